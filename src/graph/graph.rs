//! The graph ADT and its set algebra.
//!
//! A [`Graph`] owns an insertion-ordered set of vertices and edges, keyed
//! by object id. The single structural invariant is that every edge's two
//! endpoints are members of the vertex set; all mutation paths preserve it
//! and all algebra operations re-establish it on their results.
//!
//! Vertices and edges are held behind `Arc`, so the algebra shares objects
//! between operand and result graphs instead of deep-copying them: the same
//! vertex object can participate in many graphs at once.
//!
//! All algebra operations are pure. They build a fresh graph and never
//! mutate their operands; on error, nothing is observable.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::errors::PgmError;
use crate::graph::object::{Edge, Vertex};

/// A possibly-directed graph over id-keyed vertex and edge objects.
///
/// Iteration order over vertices and edges is insertion order, which makes
/// every derived traversal (components, chain decomposition) deterministic
/// for a given construction sequence.
#[derive(Debug, Clone)]
pub struct Graph {
    id: String,
    vertices: IndexMap<String, Arc<Vertex>>,
    edges: IndexMap<String, Arc<Edge>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    /// Builds a graph from vertex and edge lists.
    ///
    /// # Errors
    ///
    /// Fails like the corresponding [`add_vertex`](Graph::add_vertex) /
    /// [`add_edge`](Graph::add_edge) calls: duplicate ids are
    /// [`PgmError::InvalidGraph`], a missing edge endpoint is
    /// [`PgmError::EdgeEndpoint`].
    pub fn from_members(
        id: impl Into<String>,
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
    ) -> Result<Self, PgmError> {
        let mut g = Graph::new(id);
        for v in vertices {
            g.add_vertex(v)?;
        }
        for e in edges {
            g.add_edge(e)?;
        }
        Ok(g)
    }

    /// The graph id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no vertices (and therefore no edges).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether a vertex with this id is a member.
    pub fn has_vertex(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Whether an edge with this id is a member.
    pub fn has_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Looks up a vertex by id.
    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id).map(Arc::as_ref)
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id).map(Arc::as_ref)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values().map(Arc::as_ref)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().map(Arc::as_ref)
    }

    /// Vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = &str> {
        self.vertices.keys().map(String::as_str)
    }

    /// Edge ids in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Adds a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidGraph`] if a vertex with the same id is
    /// already a member. Silent replacement is refused because the existing
    /// object may carry a different payload or be referenced by edges.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), PgmError> {
        if self.vertices.contains_key(vertex.id()) {
            return Err(PgmError::InvalidGraph(format!(
                "duplicate vertex id '{}' in graph '{}'",
                vertex.id(),
                self.id
            )));
        }
        self.vertices
            .insert(vertex.id().to_string(), Arc::new(vertex));
        Ok(())
    }

    /// Adds an edge. Both endpoints must already be members.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::EdgeEndpoint`] if an endpoint vertex is absent,
    /// or [`PgmError::InvalidGraph`] on a duplicate edge id.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), PgmError> {
        if self.edges.contains_key(edge.id()) {
            return Err(PgmError::InvalidGraph(format!(
                "duplicate edge id '{}' in graph '{}'",
                edge.id(),
                self.id
            )));
        }
        for endpoint in [edge.start(), edge.end()] {
            if !self.vertices.contains_key(endpoint) {
                return Err(PgmError::EdgeEndpoint {
                    edge: edge.id().to_string(),
                    vertex: endpoint.to_string(),
                    graph: self.id.clone(),
                });
            }
        }
        self.edges.insert(edge.id().to_string(), Arc::new(edge));
        Ok(())
    }

    /// Removes a vertex and every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if the vertex is absent.
    pub fn remove_vertex(&mut self, id: &str) -> Result<(), PgmError> {
        if self.vertices.shift_remove(id).is_none() {
            return Err(PgmError::VertexNotFound {
                vertex: id.to_string(),
                graph: self.id.clone(),
            });
        }
        self.edges.retain(|_, e| !e.is_endpoint(id));
        Ok(())
    }

    /// Removes an edge, returning it if it was a member.
    pub fn remove_edge(&mut self, id: &str) -> Option<Arc<Edge>> {
        self.edges.shift_remove(id)
    }

    /// Edges incident to a vertex, in insertion order.
    pub fn incident_edges(&self, vertex_id: &str) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|e| e.is_endpoint(vertex_id))
            .map(Arc::as_ref)
            .collect()
    }

    /// Neighbour vertex ids of a vertex, ignoring edge direction.
    ///
    /// Deduplicated, in first-incidence order. A self-loop makes a vertex
    /// its own neighbour.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if the vertex is absent.
    pub fn neighbours_of(&self, vertex_id: &str) -> Result<Vec<&str>, PgmError> {
        if !self.vertices.contains_key(vertex_id) {
            return Err(PgmError::VertexNotFound {
                vertex: vertex_id.to_string(),
                graph: self.id.clone(),
            });
        }
        let mut seen: Vec<&str> = Vec::new();
        for e in self.edges.values() {
            if e.is_endpoint(vertex_id) {
                let other = if e.start() == vertex_id {
                    e.end()
                } else {
                    e.start()
                };
                if !seen.contains(&other) {
                    seen.push(other);
                }
            }
        }
        Ok(seen)
    }

    // Internal Arc accessors; the algebra shares objects through these
    // rather than cloning the underlying data.

    pub(crate) fn vertex_arc(&self, id: &str) -> Option<&Arc<Vertex>> {
        self.vertices.get(id)
    }

    pub(crate) fn edge_arc(&self, id: &str) -> Option<&Arc<Edge>> {
        self.edges.get(id)
    }

    pub(crate) fn insert_shared_vertex(&mut self, vertex: Arc<Vertex>) {
        self.vertices.insert(vertex.id().to_string(), vertex);
    }

    pub(crate) fn insert_shared_edge(&mut self, edge: Arc<Edge>) {
        self.edges.insert(edge.id().to_string(), edge);
    }

    /// Checks the edge-endpoint invariant over the whole graph.
    fn check_endpoints(&self) -> Result<(), PgmError> {
        for e in self.edges.values() {
            for endpoint in [e.start(), e.end()] {
                if !self.vertices.contains_key(endpoint) {
                    return Err(PgmError::EdgeEndpoint {
                        edge: e.id().to_string(),
                        vertex: endpoint.to_string(),
                        graph: self.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Union: vertices of both graphs, edges of both graphs, by id.
    ///
    /// Objects present in both operands are taken from `self`; duplicate
    /// ids collapse without error, matching set semantics.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidGraph`] if the combined edge set violates
    /// the endpoint invariant. This cannot happen when both operands are
    /// valid; the check guards against graphs built through future
    /// non-validating paths.
    pub fn union(&self, other: &Graph) -> Result<Graph, PgmError> {
        let mut g = Graph::new(format!("union({},{})", self.id, other.id));
        for v in self.vertices.values() {
            g.insert_shared_vertex(Arc::clone(v));
        }
        for v in other.vertices.values() {
            if !g.vertices.contains_key(v.id()) {
                g.insert_shared_vertex(Arc::clone(v));
            }
        }
        for e in self.edges.values() {
            g.insert_shared_edge(Arc::clone(e));
        }
        for e in other.edges.values() {
            if !g.edges.contains_key(e.id()) {
                g.insert_shared_edge(Arc::clone(e));
            }
        }
        g.check_endpoints()
            .map_err(|e| PgmError::InvalidGraph(format!("union produced a dangling edge: {}", e)))?;
        Ok(g)
    }

    /// Intersection: vertices present in both graphs; edges present in
    /// both graphs whose endpoints both survive.
    pub fn intersection(&self, other: &Graph) -> Graph {
        let mut g = Graph::new(format!("intersection({},{})", self.id, other.id));
        for v in self.vertices.values() {
            if other.vertices.contains_key(v.id()) {
                g.insert_shared_vertex(Arc::clone(v));
            }
        }
        for e in self.edges.values() {
            if other.edges.contains_key(e.id())
                && g.vertices.contains_key(e.start())
                && g.vertices.contains_key(e.end())
            {
                g.insert_shared_edge(Arc::clone(e));
            }
        }
        g
    }

    /// Difference: vertices of `self` not in `other`; edges of `self`
    /// whose endpoints both remain, minus edges also in `other`.
    ///
    /// Not commutative.
    pub fn difference(&self, other: &Graph) -> Graph {
        let mut g = Graph::new(format!("difference({},{})", self.id, other.id));
        for v in self.vertices.values() {
            if !other.vertices.contains_key(v.id()) {
                g.insert_shared_vertex(Arc::clone(v));
            }
        }
        for e in self.edges.values() {
            if !other.edges.contains_key(e.id())
                && g.vertices.contains_key(e.start())
                && g.vertices.contains_key(e.end())
            {
                g.insert_shared_edge(Arc::clone(e));
            }
        }
        g
    }

    /// Symmetric difference, computed literally as
    /// `difference(union(self, other), intersection(self, other))` so the
    /// defining identity holds exactly.
    pub fn symmetric_difference(&self, other: &Graph) -> Result<Graph, PgmError> {
        let u = self.union(other)?;
        let i = self.intersection(other);
        let mut g = u.difference(&i);
        g.id = format!("symmetric_difference({},{})", self.id, other.id);
        Ok(g)
    }

    /// Induced subgraph on a vertex subset: the listed vertices and every
    /// edge both of whose endpoints are in the subset.
    ///
    /// Ids not present in the graph are ignored. An empty subset yields an
    /// empty graph, not an error.
    pub fn subgraph_by_vertices<'a, I>(&self, vertex_ids: I) -> Graph
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut g = Graph::new(format!("subgraph({})", self.id));
        for id in vertex_ids {
            if let Some(v) = self.vertices.get(id) {
                if !g.vertices.contains_key(id) {
                    g.insert_shared_vertex(Arc::clone(v));
                }
            }
        }
        for e in self.edges.values() {
            if g.vertices.contains_key(e.start()) && g.vertices.contains_key(e.end()) {
                g.insert_shared_edge(Arc::clone(e));
            }
        }
        g
    }
}

/// Graphs compare equal when their vertex-id sets and edge-id sets are
/// equal. The graph id and iteration order do not participate.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.vertices.len() == other.vertices.len()
            && self.edges.len() == other.edges.len()
            && self.vertices.keys().all(|k| other.vertices.contains_key(k))
            && self.edges.keys().all(|k| other.edges.contains_key(k))
    }
}

impl Eq for Graph {}
