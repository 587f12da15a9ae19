//! Connectivity analysis: connected components and their materialization.
//!
//! Components are computed under *undirected* reachability: a directed
//! edge connects its endpoints for this analysis regardless of direction.
//! This is deliberate and load-bearing for the chain-graph decomposition,
//! which runs this pass over the undirected-edge subgraph.
//!
//! All functions here are stateless and read-only; they never mutate the
//! graph they analyze. Component order is first-discovery order over the
//! graph's vertex insertion order, so results are reproducible for a given
//! construction sequence.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::PgmError;
use crate::graph::graph::Graph;

type Adjacency<'a> = FxHashMap<&'a str, SmallVec<[&'a str; 4]>>;

/// Builds an undirected adjacency index over the graph, O(V+E).
fn adjacency(graph: &Graph) -> Adjacency<'_> {
    let mut adj: Adjacency<'_> = FxHashMap::default();
    for v in graph.vertex_ids() {
        adj.entry(v).or_default();
    }
    for e in graph.edges() {
        adj.entry(e.start()).or_default().push(e.end());
        if e.start() != e.end() {
            adj.entry(e.end()).or_default().push(e.start());
        }
    }
    adj
}

/// BFS forest over the adjacency index, yielding per-component vertex ids
/// in discovery order.
fn component_id_sets(graph: &Graph) -> Vec<Vec<&str>> {
    let adj = adjacency(graph);
    let mut visited: FxHashMap<&str, bool> = FxHashMap::default();
    let mut sets: Vec<Vec<&str>> = Vec::new();

    for root in graph.vertex_ids() {
        if visited.contains_key(root) {
            continue;
        }
        let mut members: Vec<&str> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(root, true);
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            members.push(v);
            if let Some(ns) = adj.get(v) {
                for n in ns {
                    if !visited.contains_key(n) {
                        visited.insert(n, true);
                        queue.push_back(n);
                    }
                }
            }
        }
        sets.push(members);
    }
    sets
}

/// Partitions the graph into maximal connected components, each
/// materialized as an induced subgraph.
///
/// Every vertex of the input appears in exactly one component; the union
/// of the components' vertex sets is the input vertex set. The induced
/// edge set of each component is exact: no dangling edges.
pub fn components(graph: &Graph) -> Vec<Graph> {
    component_id_sets(graph)
        .into_iter()
        .map(|ids| graph.subgraph_by_vertices(ids))
        .collect()
}

/// Like [`components`], but returns vertex-id sets only. Cheaper when
/// membership is all that is needed.
pub fn components_as_node_sets(graph: &Graph) -> Vec<Vec<String>> {
    component_id_sets(graph)
        .into_iter()
        .map(|ids| ids.into_iter().map(str::to_string).collect())
        .collect()
}

/// The component containing `vertex_id`, as an induced subgraph.
///
/// # Errors
///
/// Returns [`PgmError::VertexNotFound`] if the vertex is not a member of
/// the graph.
pub fn component_of(graph: &Graph, vertex_id: &str) -> Result<Graph, PgmError> {
    if !graph.has_vertex(vertex_id) {
        return Err(PgmError::VertexNotFound {
            vertex: vertex_id.to_string(),
            graph: graph.id().to_string(),
        });
    }
    let sets = component_id_sets(graph);
    let ids = sets
        .into_iter()
        .find(|ids| ids.contains(&vertex_id))
        .unwrap_or_default();
    Ok(graph.subgraph_by_vertices(ids))
}

/// Vertex ids of the component at `index` in discovery order, or `None`
/// if there are fewer components.
pub fn component_nodes(graph: &Graph, index: usize) -> Option<Vec<String>> {
    components_as_node_sets(graph).into_iter().nth(index)
}
