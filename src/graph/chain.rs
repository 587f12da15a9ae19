//! LWF chain graphs: chain-component decomposition and the chain DAG.
//!
//! A chain graph mixes directed and undirected edges. Its *chain
//! components* are the maximal vertex sets connected by undirected edges
//! alone; contracting each component to a single node and keeping the
//! inter-component directed edges (deduplicated) yields the *chain DAG*.
//! The structure is well defined only when that DAG is acyclic and no
//! directed edge lies inside a component; both conditions are checked at
//! construction and violations are reported as
//! [`PgmError::InvalidChainGraph`].
//!
//! Construction is a pure function of the input graph, done in two explicit
//! passes (partition, then contract-and-check) so each invariant can be
//! verified right after the pass that establishes it. No incremental state
//! is maintained afterwards.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::PgmError;
use crate::graph::analysis;
use crate::graph::graph::Graph;
use crate::graph::object::{Edge, Vertex};

/// A validated LWF chain graph: the source graph plus its decomposition.
///
/// The decomposition (components, membership index, chain DAG) is computed
/// once at construction; all accessors are read-only views.
#[derive(Debug, Clone)]
pub struct LwfChainGraph {
    graph: Graph,
    components: Vec<Vec<String>>,
    component_of: FxHashMap<String, usize>,
    chain_dag: Graph,
}

impl LwfChainGraph {
    /// Decomposes `graph` into chain components and builds the chain DAG.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidChainGraph`] if a directed edge connects
    /// two vertices of the same chain component, or if the contracted
    /// component DAG contains a directed cycle. Errors are raised rather
    /// than repaired: an invalid chain graph is a caller mistake.
    pub fn new(graph: Graph) -> Result<Self, PgmError> {
        // Pass 1: partition. Components of the undirected-edge subgraph
        // (every vertex, undirected edges only).
        let skeleton = undirected_skeleton(&graph);
        let components = analysis::components_as_node_sets(&skeleton);
        let mut component_of: FxHashMap<String, usize> = FxHashMap::default();
        for (idx, members) in components.iter().enumerate() {
            for m in members {
                component_of.insert(m.clone(), idx);
            }
        }

        // Pass 2: contract and check.
        let mut dag = Graph::new(format!("chain_dag({})", graph.id()));
        for idx in 0..components.len() {
            dag.add_vertex(Vertex::new(component_id(idx)))?;
        }
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut contracted: Vec<(usize, usize)> = Vec::new();
        for e in graph.edges() {
            if !e.is_directed() {
                continue;
            }
            let cu = component_of[e.start()];
            let cv = component_of[e.end()];
            if cu == cv {
                return Err(PgmError::InvalidChainGraph(format!(
                    "directed edge '{}' lies inside chain component {}",
                    e.id(),
                    component_id(cu)
                )));
            }
            if seen.insert((cu, cv)) {
                contracted.push((cu, cv));
                dag.add_edge(Edge::directed(
                    format!("{}->{}", component_id(cu), component_id(cv)),
                    component_id(cu),
                    component_id(cv),
                ))?;
            }
        }
        check_acyclic(components.len(), &contracted)?;

        Ok(Self {
            graph,
            components,
            component_of,
            chain_dag: dag,
        })
    }

    /// The source graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Chain components as vertex-id sets, in discovery order.
    pub fn chain_components(&self) -> &[Vec<String>] {
        &self.components
    }

    /// Chain components materialized as induced subgraphs of the source
    /// graph. Each contains its members' undirected edges and no directed
    /// edges (those are inter-component by construction).
    pub fn chain_component_graphs(&self) -> Vec<Graph> {
        self.components
            .iter()
            .map(|ids| {
                self.graph
                    .subgraph_by_vertices(ids.iter().map(String::as_str))
            })
            .collect()
    }

    /// The chain DAG: one vertex `c{i}` per chain component, one directed
    /// edge per deduplicated inter-component directed edge.
    pub fn chain_dag(&self) -> &Graph {
        &self.chain_dag
    }

    /// Index of the chain component containing a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if the vertex is not in the
    /// source graph.
    pub fn component_index(&self, vertex_id: &str) -> Result<usize, PgmError> {
        self.component_of
            .get(vertex_id)
            .copied()
            .ok_or_else(|| PgmError::VertexNotFound {
                vertex: vertex_id.to_string(),
                graph: self.graph.id().to_string(),
            })
    }
}

/// Synthetic id of the `idx`-th chain component.
fn component_id(idx: usize) -> String {
    format!("c{}", idx)
}

/// The subgraph with every vertex of `graph` and only its undirected edges.
fn undirected_skeleton(graph: &Graph) -> Graph {
    let mut s = Graph::new(format!("skeleton({})", graph.id()));
    for id in graph.vertex_ids() {
        if let Some(v) = graph.vertex_arc(id) {
            s.insert_shared_vertex(Arc::clone(v));
        }
    }
    for e in graph.edges() {
        if !e.is_directed() {
            if let Some(a) = graph.edge_arc(e.id()) {
                s.insert_shared_edge(Arc::clone(a));
            }
        }
    }
    s
}

/// Kahn's algorithm over the contracted edges; errors if a cycle remains.
fn check_acyclic(n: usize, edges: &[(usize, usize)]) -> Result<(), PgmError> {
    let mut indegree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(u, v) in edges {
        indegree[v] += 1;
        successors[u].push(v);
    }
    let mut ready: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut emitted = 0usize;
    while let Some(u) = ready.pop() {
        emitted += 1;
        for &v in &successors[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                ready.push(v);
            }
        }
    }
    if emitted != n {
        return Err(PgmError::InvalidChainGraph(
            "contracted component graph contains a directed cycle".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::object::Vertex;

    fn chain_example() -> Graph {
        // A - B (undirected), C - D (undirected), B -> C (directed)
        let mut g = Graph::new("g");
        for v in ["A", "B", "C", "D"] {
            g.add_vertex(Vertex::new(v)).unwrap();
        }
        g.add_edge(Edge::undirected("AB", "A", "B")).unwrap();
        g.add_edge(Edge::undirected("CD", "C", "D")).unwrap();
        g.add_edge(Edge::directed("BC", "B", "C")).unwrap();
        g
    }

    #[test]
    fn decomposes_into_two_chain_components() {
        let cg = LwfChainGraph::new(chain_example()).unwrap();
        assert_eq!(
            cg.chain_components(),
            &[
                vec!["A".to_string(), "B".to_string()],
                vec!["C".to_string(), "D".to_string()],
            ]
        );
        assert_eq!(cg.component_index("A").unwrap(), 0);
        assert_eq!(cg.component_index("D").unwrap(), 1);
    }

    #[test]
    fn chain_dag_has_one_contracted_edge() {
        let cg = LwfChainGraph::new(chain_example()).unwrap();
        let dag = cg.chain_dag();
        assert_eq!(dag.vertex_count(), 2);
        assert_eq!(dag.edge_count(), 1);
        let e = dag.edges().next().unwrap();
        assert_eq!((e.start(), e.end()), ("c0", "c1"));
        assert!(e.is_directed());
    }

    #[test]
    fn duplicate_inter_component_edges_collapse() {
        let mut g = chain_example();
        g.add_edge(Edge::directed("AC", "A", "C")).unwrap();
        let cg = LwfChainGraph::new(g).unwrap();
        assert_eq!(cg.chain_dag().edge_count(), 1);
    }

    #[test]
    fn connected_undirected_graph_contracts_to_single_vertex() {
        let mut g = Graph::new("g");
        for v in ["a", "b", "c"] {
            g.add_vertex(Vertex::new(v)).unwrap();
        }
        g.add_edge(Edge::undirected("ab", "a", "b")).unwrap();
        g.add_edge(Edge::undirected("bc", "b", "c")).unwrap();
        let cg = LwfChainGraph::new(g).unwrap();
        assert_eq!(cg.chain_components().len(), 1);
        assert_eq!(cg.chain_dag().vertex_count(), 1);
        assert_eq!(cg.chain_dag().edge_count(), 0);
    }

    #[test]
    fn component_cycle_is_rejected() {
        let mut g = Graph::new("g");
        for v in ["A", "B", "C"] {
            g.add_vertex(Vertex::new(v)).unwrap();
        }
        g.add_edge(Edge::directed("AB", "A", "B")).unwrap();
        g.add_edge(Edge::directed("BC", "B", "C")).unwrap();
        g.add_edge(Edge::directed("CA", "C", "A")).unwrap();
        let err = LwfChainGraph::new(g).unwrap_err();
        assert!(matches!(err, PgmError::InvalidChainGraph(_)));
    }

    #[test]
    fn directed_edge_inside_component_is_rejected() {
        let mut g = Graph::new("g");
        for v in ["a", "b"] {
            g.add_vertex(Vertex::new(v)).unwrap();
        }
        g.add_edge(Edge::undirected("ab", "a", "b")).unwrap();
        g.add_edge(Edge::directed("ab2", "a", "b")).unwrap();
        let err = LwfChainGraph::new(g).unwrap_err();
        assert!(matches!(err, PgmError::InvalidChainGraph(_)));
    }

    #[test]
    fn empty_graph_yields_empty_dag() {
        let cg = LwfChainGraph::new(Graph::new("g")).unwrap();
        assert!(cg.chain_components().is_empty());
        assert!(cg.chain_dag().is_empty());
    }

    #[test]
    fn component_graphs_keep_undirected_edges_only() {
        let cg = LwfChainGraph::new(chain_example()).unwrap();
        let graphs = cg.chain_component_graphs();
        assert_eq!(graphs.len(), 2);
        assert!(graphs[0].has_edge("AB"));
        assert!(!graphs[0].has_edge("BC"));
        assert!(graphs[1].has_edge("CD"));
    }
}
