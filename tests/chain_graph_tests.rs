//! Integration tests for LWF chain-graph decomposition.

use gmodels::{Edge, Graph, LwfChainGraph, PgmError, Vertex};

/// The four-vertex example: A - B and C - D undirected, B -> C directed.
fn four_vertex_chain() -> Graph {
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
fn end_to_end_decomposition_of_the_four_vertex_example() {
    let cg = LwfChainGraph::new(four_vertex_chain()).unwrap();

    assert_eq!(
        cg.chain_components(),
        &[
            vec!["A".to_string(), "B".to_string()],
            vec!["C".to_string(), "D".to_string()],
        ]
    );

    let dag = cg.chain_dag();
    assert_eq!(dag.vertex_count(), 2);
    assert_eq!(dag.edge_count(), 1);
    let e = dag.edges().next().unwrap();
    assert!(e.is_directed());
    assert_eq!(e.start(), "c0");
    assert_eq!(e.end(), "c1");

    // the edge runs from component({A,B}) to component({C,D})
    assert_eq!(cg.component_index("B").unwrap(), 0);
    assert_eq!(cg.component_index("C").unwrap(), 1);
}

#[test]
fn connected_undirected_graph_yields_single_vertex_dag() {
    let mut g = Graph::new("g");
    for v in ["a", "b", "c", "d"] {
        g.add_vertex(Vertex::new(v)).unwrap();
    }
    g.add_edge(Edge::undirected("ab", "a", "b")).unwrap();
    g.add_edge(Edge::undirected("bc", "b", "c")).unwrap();
    g.add_edge(Edge::undirected("cd", "c", "d")).unwrap();

    let cg = LwfChainGraph::new(g).unwrap();
    assert_eq!(cg.chain_components().len(), 1);
    let dag = cg.chain_dag();
    assert_eq!(dag.vertex_count(), 1);
    assert_eq!(dag.edge_count(), 0);
}

#[test]
fn component_cycle_a_b_c_a_is_rejected() {
    let mut g = Graph::new("g");
    for v in ["A", "B", "C"] {
        g.add_vertex(Vertex::new(v)).unwrap();
    }
    g.add_edge(Edge::directed("AB", "A", "B")).unwrap();
    g.add_edge(Edge::directed("BC", "B", "C")).unwrap();
    g.add_edge(Edge::directed("CA", "C", "A")).unwrap();

    match LwfChainGraph::new(g) {
        Err(PgmError::InvalidChainGraph(_)) => {}
        other => panic!("expected InvalidChainGraph, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn longer_component_cycle_is_rejected() {
    // two undirected pairs with directed edges both ways between them
    let mut g = Graph::new("g");
    for v in ["A", "B", "C", "D"] {
        g.add_vertex(Vertex::new(v)).unwrap();
    }
    g.add_edge(Edge::undirected("AB", "A", "B")).unwrap();
    g.add_edge(Edge::undirected("CD", "C", "D")).unwrap();
    g.add_edge(Edge::directed("BC", "B", "C")).unwrap();
    g.add_edge(Edge::directed("DA", "D", "A")).unwrap();

    assert!(matches!(
        LwfChainGraph::new(g),
        Err(PgmError::InvalidChainGraph(_))
    ));
}

#[test]
fn pure_dag_has_singleton_components() {
    let mut g = Graph::new("g");
    for v in ["A", "B", "C"] {
        g.add_vertex(Vertex::new(v)).unwrap();
    }
    g.add_edge(Edge::directed("AB", "A", "B")).unwrap();
    g.add_edge(Edge::directed("AC", "A", "C")).unwrap();

    let cg = LwfChainGraph::new(g).unwrap();
    assert_eq!(cg.chain_components().len(), 3);
    assert_eq!(cg.chain_dag().vertex_count(), 3);
    assert_eq!(cg.chain_dag().edge_count(), 2);
}

#[test]
fn source_graph_is_kept_intact() {
    let g = four_vertex_chain();
    let cg = LwfChainGraph::new(g.clone()).unwrap();
    assert_eq!(cg.graph(), &g);
    assert_eq!(cg.graph().edge_count(), 3);
}
