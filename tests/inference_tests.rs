//! End-to-end inference tests: factor algebra through model queries.
//!
//! Expected numbers follow the worked examples in Darwiche 2009, ch. 6.

use gmodels::{Edge, Factor, Graph, Outcome, PgModel, RandomVariable, Vertex};

fn var01(id: &str) -> RandomVariable {
    RandomVariable::new(id, vec![Outcome::Int(0), Outcome::Int(1)]).unwrap()
}

#[test]
fn product_of_two_binary_factors_tabulates_pointwise() {
    let f1 = Factor::new(vec![var01("x")], vec![0.6, 0.4]).unwrap();
    let f2 = Factor::new(vec![var01("y")], vec![0.3, 0.7]).unwrap();
    let p = f1.product(&f2).unwrap();

    // lexicographic (x, y) order
    assert_eq!(p.weights(), &[0.18, 0.42, 0.12, 0.28]);

    // spot-check via assignment lookup
    let w = p
        .phi(&[("x", Outcome::Int(1)), ("y", Outcome::Int(0))])
        .unwrap();
    assert!((w - 0.12).abs() < 1e-12);
}

#[test]
fn unit_factor_is_the_product_identity() {
    let f = Factor::new(vec![var01("x"), var01("y")], vec![0.1, 0.2, 0.3, 0.4]).unwrap();
    assert_eq!(f.product(&Factor::unit()).unwrap(), f);
}

#[test]
fn reduction_then_product_is_evidence_conditioning() {
    let f1 = Factor::new(vec![var01("x"), var01("y")], vec![0.9, 0.1, 0.2, 0.8]).unwrap();
    let f2 = Factor::new(vec![var01("y")], vec![0.5, 0.5]).unwrap();
    let reduced = f1.reduce("x", &Outcome::Int(0)).unwrap();
    let p = reduced.product(&f2).unwrap();
    assert_eq!(p.scope().len(), 1);
    assert!((p.weights()[0] - 0.45).abs() < 1e-12);
    assert!((p.weights()[1] - 0.05).abs() < 1e-12);
}

fn darwiche_abc() -> PgModel {
    let a = RandomVariable::binary("a");
    let b = RandomVariable::binary("b");
    let c = RandomVariable::binary("c");

    let mut g = Graph::new("pgm");
    for v in [&a, &b, &c] {
        g.add_vertex(Vertex::from_variable(v.clone())).unwrap();
    }
    g.add_edge(Edge::undirected("ab", "a", "b")).unwrap();
    g.add_edge(Edge::undirected("bc", "b", "c")).unwrap();

    let phi_a = Factor::new(vec![a.clone()], vec![0.6, 0.4]).unwrap();
    let phi_ab = Factor::new(vec![a, b.clone()], vec![0.9, 0.1, 0.2, 0.8]).unwrap();
    let phi_bc = Factor::new(vec![b, c], vec![0.3, 0.7, 0.5, 0.5]).unwrap();

    PgModel::new(g, vec![phi_a, phi_ab, phi_bc]).unwrap()
}

#[test]
fn prior_marginal_of_c_by_variable_elimination() {
    let m = darwiche_abc();
    let p = m.sum_product_elimination(&["a", "b"]).unwrap();
    let t = p.phi(&[("c", Outcome::Bool(true))]).unwrap();
    let f = p.phi(&[("c", Outcome::Bool(false))]).unwrap();
    assert!((t - 0.376).abs() < 1e-9);
    assert!((f - 0.624).abs() < 1e-9);
}

#[test]
fn conditional_of_c_given_a_true() {
    let m = darwiche_abc();
    let p = m.query(&["c"], &[("a", Outcome::Bool(true))]).unwrap();
    let t = p.phi_normal(&[("c", Outcome::Bool(true))]).unwrap();
    let f = p.phi_normal(&[("c", Outcome::Bool(false))]).unwrap();
    assert!((t - 0.32).abs() < 1e-9);
    assert!((f - 0.68).abs() < 1e-9);
    assert!((t + f - 1.0).abs() < 1e-12);
}

#[test]
fn elimination_order_does_not_change_the_result() {
    let m = darwiche_abc();
    let p1 = m.sum_product_elimination(&["a", "b"]).unwrap();
    let p2 = m.sum_product_elimination(&["b", "a"]).unwrap();
    assert_eq!(p1.scope(), p2.scope());
    for (x, y) in p1.weights().iter().zip(p2.weights()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn map_assignment_by_max_product_elimination() {
    // the most likely joint state of the a-b-c network is
    // (a=T, b=T, c=F) with weight 0.6 * 0.9 * 0.7 = 0.378
    let m = darwiche_abc();
    let (map, value) = m.max_product_elimination(&["a", "b", "c"]).unwrap();
    assert!((value - 0.378).abs() < 1e-9);
    assert_eq!(
        map,
        vec![
            ("a".to_string(), Outcome::Bool(true)),
            ("b".to_string(), Outcome::Bool(true)),
            ("c".to_string(), Outcome::Bool(false)),
        ]
    );
}

#[test]
fn evidence_reduction_shrinks_touched_scopes_only() {
    let m = darwiche_abc();
    let reduced = m
        .reduce_factors_with_evidence(&[("a", Outcome::Bool(true))])
        .unwrap();
    let scopes: Vec<usize> = reduced.iter().map(|f| f.scope().len()).collect();
    // phi_a becomes a constant, phi_ab drops to {b}, phi_bc is untouched
    assert_eq!(scopes, vec![0, 1, 2]);
    assert!((reduced[0].weights()[0] - 0.6).abs() < 1e-12);
}

#[test]
fn chain_structure_feeds_inference_preparation() {
    // Build the 4-vertex chain graph over variable-labeled vertices and
    // check the decomposition plays well with the probability layer.
    use gmodels::LwfChainGraph;

    let mut g = Graph::new("g");
    for id in ["A", "B", "C", "D"] {
        g.add_vertex(Vertex::from_variable(RandomVariable::binary(id)))
            .unwrap();
    }
    g.add_edge(Edge::undirected("AB", "A", "B")).unwrap();
    g.add_edge(Edge::undirected("CD", "C", "D")).unwrap();
    g.add_edge(Edge::directed("BC", "B", "C")).unwrap();

    let cg = LwfChainGraph::new(g).unwrap();
    let comps = cg.chain_component_graphs();
    assert_eq!(comps.len(), 2);
    // each chain component still carries its random variables
    for c in &comps {
        for v in c.vertices() {
            assert!(v.variable().is_some());
        }
    }
}
