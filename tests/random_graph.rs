use ferrite_ftwt::{ConfigError, Connectivity, GraphParams, RandomGraph};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params(min_verts: usize, max_verts: usize, edge_probability: f64) -> GraphParams {
    GraphParams {
        min_verts,
        max_verts,
        edge_probability,
        min_edge_weight: 0.5,
        max_edge_weight: 2.0,
        connectivity: Connectivity::BestEffort,
    }
}

#[test]
fn equal_vertex_bounds_give_exact_count() {
    let mut rng = StdRng::seed_from_u64(1);
    for n in [1, 2, 7, 30] {
        let graph = RandomGraph::generate(params(n, n, 0.3), &mut rng).unwrap();
        assert_eq!(graph.num_verts(), n);
    }
}

#[test]
fn vertex_count_stays_in_half_open_range() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..20 {
        let graph = RandomGraph::generate(params(5, 9, 0.2), &mut rng).unwrap();
        assert!((5..9).contains(&graph.num_verts()));
    }
}

#[test]
fn full_probability_connects_every_ordered_pair() {
    let mut rng = StdRng::seed_from_u64(3);
    let graph = RandomGraph::generate(params(12, 12, 1.0), &mut rng).unwrap();
    assert_eq!(graph.num_edges(), 12 * 11);
    for i in 0..12 {
        assert!(!graph.has_edge(i, i), "self loop at {}", i);
        for j in (0..12).filter(|&j| j != i) {
            assert!(graph.has_edge(i, j), "missing {} -> {}", i, j);
        }
    }
    assert_eq!(graph.islands().len(), 1);
}

#[test]
fn weights_stay_within_bounds_and_edges_match_count() {
    let mut rng = StdRng::seed_from_u64(4);
    let graph = RandomGraph::generate(params(40, 60, 0.25), &mut rng).unwrap();
    let edges = graph.edges();
    assert_eq!(edges.len(), graph.num_edges());
    for e in &edges {
        assert!(e.value >= 0.5 && e.value <= 2.0, "weight {} out of range", e.value);
        assert_ne!(e.row, e.col);
        assert!(e.row < graph.num_verts() && e.col < graph.num_verts());
    }
}

#[test]
fn strict_connectivity_yields_one_weak_component() {
    let mut rng = StdRng::seed_from_u64(5);
    for p in [0.0, 0.01, 0.05] {
        let mut strict = params(50, 50, p);
        strict.connectivity = Connectivity::Strict;
        let graph = RandomGraph::generate(strict, &mut rng).unwrap();
        assert_eq!(graph.weak_component_count(), 1, "p = {}", p);
    }
}

#[test]
fn same_seed_reproduces_the_graph() {
    let a = RandomGraph::generate(params(20, 40, 0.2), &mut StdRng::seed_from_u64(77)).unwrap();
    let b = RandomGraph::generate(params(20, 40, 0.2), &mut StdRng::seed_from_u64(77)).unwrap();
    assert_eq!(a.num_verts(), b.num_verts());
    assert_eq!(a.adjacencies(), b.adjacencies());
}

#[test]
fn degenerate_parameters_are_rejected() {
    let mut rng = StdRng::seed_from_u64(6);

    let err = RandomGraph::generate(params(10, 5, 0.5), &mut rng).unwrap_err();
    assert_eq!(err, ConfigError::VertexRange { min: 10, max: 5 });

    let err = RandomGraph::generate(params(0, 0, 0.5), &mut rng).unwrap_err();
    assert_eq!(err, ConfigError::EmptyGraph);

    let err = RandomGraph::generate(params(3, 3, 1.5), &mut rng).unwrap_err();
    assert_eq!(err, ConfigError::EdgeProbability(1.5));

    let mut bad_weights = params(3, 3, 0.5);
    bad_weights.min_edge_weight = 3.0;
    let err = RandomGraph::generate(bad_weights, &mut rng).unwrap_err();
    assert_eq!(err, ConfigError::EdgeWeightRange { min: 3.0, max: 2.0 });
}
