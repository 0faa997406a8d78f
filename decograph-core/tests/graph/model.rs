//! The graph model across both realizations.

use std::collections::{BTreeMap, BTreeSet};

use crate::common;

use decograph_core::graph::{
    DecodingCode, DecodingEdge, DecodingHyperGraph, DecodingHyperMultiGraph, EdgeId, GraphEdge,
    NxDecodingGraph, NxDecodingMultiGraph, OrderedDecodingEdges, errors_to_syndrome,
    independent_composition,
};
use proptest::prelude::*;

/// Structural summary any realization must agree on.
fn shape<G: DecodingCode>(graph: &G) -> (Vec<u32>, Vec<Vec<u32>>, Vec<BTreeSet<u32>>) {
    let nodes = graph.nodes().iter().copied().collect();
    let edges = graph.edges().map(|(_, e, _)| e.vertices().to_vec()).collect();
    let neighbors = graph.nodes().iter().map(|&n| graph.neighbors(n)).collect();
    (nodes, edges, neighbors)
}

#[test]
fn test_realizations_agree() {
    let pairs = [(0, 1), (1, 2), (2, 3), (0, 3), (3, 4)];
    let plain = NxDecodingGraph::new(
        pairs.map(|(a, b)| common::plain(a, b, 0.1)),
        BTreeMap::new(),
        BTreeSet::from([4]),
    );
    let hyper = DecodingHyperGraph::new(
        pairs.map(|(a, b)| common::hyper(&[a, b], 0.1)),
        BTreeMap::new(),
        BTreeSet::from([4]),
    );

    assert_eq!(shape(&plain), shape(&hyper));
    assert_eq!(plain.num_detectors(), 4);
    assert_eq!(hyper.detectors().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    for node in 0..5 {
        assert_eq!(plain.incident_edges(node), hyper.incident_edges(node), "node {node}");
    }
}

#[test]
fn test_parallel_edges_per_policy() {
    let edges = [common::plain(0, 1, 0.1), common::plain(1, 0, 0.1), common::plain(1, 2, 0.3)];

    let merged = NxDecodingGraph::new(edges.clone(), BTreeMap::new(), BTreeSet::new());
    assert_eq!(merged.num_edges(), 2);
    common::assert_close(merged.edge_record(EdgeId(0)).unwrap().p_err(), 2.0 * 0.1 * 0.9, 1e-12);
    common::assert_close(
        merged.edge_record(EdgeId(0)).unwrap().weight(),
        ((1.0 - 0.18) / 0.18f64).ln(),
        1e-12,
    );

    let multi = NxDecodingMultiGraph::new(edges, BTreeMap::new(), BTreeSet::new());
    assert_eq!(multi.num_edges(), 3);
    assert_eq!(multi.incident_edges(0), vec![EdgeId(0), EdgeId(1)]);

    let hyper = DecodingHyperMultiGraph::from_edges([common::hyper(&[0, 1, 2], 0.1), common::hyper(&[2, 1, 0], 0.1)]);
    assert_eq!(hyper.num_edges(), 2);
    let hyper_merged = DecodingHyperGraph::from_edges([common::hyper(&[0, 1, 2], 0.1), common::hyper(&[2, 1, 0], 0.1)]);
    assert_eq!(hyper_merged.num_edges(), 1);
}

#[test]
fn test_syndrome_of_edge_sets() {
    let graph = NxDecodingGraph::new(
        [common::plain(0, 1, 0.1), common::plain(1, 2, 0.1), common::plain(2, 3, 0.1)],
        BTreeMap::new(),
        BTreeSet::from([3]),
    );

    assert!(graph.syndrome_of(&[]).is_empty());
    let chain = graph.syndrome_of(&[EdgeId(0), EdgeId(1)]);
    assert_eq!(chain.iter().collect::<Vec<_>>(), vec![0, 2]);
    // Boundary bits are dropped.
    assert_eq!(graph.syndrome_of(&[EdgeId(2)]).iter().collect::<Vec<_>>(), vec![2]);
    // Unknown ids are ignored.
    assert!(graph.syndrome_of(&[EdgeId(99)]).is_empty());

    let dense = chain.as_bitstring(graph.num_detectors()).unwrap();
    assert_eq!(dense.to_01_string(), "101");
}

#[test]
fn test_degree_one_edge_single_bit() {
    let graph = DecodingHyperMultiGraph::from_edges([common::hyper(&[5], 0.2)]);
    let syndrome = errors_to_syndrome(graph.edge(EdgeId(0)), graph.boundaries());
    assert_eq!(syndrome.iter().collect::<Vec<_>>(), vec![5]);
}

#[test]
fn test_ordered_edges_cancel_pairs() {
    let edges: OrderedDecodingEdges<DecodingEdge> = [(0, 1), (1, 2), (1, 0), (2, 3)]
        .into_iter()
        .map(|(a, b)| DecodingEdge::new(a, b).unwrap())
        .collect();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges.syndrome(&BTreeSet::from([3])).iter().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_with_edges_keeps_metadata() {
    let (graph, _) = decograph_core::dem_to_decoding_graph_and_logicals(common::LINE_DEM).unwrap();
    let emptied = graph.with_edges(Vec::new());
    assert_eq!(emptied.num_edges(), 0);
    assert_eq!(emptied.nodes(), graph.nodes());
    assert_eq!(emptied.boundaries(), graph.boundaries());
    assert_eq!(emptied.detector_records(), graph.detector_records());
}

proptest! {
    /// Merging two copies of an edge gives probability 2p(1-p).
    #[test]
    fn prop_duplicate_edge_composes(p in 0.0001f64..0.9999) {
        let graph = NxDecodingGraph::new(
            [common::plain(0, 1, p), common::plain(0, 1, p)],
            BTreeMap::new(),
            BTreeSet::new(),
        );
        prop_assert_eq!(graph.num_edges(), 1);
        let merged = graph.edge_record(EdgeId(0)).unwrap().p_err();
        prop_assert!((merged - 2.0 * p * (1.0 - p)).abs() < 1e-12);
    }

    /// Composition is symmetric and never leaves [0, 1].
    #[test]
    fn prop_composition_symmetric(p in 0.0f64..1.0, q in 0.0f64..1.0) {
        let pq = independent_composition(p, q);
        prop_assert!((pq - independent_composition(q, p)).abs() < 1e-15);
        prop_assert!((0.0..=1.0).contains(&pq));
    }
}
