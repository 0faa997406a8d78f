//! Code distance on repetition codes and memory experiments.

use crate::common;

use decograph_core::dem::dem_to_decoding_graph_and_logicals;
use decograph_core::graph::{DecodingCode, probability_to_weight};
use decograph_core::tools::{
    change_graph_error_probabilities, compute_graph_distance, compute_graph_distance_for_logical,
    unweight_graph, worst_case_num_detectors,
};
use proptest::prelude::*;

#[test]
fn test_repetition_distance_grows_with_size() {
    for d in 3..9 {
        let (graph, logicals) = common::repetition_code(d, 0.01);
        let distance = compute_graph_distance(&unweight_graph(&graph), &logicals).unwrap();
        assert_eq!(distance.num_edges(), d as usize, "d = {d}");
        common::assert_close(distance.weight, f64::from(d), 1e-12);
    }
}

#[test]
fn test_memory_experiment_distance() {
    let p = 0.001;
    let dem = common::repetition_memory_dem(5, 4, p);
    let (graph, logicals) = dem_to_decoding_graph_and_logicals(&dem).unwrap();
    assert_eq!(graph.num_detectors(), 16);

    let distance = compute_graph_distance(&graph, &logicals).unwrap();
    assert_eq!(distance.num_edges(), 5);
    common::assert_close(distance.weight, 5.0 * probability_to_weight(p).unwrap(), 1e-9);

    // A logical error is undetectable.
    assert!(graph.syndrome_of(&distance.edges).is_empty());
    assert_eq!(logicals.flipped_by(&distance.edges), vec![true]);

    assert_eq!(worst_case_num_detectors(&graph, &logicals).unwrap(), 6);
}

#[test]
fn test_distance_is_deterministic() {
    let dem = common::repetition_memory_dem(4, 3, 0.01);
    let (graph, logicals) = dem_to_decoding_graph_and_logicals(&dem).unwrap();
    let first = compute_graph_distance_for_logical(&graph, &logicals, 0).unwrap();
    for _ in 0..5 {
        assert_eq!(compute_graph_distance_for_logical(&graph, &logicals, 0).unwrap(), first);
    }
}

proptest! {
    /// Whatever the weights, the distance is a non-empty undetectable error
    /// flipping the logical, and its weight is the sum of its edges.
    #[test]
    fn prop_distance_is_logical_error(
        probabilities in prop::collection::vec(0.001f64..0.49, 6),
    ) {
        let (graph, logicals) = common::repetition_code(6, 0.1);
        let graph = change_graph_error_probabilities(&graph, &probabilities).unwrap();
        let distance = compute_graph_distance_for_logical(&graph, &logicals, 0).unwrap();

        prop_assert!(distance.num_edges() >= 1);
        prop_assert!(graph.syndrome_of(&distance.edges).is_empty());
        prop_assert_eq!(logicals.flipped_by(&distance.edges), vec![true]);

        let total: f64 = distance
            .edges
            .iter()
            .map(|&id| graph.edge_record(id).unwrap().weight())
            .sum();
        prop_assert!((total - distance.weight).abs() < 1e-9);
    }
}
