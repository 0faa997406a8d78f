//! Hyperedge decomposition.
//!
//! Decomposing must conserve both the detection events of every mechanism
//! and its probability.

use std::collections::BTreeSet;

use crate::common;

use decograph_core::dem::dem_to_hypergraph_and_logicals;
use decograph_core::graph::{DecodingCode, DecodingEdge, GraphEdge, independent_composition};
use decograph_core::tools::{
    BoundaryStar, DecompositionScheme, ExistingEdgeCover, PairwiseCover, compute_graph_distance,
    decompose_to_graph, decompositions, is_single_connected_component,
};
use proptest::prelude::*;

/// Detectors flipped when every edge in `graph` fires.
fn detection_events<G: DecodingCode>(graph: &G) -> Vec<u32> {
    let all: Vec<_> = graph.edges().map(|(id, _, _)| id).collect();
    graph.syndrome_of(&all).iter().collect()
}

fn check_conservation(scheme: &dyn DecompositionScheme, k: u32, p: f64) -> Result<(), TestCaseError> {
    let detectors: Vec<u32> = (0..k).collect();
    let graph = common::hypergraph(&[(&detectors, p)]);
    let plain = decompose_to_graph(&graph, scheme, k).unwrap();

    prop_assert_eq!(detection_events(&plain), detectors);

    let composed = plain
        .edges()
        .map(|(_, _, r)| r.p_err())
        .fold(0.0, independent_composition);
    prop_assert!((composed - p).abs() < 1e-9, "{} composed to {}", p, composed);
    Ok(())
}

proptest! {
    /// Pairwise covers of 3 to 5 detectors conserve detection events and probability.
    #[test]
    fn prop_pairwise_conserves(k in 3u32..=5, p in 0.001f64..0.5) {
        check_conservation(&PairwiseCover::default(), k, p)?;
    }

    /// So do boundary stars.
    #[test]
    fn prop_star_conserves(k in 3u32..=5, p in 0.001f64..0.5) {
        check_conservation(&BoundaryStar, k, p)?;
    }
}

#[test]
fn test_pairing_counts_and_limit() {
    let six: Vec<u32> = (0..6).collect();
    let all = PairwiseCover::default()
        .candidates(&six, 6, &BTreeSet::new())
        .unwrap();
    // (6 - 1)!! perfect pairings.
    assert_eq!(all.len(), 15);
    assert!(all.windows(2).all(|w| w[0] < w[1]));
    assert!(all.iter().all(|cover| cover.len() == 3));

    let capped = PairwiseCover::new(2).candidates(&six, 6, &BTreeSet::new()).unwrap();
    assert_eq!(capped, all[..2].to_vec());
}

#[test]
fn test_existing_cover_found_past_candidate_limit() {
    // Nested pairs (0, 7), (1, 6), (2, 5), (3, 4) form the last of the 105
    // pairings of eight detectors, far past the default limit of 64.
    let graph = common::hypergraph(&[
        (&[0, 1, 2, 3, 4, 5, 6, 7], 0.01),
        (&[0, 7], 0.01),
        (&[1, 6], 0.01),
        (&[2, 5], 0.01),
        (&[3, 4], 0.01),
    ]);
    let covers = decompositions(&graph, &ExistingEdgeCover::default(), 8).unwrap();
    let expected: Vec<DecodingEdge> = [(0, 7), (1, 6), (2, 5), (3, 4)]
        .into_iter()
        .map(|(a, b)| DecodingEdge::new(a, b).unwrap())
        .collect();
    assert_eq!(covers[&decograph_core::EdgeId(0)], vec![expected]);

    let plain = decompose_to_graph(&graph, &ExistingEdgeCover::default(), 8).unwrap();
    assert_eq!(plain.num_edges(), 4);
}

#[test]
fn test_hyperedge_dem_becomes_matchable() {
    let dem = "error(0.01) D0 D1 D2 L0
error(0.01) D0 D1
error(0.01) D1 D2
error(0.01) D2
error(0.01) D0
detector(0, 0) D0
detector(1, 0) D1
detector(2, 0) D2";
    let (hyper, logicals) = dem_to_hypergraph_and_logicals(dem).unwrap();
    assert_eq!(hyper.max_degree(), 3);

    let covers = decompositions(&hyper, &PairwiseCover::default(), 3).unwrap();
    assert_eq!(covers.len(), 1);
    let first = &covers[&decograph_core::EdgeId(0)][0];
    assert_eq!(first, &vec![DecodingEdge::new(0, 1).unwrap(), DecodingEdge::new(2, 3).unwrap()]);

    let plain = decompose_to_graph(&hyper, &PairwiseCover::default(), 3).unwrap();
    assert!(plain.edges().all(|(_, e, _)| e.degree() == 2));
    assert!(is_single_connected_component(&plain));
    assert_eq!(plain.detector_records(), hyper.detector_records());

    // Decomposition merged edges, so the hypergraph logicals no longer
    // index this graph; the boundary edges at detector 0 carry the logical.
    let left = plain
        .edges()
        .filter(|(_, e, _)| e.vertices() == [0, 3])
        .map(|(id, _, _)| id)
        .collect::<BTreeSet<_>>();
    let distance = compute_graph_distance(&plain, &decograph_core::Logicals::from_sets(vec![left])).unwrap();
    assert!(distance.num_edges() >= 2);
    assert_eq!(logicals.len(), 1);
}
