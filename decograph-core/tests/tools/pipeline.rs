//! DEM text to distance, JSON and samples in one pass.

use std::collections::BTreeSet;

use crate::common;

use decograph_core::dem::{dem_to_decoding_graph_and_logicals, dem_to_hypergraph_and_logicals};
use decograph_core::graph::{DecodingCode, EdgeId};
use decograph_core::sampler::ErrorSampler;
use decograph_core::tools::{compute_graph_distance, graph_to_json, graph_to_json_value};

#[test]
fn test_line_dem_end_to_end() {
    let (graph, logicals) = dem_to_decoding_graph_and_logicals(common::LINE_DEM).unwrap();
    assert_eq!(graph.num_detectors(), 3);
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(logicals.get(0), Some(&BTreeSet::from([EdgeId(0)])));

    let distance = compute_graph_distance(&graph, &logicals).unwrap();
    assert_eq!(distance.logical, 0);
    assert_eq!(distance.edges, vec![EdgeId(0)]);
    common::assert_close(distance.weight, -(0.1f64 / 0.9).ln(), 1e-12);

    // The hypergraph route finds the same error.
    let (hyper, hyper_logicals) = dem_to_hypergraph_and_logicals(common::LINE_DEM).unwrap();
    assert_eq!(compute_graph_distance(&hyper, &hyper_logicals).unwrap(), distance);
}

#[test]
fn test_json_document_of_parsed_graph() {
    let (graph, logicals) = dem_to_decoding_graph_and_logicals(common::LINE_DEM).unwrap();
    let value = graph_to_json_value(&graph, &logicals).unwrap();

    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["boundaries"], serde_json::json!([3]));
    assert_eq!(value["edges"][1]["vertices"], serde_json::json!([1, 2]));
    assert_eq!(value["edges"][1]["p_err"], 0.2);
    assert_eq!(value["nodes"][2]["record"]["spatial_coord"], serde_json::json!([2.0]));
    assert_eq!(value["logicals"], serde_json::json!([[0]]));

    let text = graph_to_json(&graph, &logicals).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), value);
}

#[test]
fn test_sampled_shots_match_graph() {
    let dem = common::repetition_memory_dem(3, 2, 0.2);
    let (graph, logicals) = dem_to_decoding_graph_and_logicals(&dem).unwrap();
    let mut sampler = ErrorSampler::new(&graph, &logicals, 2026);
    // Two checks over two rounds; the boundary gets no bit.
    assert_eq!(graph.num_detectors(), 4);
    assert_eq!(sampler.width(), 4);

    let shots = sampler.sample_batch(200);
    let mut fired = 0;
    for shot in &shots {
        assert_eq!(shot.syndrome.width(), 4);
        let expected = graph.syndrome_of(&shot.fired);
        assert_eq!(shot.syndrome.iter_ones().map(|d| d as u32).collect::<Vec<_>>(), expected.iter().collect::<Vec<_>>());
        assert_eq!(shot.flipped_logicals, logicals.flipped_by(&shot.fired));
        fired += shot.fired.len();
    }
    // 200 shots over 8 edges at p = 0.2: expect about 320 fired edges.
    assert!((200..450).contains(&fired), "{fired} edges fired");

    let again = ErrorSampler::new(&graph, &logicals, 2026).sample_batch(200);
    assert_eq!(again, shots);
}
