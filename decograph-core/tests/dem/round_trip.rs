//! Parsing a DEM, writing the graph back out and parsing again must describe
//! the same mechanisms.

use crate::common;

use decograph_core::dem::{dem_to_decoding_graph_and_logicals, dem_to_hypergraph_and_logicals};
use decograph_core::graph::DecodingCode;

const EVERY_FORM: &str = "# all instruction forms
logical_observable L0
logical_observable L1
detector(0, 0, 0) D0
detector(1, 0, 0) D1
error(0.125) D0 D1 L1
error[meas](0.01) D0 ^ D1 L0
REPEAT 2 {
    repeat 2 {
        error(0.02) D0 D1 D2
        error(0.03) D2 L0
        detector(0, 1, 1) D2
        shift_detectors(0, 0, 1) 1
    }
    shift_detectors(5, 0, 0) 3
}
detector_separator
error(1e-3) D0 D9
";

#[test]
fn test_hypergraph_round_trip() {
    let (graph, logicals) = dem_to_hypergraph_and_logicals(EVERY_FORM).unwrap();
    let written = common::write_dem(&graph, &logicals);
    let (again, again_logicals) = dem_to_hypergraph_and_logicals(&written).unwrap();

    assert_eq!(
        common::mechanisms(&again, &again_logicals),
        common::mechanisms(&graph, &logicals)
    );
    assert_eq!(again.detector_records(), graph.detector_records());
    assert_eq!(again.nodes(), graph.nodes());
}

#[test]
fn test_every_form_executes_as_expected() {
    let (graph, logicals) = dem_to_hypergraph_and_logicals(EVERY_FORM).unwrap();

    // 2 top-level errors, 8 unrolled from the repeats, 1 after them.
    assert_eq!(graph.num_edges(), 11);
    let detectors: Vec<Vec<u32>> = common::mechanisms(&graph, &logicals)
        .into_iter()
        .map(|(d, _, _)| d)
        .collect();
    assert_eq!(detectors[0], vec![0, 1]);
    assert_eq!(detectors[1], vec![0, 1]);
    // Inner shift by 1, outer shift by 3 after each inner block.
    assert_eq!(detectors[2], vec![0, 1, 2]);
    assert_eq!(detectors[4], vec![1, 2, 3]);
    assert_eq!(detectors[6], vec![5, 6, 7]);
    assert_eq!(detectors[8], vec![6, 7, 8]);
    // Shifts persist past the repeat block.
    assert_eq!(detectors[10], vec![10, 19]);

    // Coordinates shift with the blocks: x by 5 per outer iteration, t by 1
    // per inner iteration.
    let records = graph.detector_records();
    assert_eq!(records[&2].spatial_coord, vec![0.0, 1.0]);
    assert_eq!(records[&2].time, 1);
    assert_eq!(records[&3].time, 2);
    assert_eq!(records[&7].spatial_coord, vec![5.0, 1.0]);
    assert_eq!(records[&8].time, 4);

    assert_eq!(logicals.len(), 2);
    assert_eq!(logicals.get(1).map(|m| m.len()), Some(1));
    assert_eq!(logicals.get(0).map(|m| m.len()), Some(5));
    assert_eq!(graph.edge_record(decograph_core::EdgeId(1)).unwrap().tag(), Some("meas"));
}

#[test]
fn test_decoding_graph_round_trip() {
    let dem = common::repetition_memory_dem(4, 3, 0.01);
    let (graph, logicals) = dem_to_decoding_graph_and_logicals(&dem).unwrap();
    let written = common::write_dem(&graph, &logicals);
    let (again, again_logicals) = dem_to_decoding_graph_and_logicals(&written).unwrap();

    assert_eq!(again.boundary(), graph.boundary());
    assert_eq!(
        common::mechanisms(&again, &again_logicals),
        common::mechanisms(&graph, &logicals)
    );
}
