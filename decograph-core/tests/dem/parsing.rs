//! DEM parsing through the public entry points.

use std::collections::BTreeSet;

use crate::common;

use decograph_core::dem::{
    DEFAULT_MAX_REPEAT_DEPTH, DemParser, DetectorAction, DetectorCounter, DetectorInstruction,
    ErrorInstruction, ParseWarning, ParserOptions, parse_dem, parse_dem_with_options,
};
use decograph_core::graph::{DecodingCode, EdgeId};
use decograph_core::{DemErrorKind, Error, GraphError};

#[test]
fn test_line_dem_hypergraph() {
    let parsed = parse_dem(common::LINE_DEM).unwrap();
    assert_eq!(parsed.num_detectors, 3);
    assert_eq!(parsed.errors.len(), 2);
    assert!(parsed.warnings.is_empty());

    let (graph, logicals) = parsed.to_hypergraph();
    assert_eq!(graph.num_detectors(), 3);
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(logicals.len(), 1);
    assert_eq!(logicals.get(0), Some(&BTreeSet::from([EdgeId(0)])));
    assert_eq!(graph.detector_records()[&2].spatial_coord, vec![2.0]);
    assert_eq!(graph.detector_records()[&2].time, 0);
}

#[test]
fn test_forward_references_allowed() {
    // Errors may name detectors declared later, or never declared.
    let parsed = parse_dem("error(0.1) D4 D7\ndetector(1, 2) D4").unwrap();
    assert_eq!(parsed.num_detectors, 8);
    assert_eq!(parsed.detector_records.len(), 1);
    assert_eq!(parsed.detector_records[&4].time, 2);
}

#[test]
fn test_repeat_rounds_recorded() {
    let text = "repeat 3 {\n  error(0.01) D0 D1\n  detector(0, 0) D0\n  detector(1, 0) D1\n  shift_detectors(0, 1) 2\n}";
    let parsed = parse_dem(text).unwrap();
    assert_eq!(parsed.errors.len(), 3);
    assert_eq!(parsed.num_detectors, 6);

    let rounds: Vec<(u32, i64)> = parsed
        .detector_records
        .iter()
        .map(|(&d, r)| (d, r.time))
        .collect();
    assert_eq!(rounds, vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2), (5, 2)]);

    let lines: BTreeSet<usize> = parsed.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, BTreeSet::from([2]));
}

#[test]
fn test_decomposed_error_components() {
    let parsed = parse_dem("error(0.05) D0 D1 ^ D2 L0\ndetector D2").unwrap();
    let error = &parsed.errors[0];
    assert!(error.is_decomposed());
    assert_eq!(error.detectors(), vec![0, 1, 2]);
    assert_eq!(error.components[0].logicals, Vec::<u32>::new());
    assert_eq!(error.components[1].logicals, vec![0]);

    // The plain builder keeps components apart, the boundary is node 3.
    let (graph, logicals) = parsed.to_decoding_graph().unwrap();
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(graph.boundary(), Some(3));
    let members: Vec<EdgeId> = logicals.get(0).unwrap().iter().copied().collect();
    assert_eq!(members.len(), 1);
    assert_eq!(graph.edge(members[0]).unwrap().first(), 2);
}

#[test]
fn test_plain_builder_rejects_hyperedges() {
    let parsed = parse_dem("error(0.1) D0 D1 D2").unwrap();
    let err = parsed.to_decoding_graph().unwrap_err();
    assert!(matches!(err, Error::Graph(GraphError::NotPlainEdge(ref v)) if v == &vec![0, 1, 2]));
}

#[test]
fn test_parse_error_reports_line() {
    let text = "error(0.1) D0\ndetector(0, 0) D0\ndetector(1, zz) D1";
    let Err(Error::Parse(err)) = parse_dem(text) else {
        panic!("expected a parse error");
    };
    assert_eq!(err.line, 3);
    assert_eq!(err.content, "detector(1, zz) D1");
    assert!(matches!(err.kind, DemErrorKind::InvalidCoordinate(_)));
}

#[test]
fn test_non_finite_coordinates_rejected() {
    let Err(Error::Parse(err)) = parse_dem("detector(nan, inf) D0") else {
        panic!("non-finite coordinates should not parse");
    };
    assert_eq!(err.line, 1);
    assert_eq!(err.kind, DemErrorKind::InvalidCoordinate("nan".into()));
}

/// `depth` nested `repeat 1` blocks around a single error.
fn nested_repeats(depth: usize) -> String {
    format!(
        "{}error(0.1) D0 L0\n{}",
        "repeat 1 {\n".repeat(depth),
        "}\n".repeat(depth)
    )
}

#[test]
fn test_deep_repeat_nesting_is_an_error() {
    let parsed = parse_dem(&nested_repeats(DEFAULT_MAX_REPEAT_DEPTH)).unwrap();
    assert_eq!(parsed.errors.len(), 1);

    for depth in [DEFAULT_MAX_REPEAT_DEPTH + 1, 2000, 10_000] {
        let Err(Error::Parse(err)) = parse_dem(&nested_repeats(depth)) else {
            panic!("nesting {depth} deep should be rejected");
        };
        assert_eq!(err.kind, DemErrorKind::NestingTooDeep {
            max: DEFAULT_MAX_REPEAT_DEPTH
        });
        assert_eq!(err.line, DEFAULT_MAX_REPEAT_DEPTH + 1);
    }

    let options = ParserOptions::default().with_max_repeat_depth(2);
    let Err(Error::Parse(err)) = parse_dem_with_options(&nested_repeats(3), options) else {
        panic!("nesting beyond a custom limit should be rejected");
    };
    assert_eq!(err.kind, DemErrorKind::NestingTooDeep { max: 2 });
}

#[test]
fn test_bad_targets_rejected() {
    for text in ["error(0.1) X3", "error(0.1) D", "error(0.1) D-1", "error(0.1) L0.5"] {
        let Err(Error::Parse(err)) = parse_dem(text) else {
            panic!("`{text}` should not parse");
        };
        assert_eq!(err.line, 1, "{text}");
    }
}

#[test]
fn test_warnings_leave_output_unchanged() {
    let plain = parse_dem(common::LINE_DEM).unwrap();
    let noisy_text = format!("detector_separator\n{}\nlogical_observable L1", common::LINE_DEM);
    let noisy = parse_dem(&noisy_text).unwrap();

    let mechanisms = |errors: &[ErrorInstruction]| -> Vec<(Vec<u32>, Vec<u32>, f64)> {
        errors
            .iter()
            .map(|e| (e.detectors(), e.logicals(), e.probability.get()))
            .collect()
    };
    assert_eq!(mechanisms(&noisy.errors), mechanisms(&plain.errors));
    assert_eq!(noisy.detector_records, plain.detector_records);
    assert_eq!(
        noisy.warnings,
        vec![
            ParseWarning::SeparatorIgnored { line: 1 },
            ParseWarning::UnusedObservable { index: 1 },
        ]
    );
    // The declared but unused observable still gets a slot.
    assert_eq!(noisy.logicals.len(), 2);
    assert!(noisy.logicals.get(1).unwrap().is_empty());
}

#[test]
fn test_tags_follow_options() {
    let text = "error[leak](0.1) D0 D1\ndetector[anc](0, 0) D0";

    let tagged = parse_dem_with_options(text, ParserOptions::default().with_tags_enabled(true)).unwrap();
    assert_eq!(tagged.errors[0].tag.as_deref(), Some("leak"));
    let (graph, _) = tagged.to_hypergraph();
    assert_eq!(graph.edge_record(EdgeId(0)).unwrap().tag(), Some("leak"));

    let untagged =
        parse_dem_with_options(text, ParserOptions::default().with_tags_enabled(false)).unwrap();
    assert_eq!(untagged.errors[0].tag, None);
    assert_eq!(untagged.warnings.len(), 2);
    assert!(
        untagged
            .warnings
            .iter()
            .all(|w| matches!(w, ParseWarning::TagIgnored { .. }))
    );
}

/// Compacts detector ids into first-seen order.
#[derive(Default)]
struct FirstSeen {
    ids: Vec<u32>,
    declared: Vec<u32>,
}

impl DetectorAction for FirstSeen {
    fn assign(&mut self, id: u32) -> u32 {
        match self.ids.iter().position(|&seen| seen == id) {
            Some(i) => i as u32,
            None => {
                self.ids.push(id);
                self.ids.len() as u32 - 1
            }
        }
    }

    fn record(&mut self, instruction: &DetectorInstruction) {
        self.declared.push(instruction.id);
    }
}

#[test]
fn test_custom_detector_action_renumbers() {
    let mut errors = Vec::new();
    let mut parser = DemParser::new(
        |e: &ErrorInstruction| errors.push(e.detectors()),
        FirstSeen::default(),
        |_: u32| {},
    );
    let summary = parser
        .parse("error(0.1) D10 D20\nerror(0.1) D20 D30\ndetector D30")
        .unwrap();
    assert_eq!(summary.errors, 2);
    assert_eq!(summary.detectors, 1);

    let (_, detectors, _) = parser.into_actions();
    assert_eq!(detectors.ids, vec![10, 20, 30]);
    assert_eq!(detectors.declared, vec![2]);
    assert_eq!(errors, vec![vec![0, 1], vec![1, 2]]);
}

#[test]
fn test_counter_sees_every_reference() {
    let mut parser = DemParser::new(
        |_: &ErrorInstruction| {},
        DetectorCounter::default(),
        |_: u32| {},
    );
    parser
        .parse("repeat 4 {\n  error(0.1) D0 D1\n  shift_detectors 1\n}")
        .unwrap();
    let (_, counter, _) = parser.into_actions();
    assert_eq!(counter.count(), 5);
}
