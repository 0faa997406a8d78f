//! Building decoding graphs from DEM text.

use std::collections::{BTreeMap, BTreeSet};

use super::actions::{DetectorRecorder, ErrorAction, LogicalsInEdges};
use super::instruction::ErrorInstruction;
use super::options::ParserOptions;
use super::parser::{DemParser, ParseWarning};
use crate::error::Result;
use crate::graph::{
    DecodingEdge, DecodingHyperEdge, DecodingHyperMultiGraph, EdgeId, EdgeRecord, Logicals,
    NxDecodingGraph,
};
use crate::syndrome::DetectorRecord;

/// Everything one parse of a DEM yields.
#[derive(Clone, Debug)]
pub struct ParsedDem {
    /// Executed `error` instructions in order; the `n`-th is `EdgeId(n)` in
    /// [`logicals`](Self::logicals).
    pub errors: Vec<ErrorInstruction>,
    /// Records of declared detectors that carry coordinates.
    pub detector_records: BTreeMap<u32, DetectorRecord>,
    /// Observable membership keyed by error index.
    pub logicals: Logicals,
    /// One past the largest detector id referenced.
    pub num_detectors: u32,
    /// Non-fatal conditions met while parsing.
    pub warnings: Vec<ParseWarning>,
}

/// Collects errors and their observable membership in one pass.
#[derive(Default)]
struct ErrorCollector {
    errors: Vec<ErrorInstruction>,
    logicals: LogicalsInEdges,
}

impl ErrorAction for ErrorCollector {
    fn on_error(&mut self, instruction: &ErrorInstruction) {
        self.logicals.on_error(instruction);
        self.errors.push(instruction.clone());
    }
}

/// Parses `text` with default options.
///
/// # Errors
///
/// Any [`DemParsingError`](crate::error::DemParsingError).
pub fn parse_dem(text: &str) -> Result<ParsedDem> {
    parse_dem_with_options(text, ParserOptions::default())
}

/// Parses `text` with explicit options.
///
/// # Errors
///
/// Any [`DemParsingError`](crate::error::DemParsingError).
pub fn parse_dem_with_options(text: &str, options: ParserOptions) -> Result<ParsedDem> {
    let mut parser = DemParser::new(
        ErrorCollector::default(),
        DetectorRecorder::new(),
        LogicalsInEdges::new(),
    )
    .with_options(options);
    parser.parse(text)?;
    let warnings = parser.warnings().to_vec();
    let (collector, recorder, declared) = parser.into_actions();

    let (num_detectors, detector_records) = recorder.into_parts();
    let mut logicals = collector.logicals.into_logicals();
    logicals.reserve_logicals(declared.logicals().len());

    Ok(ParsedDem {
        errors: collector.errors,
        detector_records,
        logicals,
        num_detectors,
        warnings,
    })
}

impl ParsedDem {
    /// One hyperedge per error, parallel mechanisms kept apart.
    ///
    /// Errors whose detectors all cancel cannot be an edge and are dropped
    /// with a warning; logical membership is renumbered to match.
    #[must_use]
    pub fn to_hypergraph(&self) -> (DecodingHyperMultiGraph, Logicals) {
        let mut origin = Vec::with_capacity(self.errors.len());
        let mut edges = Vec::with_capacity(self.errors.len());
        for (i, error) in self.errors.iter().enumerate() {
            let Ok(edge) = DecodingHyperEdge::new(error.detectors()) else {
                tracing::warn!(line = error.line, "error flips no detector, dropped");
                continue;
            };
            origin.push(EdgeId(i));
            edges.push((edge, record_of(error)));
        }
        let graph =
            DecodingHyperMultiGraph::new(edges, self.detector_records.clone(), BTreeSet::new());
        (graph, self.logicals.project(&origin))
    }

    /// One plain edge per `^` component, parallel components merged.
    ///
    /// Degree-one components attach to boundary node `num_detectors`. A
    /// merged edge belongs to every logical any of its components flips; a
    /// disagreement between components is logged.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotPlainEdge`](crate::error::GraphError::NotPlainEdge)
    /// for a component with more than two detectors.
    pub fn to_decoding_graph(&self) -> Result<(NxDecodingGraph, Logicals)> {
        let boundary = self.num_detectors;
        let mut edges = Vec::new();
        let mut component_logicals: Vec<&[u32]> = Vec::new();

        for error in &self.errors {
            for component in &error.components {
                let Ok(hyper) = DecodingHyperEdge::new(component.detectors.iter().copied()) else {
                    tracing::warn!(line = error.line, "error component flips no detector, dropped");
                    continue;
                };
                let edge = DecodingEdge::from_hyperedge(&hyper, Some(boundary))?;
                edges.push((edge, record_of(error)));
                component_logicals.push(&component.logicals);
            }
        }

        let (graph, assigned) = NxDecodingGraph::new_indexed(
            edges,
            self.detector_records.clone(),
            BTreeSet::from([boundary]),
        );

        let mut seen: BTreeMap<EdgeId, &[u32]> = BTreeMap::new();
        let mut logicals = Logicals::with_len(self.logicals.len());
        for (&id, &members) in assigned.iter().zip(&component_logicals) {
            if let Some(previous) = seen.insert(id, members) {
                if previous != members {
                    tracing::warn!(
                        edge = %id,
                        "parallel components disagree on logical membership, using the union"
                    );
                }
            }
            for &l in members {
                logicals.insert(l as usize, id);
            }
        }
        Ok((graph, logicals))
    }
}

fn record_of(error: &ErrorInstruction) -> EdgeRecord {
    EdgeRecord::new(error.probability).with_tag(error.tag.clone())
}

/// Parses `text` into a hypergraph with one edge per error.
///
/// The hypergraph has no explicit boundary: single-detector edges end on the
/// implicit boundary.
///
/// # Errors
///
/// Any [`DemParsingError`](crate::error::DemParsingError).
pub fn dem_to_hypergraph_and_logicals(text: &str) -> Result<(DecodingHyperMultiGraph, Logicals)> {
    Ok(parse_dem(text)?.to_hypergraph())
}

/// Parses `text` into a plain graph whose boundary is node `num_detectors`.
///
/// # Errors
///
/// Any [`DemParsingError`](crate::error::DemParsingError), or
/// [`GraphError::NotPlainEdge`](crate::error::GraphError::NotPlainEdge) for
/// an undecomposed error over more than two detectors.
pub fn dem_to_decoding_graph_and_logicals(text: &str) -> Result<(NxDecodingGraph, Logicals)> {
    parse_dem(text)?.to_decoding_graph()
}
