//! Splitting a graph into space-like and time-like edges.
//!
//! An edge's rounds are the [`DetectorRecord`](crate::syndrome::DetectorRecord)
//! rounds of its non-boundary endpoints. A data-qubit error flips detectors
//! of one round; a measurement error flips the same check in consecutive
//! rounds. An edge touching a detector without a record cannot be classified
//! and appears in neither partition.
//!
//! [`syndrome_by_round`] applies the same round metadata to a dense syndrome.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SyndromeError};
use crate::graph::{DecodingCode, EdgeId, GraphEdge, Logicals};
use crate::syndrome::{FixedWidthBitstring, OrderedSyndrome};

/// A graph built from a subset of another graph's edges.
#[derive(Clone, Debug)]
pub struct EdgeSubgraph<G> {
    /// The derived graph, over the source graph's full node set.
    pub graph: G,
    /// `origin[i]` is the source-graph id of the derived graph's edge `i`.
    pub origin: Vec<EdgeId>,
}

impl<G> EdgeSubgraph<G> {
    /// Source-graph logicals renumbered for the derived graph.
    #[must_use]
    pub fn logicals(&self, logicals: &Logicals) -> Logicals {
        logicals.project(&self.origin)
    }
}

fn edge_rounds<G: DecodingCode>(graph: &G, edge: &G::Edge) -> Option<BTreeSet<i64>> {
    let mut rounds = BTreeSet::new();
    for &v in edge.vertices() {
        if graph.is_boundary(v) {
            continue;
        }
        rounds.insert(graph.detector_records().get(&v)?.time);
    }
    (!rounds.is_empty()).then_some(rounds)
}

fn filter_by_rounds<G, F>(graph: &G, keep: F) -> EdgeSubgraph<G>
where
    G: DecodingCode,
    F: Fn(usize) -> bool,
{
    let mut origin = Vec::new();
    let mut edges = Vec::new();
    for (id, edge, record) in graph.edges() {
        if edge_rounds(graph, edge).is_some_and(|r| keep(r.len())) {
            origin.push(id);
            edges.push((edge.clone(), record.clone()));
        }
    }
    tracing::debug!(kept = edges.len(), total = graph.num_edges(), "edges filtered by round");
    EdgeSubgraph {
        graph: graph.with_edges(edges),
        origin,
    }
}

/// Edges whose detectors all lie in one round (data-qubit errors).
#[must_use]
pub fn filter_to_data_edges<G: DecodingCode>(graph: &G) -> EdgeSubgraph<G> {
    filter_by_rounds(graph, |rounds| rounds == 1)
}

/// Edges whose detectors span several rounds (measurement errors).
#[must_use]
pub fn filter_to_measure_edges<G: DecodingCode>(graph: &G) -> EdgeSubgraph<G> {
    filter_by_rounds(graph, |rounds| rounds > 1)
}

/// Fired detectors of a dense syndrome over `graph`, grouped by round.
///
/// # Errors
///
/// - [`SyndromeError::WidthMismatch`] unless `bits` is
///   [`syndrome_width`](DecodingCode::syndrome_width) bits wide.
/// - [`SyndromeError::MissingRecord`] if a fired detector has no record.
pub fn syndrome_by_round<G: DecodingCode>(
    graph: &G,
    bits: &FixedWidthBitstring,
) -> Result<BTreeMap<i64, OrderedSyndrome>> {
    let width = graph.syndrome_width();
    if bits.width() != width {
        return Err(SyndromeError::WidthMismatch {
            left: bits.width(),
            right: width,
        }
        .into());
    }
    let rounds = OrderedSyndrome::from_bitstring(bits).split_by_round(graph.detector_records())?;
    Ok(rounds)
}
