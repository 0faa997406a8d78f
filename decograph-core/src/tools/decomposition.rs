//! Rewriting hyperedges as plain edges.
//!
//! Matching decoders accept edges on at most two nodes. A hyperedge over
//! `k > 2` detectors is replaced by `m` plain edges covering the same
//! detectors (an odd `k` pairs one detector with the boundary). Each
//! constituent gets probability
//!
//! ```text
//! q = (1 - (1 - 2p)^(1/m)) / 2
//! ```
//!
//! so composing the `m` constituents with
//! [`independent_composition`] gives back `p`.
//!
//! Which plain edges to use is a [`DecompositionScheme`]. Schemes list their
//! candidates in a fixed lexicographic order, and the first candidate is the
//! one used by [`hypergraph_to_weighted_edge_list`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::GraphError;
use crate::graph::{
    DecodingCode, DecodingEdge, EdgeId, EdgeRecord, GraphEdge, NxDecodingGraph, Probability,
    independent_composition, probability_to_weight,
};

/// Default cap on the candidates a scheme lists per hyperedge.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 64;

/// A way of covering a hyperedge's detectors with plain edges.
pub trait DecompositionScheme {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Candidate covers of `detectors` (sorted, more than two), best first.
    ///
    /// `existing` holds the plain edges already in the graph, with
    /// degree-one edges attached to `boundary`. An empty result means the
    /// hyperedge cannot be decomposed by this scheme.
    ///
    /// # Errors
    ///
    /// [`GraphError::SelfLoop`] if `boundary` is one of `detectors`.
    fn candidates(
        &self,
        detectors: &[u32],
        boundary: u32,
        existing: &BTreeSet<DecodingEdge>,
    ) -> Result<Vec<Vec<DecodingEdge>>, GraphError>;
}

/// Every perfect pairing of the detectors, the boundary joining an odd set.
///
/// Pairings are listed in lexicographic order of their sorted edges, so the
/// first is `(d0, d1), (d2, d3), ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairwiseCover {
    limit: usize,
}

impl PairwiseCover {
    /// Lists at most `limit` pairings per hyperedge.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for PairwiseCover {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_LIMIT)
    }
}

impl DecompositionScheme for PairwiseCover {
    fn name(&self) -> &'static str {
        "pairwise"
    }

    fn candidates(
        &self,
        detectors: &[u32],
        boundary: u32,
        _existing: &BTreeSet<DecodingEdge>,
    ) -> Result<Vec<Vec<DecodingEdge>>, GraphError> {
        let items = pairing_items(detectors, boundary);
        let mut out = Vec::new();
        pairings(&items, &|_| true, &mut Vec::new(), &mut out, self.limit)?;
        Ok(out)
    }
}

/// Sorted detectors, with `boundary` added to make the count even.
fn pairing_items(detectors: &[u32], boundary: u32) -> Vec<u32> {
    let mut items = detectors.to_vec();
    if items.len() % 2 == 1 {
        items.push(boundary);
    }
    items.sort_unstable();
    items
}

/// Perfect pairings of `items` using only edges `allowed` accepts.
///
/// The smallest unpaired item is always paired next, so pairings come out in
/// lexicographic order and `limit` caps the pairings found, not the search.
fn pairings(
    items: &[u32],
    allowed: &dyn Fn(&DecodingEdge) -> bool,
    current: &mut Vec<DecodingEdge>,
    out: &mut Vec<Vec<DecodingEdge>>,
    limit: usize,
) -> Result<(), GraphError> {
    if out.len() >= limit {
        return Ok(());
    }
    let Some((&first, rest)) = items.split_first() else {
        out.push(current.clone());
        return Ok(());
    };
    for (i, &partner) in rest.iter().enumerate() {
        let edge = DecodingEdge::new(first, partner)?;
        if !allowed(&edge) {
            continue;
        }
        current.push(edge);
        let remaining: Vec<u32> = rest
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &v)| v)
            .collect();
        pairings(&remaining, allowed, current, out, limit)?;
        current.pop();
        if out.len() >= limit {
            break;
        }
    }
    Ok(())
}

/// Pairings whose edges all exist in the graph already.
///
/// Decoders tuned for a fixed edge set need decompositions that do not
/// introduce new edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExistingEdgeCover {
    limit: usize,
}

impl ExistingEdgeCover {
    /// Lists at most `limit` covers per hyperedge.
    ///
    /// Only pairings made of existing edges are explored, so a cover is found
    /// however late it comes among all pairings.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for ExistingEdgeCover {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_LIMIT)
    }
}

impl DecompositionScheme for ExistingEdgeCover {
    fn name(&self) -> &'static str {
        "existing-edge"
    }

    fn candidates(
        &self,
        detectors: &[u32],
        boundary: u32,
        existing: &BTreeSet<DecodingEdge>,
    ) -> Result<Vec<Vec<DecodingEdge>>, GraphError> {
        let items = pairing_items(detectors, boundary);
        let mut out = Vec::new();
        pairings(&items, &|e| existing.contains(e), &mut Vec::new(), &mut out, self.limit)?;
        Ok(out)
    }
}

/// Every detector joined to the boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundaryStar;

impl DecompositionScheme for BoundaryStar {
    fn name(&self) -> &'static str {
        "boundary-star"
    }

    fn candidates(
        &self,
        detectors: &[u32],
        boundary: u32,
        _existing: &BTreeSet<DecodingEdge>,
    ) -> Result<Vec<Vec<DecodingEdge>>, GraphError> {
        let star = detectors
            .iter()
            .map(|&d| DecodingEdge::new(d, boundary))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vec![star])
    }
}

/// Probability of each of `m` constituents that compose to `p`.
///
/// `m = 0` is treated as 1.
///
/// # Errors
///
/// [`GraphError::InvalidProbability`] unless `0 < p <= 0.5` when `m > 1`, or
/// `0 < p < 1` when `m <= 1`.
pub fn constituent_probability(p: f64, m: usize) -> Result<f64, GraphError> {
    if m <= 1 {
        return Probability::new(p).map(Probability::get);
    }
    if !(p > 0.0 && p <= 0.5) {
        return Err(GraphError::InvalidProbability(p));
    }
    Ok((1.0 - (1.0 - 2.0 * p).powf(1.0 / m as f64)) / 2.0)
}

fn real_detectors<G: DecodingCode>(graph: &G, edge: &G::Edge) -> Vec<u32> {
    edge.vertices()
        .iter()
        .copied()
        .filter(|&v| !graph.is_boundary(v))
        .collect()
}

fn plain_edges<G: DecodingCode>(graph: &G, boundary: u32) -> Result<BTreeSet<DecodingEdge>, GraphError> {
    let mut plain = BTreeSet::new();
    for (_, edge, _) in graph.edges() {
        match *real_detectors(graph, edge).as_slice() {
            [d] => {
                plain.insert(DecodingEdge::new(d, boundary)?);
            }
            [a, b] => {
                plain.insert(DecodingEdge::new(a, b)?);
            }
            _ => {}
        }
    }
    Ok(plain)
}

/// Candidate covers of every hyperedge of degree three or more.
///
/// Boundary nodes of `graph` are dropped from edges first; `boundary` is
/// the node odd-sized covers attach to.
///
/// # Errors
///
/// [`GraphError::UndecomposableEdge`] naming the first hyperedge the scheme
/// cannot cover.
pub fn decompositions<G, S>(
    graph: &G,
    scheme: &S,
    boundary: u32,
) -> Result<BTreeMap<EdgeId, Vec<Vec<DecodingEdge>>>, GraphError>
where
    G: DecodingCode,
    S: DecompositionScheme + ?Sized,
{
    let existing = plain_edges(graph, boundary)?;
    let mut out = BTreeMap::new();
    for (id, edge, _) in graph.edges() {
        let detectors = real_detectors(graph, edge);
        if detectors.len() <= 2 {
            continue;
        }
        let candidates = scheme.candidates(&detectors, boundary, &existing)?;
        if candidates.is_empty() {
            return Err(GraphError::UndecomposableEdge {
                edge: id,
                detectors,
                reason: format!("no {} decomposition", scheme.name()),
            });
        }
        out.insert(id, candidates);
    }
    Ok(out)
}

fn merged_plain_edges<G, S>(
    graph: &G,
    scheme: &S,
    boundary: u32,
) -> Result<BTreeMap<DecodingEdge, f64>, GraphError>
where
    G: DecodingCode,
    S: DecompositionScheme + ?Sized,
{
    let mut covers = decompositions(graph, scheme, boundary)?;
    let mut merged: BTreeMap<DecodingEdge, f64> = BTreeMap::new();

    for (id, edge, record) in graph.edges() {
        let parts = match *real_detectors(graph, edge).as_slice() {
            [] => continue,
            [d] => vec![DecodingEdge::new(d, boundary)?],
            [a, b] => vec![DecodingEdge::new(a, b)?],
            _ => covers
                .remove(&id)
                .and_then(|c| c.into_iter().next())
                .unwrap_or_default(),
        };
        if parts.is_empty() {
            continue;
        }
        let q = constituent_probability(record.p_err(), parts.len())?;
        for part in parts {
            merged
                .entry(part)
                .and_modify(|p| *p = independent_composition(*p, q))
                .or_insert(q);
        }
    }
    Ok(merged)
}

/// Plain `(a, b, weight)` edges equivalent to `graph`.
///
/// Hyperedges are replaced by their first candidate under `scheme`; plain
/// edges that coincide are merged by independent composition. Weights are
/// `-ln(p / (1 - p))`. The list is sorted by endpoints.
///
/// # Errors
///
/// - [`GraphError::UndecomposableEdge`] as for [`decompositions`].
/// - [`GraphError::InvalidProbability`] for a hyperedge with `p > 0.5`.
pub fn hypergraph_to_weighted_edge_list<G, S>(
    graph: &G,
    scheme: &S,
    boundary: u32,
) -> Result<Vec<(u32, u32, f64)>, GraphError>
where
    G: DecodingCode,
    S: DecompositionScheme + ?Sized,
{
    merged_plain_edges(graph, scheme, boundary)?
        .into_iter()
        .map(|(edge, p)| probability_to_weight(p).map(|w| (edge.first(), edge.second(), w)))
        .collect()
}

/// The decomposed graph, with `boundary` as its only boundary node.
///
/// # Errors
///
/// As for [`hypergraph_to_weighted_edge_list`].
pub fn decompose_to_graph<G, S>(
    graph: &G,
    scheme: &S,
    boundary: u32,
) -> Result<NxDecodingGraph, GraphError>
where
    G: DecodingCode,
    S: DecompositionScheme + ?Sized,
{
    let edges = merged_plain_edges(graph, scheme, boundary)?
        .into_iter()
        .map(|(edge, p)| EdgeRecord::from_probability(p).map(|r| (edge, r)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NxDecodingGraph::new(
        edges,
        graph.detector_records().clone(),
        BTreeSet::from([boundary]),
    ))
}
