//! Hypergraph realizations of [`DecodingCode`].

use core::marker::PhantomData;
use std::collections::{BTreeMap, BTreeSet};

use super::code::{DecodingCode, EdgePolicy, KeepParallel, MergeParallel, collect_edges, collect_nodes};
use super::edge::{DecodingHyperEdge, EdgeId, EdgeRecord, GraphEdge};
use crate::syndrome::DetectorRecord;

/// Hypergraph that merges parallel edges.
pub type DecodingHyperGraph = HyperGraph<MergeParallel>;

/// Hypergraph that keeps parallel edges as independent mechanisms.
pub type DecodingHyperMultiGraph = HyperGraph<KeepParallel>;

/// Error mechanisms over any number of detectors.
///
/// Degree-one edges have an implicit boundary endpoint; explicit boundary
/// nodes are optional.
#[derive(Clone, Debug)]
pub struct HyperGraph<P: EdgePolicy> {
    edges: Vec<(DecodingHyperEdge, EdgeRecord)>,
    nodes: BTreeSet<u32>,
    boundaries: BTreeSet<u32>,
    detector_records: BTreeMap<u32, DetectorRecord>,
    incidence: BTreeMap<u32, Vec<EdgeId>>,
    _policy: PhantomData<P>,
}

impl<P: EdgePolicy> HyperGraph<P> {
    /// Builds a hypergraph.
    ///
    /// Nodes are the union of edge vertices, recorded detectors and
    /// boundaries.
    pub fn new<I>(
        edges: I,
        detector_records: BTreeMap<u32, DetectorRecord>,
        boundaries: BTreeSet<u32>,
    ) -> Self
    where
        I: IntoIterator<Item = (DecodingHyperEdge, EdgeRecord)>,
    {
        Self::new_indexed(edges, detector_records, boundaries).0
    }

    /// Builds a hypergraph from edges alone.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (DecodingHyperEdge, EdgeRecord)>,
    {
        Self::new(edges, BTreeMap::new(), BTreeSet::new())
    }

    /// Like [`new`](Self::new), also returning the id each input edge landed on.
    pub fn new_indexed<I>(
        edges: I,
        detector_records: BTreeMap<u32, DetectorRecord>,
        boundaries: BTreeSet<u32>,
    ) -> (Self, Vec<EdgeId>)
    where
        I: IntoIterator<Item = (DecodingHyperEdge, EdgeRecord)>,
    {
        let (edges, assigned) = collect_edges::<_, P, _>(edges);
        let nodes = collect_nodes(&edges, &detector_records, &boundaries);

        let mut incidence: BTreeMap<u32, Vec<EdgeId>> = BTreeMap::new();
        for (i, (edge, _)) in edges.iter().enumerate() {
            for &v in edge.vertices() {
                incidence.entry(v).or_default().push(EdgeId(i));
            }
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            merge_parallel = P::MERGE_PARALLEL,
            "hypergraph built"
        );

        let graph = Self {
            edges,
            nodes,
            boundaries,
            detector_records,
            incidence,
            _policy: PhantomData,
        };
        (graph, assigned)
    }

    /// True if every edge has at most two vertices.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.edges.iter().all(|(e, _)| e.is_plain())
    }

    /// Largest edge degree, 0 for an edgeless graph.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.edges.iter().map(|(e, _)| e.degree()).max().unwrap_or(0)
    }
}

impl<P: EdgePolicy> DecodingCode for HyperGraph<P> {
    type Edge = DecodingHyperEdge;

    fn nodes(&self) -> &BTreeSet<u32> {
        &self.nodes
    }

    fn boundaries(&self) -> &BTreeSet<u32> {
        &self.boundaries
    }

    fn detector_records(&self) -> &BTreeMap<u32, DetectorRecord> {
        &self.detector_records
    }

    fn edge_list(&self) -> &[(DecodingHyperEdge, EdgeRecord)] {
        &self.edges
    }

    fn incident_edges(&self, node: u32) -> Vec<EdgeId> {
        self.incidence.get(&node).cloned().unwrap_or_default()
    }

    fn neighbors(&self, node: u32) -> BTreeSet<u32> {
        self.incident_edges(node)
            .into_iter()
            .flat_map(|id| self.edges[id.index()].0.vertices().iter().copied())
            .filter(|&v| v != node)
            .collect()
    }

    fn with_edges(&self, edges: Vec<(DecodingHyperEdge, EdgeRecord)>) -> Self {
        let mut graph = Self::new(edges, self.detector_records.clone(), self.boundaries.clone());
        graph.nodes.extend(self.nodes.iter().copied());
        graph
    }
}
