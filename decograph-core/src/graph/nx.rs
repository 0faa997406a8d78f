//! Plain decoding graphs backed by `petgraph`.
//!
//! These hold edges on exactly two nodes; an error flipping a single detector
//! is an edge to a boundary node. This is the form matching decoders take.

use core::marker::PhantomData;
use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{NodeIndex, UnGraph};

use super::code::{DecodingCode, EdgePolicy, KeepParallel, MergeParallel, collect_edges, collect_nodes};
use super::edge::{DecodingEdge, DecodingHyperEdge, EdgeId, EdgeRecord};
use crate::error::GraphError;
use crate::syndrome::DetectorRecord;

/// Plain graph that merges parallel edges.
pub type NxDecodingGraph = NxGraph<MergeParallel>;

/// Plain graph that keeps parallel edges.
pub type NxDecodingMultiGraph = NxGraph<KeepParallel>;

/// A plain decoding graph stored as a `petgraph` undirected graph.
///
/// Node weights are node ids; edge weights are [`EdgeId`]s into the record
/// list, so metadata lookups never depend on petgraph's internal indices.
#[derive(Clone, Debug)]
pub struct NxGraph<P: EdgePolicy> {
    graph: UnGraph<u32, EdgeId>,
    node_index: BTreeMap<u32, NodeIndex>,
    edges: Vec<(DecodingEdge, EdgeRecord)>,
    nodes: BTreeSet<u32>,
    boundaries: BTreeSet<u32>,
    detector_records: BTreeMap<u32, DetectorRecord>,
    _policy: PhantomData<P>,
}

impl<P: EdgePolicy> NxGraph<P> {
    /// Builds a plain graph.
    pub fn new<I>(
        edges: I,
        detector_records: BTreeMap<u32, DetectorRecord>,
        boundaries: BTreeSet<u32>,
    ) -> Self
    where
        I: IntoIterator<Item = (DecodingEdge, EdgeRecord)>,
    {
        Self::new_indexed(edges, detector_records, boundaries).0
    }

    /// Like [`new`](Self::new), also returning the id each input edge landed on.
    pub fn new_indexed<I>(
        edges: I,
        detector_records: BTreeMap<u32, DetectorRecord>,
        boundaries: BTreeSet<u32>,
    ) -> (Self, Vec<EdgeId>)
    where
        I: IntoIterator<Item = (DecodingEdge, EdgeRecord)>,
    {
        let (edges, assigned) = collect_edges::<_, P, _>(edges);
        let nodes = collect_nodes(&edges, &detector_records, &boundaries);

        let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
        let node_index: BTreeMap<u32, NodeIndex> =
            nodes.iter().map(|&n| (n, graph.add_node(n))).collect();
        for (i, (edge, _)) in edges.iter().enumerate() {
            graph.add_edge(
                node_index[&edge.first()],
                node_index[&edge.second()],
                EdgeId(i),
            );
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            boundaries = boundaries.len(),
            "decoding graph built"
        );

        let built = Self {
            graph,
            node_index,
            edges,
            nodes,
            boundaries,
            detector_records,
            _policy: PhantomData,
        };
        (built, assigned)
    }

    /// Builds a plain graph from hyperedges of degree one or two.
    ///
    /// Degree-one edges are attached to `boundary`, which becomes the
    /// graph's only boundary node.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotPlainEdge`] for an edge of degree three or more, and
    /// [`GraphError::SelfLoop`] if a degree-one edge sits on `boundary`.
    pub fn from_hyperedges<I>(
        edges: I,
        detector_records: BTreeMap<u32, DetectorRecord>,
        boundary: u32,
    ) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (DecodingHyperEdge, EdgeRecord)>,
    {
        let plain = edges
            .into_iter()
            .map(|(e, r)| DecodingEdge::from_hyperedge(&e, Some(boundary)).map(|e| (e, r)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(plain, detector_records, BTreeSet::from([boundary])))
    }

    /// The boundary node, if there is exactly one.
    #[must_use]
    pub fn boundary(&self) -> Option<u32> {
        match self.boundaries.len() {
            1 => self.boundaries.first().copied(),
            _ => None,
        }
    }

    /// The underlying petgraph graph.
    ///
    /// Node weights are node ids and edge weights index
    /// [`edge_list`](DecodingCode::edge_list).
    #[must_use]
    pub const fn petgraph(&self) -> &UnGraph<u32, EdgeId> {
        &self.graph
    }

    /// Number of connected components, boundaries counted as ordinary nodes.
    #[must_use]
    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}

impl<P: EdgePolicy> DecodingCode for NxGraph<P> {
    type Edge = DecodingEdge;

    fn nodes(&self) -> &BTreeSet<u32> {
        &self.nodes
    }

    fn boundaries(&self) -> &BTreeSet<u32> {
        &self.boundaries
    }

    fn detector_records(&self) -> &BTreeMap<u32, DetectorRecord> {
        &self.detector_records
    }

    fn edge_list(&self) -> &[(DecodingEdge, EdgeRecord)] {
        &self.edges
    }

    fn incident_edges(&self, node: u32) -> Vec<EdgeId> {
        let Some(&idx) = self.node_index.get(&node) else {
            return Vec::new();
        };
        let mut ids: Vec<EdgeId> = self.graph.edges(idx).map(|e| *e.weight()).collect();
        ids.sort_unstable();
        ids
    }

    fn neighbors(&self, node: u32) -> BTreeSet<u32> {
        self.node_index
            .get(&node)
            .map(|&idx| self.graph.neighbors(idx).map(|n| self.graph[n]).collect())
            .unwrap_or_default()
    }

    fn with_edges(&self, edges: Vec<(DecodingEdge, EdgeRecord)>) -> Self {
        let mut rebuilt = Self::new(
            edges,
            self.detector_records.clone(),
            self.boundaries.clone(),
        );
        for &n in &self.nodes {
            if !rebuilt.node_index.contains_key(&n) {
                let idx = rebuilt.graph.add_node(n);
                rebuilt.node_index.insert(n, idx);
                rebuilt.nodes.insert(n);
            }
        }
        rebuilt
    }
}
