//! The read-only capability set every decoding graph provides.
//!
//! Graph tools are written once against [`DecodingCode`] and run on every
//! realization: the hypergraphs in [`hypergraph`](super::hypergraph) and the
//! petgraph-backed plain graphs in [`nx`](super::nx).

use core::fmt::Debug;
use std::collections::{BTreeMap, BTreeSet};

use super::edge::{EdgeId, EdgeRecord, GraphEdge, errors_to_syndrome};
use crate::syndrome::{DetectorRecord, OrderedSyndrome};

/// How a graph treats two edges over the same vertex set.
pub trait EdgePolicy: Clone + Copy + Debug + Default + Send + Sync + 'static {
    /// If true, parallel edges are merged by independent composition.
    const MERGE_PARALLEL: bool;
}

/// Parallel edges collapse into one edge whose probability is the chance
/// that exactly one of them fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct MergeParallel;

impl EdgePolicy for MergeParallel {
    const MERGE_PARALLEL: bool = true;
}

/// Parallel edges stay distinct, independent error mechanisms.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepParallel;

impl EdgePolicy for KeepParallel {
    const MERGE_PARALLEL: bool = false;
}

/// Read access to a built decoding graph.
///
/// Graphs are immutable once built. Every transformation goes through
/// [`with_edges`](Self::with_edges), which returns a new graph sharing the
/// node set, boundaries and detector records of `self`.
pub trait DecodingCode: Clone {
    /// Edge type held by this graph.
    type Edge: GraphEdge;

    /// All nodes, detectors and boundaries alike.
    fn nodes(&self) -> &BTreeSet<u32>;

    /// Boundary nodes.
    fn boundaries(&self) -> &BTreeSet<u32>;

    /// Detector metadata, keyed by detector id.
    fn detector_records(&self) -> &BTreeMap<u32, DetectorRecord>;

    /// Edges and their records in enumeration order; index `i` is `EdgeId(i)`.
    fn edge_list(&self) -> &[(Self::Edge, EdgeRecord)];

    /// Edges touching `node`, in id order.
    fn incident_edges(&self, node: u32) -> Vec<EdgeId>;

    /// Nodes sharing an edge with `node`.
    fn neighbors(&self, node: u32) -> BTreeSet<u32>;

    /// A new graph over the same nodes with `edges` in place of the current ones.
    #[must_use]
    fn with_edges(&self, edges: Vec<(Self::Edge, EdgeRecord)>) -> Self;

    /// Number of nodes.
    fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Number of edges.
    fn num_edges(&self) -> usize {
        self.edge_list().len()
    }

    /// Topology of edge `id`.
    fn edge(&self, id: EdgeId) -> Option<&Self::Edge> {
        self.edge_list().get(id.index()).map(|(e, _)| e)
    }

    /// Metadata of edge `id`.
    fn edge_record(&self, id: EdgeId) -> Option<&EdgeRecord> {
        self.edge_list().get(id.index()).map(|(_, r)| r)
    }

    /// Edges with ids and records, in enumeration order.
    fn edges(&self) -> impl Iterator<Item = (EdgeId, &Self::Edge, &EdgeRecord)> + '_ {
        self.edge_list()
            .iter()
            .enumerate()
            .map(|(i, (e, r))| (EdgeId(i), e, r))
    }

    /// True if `node` is a boundary node.
    fn is_boundary(&self, node: u32) -> bool {
        self.boundaries().contains(&node)
    }

    /// Nodes that are not boundaries, in increasing order.
    fn detectors(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes()
            .iter()
            .copied()
            .filter(|n| !self.boundaries().contains(n))
    }

    /// Number of non-boundary nodes.
    fn num_detectors(&self) -> usize {
        self.nodes().len() - self.boundaries().len()
    }

    /// Width of a dense syndrome over this graph: one past the largest
    /// detector id. Boundary nodes get no bit.
    fn syndrome_width(&self) -> usize {
        self.detectors().last().map_or(0, |d| d as usize + 1)
    }

    /// Syndrome produced when exactly the edges in `fired` occur.
    ///
    /// Ids outside the graph are ignored.
    fn syndrome_of(&self, fired: &[EdgeId]) -> OrderedSyndrome {
        errors_to_syndrome(fired.iter().filter_map(|&id| self.edge(id)), self.boundaries())
    }
}

/// Orders edges for a graph, merging parallel edges when `P` asks for it.
///
/// Returns the stored edges and, for every input edge, the id it landed on.
pub(crate) fn collect_edges<E, P, I>(input: I) -> (Vec<(E, EdgeRecord)>, Vec<EdgeId>)
where
    E: GraphEdge,
    P: EdgePolicy,
    I: IntoIterator<Item = (E, EdgeRecord)>,
{
    let mut edges: Vec<(E, EdgeRecord)> = Vec::new();
    let mut assigned = Vec::new();
    let mut seen: BTreeMap<E, EdgeId> = BTreeMap::new();

    for (edge, record) in input {
        if P::MERGE_PARALLEL {
            if let Some(&id) = seen.get(&edge) {
                let merged = edges[id.index()].1.combine(&record);
                edges[id.index()].1 = merged;
                assigned.push(id);
                continue;
            }
            seen.insert(edge.clone(), EdgeId(edges.len()));
        }
        assigned.push(EdgeId(edges.len()));
        edges.push((edge, record));
    }

    (edges, assigned)
}

/// Node set implied by edges, detector records and boundaries.
pub(crate) fn collect_nodes<E: GraphEdge>(
    edges: &[(E, EdgeRecord)],
    detector_records: &BTreeMap<u32, DetectorRecord>,
    boundaries: &BTreeSet<u32>,
) -> BTreeSet<u32> {
    edges
        .iter()
        .flat_map(|(e, _)| e.vertices().iter().copied())
        .chain(detector_records.keys().copied())
        .chain(boundaries.iter().copied())
        .collect()
}
