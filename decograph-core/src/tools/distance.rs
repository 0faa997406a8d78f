//! Code distance by shortest paths on a parity-doubled graph.
//!
//! Each detector `v` becomes two nodes `(v, 0)` and `(v, 1)`, and every
//! boundary, explicit or implicit, collapses into one node `B`. An edge
//! `{a, b}` links `(a, π)` to `(b, π ^ ℓ)`, where `ℓ` is set when the edge
//! belongs to the logical. A path from `(s, 0)` to `(s, 1)` is a closed walk
//! through `s` that leaves no syndrome and flips the logical an odd number
//! of times. Every such walk passes through an endpoint of a member edge,
//! so the minimum over those endpoints is the distance.
//!
//! A graph with no edge to any boundary gets one fallback: the endpoints of
//! the logical's member edges are treated as open ends of the code and
//! joined to `B` at zero cost.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use super::weights::unweight_graph;
use crate::error::GraphError;
use crate::graph::{DecodingCode, EdgeId, EdgeRecord, GraphEdge, Logicals};

/// A minimum-weight undetectable error flipping one logical.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogicalDistance {
    /// The logical flipped.
    pub logical: usize,
    /// Total weight of [`edges`](Self::edges).
    pub weight: f64,
    /// The edges of the error, sorted.
    pub edges: Vec<EdgeId>,
}

impl LogicalDistance {
    /// Number of edges in the error.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Clone, Copy, Debug)]
struct Hop {
    edge: Option<EdgeId>,
    weight: f64,
}

const BOUNDARY: usize = 0;

struct ParityGraph {
    graph: UnGraph<(), Hop>,
    keys: BTreeMap<u32, usize>,
    boundary_touched: bool,
}

impl ParityGraph {
    fn build<G: DecodingCode>(graph: &G, members: &BTreeSet<EdgeId>) -> Result<Self, GraphError> {
        let keys: BTreeMap<u32, usize> = graph
            .detectors()
            .enumerate()
            .map(|(i, d)| (d, i + 1))
            .collect();
        let num_nodes = 2 * (keys.len() + 1);
        let mut doubled = UnGraph::with_capacity(num_nodes, 2 * graph.num_edges());
        for _ in 0..num_nodes {
            doubled.add_node(());
        }

        let mut built = Self {
            graph: doubled,
            keys,
            boundary_touched: false,
        };
        for (id, edge, record) in graph.edges() {
            let weight = record.weight();
            if weight < 0.0 {
                return Err(GraphError::NegativeWeight { edge: id, weight });
            }
            let (a, b) = built.endpoints(edge)?;
            built.boundary_touched |= a == BOUNDARY || b == BOUNDARY;
            built.link(a, b, members.contains(&id), Hop {
                edge: Some(id),
                weight,
            });
        }
        Ok(built)
    }

    fn endpoints<E: GraphEdge>(&self, edge: &E) -> Result<(usize, usize), GraphError> {
        if edge.degree() > 2 {
            return Err(GraphError::NotPlainEdge(edge.vertices().to_vec()));
        }
        let real: Vec<usize> = edge
            .vertices()
            .iter()
            .filter_map(|v| self.keys.get(v).copied())
            .collect();
        Ok(match *real.as_slice() {
            [a, b] => (a, b),
            [a] => (a, BOUNDARY),
            _ => (BOUNDARY, BOUNDARY),
        })
    }

    fn node(key: usize, parity: usize) -> NodeIndex {
        NodeIndex::new(2 * key + parity)
    }

    fn link(&mut self, a: usize, b: usize, flips: bool, hop: Hop) {
        if a == b {
            // Boundary to boundary: only matters if it flips the logical.
            if flips {
                self.graph.add_edge(Self::node(a, 0), Self::node(a, 1), hop);
            }
            return;
        }
        let twist = usize::from(flips);
        for parity in 0..2 {
            self.graph
                .add_edge(Self::node(a, parity), Self::node(b, parity ^ twist), hop);
        }
    }

    fn open_endpoints(&mut self, sources: &BTreeSet<usize>) {
        for &s in sources {
            if s != BOUNDARY {
                self.link(s, BOUNDARY, false, Hop {
                    edge: None,
                    weight: 0.0,
                });
            }
        }
    }

    fn shortest_flip(&self, key: usize) -> Option<(f64, Vec<NodeIndex>)> {
        let goal = Self::node(key, 1);
        astar(
            &self.graph,
            Self::node(key, 0),
            |n| n == goal,
            |e| e.weight().weight,
            |_| 0.0,
        )
    }

    /// Original edges along `path`, taking the lightest of parallel hops.
    fn path_edges(&self, path: &[NodeIndex]) -> Vec<EdgeId> {
        let mut fired = BTreeSet::new();
        for pair in path.windows(2) {
            let lightest = self
                .graph
                .edges_connecting(pair[0], pair[1])
                .map(|e| *e.weight())
                .min_by(|x, y| x.weight.total_cmp(&y.weight));
            if let Some(id) = lightest.and_then(|hop| hop.edge) {
                if !fired.remove(&id) {
                    fired.insert(id);
                }
            }
        }
        fired.into_iter().collect()
    }
}

/// Minimum-weight error that flips logical `logical` and leaves no syndrome.
///
/// Weights are taken from the edge records; run on
/// [`unweight_graph`] to count edges instead.
///
/// # Errors
///
/// - [`GraphError::LogicalIndexOutOfRange`] / [`GraphError::EmptyLogical`]
///   for a missing or memberless logical.
/// - [`GraphError::NegativeWeight`] if any edge weight is negative.
/// - [`GraphError::NotPlainEdge`] if the graph holds a hyperedge of degree
///   three or more; decompose it first.
/// - [`GraphError::LogicalUnreachable`] if no such error exists.
pub fn compute_graph_distance_for_logical<G: DecodingCode>(
    graph: &G,
    logicals: &Logicals,
    logical: usize,
) -> Result<LogicalDistance, GraphError> {
    let members = logicals
        .get(logical)
        .ok_or(GraphError::LogicalIndexOutOfRange {
            index: logical,
            len: logicals.len(),
        })?;
    if members.is_empty() {
        return Err(GraphError::EmptyLogical(logical));
    }

    let mut parity = ParityGraph::build(graph, members)?;
    let mut sources = BTreeSet::new();
    for edge in members.iter().filter_map(|&id| graph.edge(id)) {
        let (a, b) = parity.endpoints(edge)?;
        sources.insert(a);
        sources.insert(b);
    }

    let mut best: Option<(f64, Vec<NodeIndex>)> = None;
    for &s in &sources {
        if let Some((cost, path)) = parity.shortest_flip(s) {
            if best.as_ref().is_none_or(|(c, _)| cost < *c) {
                best = Some((cost, path));
            }
        }
    }
    if best.is_none() && !parity.boundary_touched && !sources.is_empty() {
        tracing::debug!(logical, "graph has no boundary edges, logical endpoints treated as open");
        parity.open_endpoints(&sources);
        best = parity.shortest_flip(BOUNDARY);
    }

    let (_, path) = best.ok_or(GraphError::LogicalUnreachable(logical))?;
    let edges = parity.path_edges(&path);
    let weight: f64 = edges
        .iter()
        .filter_map(|&id| graph.edge_record(id))
        .map(EdgeRecord::weight)
        .sum();
    tracing::debug!(logical, weight, edges = edges.len(), "logical distance found");
    Ok(LogicalDistance {
        logical,
        weight,
        edges,
    })
}

/// Minimum over all logicals with members of
/// [`compute_graph_distance_for_logical`].
///
/// Ties go to the lowest logical index.
///
/// # Errors
///
/// - [`GraphError::NoLogicals`] if no logical has members.
/// - [`GraphError::LogicalUnreachable`] if no logical can be flipped.
/// - Any other error of [`compute_graph_distance_for_logical`].
pub fn compute_graph_distance<G: DecodingCode>(
    graph: &G,
    logicals: &Logicals,
) -> Result<LogicalDistance, GraphError> {
    let mut best: Option<LogicalDistance> = None;
    let mut unreachable = None;
    for (index, members) in logicals.iter().enumerate() {
        if members.is_empty() {
            continue;
        }
        match compute_graph_distance_for_logical(graph, logicals, index) {
            Ok(d) => {
                if best.as_ref().is_none_or(|b| d.weight < b.weight) {
                    best = Some(d);
                }
            }
            Err(GraphError::LogicalUnreachable(i)) => {
                unreachable.get_or_insert(i);
            }
            Err(e) => return Err(e),
        }
    }
    match (best, unreachable) {
        (Some(d), _) => Ok(d),
        (None, Some(i)) => Err(GraphError::LogicalUnreachable(i)),
        (None, None) => Err(GraphError::NoLogicals),
    }
}

/// True if `edge` ends on a boundary, explicit or implicit.
pub fn is_boundary_edge<G: DecodingCode>(graph: &G, edge: &G::Edge) -> bool {
    edge.degree() == 1 || edge.vertices().iter().any(|&v| graph.is_boundary(v))
}

/// Boundary edges outside `logical`.
///
/// When a logical is represented by the boundary edges on one side of the
/// code, these are the boundary edges on the other side: a representative
/// of the same logical class.
#[must_use]
pub fn inverse_logical_at_boundary<G: DecodingCode>(
    graph: &G,
    logical: &BTreeSet<EdgeId>,
) -> BTreeSet<EdgeId> {
    graph
        .edges()
        .filter(|(id, edge, _)| is_boundary_edge(graph, *edge) && !logical.contains(id))
        .map(|(id, _, _)| id)
        .collect()
}

/// Upper bound on the detectors a minimum-weight logical error can touch.
///
/// A path of `d` edges touches at most `d + 1` nodes, where `d` is the
/// unit-weight distance.
///
/// # Errors
///
/// Any error of [`compute_graph_distance`].
pub fn worst_case_num_detectors<G: DecodingCode>(
    graph: &G,
    logicals: &Logicals,
) -> Result<usize, GraphError> {
    let distance = compute_graph_distance(&unweight_graph(graph), logicals)?;
    Ok(graph.num_detectors().min(distance.num_edges() + 1))
}
