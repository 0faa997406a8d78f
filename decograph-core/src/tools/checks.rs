//! Topological checks decoders rely on.

use std::collections::{BTreeSet, VecDeque};

use crate::graph::DecodingCode;

/// True if every node can reach every other node.
///
/// Boundary nodes count as ordinary nodes. An empty graph is not connected.
#[must_use]
pub fn is_single_connected_component<G: DecodingCode>(graph: &G) -> bool {
    let Some(&start) = graph.nodes().first() else {
        return false;
    };
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for next in graph.neighbors(node) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == graph.num_nodes()
}

/// True if node ids are exactly `0..num_nodes`.
#[must_use]
pub fn has_contiguous_nodes<G: DecodingCode>(graph: &G) -> bool {
    graph
        .nodes()
        .iter()
        .enumerate()
        .all(|(i, &n)| n as usize == i)
}

/// True if there is exactly one boundary node and it has the largest id.
#[must_use]
pub fn single_boundary_is_last_node<G: DecodingCode>(graph: &G) -> bool {
    match (graph.boundaries().first(), graph.nodes().last()) {
        (Some(b), Some(last)) => graph.boundaries().len() == 1 && b == last,
        _ => false,
    }
}
