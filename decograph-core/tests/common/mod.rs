//! Shared test utilities for decograph-core tests.
//!
//! Builders for small graphs and a DEM writer used to check that parsed
//! graphs describe the same mechanisms as their source text.

#![allow(dead_code)] // Not all test files use all functions

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use decograph_core::graph::{
    DecodingCode, DecodingEdge, DecodingHyperEdge, DecodingHyperMultiGraph, EdgeId, EdgeRecord,
    GraphEdge, Logicals, NxDecodingGraph,
};

/// Three detectors on a line, one logical edge and no boundary edge.
pub const LINE_DEM: &str = "error(0.1) D0 D1 L0
error(0.2) D1 D2
detector(0, 0) D0
detector(1, 0) D1
detector(2, 0) D2";

/// A plain edge with probability `p`.
pub fn plain(a: u32, b: u32, p: f64) -> (DecodingEdge, EdgeRecord) {
    (
        DecodingEdge::new(a, b).unwrap(),
        EdgeRecord::from_probability(p).unwrap(),
    )
}

/// A hyperedge with probability `p`.
pub fn hyper(vertices: &[u32], p: f64) -> (DecodingHyperEdge, EdgeRecord) {
    (
        DecodingHyperEdge::new(vertices.iter().copied()).unwrap(),
        EdgeRecord::from_probability(p).unwrap(),
    )
}

/// Distance-`d` repetition code: detectors `0..d-1` in a chain, both ends
/// attached to boundary `d - 1`. The logical is the left boundary edge.
pub fn repetition_code(d: u32, p: f64) -> (NxDecodingGraph, Logicals) {
    assert!(d >= 2);
    let boundary = d - 1;
    let mut edges = vec![plain(0, boundary, p)];
    for i in 0..d.saturating_sub(2) {
        edges.push(plain(i, i + 1, p));
    }
    edges.push(plain(d - 2, boundary, p));

    let (graph, ids) = NxDecodingGraph::new_indexed(edges, BTreeMap::new(), BTreeSet::from([boundary]));
    let logicals = Logicals::from_sets(vec![BTreeSet::from([ids[0]])]);
    (graph, logicals)
}

/// Repetition-code memory experiment over `rounds` rounds as DEM text.
///
/// `n` data qubits give `n - 1` checks per round. Data errors flip
/// neighbouring checks of one round, measurement errors flip one check in
/// two consecutive rounds. The first data qubit carries the logical.
pub fn repetition_memory_dem(n: u32, rounds: u32, p: f64) -> String {
    assert!(n >= 2 && rounds >= 1);
    let checks = n - 1;
    let mut round = String::new();
    writeln!(round, "error({p}) D0 L0").unwrap();
    for c in 0..checks - 1 {
        writeln!(round, "error({p}) D{c} D{}", c + 1).unwrap();
    }
    writeln!(round, "error({p}) D{}", checks - 1).unwrap();
    let mut declarations = String::new();
    for c in 0..checks {
        writeln!(declarations, "detector({c}, 0) D{c}").unwrap();
    }

    let mut dem = String::from("logical_observable L0\n");
    if rounds > 1 {
        writeln!(dem, "repeat {} {{", rounds - 1).unwrap();
        dem.push_str(&round);
        for c in 0..checks {
            writeln!(dem, "error({p}) D{c} D{}", c + checks).unwrap();
        }
        dem.push_str(&declarations);
        writeln!(dem, "shift_detectors(0, 1) {checks}").unwrap();
        dem.push_str("}\n");
    }
    dem.push_str(&round);
    dem.push_str(&declarations);
    dem
}

/// Writes `graph` back out as DEM text, one `error` line per edge.
///
/// Probabilities are printed with full precision so a reparse sees the
/// same values.
pub fn write_dem<G: DecodingCode>(graph: &G, logicals: &Logicals) -> String {
    let mut dem = String::new();
    for (id, edge, record) in graph.edges() {
        write!(dem, "error({:?})", record.p_err()).unwrap();
        for &v in edge.vertices() {
            if !graph.is_boundary(v) {
                write!(dem, " D{v}").unwrap();
            }
        }
        for l in logicals.logicals_of(id) {
            write!(dem, " L{l}").unwrap();
        }
        dem.push('\n');
    }
    for (id, record) in graph.detector_records() {
        let coords: Vec<String> = record.full_coord().iter().map(|c| format!("{c:?}")).collect();
        writeln!(dem, "detector({}) D{id}", coords.join(", ")).unwrap();
    }
    dem
}

/// Edges as `(sorted detectors, probability, logicals)`, in edge order.
pub fn mechanisms<G: DecodingCode>(graph: &G, logicals: &Logicals) -> Vec<(Vec<u32>, f64, Vec<usize>)> {
    graph
        .edges()
        .map(|(id, edge, record)| {
            let detectors = edge
                .vertices()
                .iter()
                .copied()
                .filter(|&v| !graph.is_boundary(v))
                .collect();
            (detectors, record.p_err(), logicals.logicals_of(id))
        })
        .collect()
}

/// Hypergraph built directly from `(vertices, p)` pairs.
pub fn hypergraph(edges: &[(&[u32], f64)]) -> DecodingHyperMultiGraph {
    DecodingHyperMultiGraph::from_edges(edges.iter().map(|(vs, p)| hyper(vs, *p)))
}

/// Asserts two floats agree to `tol`.
pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} and {b} differ by more than {tol}");
}

/// Ids `0..n` as edge ids.
pub fn edge_ids(ids: &[usize]) -> BTreeSet<EdgeId> {
    ids.iter().map(|&i| EdgeId(i)).collect()
}
