//! Graph analytics over any [`DecodingCode`](crate::graph::DecodingCode).
//!
//! Tools only read the graph they are given. Anything that changes edges
//! returns a new graph.
//!
//! # Module Organization
//!
//! - [`weights`] - re-weighting and unweighting
//! - [`checks`] - connectivity and node-numbering checks
//! - [`filter`] - space-like / time-like edge partitions, syndromes by round
//! - [`distance`] - code distance and boundary logicals
//! - [`decomposition`] - hyperedges to plain edges
//! - [`json`] - JSON export

pub mod checks;
pub mod decomposition;
pub mod distance;
pub mod filter;
pub mod json;
pub mod weights;

pub use checks::{has_contiguous_nodes, is_single_connected_component, single_boundary_is_last_node};
pub use decomposition::{
    BoundaryStar, DEFAULT_CANDIDATE_LIMIT, DecompositionScheme, ExistingEdgeCover, PairwiseCover,
    constituent_probability, decompose_to_graph, decompositions, hypergraph_to_weighted_edge_list,
};
pub use distance::{
    LogicalDistance, compute_graph_distance, compute_graph_distance_for_logical,
    inverse_logical_at_boundary, is_boundary_edge, worst_case_num_detectors,
};
pub use filter::{EdgeSubgraph, filter_to_data_edges, filter_to_measure_edges, syndrome_by_round};
pub use json::{graph_to_json, graph_to_json_value};
pub use weights::{change_graph_error_probabilities, unweight_graph, vector_probabilities, vector_weights};
