//! The decoding graph model.
//!
//! # Module Organization
//!
//! - [`edge`] - edge types, [`EdgeRecord`], probability arithmetic, [`errors_to_syndrome`]
//! - [`logicals`] - [`Logicals`], observable membership by [`EdgeId`]
//! - [`code`] - the [`DecodingCode`] trait and parallel-edge policies
//! - [`hypergraph`] - [`DecodingHyperGraph`] and [`DecodingHyperMultiGraph`]
//! - [`nx`] - petgraph-backed [`NxDecodingGraph`] and [`NxDecodingMultiGraph`]

pub mod code;
pub mod edge;
pub mod hypergraph;
pub mod logicals;
pub mod nx;

pub use code::{DecodingCode, EdgePolicy, KeepParallel, MergeParallel};
pub use edge::{
    DecodingEdge, DecodingHyperEdge, EdgeId, EdgeRecord, GraphEdge, OrderedDecodingEdges,
    Probability, errors_to_syndrome, independent_composition, probability_to_weight,
};
pub use hypergraph::{DecodingHyperGraph, DecodingHyperMultiGraph, HyperGraph};
pub use logicals::Logicals;
pub use nx::{NxDecodingGraph, NxDecodingMultiGraph, NxGraph};
