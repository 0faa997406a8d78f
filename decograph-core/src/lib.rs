//! # decograph-core: Detector Error Models to Decoding Graphs
//!
//! `decograph-core` turns a detector error model (DEM), the textual
//! description of a circuit's error mechanisms, into the graphs that
//! quantum error correction decoders consume, and provides the graph
//! analytics needed to build and validate those decoders.
//!
//! ## Overview
//!
//! 1. **Parse** - [`dem::DemParser`] executes DEM text (repeat blocks,
//!    detector and coordinate shifts, tags) and hands typed instructions to
//!    pluggable actions
//! 2. **Build** - the DEM builders accumulate edges, detector records and
//!    logical membership into an immutable graph plus [`Logicals`]
//! 3. **Analyse** - [`tools`] computes distances, decompositions,
//!    re-weightings and filters, always returning new values
//!
//! ## Quick Start
//!
//! ```
//! use decograph_core::dem::dem_to_decoding_graph_and_logicals;
//! use decograph_core::graph::DecodingCode;
//! use decograph_core::tools::compute_graph_distance_for_logical;
//!
//! let dem = "error(0.1) D0 L0\nerror(0.1) D0 D1\nerror(0.1) D1";
//! let (graph, logicals) = dem_to_decoding_graph_and_logicals(dem).unwrap();
//! assert_eq!(graph.num_detectors(), 2);
//!
//! let distance = compute_graph_distance_for_logical(&graph, &logicals, 0).unwrap();
//! assert_eq!(distance.num_edges(), 3);
//! ```
//!
//! ## Module Organization
//!
//! - [`error`] - error types for parsing, graphs and syndromes
//! - [`syndrome`] - bitstrings, ordered syndromes and detector records
//! - [`dem`] - DEM parser, actions and graph builders
//! - [`graph`] - edges, logicals, the [`DecodingCode`] trait and its realizations
//! - [`tools`] - distance, decomposition, weights, filters, checks, JSON
//! - [`sampler`] - seeded error sampling

#![warn(missing_docs)]

// =============================================================================
// Module Declarations
// =============================================================================

/// DEM text parsing and DEM to graph builders.
pub mod dem;

/// Error types for every layer.
pub mod error;

/// The decoding graph model.
pub mod graph;

/// Seeded sampling of errors, syndromes and logical flips.
pub mod sampler;

/// Bitstrings, syndromes and detector metadata.
pub mod syndrome;

/// Graph analytics.
pub mod tools;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Errors
pub use error::{DemErrorKind, DemParsingError, Error, GraphError, Result, SyndromeError};

// Parsing
pub use dem::{
    DemParser, ParserOptions, dem_to_decoding_graph_and_logicals, dem_to_hypergraph_and_logicals,
    parse_dem,
};

// Graph model
pub use graph::{
    DecodingCode, DecodingEdge, DecodingHyperEdge, DecodingHyperGraph, DecodingHyperMultiGraph,
    EdgeId, EdgeRecord, Logicals, NxDecodingGraph, NxDecodingMultiGraph, errors_to_syndrome,
};

// Syndromes
pub use syndrome::{Bitstring, DetectorRecord, FixedWidthBitstring, OrderedSyndrome};

// Sampling
pub use sampler::{ErrorSampler, Sample};
