//! Detector error model (DEM) parsing.
//!
//! # Module Organization
//!
//! - [`instruction`] - typed instructions handed to actions
//! - [`actions`] - [`ErrorAction`], [`DetectorAction`], [`LogicalAction`] and stock implementations
//! - [`options`] - [`ParserOptions`] and the tag capability query
//! - [`parser`] - [`DemParser`] and [`ParseWarning`]
//! - [`build`] - DEM text to decoding graphs
//!
//! # Example
//!
//! ```
//! use decograph_core::dem::dem_to_decoding_graph_and_logicals;
//! use decograph_core::graph::DecodingCode;
//!
//! let dem = "error(0.1) D0 D1 L0\nerror(0.2) D1\ndetector(0, 0) D0\ndetector(1, 0) D1";
//! let (graph, logicals) = dem_to_decoding_graph_and_logicals(dem).unwrap();
//! assert_eq!(graph.num_detectors(), 2);
//! assert_eq!(graph.boundary(), Some(2));
//! assert_eq!(logicals.len(), 1);
//! ```

pub mod actions;
pub mod build;
pub mod instruction;
pub mod options;
pub mod parser;

pub use actions::{
    DetectorAction, DetectorCounter, DetectorRecorder, ErrorAction, LogicalAction,
    LogicalsInEdges,
};
pub use build::{
    ParsedDem, dem_to_decoding_graph_and_logicals, dem_to_hypergraph_and_logicals, parse_dem,
    parse_dem_with_options,
};
pub use instruction::{DetectorInstruction, ErrorComponent, ErrorInstruction};
pub use options::{
    DEFAULT_MAX_REPEAT_DEPTH, ParserOptions, TAG_FEATURE_ENV, tag_feature_available,
};
pub use parser::{DemParser, ParseSummary, ParseWarning, observable_warning};
