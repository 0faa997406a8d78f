//! Error types for DEM parsing, graph construction and graph analytics.
//!
//! Every fatal error kind is its own enum so callers can match on the layer
//! that failed:
//!
//! | Type | Raised by |
//! |------|-----------|
//! | [`DemParsingError`] | [`DemParser`](crate::dem::DemParser) |
//! | [`GraphError`] | graph construction and [`tools`](crate::tools) |
//! | [`SyndromeError`] | bitstring and syndrome operations |
//!
//! [`Error`] wraps all three, plus `serde_json` failures, for the entry
//! points that cross layers: the DEM builders such as
//! [`dem_to_decoding_graph_and_logicals`](crate::dem::dem_to_decoding_graph_and_logicals),
//! [`syndrome_by_round`](crate::tools::syndrome_by_round) and the JSON export.

use thiserror::Error;

use crate::graph::EdgeId;

/// Reason a DEM line was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DemErrorKind {
    /// The instruction name is not part of the DEM format.
    #[error("unknown instruction `{0}`")]
    UnknownInstruction(String),

    /// The line does not follow `name[tag](args) targets`.
    #[error("malformed instruction: {0}")]
    Malformed(String),

    /// The probability argument is not a number.
    #[error("cannot parse probability `{0}`")]
    InvalidProbability(String),

    /// The probability argument is not inside the open interval (0, 1).
    #[error("probability {0} is outside the open interval (0, 1)")]
    ProbabilityOutOfRange(f64),

    /// A target token is not valid for this instruction.
    #[error("invalid target `{0}`")]
    InvalidTarget(String),

    /// A coordinate argument is not a number.
    #[error("invalid coordinate `{0}`")]
    InvalidCoordinate(String),

    /// The repeat count is not a positive integer.
    #[error("repeat count must be a positive integer, got `{0}`")]
    InvalidRepeatCount(String),

    /// A `}` with no open repeat block.
    #[error("unmatched closing brace")]
    UnmatchedClose,

    /// A `repeat` block that is never closed.
    #[error("repeat block is never closed")]
    UnclosedRepeat,

    /// `repeat` blocks nested deeper than the configured limit.
    #[error("repeat blocks nested more than {max} deep")]
    NestingTooDeep {
        /// The configured limit.
        max: usize,
    },

    /// An `L<i>` target beyond the configured number of observables.
    #[error("logical observable L{index} is out of range ({max} observables allowed)")]
    LogicalOutOfRange {
        /// The referenced observable.
        index: u32,
        /// The configured limit.
        max: u32,
    },

    /// Shifting a detector id pushed it past `u32::MAX`.
    #[error("detector id D{0} overflows after shifting")]
    DetectorOverflow(u64),
}

/// A fatal DEM parse failure, carrying the offending line.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("line {line}: {kind} (in `{content}`)")]
pub struct DemParsingError {
    /// One-based line number in the DEM text.
    pub line: usize,
    /// The text of the offending line, trimmed.
    pub content: String,
    /// What went wrong.
    pub kind: DemErrorKind,
}

impl DemParsingError {
    /// Creates a new parse error for `line`.
    pub fn new(line: usize, content: &str, kind: DemErrorKind) -> Self {
        Self {
            line,
            content: content.trim().to_string(),
            kind,
        }
    }
}

/// Structural and domain errors raised by graph construction and graph tools.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GraphError {
    /// A probability outside the open interval (0, 1).
    #[error("probability {0} is outside the open interval (0, 1)")]
    InvalidProbability(f64),

    /// A negative edge weight reached an algorithm that needs non-negative weights.
    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight {
        /// Offending edge.
        edge: EdgeId,
        /// Its weight.
        weight: f64,
    },

    /// A per-edge vector does not match the number of edges.
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Number of edges in the graph.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// An edge with no detectors.
    #[error("edge has no detectors")]
    EmptyEdge,

    /// A plain edge whose two endpoints coincide.
    #[error("plain edge from detector {0} to itself")]
    SelfLoop(u32),

    /// A hyperedge with more than two detectors where a plain edge is required.
    #[error("edge over detectors {0:?} has more than two endpoints")]
    NotPlainEdge(Vec<u32>),

    /// A degree-one edge needs a boundary node but none was given.
    #[error("degree-one edge on detector {0} needs a boundary node")]
    MissingBoundary(u32),

    /// A logical index past the end of the logicals.
    #[error("logical {index} is out of range ({len} logicals)")]
    LogicalIndexOutOfRange {
        /// Requested logical.
        index: usize,
        /// Number of logicals.
        len: usize,
    },

    /// A logical with no member edges.
    #[error("logical {0} has no member edges")]
    EmptyLogical(usize),

    /// No logical can be used for a distance computation.
    #[error("no logical with member edges")]
    NoLogicals,

    /// No syndrome-free edge set flips the logical.
    #[error("logical {0} is not reachable: no syndrome-free edge set flips it")]
    LogicalUnreachable(usize),

    /// A hyperedge could not be covered by the decomposition scheme.
    #[error("edge {edge} over detectors {detectors:?} cannot be decomposed: {reason}")]
    UndecomposableEdge {
        /// Offending edge.
        edge: EdgeId,
        /// Its detectors.
        detectors: Vec<u32>,
        /// Why no decomposition applies.
        reason: String,
    },
}

/// Errors raised by bitstring and syndrome operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyndromeError {
    /// Two fixed-width bitstrings of different widths were combined.
    #[error("width mismatch: {left} bits vs {right} bits")]
    WidthMismatch {
        /// Width of the left operand.
        left: usize,
        /// Width of the right operand.
        right: usize,
    },

    /// A bit index at or beyond the width.
    #[error("bit {index} is out of range for width {width}")]
    IndexOutOfRange {
        /// Requested bit.
        index: usize,
        /// Bitstring width.
        width: usize,
    },

    /// A round window reaching past the end of the bitstring.
    #[error("round {round} of {round_width} bits exceeds width {width}")]
    RoundOutOfRange {
        /// Requested round.
        round: usize,
        /// Bits per round.
        round_width: usize,
        /// Bitstring width.
        width: usize,
    },

    /// Rounds must hold at least one bit.
    #[error("round width must be positive")]
    ZeroRoundWidth,

    /// A character other than '0' or '1' in bit text.
    #[error("invalid character {0:?} in bit text")]
    InvalidCharacter(char),

    /// Packed bytes whose length does not match the width.
    #[error("{bytes} bytes do not hold exactly {width} bits")]
    ByteLength {
        /// Supplied byte count.
        bytes: usize,
        /// Requested width.
        width: usize,
    },

    /// A fired detector with no round metadata.
    #[error("detector {0} has no detector record")]
    MissingRecord(u32),
}

/// Any error raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// DEM text could not be parsed.
    #[error(transparent)]
    Parse(#[from] DemParsingError),

    /// A graph could not be built or analysed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A bitstring operation failed.
    #[error(transparent)]
    Syndrome(#[from] SyndromeError),

    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used by the cross-layer entry points.
pub type Result<T, E = Error> = std::result::Result<T, E>;
