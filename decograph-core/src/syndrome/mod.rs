//! Bitstrings, syndromes and detector metadata.
//!
//! # Module Organization
//!
//! - [`bitstring`] - [`Bitstring`], [`FixedWidthBitstring`] and [`get_round_words`]
//! - [`ordered`] - [`OrderedSyndrome`] and [`DetectorRecord`]

pub mod bitstring;
pub mod ordered;

pub use bitstring::{Bitstring, FixedWidthBitstring, get_round_words};
pub use ordered::{DetectorRecord, OrderedSyndrome};
