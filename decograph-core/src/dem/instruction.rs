//! Typed DEM instructions as handed to parser actions.
//!
//! All ids here are already shifted by the running `shift_detectors` offset,
//! and coordinates by the running coordinate offset.

use std::collections::BTreeSet;

use crate::graph::Probability;

/// One `^`-separated part of an `error` instruction's targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorComponent {
    /// Detectors flipped by this component, sorted, each at most once.
    pub detectors: Vec<u32>,
    /// Observables flipped by this component, sorted, each at most once.
    pub logicals: Vec<u32>,
}

impl ErrorComponent {
    /// True if the component flips nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty() && self.logicals.is_empty()
    }
}

/// An `error(p) targets` instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorInstruction {
    /// Probability that the mechanism fires.
    pub probability: Probability,
    /// Suggested decomposition of the mechanism, in textual order.
    pub components: Vec<ErrorComponent>,
    /// Provenance tag, when tags are enabled and one was given.
    pub tag: Option<String>,
    /// One-based line of the instruction in the DEM text.
    pub line: usize,
}

impl ErrorInstruction {
    /// Detectors flipped by the whole mechanism.
    ///
    /// A detector named by an even number of components cancels out.
    #[must_use]
    pub fn detectors(&self) -> Vec<u32> {
        symmetric_difference(self.components.iter().map(|c| c.detectors.as_slice()))
    }

    /// Observables flipped by the whole mechanism, with the same cancellation.
    #[must_use]
    pub fn logicals(&self) -> Vec<u32> {
        symmetric_difference(self.components.iter().map(|c| c.logicals.as_slice()))
    }

    /// True if the instruction has more than one component.
    #[must_use]
    pub fn is_decomposed(&self) -> bool {
        self.components.len() > 1
    }
}

/// A `detector(coords) D<i>` instruction, one per detector target.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorInstruction {
    /// The detector id as materialized by the detector action.
    pub id: u32,
    /// Shifted coordinates; may be empty.
    pub coordinates: Vec<f64>,
    /// Provenance tag, when tags are enabled and one was given.
    pub tag: Option<String>,
    /// One-based line of the instruction in the DEM text.
    pub line: usize,
}

/// Sorted values appearing an odd number of times across `parts`.
pub(crate) fn symmetric_difference<'a, I>(parts: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a [u32]>,
{
    let mut odd = BTreeSet::new();
    for &v in parts.into_iter().flatten() {
        if !odd.remove(&v) {
            odd.insert(v);
        }
    }
    odd.into_iter().collect()
}
