//! Callbacks the parser drives while executing a DEM.
//!
//! The parser knows nothing about what is built from the instructions it
//! reads. Each instruction kind is handed to an action:
//!
//! - [`ErrorAction`] receives every `error` instruction
//! - [`DetectorAction`] materializes detector ids and receives `detector` declarations
//! - [`LogicalAction`] receives `logical_observable` declarations
//!
//! All three are implemented for closures, so ad hoc consumers need no type.

use std::collections::BTreeMap;

use super::instruction::{DetectorInstruction, ErrorInstruction};
use crate::graph::{EdgeId, Logicals};
use crate::syndrome::DetectorRecord;

/// Receives `error` instructions in execution order.
pub trait ErrorAction {
    /// Called once per executed `error` instruction.
    fn on_error(&mut self, instruction: &ErrorInstruction);
}

impl<F: FnMut(&ErrorInstruction)> ErrorAction for F {
    fn on_error(&mut self, instruction: &ErrorInstruction) {
        self(instruction);
    }
}

/// Decides how detector ids are materialized and records declarations.
pub trait DetectorAction {
    /// Maps a shifted detector id, as read from the DEM, to the id used in
    /// the output. Called for every detector reference, in errors and
    /// declarations alike.
    fn assign(&mut self, id: u32) -> u32 {
        id
    }

    /// Called once per detector target of a `detector` instruction, after
    /// [`assign`](Self::assign).
    fn record(&mut self, instruction: &DetectorInstruction);
}

impl<F: FnMut(&DetectorInstruction)> DetectorAction for F {
    fn record(&mut self, instruction: &DetectorInstruction) {
        self(instruction);
    }
}

/// Receives `logical_observable` declarations.
pub trait LogicalAction {
    /// Called once per declared observable.
    fn on_logical(&mut self, index: u32);
}

impl<F: FnMut(u32)> LogicalAction for F {
    fn on_logical(&mut self, index: u32) {
        self(index);
    }
}

// =============================================================================
// Detector actions
// =============================================================================

/// Counts detectors: one past the largest id seen anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectorCounter {
    count: u32,
}

impl DetectorCounter {
    /// Creates a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Number of detectors implied by the ids seen so far.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }
}

impl DetectorAction for DetectorCounter {
    fn assign(&mut self, id: u32) -> u32 {
        self.count = self.count.max(id.saturating_add(1));
        id
    }

    fn record(&mut self, _instruction: &DetectorInstruction) {}
}

/// Counts detectors and keeps a [`DetectorRecord`] for each declared one
/// that carries coordinates.
///
/// A detector declared twice keeps its last declaration.
#[derive(Clone, Debug, Default)]
pub struct DetectorRecorder {
    counter: DetectorCounter,
    records: BTreeMap<u32, DetectorRecord>,
}

impl DetectorRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of detectors implied by the ids seen so far.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.counter.count()
    }

    /// Records gathered so far.
    #[must_use]
    pub const fn records(&self) -> &BTreeMap<u32, DetectorRecord> {
        &self.records
    }

    /// Consumes the recorder, returning the detector count and the records.
    #[must_use]
    pub fn into_parts(self) -> (u32, BTreeMap<u32, DetectorRecord>) {
        (self.counter.count(), self.records)
    }
}

impl DetectorAction for DetectorRecorder {
    fn assign(&mut self, id: u32) -> u32 {
        self.counter.assign(id)
    }

    fn record(&mut self, instruction: &DetectorInstruction) {
        // No coordinates means no round to record.
        if instruction.coordinates.is_empty() {
            return;
        }
        self.records.insert(
            instruction.id,
            DetectorRecord::from_coordinates(&instruction.coordinates),
        );
    }
}

// =============================================================================
// Logical bookkeeping
// =============================================================================

/// Builds [`Logicals`] keyed by error index while the DEM executes.
///
/// The `n`-th executed error is `EdgeId(n)`. Declared observables with no
/// edges still get an (empty) entry.
#[derive(Clone, Debug, Default)]
pub struct LogicalsInEdges {
    logicals: Logicals,
    next_edge: usize,
}

impl LogicalsInEdges {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership collected so far.
    #[must_use]
    pub const fn logicals(&self) -> &Logicals {
        &self.logicals
    }

    /// Number of errors seen.
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.next_edge
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_logicals(self) -> Logicals {
        self.logicals
    }
}

impl ErrorAction for LogicalsInEdges {
    fn on_error(&mut self, instruction: &ErrorInstruction) {
        let edge = EdgeId(self.next_edge);
        self.next_edge += 1;
        for l in instruction.logicals() {
            self.logicals.insert(l as usize, edge);
        }
    }
}

impl LogicalAction for LogicalsInEdges {
    fn on_logical(&mut self, index: u32) {
        self.logicals.reserve_logicals(index as usize + 1);
    }
}
