//! Sparse syndromes and detector metadata.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::bitstring::{Bitstring, FixedWidthBitstring};
use crate::error::SyndromeError;

/// Coordinate metadata for one detector.
///
/// DEM `detector(c0, c1, ..., t) D<i>` instructions list spatial coordinates
/// followed by the time coordinate; the last coordinate is taken as the
/// measurement round.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetectorRecord {
    /// Spatial coordinates, in declaration order.
    pub spatial_coord: Vec<f64>,
    /// Measurement round.
    pub time: i64,
}

impl DetectorRecord {
    /// Creates a record from explicit spatial coordinates and round.
    #[must_use]
    pub fn new(spatial_coord: Vec<f64>, time: i64) -> Self {
        Self {
            spatial_coord,
            time,
        }
    }

    /// Splits DEM coordinates into spatial part and round.
    ///
    /// An empty coordinate list yields round 0 with no spatial part.
    /// Coordinates must be finite; the DEM parser rejects any that are not.
    #[must_use]
    pub fn from_coordinates(coords: &[f64]) -> Self {
        match coords.split_last() {
            Some((&t, spatial)) => Self {
                spatial_coord: spatial.to_vec(),
                time: t.round() as i64,
            },
            None => Self::default(),
        }
    }

    /// All coordinates with the round appended last.
    #[must_use]
    pub fn full_coord(&self) -> Vec<f64> {
        let mut coords = self.spatial_coord.clone();
        coords.push(self.time as f64);
        coords
    }
}

/// The set of fired detectors, kept sorted.
///
/// Inserting a detector that is already present removes it: two flips of
/// the same detector cancel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderedSyndrome {
    detectors: BTreeSet<u32>,
}

impl OrderedSyndrome {
    /// Creates an empty syndrome.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            detectors: BTreeSet::new(),
        }
    }

    /// Flips `detector`.
    pub fn xor_insert(&mut self, detector: u32) {
        if !self.detectors.remove(&detector) {
            self.detectors.insert(detector);
        }
    }

    /// True if `detector` fired.
    #[must_use]
    pub fn contains(&self, detector: u32) -> bool {
        self.detectors.contains(&detector)
    }

    /// Number of fired detectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// True if nothing fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Fired detectors in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.detectors.iter().copied()
    }

    /// Reads fired detectors from a dense bitstring.
    #[must_use]
    pub fn from_bitstring(bits: &FixedWidthBitstring) -> Self {
        Self {
            detectors: bits.iter_ones().map(|i| i as u32).collect(),
        }
    }

    /// Dense form with `width` bits.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::IndexOutOfRange`] if a fired detector is at or past `width`.
    pub fn as_bitstring(&self, width: usize) -> Result<FixedWidthBitstring, SyndromeError> {
        FixedWidthBitstring::from_bitstring(
            Bitstring::from_indices(self.iter().map(|d| d as usize)),
            width,
        )
    }

    /// Groups fired detectors by measurement round.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::MissingRecord`] if a fired detector has no record.
    pub fn split_by_round(
        &self,
        records: &BTreeMap<u32, DetectorRecord>,
    ) -> Result<BTreeMap<i64, OrderedSyndrome>, SyndromeError> {
        let mut rounds: BTreeMap<i64, OrderedSyndrome> = BTreeMap::new();
        for d in self.iter() {
            let record = records.get(&d).ok_or(SyndromeError::MissingRecord(d))?;
            rounds.entry(record.time).or_default().xor_insert(d);
        }
        Ok(rounds)
    }
}

impl FromIterator<u32> for OrderedSyndrome {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut syndrome = Self::new();
        for d in iter {
            syndrome.xor_insert(d);
        }
        syndrome
    }
}
