//! Logical observable membership.

use std::collections::BTreeSet;

use serde::Serialize;

use super::edge::EdgeId;

/// Maps each logical observable to the edges that flip it.
///
/// An observable's value after a set of errors is the parity of how many of
/// its member edges fired. Membership refers to [`EdgeId`]s of one specific
/// graph; after any transformation that renumbers edges the logicals must be
/// rebuilt with [`project`](Self::project).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Logicals {
    members: Vec<BTreeSet<EdgeId>>,
}

impl Logicals {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Creates `count` logicals with no members.
    #[must_use]
    pub fn with_len(count: usize) -> Self {
        Self {
            members: vec![BTreeSet::new(); count],
        }
    }

    /// Wraps explicit member sets.
    #[must_use]
    pub fn from_sets(members: Vec<BTreeSet<EdgeId>>) -> Self {
        Self { members }
    }

    /// Number of logicals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if there are no logicals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members of logical `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BTreeSet<EdgeId>> {
        self.members.get(index)
    }

    /// Member sets in logical order.
    pub fn iter(&self) -> impl Iterator<Item = &BTreeSet<EdgeId>> + '_ {
        self.members.iter()
    }

    /// Adds `edge` to logical `index`, growing the map as needed.
    pub fn insert(&mut self, index: usize, edge: EdgeId) {
        if index >= self.members.len() {
            self.members.resize(index + 1, BTreeSet::new());
        }
        self.members[index].insert(edge);
    }

    /// Ensures at least `count` logicals exist.
    pub fn reserve_logicals(&mut self, count: usize) {
        if count > self.members.len() {
            self.members.resize(count, BTreeSet::new());
        }
    }

    /// Logicals that `edge` belongs to.
    #[must_use]
    pub fn logicals_of(&self, edge: EdgeId) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.contains(&edge))
            .map(|(i, _)| i)
            .collect()
    }

    /// Which logicals a set of fired edges flips.
    ///
    /// An edge listed twice counts twice.
    #[must_use]
    pub fn flipped_by(&self, fired: &[EdgeId]) -> Vec<bool> {
        self.members
            .iter()
            .map(|m| fired.iter().filter(|&e| m.contains(e)).count() % 2 == 1)
            .collect()
    }

    /// Rebuilds membership for a graph derived from this one.
    ///
    /// `origin[i]` is the edge of the source graph that edge `i` of the
    /// derived graph came from.
    #[must_use]
    pub fn project(&self, origin: &[EdgeId]) -> Self {
        let members = self
            .members
            .iter()
            .map(|m| {
                origin
                    .iter()
                    .enumerate()
                    .filter(|&(_, old)| m.contains(old))
                    .map(|(new, _)| EdgeId(new))
                    .collect()
            })
            .collect();
        Self { members }
    }
}
