//! Edges, edge metadata and probability arithmetic.
//!
//! An edge's topology (which detectors it flips) is kept apart from its
//! metadata ([`EdgeRecord`]): graphs store both side by side and hand out the
//! record by [`EdgeId`], never by position in some external list.

use core::fmt;
use std::collections::BTreeSet;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::GraphError;
use crate::syndrome::OrderedSyndrome;

/// Identity of an edge inside one graph.
///
/// Ids are dense, start at zero and follow the graph's deterministic edge
/// enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

impl EdgeId {
    /// The position of this edge in the graph's enumeration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A probability inside the open interval (0, 1).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Validates `p`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidProbability`] unless `0 < p < 1`.
    pub fn new(p: f64) -> Result<Self, GraphError> {
        if p > 0.0 && p < 1.0 {
            Ok(Self(p))
        } else {
            Err(GraphError::InvalidProbability(p))
        }
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Log-likelihood weight `ln((1 - p) / p)`, i.e. `-ln(p / (1 - p))`.
    ///
    /// Positive below 0.5, zero at 0.5, negative above.
    #[must_use]
    pub fn weight(self) -> f64 {
        ((1.0 - self.0) / self.0).ln()
    }

    /// Probability that exactly one of two independent mechanisms fires.
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        Self(independent_composition(self.0, other.0))
    }
}

/// `p1 (1 - p2) + p2 (1 - p1)`: the chance that exactly one of two
/// independent mechanisms fires, so their shared detectors flip.
#[must_use]
pub fn independent_composition(p1: f64, p2: f64) -> f64 {
    p1 * (1.0 - p2) + p2 * (1.0 - p1)
}

/// `-ln(p / (1 - p))` for a validated probability.
///
/// # Errors
///
/// [`GraphError::InvalidProbability`] unless `0 < p < 1`.
pub fn probability_to_weight(p: f64) -> Result<f64, GraphError> {
    Probability::new(p).map(Probability::weight)
}

/// Per-edge metadata: probability, derived weight and provenance tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeRecord {
    p_err: f64,
    weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

impl EdgeRecord {
    /// A record whose weight is derived from `p`.
    #[must_use]
    pub fn new(p: Probability) -> Self {
        Self {
            p_err: p.get(),
            weight: p.weight(),
            tag: None,
        }
    }

    /// Validates `p` and derives the weight.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidProbability`] unless `0 < p < 1`.
    pub fn from_probability(p: f64) -> Result<Self, GraphError> {
        Probability::new(p).map(Self::new)
    }

    /// Attaches a provenance tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Overrides the derived weight, keeping the probability.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Error probability.
    #[must_use]
    pub const fn p_err(&self) -> f64 {
        self.p_err
    }

    /// Edge weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Provenance tag, if the DEM carried one.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Merges two independent mechanisms on the same edge.
    ///
    /// The weight is re-derived from the composed probability; the first tag
    /// present wins.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let p_err = independent_composition(self.p_err, other.p_err);
        Self {
            p_err,
            weight: ((1.0 - p_err) / p_err).ln(),
            tag: self.tag.clone().or_else(|| other.tag.clone()),
        }
    }
}

/// Vertex access shared by every edge type a graph can hold.
pub trait GraphEdge: Clone + fmt::Debug + Ord {
    /// Detectors (and boundary nodes) this edge touches, sorted.
    fn vertices(&self) -> &[u32];

    /// Number of vertices.
    fn degree(&self) -> usize {
        self.vertices().len()
    }

    /// True if the edge touches `node`.
    fn contains(&self, node: u32) -> bool {
        self.vertices().binary_search(&node).is_ok()
    }
}

/// An error mechanism flipping any number of detectors.
///
/// A single-detector hyperedge has an implicit boundary endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecodingHyperEdge {
    vertices: SmallVec<[u32; 4]>,
}

impl DecodingHyperEdge {
    /// Creates a hyperedge over `vertices`; duplicates collapse.
    ///
    /// # Errors
    ///
    /// [`GraphError::EmptyEdge`] if no vertex is given.
    pub fn new<I: IntoIterator<Item = u32>>(vertices: I) -> Result<Self, GraphError> {
        let mut vertices: SmallVec<[u32; 4]> = vertices.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();
        if vertices.is_empty() {
            return Err(GraphError::EmptyEdge);
        }
        Ok(Self { vertices })
    }

    /// True if the edge has at most two vertices.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.vertices.len() <= 2
    }
}

impl GraphEdge for DecodingHyperEdge {
    fn vertices(&self) -> &[u32] {
        &self.vertices
    }
}

impl From<DecodingEdge> for DecodingHyperEdge {
    fn from(edge: DecodingEdge) -> Self {
        Self {
            vertices: SmallVec::from_slice(&edge.vertices),
        }
    }
}

/// A plain edge between two distinct nodes, stored with `first < second`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DecodingEdge {
    vertices: [u32; 2],
}

impl DecodingEdge {
    /// Creates the edge `{a, b}`.
    ///
    /// # Errors
    ///
    /// [`GraphError::SelfLoop`] if `a == b`.
    pub fn new(a: u32, b: u32) -> Result<Self, GraphError> {
        match a.cmp(&b) {
            core::cmp::Ordering::Less => Ok(Self { vertices: [a, b] }),
            core::cmp::Ordering::Greater => Ok(Self { vertices: [b, a] }),
            core::cmp::Ordering::Equal => Err(GraphError::SelfLoop(a)),
        }
    }

    /// Converts a hyperedge of degree one or two.
    ///
    /// A degree-one hyperedge is attached to `boundary`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::MissingBoundary`] for degree one without a boundary.
    /// - [`GraphError::NotPlainEdge`] for degree three or more.
    pub fn from_hyperedge(
        edge: &DecodingHyperEdge,
        boundary: Option<u32>,
    ) -> Result<Self, GraphError> {
        match edge.vertices() {
            &[d] => {
                let boundary = boundary.ok_or(GraphError::MissingBoundary(d))?;
                Self::new(d, boundary)
            }
            &[a, b] => Self::new(a, b),
            many => Err(GraphError::NotPlainEdge(many.to_vec())),
        }
    }

    /// The smaller endpoint.
    #[must_use]
    pub const fn first(&self) -> u32 {
        self.vertices[0]
    }

    /// The larger endpoint.
    #[must_use]
    pub const fn second(&self) -> u32 {
        self.vertices[1]
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    #[must_use]
    pub const fn other(&self, node: u32) -> Option<u32> {
        if node == self.vertices[0] {
            Some(self.vertices[1])
        } else if node == self.vertices[1] {
            Some(self.vertices[0])
        } else {
            None
        }
    }
}

impl GraphEdge for DecodingEdge {
    fn vertices(&self) -> &[u32] {
        &self.vertices
    }
}

/// Syndrome produced by a set of fired edges.
///
/// Detector `d` is in the syndrome iff an odd number of fired edges touch
/// it. Nodes in `boundaries` never appear.
pub fn errors_to_syndrome<'a, E, I>(edges: I, boundaries: &BTreeSet<u32>) -> OrderedSyndrome
where
    E: GraphEdge + 'a,
    I: IntoIterator<Item = &'a E>,
{
    edges
        .into_iter()
        .flat_map(|e| e.vertices().iter().copied())
        .filter(|v| !boundaries.contains(v))
        .collect()
}

/// An ordered set of edges where inserting a present edge removes it.
///
/// Decoders report corrections in this form: applying an edge twice is the
/// same as not applying it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OrderedDecodingEdges<E: GraphEdge> {
    edges: BTreeSet<E>,
}

impl<E: GraphEdge> OrderedDecodingEdges<E> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            edges: BTreeSet::new(),
        }
    }

    /// Toggles `edge`.
    pub fn xor_insert(&mut self, edge: E) {
        if !self.edges.remove(&edge) {
            self.edges.insert(edge);
        }
    }

    /// Number of edges present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.edges.iter()
    }

    /// Syndrome these edges produce.
    #[must_use]
    pub fn syndrome(&self, boundaries: &BTreeSet<u32>) -> OrderedSyndrome {
        errors_to_syndrome(self.edges.iter(), boundaries)
    }
}

impl<E: GraphEdge> FromIterator<E> for OrderedDecodingEdges<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = Self::new();
        for e in iter {
            set.xor_insert(e);
        }
        set
    }
}
