//! Seeded error sampling over a built graph.
//!
//! Each edge fires independently with its record's probability. The result
//! carries the fired edges, the syndrome they produce and the logicals they
//! flip, so a decoder can be checked against the truth.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::graph::{DecodingCode, EdgeId, Logicals};
use crate::syndrome::FixedWidthBitstring;

/// One sampled shot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Edges that fired, in id order.
    pub fired: Vec<EdgeId>,
    /// Detector outcomes; bit `d` is detector `d`.
    pub syndrome: FixedWidthBitstring,
    /// Which logicals the fired edges flip.
    pub flipped_logicals: Vec<bool>,
}

/// Samples shots from a graph.
///
/// # Example
///
/// ```
/// use decograph_core::dem::dem_to_decoding_graph_and_logicals;
/// use decograph_core::sampler::ErrorSampler;
///
/// let (graph, logicals) = dem_to_decoding_graph_and_logicals("error(0.5) D0 D1 L0").unwrap();
/// let mut sampler = ErrorSampler::new(&graph, &logicals, 7);
/// let shot = sampler.sample();
/// assert_eq!(shot.syndrome.width(), 2);
/// assert_eq!(shot.syndrome.count_ones() % 2, 0);
/// assert_eq!(shot.flipped_logicals, vec![!shot.fired.is_empty()]);
/// ```
pub struct ErrorSampler<'g, G: DecodingCode> {
    graph: &'g G,
    logicals: &'g Logicals,
    probabilities: Vec<f64>,
    width: usize,
    rng: Xoshiro256PlusPlus,
}

impl<'g, G: DecodingCode> ErrorSampler<'g, G> {
    /// Creates a sampler seeded with `seed`.
    ///
    /// The syndrome width is [`DecodingCode::syndrome_width`], so boundary
    /// nodes have no bit.
    pub fn new(graph: &'g G, logicals: &'g Logicals, seed: u64) -> Self {
        let probabilities = graph.edges().map(|(_, _, r)| r.p_err()).collect();
        let width = graph.syndrome_width();
        Self {
            graph,
            logicals,
            probabilities,
            width,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Width of sampled syndromes.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Draws one shot.
    pub fn sample(&mut self) -> Sample {
        let fired: Vec<EdgeId> = self
            .probabilities
            .iter()
            .enumerate()
            .filter(|&(_, &p)| self.rng.random::<f64>() < p)
            .map(|(i, _)| EdgeId(i))
            .collect();

        let syndrome = self.graph.syndrome_of(&fired);
        let syndrome = FixedWidthBitstring::from_bools(
            &(0..self.width)
                .map(|d| syndrome.contains(d as u32))
                .collect::<Vec<_>>(),
        );

        Sample {
            flipped_logicals: self.logicals.flipped_by(&fired),
            fired,
            syndrome,
        }
    }

    /// Draws `shots` shots.
    pub fn sample_batch(&mut self, shots: usize) -> Vec<Sample> {
        (0..shots).map(|_| self.sample()).collect()
    }
}
