//! Edge weights and probabilities.
//!
//! Every function here returns a new graph; the input is never modified.

use crate::error::GraphError;
use crate::graph::{DecodingCode, EdgeRecord};

/// Edge weights in enumeration order.
#[must_use]
pub fn vector_weights<G: DecodingCode>(graph: &G) -> Vec<f64> {
    graph.edges().map(|(_, _, r)| r.weight()).collect()
}

/// Edge probabilities in enumeration order.
#[must_use]
pub fn vector_probabilities<G: DecodingCode>(graph: &G) -> Vec<f64> {
    graph.edges().map(|(_, _, r)| r.p_err()).collect()
}

/// A copy of `graph` whose `i`-th edge has probability `probabilities[i]`.
///
/// Weights are re-derived as `-ln(p / (1 - p))`; tags are kept.
///
/// # Errors
///
/// - [`GraphError::LengthMismatch`] unless there is one probability per edge.
/// - [`GraphError::InvalidProbability`] for a value outside (0, 1).
pub fn change_graph_error_probabilities<G: DecodingCode>(
    graph: &G,
    probabilities: &[f64],
) -> Result<G, GraphError> {
    if probabilities.len() != graph.num_edges() {
        return Err(GraphError::LengthMismatch {
            expected: graph.num_edges(),
            actual: probabilities.len(),
        });
    }
    let edges = graph
        .edge_list()
        .iter()
        .zip(probabilities)
        .map(|((edge, old), &p)| -> Result<_, GraphError> {
            let record = EdgeRecord::from_probability(p)?.with_tag(old.tag().map(str::to_string));
            Ok((edge.clone(), record))
        })
        .collect::<Result<Vec<_>, GraphError>>()?;
    Ok(graph.with_edges(edges))
}

/// A copy of `graph` with weight 1 on every edge.
///
/// Probabilities are kept, so distances on the result count edges.
#[must_use]
pub fn unweight_graph<G: DecodingCode>(graph: &G) -> G {
    let edges = graph
        .edge_list()
        .iter()
        .map(|(edge, record)| (edge.clone(), record.clone().with_weight(1.0)))
        .collect();
    graph.with_edges(edges)
}
