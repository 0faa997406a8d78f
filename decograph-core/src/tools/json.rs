//! JSON export of a graph and its logicals.

use serde::Serialize;

use crate::error::Result;
use crate::graph::{DecodingCode, EdgeId, EdgeRecord, GraphEdge, Logicals};
use crate::syndrome::DetectorRecord;

#[derive(Serialize)]
struct GraphDocument<'a> {
    nodes: Vec<NodeEntry<'a>>,
    boundaries: Vec<u32>,
    edges: Vec<EdgeEntry<'a>>,
    logicals: &'a Logicals,
}

#[derive(Serialize)]
struct NodeEntry<'a> {
    id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a DetectorRecord>,
}

#[derive(Serialize)]
struct EdgeEntry<'a> {
    id: EdgeId,
    vertices: &'a [u32],
    #[serde(flatten)]
    record: &'a EdgeRecord,
}

fn document<'a, G: DecodingCode>(graph: &'a G, logicals: &'a Logicals) -> GraphDocument<'a> {
    GraphDocument {
        nodes: graph
            .nodes()
            .iter()
            .map(|&id| NodeEntry {
                id,
                record: graph.detector_records().get(&id),
            })
            .collect(),
        boundaries: graph.boundaries().iter().copied().collect(),
        edges: graph
            .edges()
            .map(|(id, edge, record)| EdgeEntry {
                id,
                vertices: edge.vertices(),
                record,
            })
            .collect(),
        logicals,
    }
}

/// Pretty-printed JSON document of `graph` and `logicals`.
///
/// ```json
/// {
///   "nodes": [{"id": 0, "record": {"spatial_coord": [0.0], "time": 0}}],
///   "boundaries": [1],
///   "edges": [{"id": 0, "vertices": [0, 1], "p_err": 0.1, "weight": 2.19}],
///   "logicals": [[0]]
/// }
/// ```
///
/// # Errors
///
/// [`Error::Json`](crate::Error::Json) if `serde_json` fails.
pub fn graph_to_json<G: DecodingCode>(graph: &G, logicals: &Logicals) -> Result<String> {
    Ok(serde_json::to_string_pretty(&document(graph, logicals))?)
}

/// Same document as [`graph_to_json`], as a [`serde_json::Value`].
///
/// # Errors
///
/// [`Error::Json`](crate::Error::Json) if `serde_json` fails.
pub fn graph_to_json_value<G: DecodingCode>(
    graph: &G,
    logicals: &Logicals,
) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(document(graph, logicals))?)
}
