//! JSON wire format.
//!
//! Decoding is strict: unknown fields at any level are rejected, and every
//! decoded graph is indexed before it is returned, so a document with
//! dangling or duplicate references never yields a partial graph. Encoding
//! writes fields in declaration order and omits empty optional fields.

use std::io::Write;

use tracing::debug;

use crate::error::{DepGraphError, Result};
use crate::graph::DepGraph;

/// Decodes and indexes a graph from JSON bytes.
///
/// # Example
///
/// ```
/// use depgraph::codec::json::decode;
///
/// let doc = br#"{
///     "schemaVersion": "1.3.0",
///     "pkgManager": {"name": "npm"},
///     "pkgs": [{"id": "app@1.0.0", "info": {"name": "app", "version": "1.0.0"}}],
///     "graph": {
///         "rootNodeId": "root-node",
///         "nodes": [{"nodeId": "root-node", "pkgId": "app@1.0.0", "deps": []}]
///     }
/// }"#;
///
/// let graph = decode(doc).unwrap();
/// assert_eq!(graph.get_root_pkg().unwrap().id, "app@1.0.0");
/// ```
pub fn decode(bytes: &[u8]) -> Result<DepGraph> {
    let graph: DepGraph = serde_json::from_slice(bytes).map_err(DepGraphError::Decode)?;
    finish_decode(graph)
}

/// Decodes and indexes a graph from a JSON string.
///
/// # Arguments
///
/// * `json` - A complete graph document
///
/// # Returns
///
/// The indexed graph, [`DepGraphError::Decode`] for malformed JSON or unknown
/// fields, or [`DepGraphError::InvalidGraph`] for dangling or duplicate
/// references.
pub fn decode_str(json: &str) -> Result<DepGraph> {
    let graph: DepGraph = serde_json::from_str(json).map_err(DepGraphError::Decode)?;
    finish_decode(graph)
}

fn finish_decode(mut graph: DepGraph) -> Result<DepGraph> {
    graph.build_graph().map_err(DepGraphError::InvalidGraph)?;
    debug!(
        schema_version = %graph.schema_version,
        pkgs = graph.pkg_count(),
        nodes = graph.node_count(),
        "decoded dependency graph"
    );
    Ok(graph)
}

/// Encodes a graph as compact JSON bytes.
pub fn encode(graph: &DepGraph) -> Result<Vec<u8>> {
    serde_json::to_vec(graph).map_err(DepGraphError::Encode)
}

/// Encodes a graph as a compact JSON string.
///
/// # Example
///
/// ```
/// use depgraph::codec::json::encode_string;
/// use depgraph::DepGraph;
///
/// let json = encode_string(&DepGraph::new()).unwrap();
/// assert!(json.starts_with(r#"{"schemaVersion":"""#));
/// ```
pub fn encode_string(graph: &DepGraph) -> Result<String> {
    serde_json::to_string(graph).map_err(DepGraphError::Encode)
}

/// Encodes a graph as indented JSON.
pub fn encode_pretty(graph: &DepGraph) -> Result<String> {
    serde_json::to_string_pretty(graph).map_err(DepGraphError::Encode)
}

/// Writes a graph as compact JSON and flushes the writer.
pub fn encode_to_writer<W: Write>(graph: &DepGraph, writer: &mut W) -> Result<()> {
    serde_json::to_writer(&mut *writer, graph).map_err(|err| {
        if err.is_io() {
            DepGraphError::Io(err.into())
        } else {
            DepGraphError::Encode(err)
        }
    })?;
    writer.flush()?;
    Ok(())
}

impl DepGraph {
    /// Decodes and indexes a graph. See [`decode_str`].
    pub fn from_json(json: &str) -> Result<Self> {
        decode_str(json)
    }

    /// Encodes the graph as compact JSON. See [`encode_string`].
    pub fn to_json(&self) -> Result<String> {
        encode_string(self)
    }
}
