//! Structured diagnostics for recoverable data-quality problems.
//!
//! Extraction and merging report dangling edges, orphan nodes and failed chunks
//! through a [`DiagnosticSink`] rather than logging directly, so callers can
//! collect them (see [`MemorySink`]) or forward them to `tracing`
//! ([`TracingSink`], the default).

use std::sync::Mutex;

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// Edge references a node id that does not exist. The edge is retained.
    #[serde(rename_all = "camelCase")]
    DanglingEdge {
        edge_id: String,
        from: String,
        to: String,
        missing: Vec<String>,
    },
    /// Node cannot be reached from the root.
    #[serde(rename_all = "camelCase")]
    OrphanNode { node_id: String, label: String },
    /// One chunk of a chunked extraction failed and was skipped.
    #[serde(rename_all = "camelCase")]
    ChunkFailed {
        chunk_index: usize,
        total_chunks: usize,
        error: String,
    },
    /// A chunk graph contributed nothing to the merge.
    #[serde(rename_all = "camelCase")]
    EmptyChunk { chunk_index: usize },
}

impl Diagnostic {
    pub fn message(&self) -> String {
        match self {
            Diagnostic::DanglingEdge {
                edge_id, missing, ..
            } => format!(
                "Edge {} references unknown node(s): {}",
                edge_id,
                missing.join(", ")
            ),
            Diagnostic::OrphanNode { node_id, label } => {
                format!("Node {} ({:?}) is not reachable from the root", node_id, label)
            }
            Diagnostic::ChunkFailed {
                chunk_index,
                total_chunks,
                error,
            } => format!(
                "Chunk {}/{} failed: {}",
                chunk_index + 1,
                total_chunks,
                error
            ),
            Diagnostic::EmptyChunk { chunk_index } => {
                format!("Chunk {} produced no nodes", chunk_index + 1)
            }
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::DanglingEdge { edge_id, .. } => {
                warn!(edge_id = %edge_id, "{}", diagnostic.message())
            }
            Diagnostic::OrphanNode { node_id, .. } => {
                warn!(node_id = %node_id, "{}", diagnostic.message())
            }
            Diagnostic::ChunkFailed { chunk_index, .. } => {
                warn!(chunk = chunk_index + 1, "{}", diagnostic.message())
            }
            Diagnostic::EmptyChunk { chunk_index } => {
                warn!(chunk = chunk_index + 1, "{}", diagnostic.message())
            }
        }
    }
}

/// Records diagnostics in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dangling_edges(&self) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::DanglingEdge { edge_id, .. } => Some(edge_id),
                _ => None,
            })
            .collect()
    }

    pub fn orphan_nodes(&self) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::OrphanNode { node_id, .. } => Some(node_id),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(diagnostic);
        }
    }
}

/// Emits one diagnostic per dangling edge and per orphan node of `graph`.
pub fn report_graph_warnings(graph: &crate::graph::Graph, sink: &dyn DiagnosticSink) {
    let ids: std::collections::HashSet<&str> =
        graph.nodes.iter().map(|n| n.id.as_str()).collect();

    for edge in graph.dangling_edges() {
        let missing = [&edge.from, &edge.to]
            .into_iter()
            .filter(|id| !ids.contains(id.as_str()))
            .cloned()
            .collect();
        sink.emit(Diagnostic::DanglingEdge {
            edge_id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            missing,
        });
    }

    for node in graph.orphan_nodes() {
        sink.emit(Diagnostic::OrphanNode {
            node_id: node.id.clone(),
            label: node.label.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Graph, Node};

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(Diagnostic::EmptyChunk { chunk_index: 1 });
        sink.emit(Diagnostic::OrphanNode {
            node_id: "n".into(),
            label: "N".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.orphan_nodes(), vec!["n".to_string()]);
        assert!(matches!(
            sink.diagnostics()[0],
            Diagnostic::EmptyChunk { chunk_index: 1 }
        ));
    }

    #[test]
    fn test_report_graph_warnings() {
        let graph = Graph::new(
            "g",
            vec![
                Node::new("r", "Root", 0),
                Node::new("a", "A", 1),
                Node::new("lost", "Lost", 1),
            ],
            vec![
                Edge::new("e1", "r", "a", "has"),
                Edge::new("e2", "x", "y", "mentions"),
            ],
        );
        let sink = MemorySink::new();
        report_graph_warnings(&graph, &sink);

        assert_eq!(sink.dangling_edges(), vec!["e2".to_string()]);
        assert_eq!(sink.orphan_nodes(), vec!["lost".to_string()]);
        match &sink.diagnostics()[0] {
            Diagnostic::DanglingEdge { missing, .. } => {
                assert_eq!(missing, &vec!["x".to_string(), "y".to_string()])
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_messages() {
        let d = Diagnostic::ChunkFailed {
            chunk_index: 0,
            total_chunks: 3,
            error: "timeout".into(),
        };
        assert_eq!(d.message(), "Chunk 1/3 failed: timeout");
    }
}
