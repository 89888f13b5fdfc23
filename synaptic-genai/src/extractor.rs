//! Concept-graph extraction from free text.
//!
//! A single [`GraphExtractor::extract`] call sends one prompt and validates the
//! response. [`GraphExtractor::extract_chunked`] runs the same call over each
//! chunk of a long document, strictly one after another, and merges the
//! results under a synthesized root.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use synaptic::diagnostics::{report_graph_warnings, Diagnostic, DiagnosticSink, TracingSink};
use synaptic::fidelity;
use synaptic::graph::Graph;
use synaptic::merge::{merge_graphs, MergeOptions};
use synaptic::template;
use tracing::{debug, info, warn};

use crate::chunker::{Chunker, ParagraphChunker};
use crate::config::{ChunkOptions, ExtractionConfig};
use crate::errors::{ExtractionError, Result};
use crate::prompt::build_prompt;
use crate::provider::{CompletionOptions, CompletionProvider};
use crate::response::parse_graph;

/// Reported after every chunk attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionProgress {
    /// 1-based index of the chunk just attempted
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Cut `text` to at most `max_chars` characters, preferring to end on a
/// sentence boundary in the second half of the allowed range.
pub fn truncate_text(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };
    let prefix = &text[..cut];

    let sentence_end = prefix
        .char_indices()
        .filter(|(i, c)| {
            matches!(c, '.' | '!' | '?')
                && prefix[i + c.len_utf8()..]
                    .chars()
                    .next()
                    .map_or(false, char::is_whitespace)
        })
        .map(|(i, c)| i + c.len_utf8())
        .last();

    match sentence_end {
        Some(end) if end >= prefix.len() / 2 => &prefix[..end],
        _ => match prefix.rfind(char::is_whitespace) {
            Some(space) if space > 0 => prefix[..space].trim_end(),
            _ => prefix,
        },
    }
}

pub struct GraphExtractor {
    provider: Arc<dyn CompletionProvider>,
    chunker: Arc<dyn Chunker>,
    sink: Arc<dyn DiagnosticSink>,
    config: ExtractionConfig,
    cancel: Arc<AtomicBool>,
}

impl GraphExtractor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            chunker: Arc::new(ParagraphChunker),
            sink: Arc::new(TracingSink),
            config: ExtractionConfig::default(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Share a cancellation flag with the caller. Setting it stops chunked
    /// extraction before the next chunk starts.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract with the configured node and depth limits.
    pub async fn extract(&self, text: &str) -> Result<Graph> {
        self.extract_with_limits(text, self.config.max_nodes, self.config.max_depth)
            .await
    }

    pub async fn extract_with_limits(
        &self,
        text: &str,
        max_nodes: usize,
        max_depth: u32,
    ) -> Result<Graph> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        let mut graph = self.request_graph(text, max_nodes, max_depth).await?;
        self.finish(&mut graph, text);
        Ok(graph)
    }

    /// Extract each chunk of `text` in turn and merge the results.
    ///
    /// Failing chunks are logged, reported to the diagnostics sink and
    /// skipped. Only when no chunk succeeds does the whole call fail.
    pub async fn extract_chunked<F>(
        &self,
        text: &str,
        options: &ChunkOptions,
        mut on_progress: F,
    ) -> Result<Graph>
    where
        F: FnMut(ExtractionProgress),
    {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        let set = self.chunker.chunk(text, options)?;
        let total = set.total_chunks;
        if total == 0 {
            return Err(ExtractionError::EmptyInput);
        }

        let chunk_nodes = self.config.max_nodes.div_ceil(total).max(1);
        let chunk_depth = self.config.max_depth.saturating_sub(1).max(1);
        info!(
            provider = self.provider.name(),
            chunks = total,
            nodes_per_chunk = chunk_nodes,
            depth = chunk_depth,
            "Starting chunked extraction"
        );

        let mut graphs = Vec::with_capacity(total);
        let mut last_error = None;

        for chunk in &set.chunks {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(completed = chunk.index, total, "Chunked extraction cancelled");
                return Err(ExtractionError::Cancelled {
                    completed: chunk.index,
                    total,
                });
            }

            let current = chunk.index + 1;
            let message = match self.request_graph(&chunk.text, chunk_nodes, chunk_depth).await {
                Ok(graph) if graph.nodes.is_empty() => {
                    self.sink.emit(Diagnostic::EmptyChunk {
                        chunk_index: chunk.index,
                    });
                    format!("Chunk {}/{} produced no nodes", current, total)
                }
                Ok(graph) => {
                    let message = format!(
                        "Extracted chunk {}/{} ({} nodes)",
                        current,
                        total,
                        graph.nodes.len()
                    );
                    graphs.push(graph);
                    message
                }
                Err(err) => {
                    warn!(chunk = current, total, error = %err, "Chunk extraction failed; skipping");
                    self.sink.emit(Diagnostic::ChunkFailed {
                        chunk_index: chunk.index,
                        total_chunks: total,
                        error: err.to_string(),
                    });
                    let message = format!("Chunk {}/{} failed: {}", current, total, err);
                    last_error = Some(err.to_string());
                    message
                }
            };

            debug!("{}", message);
            on_progress(ExtractionProgress {
                current,
                total,
                message,
            });
        }

        if graphs.is_empty() {
            return Err(ExtractionError::AllChunksFailed {
                attempted: total,
                last_error: last_error.unwrap_or_else(|| "no chunk produced nodes".to_string()),
            });
        }

        info!(
            succeeded = graphs.len(),
            attempted = total,
            "Merging chunk graphs"
        );
        let mut graph = merge_graphs(graphs, &MergeOptions::default());
        self.finish(&mut graph, text);
        Ok(graph)
    }

    async fn request_graph(&self, text: &str, max_nodes: usize, max_depth: u32) -> Result<Graph> {
        let input = truncate_text(text, self.config.max_input_chars);
        if input.len() < text.len() {
            debug!(
                kept = input.chars().count(),
                limit = self.config.max_input_chars,
                "Truncated input at sentence boundary"
            );
        }

        let prompt = build_prompt(input, max_nodes, max_depth);
        let options = CompletionOptions {
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let completion = self
            .provider
            .complete(&prompt, options)
            .await
            .map_err(|err| ExtractionError::provider(self.provider.name(), format!("{err:#}")))?;

        let graph = parse_graph(&completion.content, "Untitled")?;
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Parsed graph from completion"
        );
        Ok(graph)
    }

    /// Annotate fidelity, report data-quality warnings and stamp the template.
    fn finish(&self, graph: &mut Graph, source_text: &str) {
        fidelity::annotate(graph);
        report_graph_warnings(graph, self.sink.as_ref());
        if let Err(problems) = graph.verify_graph_integrity() {
            debug!(problems = problems.len(), "Graph integrity issues: {:?}", problems);
        }
        let recommendation = template::recommend(source_text, &graph.nodes, &graph.edges);
        debug!(
            template = %recommendation.template,
            confidence = recommendation.confidence,
            "Stamped template"
        );
        graph.template = recommendation.template;
    }
}
