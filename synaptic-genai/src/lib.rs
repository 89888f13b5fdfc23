//! LLM-backed concept-graph extraction.

pub mod chunker;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod prompt;
pub mod provider;
pub mod response;

pub use chunker::{ChunkSet, Chunker, ParagraphChunker, TextChunk};
pub use config::{ChunkOptions, ExtractionConfig, LlmProvider, ProviderConfig, ProviderSettings};
pub use errors::{ExtractionError, Result};
pub use extractor::{ExtractionProgress, GraphExtractor};
pub use provider::{Completion, CompletionOptions, CompletionProvider, RigCompletionProvider};
