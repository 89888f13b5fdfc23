//! Extraction error types
//!
//! Graph schema problems come through unchanged as [`GraphError`]; everything
//! else concerns the provider call or the chunked pipeline around it.

use synaptic::errors::GraphError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The provider's payload failed validation
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The completion call failed or timed out
    #[error("{provider} API error: {message}")]
    Provider { provider: String, message: String },

    #[error("No text to extract from")]
    EmptyInput,

    /// Every chunk of a chunked extraction failed
    #[error("All {attempted} chunks failed to extract; last error: {last_error}")]
    AllChunksFailed { attempted: usize, last_error: String },

    #[error("Extraction cancelled after {completed} of {total} chunks")]
    Cancelled { completed: usize, total: usize },

    #[error("Chunking failed: {0}")]
    Chunking(String),
}

impl ExtractionError {
    pub fn provider(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ExtractionError::Provider {
            provider: provider.into(),
            message: err.to_string(),
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ExtractionError::Graph(err) => err.error_code(),
            ExtractionError::Provider { .. } => "PROVIDER_ERROR",
            ExtractionError::EmptyInput => "EMPTY_INPUT",
            ExtractionError::AllChunksFailed { .. } => "ALL_CHUNKS_FAILED",
            ExtractionError::Cancelled { .. } => "CANCELLED",
            ExtractionError::Chunking(_) => "CHUNKING_ERROR",
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExtractionError::Provider { .. } | ExtractionError::Graph(GraphError::MalformedGraph(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
