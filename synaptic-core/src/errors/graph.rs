//! Graph-related error types
//!
//! These errors describe structural defects in a concept graph as it arrives from
//! an untrusted generator. They are fatal for the extraction call that produced
//! them; recoverable data-quality problems (dangling edges, orphans) are reported
//! through [`crate::diagnostics`] instead.
//!
//! # Examples
//!
//! ```rust
//! use synaptic::errors::GraphError;
//!
//! let err = GraphError::InvalidNode {
//!     index: 3,
//!     reason: "missing label".to_string(),
//! };
//! assert!(err.is_client_error());
//! assert_eq!(err.error_code(), "INVALID_NODE");
//! ```

use thiserror::Error;

/// Graph schema and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Response is not a JSON object or lacks the `nodes`/`edges` arrays
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    /// A node is missing a required field
    #[error("Invalid node at index {index}: {reason}")]
    InvalidNode {
        /// Position of the node in the `nodes` array
        index: usize,
        /// Which field failed
        reason: String,
    },

    /// An edge is missing a required field
    #[error("Invalid edge at index {index}: {reason}")]
    InvalidEdge {
        /// Position of the edge in the `edges` array
        index: usize,
        /// Which field failed
        reason: String,
    },
}

impl GraphError {
    /// Check if this error was caused by the generated payload rather than the caller
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GraphError::MalformedGraph(_)
                | GraphError::InvalidNode { .. }
                | GraphError::InvalidEdge { .. }
        )
    }

    /// Index of the offending element, when the error concerns a single element
    pub fn element_index(&self) -> Option<usize> {
        match self {
            GraphError::InvalidNode { index, .. } | GraphError::InvalidEdge { index, .. } => {
                Some(*index)
            }
            GraphError::MalformedGraph(_) => None,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphError::MalformedGraph(_) => "MALFORMED_GRAPH",
            GraphError::InvalidNode { .. } => "INVALID_NODE",
            GraphError::InvalidEdge { .. } => "INVALID_EDGE",
        }
    }
}
