//! Domain-specific error types for synaptic-core
//!
//! # Error Categories
//!
//! - **GraphError**: structural defects in a generated graph (malformed payload,
//!   invalid nodes, invalid edges)
//! - **LayoutError**: layout preconditions (missing root)
//!
//! Recoverable problems such as dangling edges and orphan nodes are not errors;
//! they are emitted as [`crate::diagnostics::Diagnostic`] values.
//!
//! # Examples
//!
//! ```rust
//! use synaptic::errors::{GraphError, LayoutError};
//!
//! fn require_label(index: usize, label: Option<&str>) -> Result<String, GraphError> {
//!     label.map(str::to_string).ok_or(GraphError::InvalidNode {
//!         index,
//!         reason: "missing label".to_string(),
//!     })
//! }
//!
//! assert!(require_label(0, None).is_err());
//! assert_eq!(LayoutError::NoRootNode.error_code(), "NO_ROOT_NODE");
//! ```

pub mod graph;
pub mod layout;

pub use graph::GraphError;
pub use layout::LayoutError;

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
