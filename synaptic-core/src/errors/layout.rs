//! Layout precondition errors

use thiserror::Error;

/// Errors raised before any geometry is computed. No partial layout is ever
/// returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No node sits at level 0
    #[error("Graph has no root node (no node at level 0)")]
    NoRootNode,
}

impl LayoutError {
    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            LayoutError::NoRootNode => "NO_ROOT_NODE",
        }
    }
}
