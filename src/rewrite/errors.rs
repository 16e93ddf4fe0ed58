//! # Rewrite Errors

use thiserror::Error;

/// Result type for rewrite operations
pub type RewriteResult<T> = Result<T, RewriteError>;

/// Rewrite errors
///
/// Rules never fail; the only error is the rewriter's safety cap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("No fixed point after {limit} iterations")]
    IterationLimitExceeded { limit: usize },
}

impl RewriteError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RewriteError::IterationLimitExceeded { .. } => "FED_REWRITE_LIMIT_EXCEEDED",
        }
    }
}
