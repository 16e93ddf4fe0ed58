//! # Scorer Errors

use thiserror::Error;

/// Result type for scoring
pub type ScorerResult<T> = Result<T, ScorerError>;

/// Plan shapes a scorer cannot evaluate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScorerError {
    #[error("Plan has no node without a parent entity")]
    NoRoot,

    #[error("Plan has {0} nodes without a parent entity")]
    MultipleRoots(usize),

    #[error("Cycle through node {0} in source edges")]
    CyclicPlan(String),
}

impl ScorerError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ScorerError::NoRoot => "FED_SCORER_NO_ROOT",
            ScorerError::MultipleRoots(_) => "FED_SCORER_MULTIPLE_ROOTS",
            ScorerError::CyclicPlan(_) => "FED_SCORER_CYCLIC_PLAN",
        }
    }
}
