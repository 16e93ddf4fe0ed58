//! # Plan Errors

use thiserror::Error;

use super::node::NodeId;

/// Result type for plan operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Plan construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Unknown plan node: {0}")]
    UnknownNode(NodeId),

    #[error("No edge between {0} and {1}")]
    NoEdge(NodeId, NodeId),
}

impl PlanError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::UnknownNode(_) => "FED_PLAN_UNKNOWN_NODE",
            PlanError::NoEdge(..) => "FED_PLAN_NO_EDGE",
        }
    }
}
