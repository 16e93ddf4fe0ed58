//! Query plan scoring
//!
//! A scorer defines the payload each plan node carries (`Data`), fills it
//! in once per request with `reset`, and then scores any number of
//! orientations of that plan. Lower scores are cheaper; [`Score::Max`]
//! is worse than every finite score.

mod errors;
mod explain;
mod indexed;
mod max;
mod score;

pub use errors::{ScorerError, ScorerResult};
pub use explain::{DescendantFactor, NodeCost, ScoreBreakdown};
pub use indexed::{IndexedFieldScorer, IndexedFieldScorerData};
pub use max::MaxScorer;
pub use score::Score;

use crate::plan::QueryPlan;

/// Computes a comparable cost for a query plan
pub trait QueryPlanScorer {
    /// Per-node payload
    type Data;

    /// Payload for a freshly added node
    fn new_data(&self) -> Self::Data;

    /// Recomputes the per-node payloads of `plan`. Called once per request,
    /// before any `score`.
    fn reset(&self, plan: &mut QueryPlan<Self::Data>);

    /// Scores `plan` in its current orientation
    fn score(&self, plan: &QueryPlan<Self::Data>) -> ScorerResult<Score>;
}
