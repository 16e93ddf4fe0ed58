//! Scorer that rates every plan as equally expensive

use crate::plan::QueryPlan;

use super::errors::ScorerResult;
use super::score::Score;
use super::QueryPlanScorer;

/// Scores every plan as [`Score::Max`]; a chooser using it keeps whichever
/// candidate it saw first
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxScorer;

impl QueryPlanScorer for MaxScorer {
    type Data = ();

    fn new_data(&self) {}

    fn reset(&self, _plan: &mut QueryPlan<()>) {}

    fn score(&self, _plan: &QueryPlan<()>) -> ScorerResult<Score> {
        Ok(Score::Max)
    }
}
