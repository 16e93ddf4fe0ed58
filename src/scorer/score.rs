//! Plan scores

use std::fmt;

/// Comparable plan cost.
///
/// `Max` sorts after every `Cost` and equals only itself. Costs are only
/// meaningful relative to other plans of the same request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Score {
    Cost(u128),
    Max,
}

impl Score {
    pub const ZERO: Score = Score::Cost(0);

    /// The finite cost, `None` for `Max`
    pub fn cost(&self) -> Option<u128> {
        match self {
            Score::Cost(c) => Some(*c),
            Score::Max => None,
        }
    }

    pub fn is_max(&self) -> bool {
        matches!(self, Score::Max)
    }
}

impl From<u128> for Score {
    fn from(cost: u128) -> Self {
        Score::Cost(cost)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cost(c) => write!(f, "{}", c),
            Score::Max => write!(f, "MAX"),
        }
    }
}
