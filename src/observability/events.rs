//! Observable events
//!
//! Events are explicit and typed. Each carries the severity it is logged
//! at, so call sites never pick a level by hand.

use std::fmt;

use super::logger::Severity;

/// Observable events in the rewriter and scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Rewriter
    /// `rewrite` called
    RewriteBegin,
    /// One full pass over the tree finished
    RewriteIteration,
    /// A rule returned a new node
    RewriteRuleFired,
    /// Fixed point reached
    RewriteComplete,
    /// Safety cap hit before a fixed point
    RewriteLimitExceeded,

    // Scorer
    /// Per-request node annotations recomputed
    ScorerReset,
    /// One candidate plan scored
    PlanScored,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RewriteBegin => "REWRITE_BEGIN",
            Event::RewriteIteration => "REWRITE_ITERATION",
            Event::RewriteRuleFired => "REWRITE_RULE_FIRED",
            Event::RewriteComplete => "REWRITE_COMPLETE",
            Event::RewriteLimitExceeded => "REWRITE_LIMIT_EXCEEDED",
            Event::ScorerReset => "SCORER_RESET",
            Event::PlanScored => "PLAN_SCORED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RewriteLimitExceeded => Severity::Warn,
            Event::ConfigLoaded => Severity::Info,
            Event::RewriteBegin
            | Event::RewriteIteration
            | Event::RewriteRuleFired
            | Event::RewriteComplete
            | Event::ScorerReset
            | Event::PlanScored => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
