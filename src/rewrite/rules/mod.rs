//! Rewrite rules
//!
//! A rule looks at one node (it never recurses; the rewriter does) and
//! either returns `Arc::clone` of its input, meaning "no change", or a
//! freshly built equivalent node.

mod combine;
mod elem_match;
mod extend;
mod negation;
mod structure;

use std::fmt::Debug;

use serde_json::Value;

use crate::query::{compare_values, QueryExpr};

pub use combine::{CombineAndsToNin, CombineInsInOr, CombineNinsInAnd, CombineOrsToIn};
pub use elem_match::SimpleElemMatchIsComparison;
pub use extend::{ExtendInsInOr, ExtendNinsInAnd};
pub use negation::{EliminateNot, EliminateNotNot, EliminateNotOr};
pub use structure::{EliminateSingleAndOr, PromoteNestedAnd};

/// A single semantics-preserving rewrite
pub trait RewriteRule: Debug + Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Rewrites `q`, returning `q` itself (same `Arc`) when the rule does
    /// not apply
    fn rewrite(&self, q: &QueryExpr) -> QueryExpr;
}

/// The default rule set, in application order
pub fn default_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(CombineInsInOr),
        Box::new(CombineNinsInAnd),
        Box::new(CombineAndsToNin),
        Box::new(CombineOrsToIn),
        Box::new(ExtendInsInOr),
        Box::new(ExtendNinsInAnd),
        Box::new(EliminateNot),
        Box::new(EliminateNotNot),
        Box::new(EliminateNotOr),
        Box::new(EliminateSingleAndOr),
        Box::new(PromoteNestedAnd),
        Box::new(SimpleElemMatchIsComparison),
    ]
}

/// Appends the values of `src` not already in `dst`, keeping first-seen order
pub(crate) fn extend_distinct<'a>(dst: &mut Vec<Value>, src: impl IntoIterator<Item = &'a Value>) {
    for v in src {
        if !dst.iter().any(|x| compare_values(x, v).is_eq()) {
            dst.push(v.clone());
        }
    }
}
