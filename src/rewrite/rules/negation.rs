//! Rules pushing `$not` inward or removing it

use std::sync::Arc;

use super::RewriteRule;
use crate::query::{is_multi_valued, Expr, NaryLogicalOp, QueryExpr};

/// `$not(f op v)` → `f op' v` where `op'` is the inverse of `op`.
/// Field-to-field comparisons are inverted the same way.
///
/// Declines on `*` paths: "no element matches" is not "some element
/// matches the inverse".
#[derive(Debug, Clone, Copy, Default)]
pub struct EliminateNot;

impl RewriteRule for EliminateNot {
    fn name(&self) -> &'static str {
        "EliminateNOT"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        let Expr::Not(nested) = q.as_ref() else {
            return Arc::clone(q);
        };
        match nested.as_ref() {
            Expr::ValueComparison(c) if !is_multi_valued(&c.field) => {
                Expr::compare(c.field.clone(), c.op.negate(), c.value.clone())
            }
            Expr::FieldComparison(c) if !is_multi_valued(&c.field) && !is_multi_valued(&c.rfield) => {
                Expr::compare_fields(c.field.clone(), c.op.negate(), c.rfield.clone())
            }
            _ => Arc::clone(q),
        }
    }
}

/// `$not($not(q))` → `q`
#[derive(Debug, Clone, Copy, Default)]
pub struct EliminateNotNot;

impl RewriteRule for EliminateNotNot {
    fn name(&self) -> &'static str {
        "EliminateNOTNOT"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        match q.as_ref() {
            Expr::Not(nested) => match nested.as_ref() {
                Expr::Not(inner) => Arc::clone(inner),
                _ => Arc::clone(q),
            },
            _ => Arc::clone(q),
        }
    }
}

/// `$not($or(a, b))` → `$and($not(a), $not(b))`
#[derive(Debug, Clone, Copy, Default)]
pub struct EliminateNotOr;

impl RewriteRule for EliminateNotOr {
    fn name(&self) -> &'static str {
        "EliminateNOTOR"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        let Expr::Not(nested) = q.as_ref() else {
            return Arc::clone(q);
        };
        match nested.as_logical(NaryLogicalOp::Or) {
            Some(le) => Expr::and(le.children.iter().map(|c| Expr::not(Arc::clone(c))).collect()),
            None => Arc::clone(q),
        }
    }
}
