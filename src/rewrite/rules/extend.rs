//! Rules folding single-value comparisons into an existing `$in` / `$nin`
//! on the same field
//!
//! The first `$in` (`$nin`) on a field absorbs every `=` (`!=`) on that
//! field and keeps its position; absorbed clauses are dropped. A `!=` on
//! a `*` path is not absorbed: it holds when some element differs, which
//! a `$nin` cannot express.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{extend_distinct, RewriteRule};
use crate::query::{
    is_multi_valued, ComparisonOp, Expr, NaryLogicalOp, NaryRelationalOp, QueryExpr,
};

fn extend(
    q: &QueryExpr,
    logical: NaryLogicalOp,
    absorb: ComparisonOp,
    into: NaryRelationalOp,
    scalar_only: bool,
) -> QueryExpr {
    let Some(le) = q.as_logical(logical) else {
        return Arc::clone(q);
    };

    let mut targets: HashMap<&str, usize> = HashMap::new();
    for (i, child) in le.children.iter().enumerate() {
        if let Expr::NaryRelational(r) = child.as_ref() {
            if r.op == into {
                targets.entry(r.field.as_str()).or_insert(i);
            }
        }
    }
    if targets.is_empty() {
        return Arc::clone(q);
    }

    let mut absorbed: HashMap<usize, Vec<&Value>> = HashMap::new();
    let mut dropped = vec![false; le.children.len()];
    for (i, child) in le.children.iter().enumerate() {
        if let Expr::ValueComparison(c) = child.as_ref() {
            if c.op != absorb || (scalar_only && is_multi_valued(&c.field)) {
                continue;
            }
            if let Some(&target) = targets.get(c.field.as_str()) {
                absorbed.entry(target).or_default().push(&c.value);
                dropped[i] = true;
            }
        }
    }
    if absorbed.is_empty() {
        return Arc::clone(q);
    }

    let children = le
        .children
        .iter()
        .enumerate()
        .filter(|(i, _)| !dropped[*i])
        .map(|(i, child)| match (absorbed.get(&i), child.as_ref()) {
            (Some(extra), Expr::NaryRelational(r)) => {
                let mut values = r.values.clone();
                extend_distinct(&mut values, extra.iter().copied());
                Expr::relational(r.field.clone(), r.op, values)
            }
            _ => Arc::clone(child),
        })
        .collect();
    Expr::logical(logical, children)
}

/// `$or(f $in A, f = x)` → `$or(f $in A+[x])`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendInsInOr;

impl RewriteRule for ExtendInsInOr {
    fn name(&self) -> &'static str {
        "ExtendINsInOR"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        extend(q, NaryLogicalOp::Or, ComparisonOp::Eq, NaryRelationalOp::In, false)
    }
}

/// `$and(f $nin A, f != x)` → `$and(f $nin A+[x])`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendNinsInAnd;

impl RewriteRule for ExtendNinsInAnd {
    fn name(&self) -> &'static str {
        "ExtendNINsInAND"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        extend(q, NaryLogicalOp::And, ComparisonOp::Neq, NaryRelationalOp::NotIn, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_in_with_eq() {
        let q = Expr::or(vec![
            Expr::eq("f", 9),
            Expr::is_in("f", [1, 2]),
            Expr::eq("g", 1),
            Expr::eq("f", 2),
        ]);
        let out = ExtendInsInOr.rewrite(&q);
        assert_eq!(out, Expr::or(vec![Expr::is_in("f", [1, 2, 9]), Expr::eq("g", 1)]));
    }

    #[test]
    fn test_extend_in_needs_matching_field() {
        let q = Expr::or(vec![Expr::is_in("f", [1]), Expr::eq("g", 2)]);
        assert!(Arc::ptr_eq(&ExtendInsInOr.rewrite(&q), &q));
    }

    #[test]
    fn test_extend_in_ignores_neq() {
        let q = Expr::or(vec![Expr::is_in("f", [1]), Expr::neq("f", 2)]);
        assert!(Arc::ptr_eq(&ExtendInsInOr.rewrite(&q), &q));
    }

    #[test]
    fn test_extend_nin_with_neq() {
        let q = Expr::and(vec![Expr::not_in("f", [1]), Expr::neq("f", 2), Expr::neq("f", 1)]);
        let out = ExtendNinsInAnd.rewrite(&q);
        assert_eq!(out, Expr::and(vec![Expr::not_in("f", [1, 2])]));
    }

    #[test]
    fn test_extend_nin_skips_wildcard_neq() {
        let q = Expr::and(vec![Expr::not_in("items.*", [1]), Expr::neq("items.*", 2)]);
        assert!(Arc::ptr_eq(&ExtendNinsInAnd.rewrite(&q), &q));

        let q = Expr::or(vec![Expr::is_in("items.*", [1]), Expr::eq("items.*", 2)]);
        let out = ExtendInsInOr.rewrite(&q);
        assert_eq!(out, Expr::or(vec![Expr::is_in("items.*", [1, 2])]));
    }

    #[test]
    fn test_extend_nin_ignores_or() {
        let q = Expr::or(vec![Expr::not_in("f", [1]), Expr::neq("f", 2)]);
        assert!(Arc::ptr_eq(&ExtendNinsInAnd.rewrite(&q), &q));
    }
}
