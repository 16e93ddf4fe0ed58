//! Rules merging same-field clauses of one logical node into a single
//! `$in` / `$nin`
//!
//! The merged clause takes the position of the first clause it replaces;
//! values keep first-seen order with duplicates removed.
//!
//! `!=` clauses on `*` paths are never merged into a `$nin`: on a
//! multi-valued path `f != a` holds when some element differs from `a`,
//! while `$nin` requires that no element is listed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::slice;
use std::sync::Arc;

use serde_json::Value;

use super::{extend_distinct, RewriteRule};
use crate::query::{
    is_multi_valued, ComparisonOp, Expr, NaryLogicalOp, NaryRelationalOp, QueryExpr,
};

/// Which children of the logical node take part in a merge
#[derive(Debug, Clone, Copy)]
enum Operand {
    Comparison(ComparisonOp),
    Relational(NaryRelationalOp),
}

impl Operand {
    fn select(self, q: &Expr, scalar_only: bool) -> Option<(&str, &[Value])> {
        let selected = match (self, q) {
            (Operand::Comparison(op), Expr::ValueComparison(c)) if c.op == op => {
                Some((c.field.as_str(), slice::from_ref(&c.value)))
            }
            (Operand::Relational(op), Expr::NaryRelational(r)) if r.op == op => {
                Some((r.field.as_str(), r.values.as_slice()))
            }
            _ => None,
        };
        selected.filter(|(field, _)| !(scalar_only && is_multi_valued(field)))
    }
}

enum Slot<'a> {
    Keep(&'a QueryExpr),
    Merged(&'a str),
}

fn combine(
    q: &QueryExpr,
    logical: NaryLogicalOp,
    operand: Operand,
    target: NaryRelationalOp,
    scalar_only: bool,
) -> QueryExpr {
    let Some(le) = q.as_logical(logical) else {
        return Arc::clone(q);
    };

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for child in &le.children {
        if let Some((field, _)) = operand.select(child, scalar_only) {
            *counts.entry(field).or_default() += 1;
        }
    }
    if !counts.values().any(|&n| n >= 2) {
        return Arc::clone(q);
    }

    let mut slots = Vec::with_capacity(le.children.len());
    let mut merged: HashMap<&str, Vec<Value>> = HashMap::new();
    for child in &le.children {
        match operand.select(child, scalar_only) {
            Some((field, values)) if counts.get(field).copied().unwrap_or(0) >= 2 => {
                match merged.entry(field) {
                    Entry::Vacant(e) => {
                        slots.push(Slot::Merged(field));
                        extend_distinct(e.insert(Vec::new()), values);
                    }
                    Entry::Occupied(mut e) => extend_distinct(e.get_mut(), values),
                }
            }
            _ => slots.push(Slot::Keep(child)),
        }
    }

    let children = slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Keep(child) => Arc::clone(child),
            Slot::Merged(field) => {
                Expr::relational(field, target, merged.remove(field).unwrap_or_default())
            }
        })
        .collect();
    Expr::logical(logical, children)
}

/// `$or(f $in A, f $in B)` → `$or(f $in A∪B)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CombineInsInOr;

impl RewriteRule for CombineInsInOr {
    fn name(&self) -> &'static str {
        "CombineINsInOR"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        combine(
            q,
            NaryLogicalOp::Or,
            Operand::Relational(NaryRelationalOp::In),
            NaryRelationalOp::In,
            false,
        )
    }
}

/// `$and(f $nin A, f $nin B)` → `$and(f $nin A∪B)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CombineNinsInAnd;

impl RewriteRule for CombineNinsInAnd {
    fn name(&self) -> &'static str {
        "CombineNINsInAND"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        combine(
            q,
            NaryLogicalOp::And,
            Operand::Relational(NaryRelationalOp::NotIn),
            NaryRelationalOp::NotIn,
            false,
        )
    }
}

/// `$and(f != a, f != b)` → `$and(f $nin [a,b])`
#[derive(Debug, Clone, Copy, Default)]
pub struct CombineAndsToNin;

impl RewriteRule for CombineAndsToNin {
    fn name(&self) -> &'static str {
        "CombineANDsToNIN"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        combine(
            q,
            NaryLogicalOp::And,
            Operand::Comparison(ComparisonOp::Neq),
            NaryRelationalOp::NotIn,
            true,
        )
    }
}

/// `$or(f = a, f = b)` → `$or(f $in [a,b])`
#[derive(Debug, Clone, Copy, Default)]
pub struct CombineOrsToIn;

impl RewriteRule for CombineOrsToIn {
    fn name(&self) -> &'static str {
        "CombineORsToIN"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        combine(
            q,
            NaryLogicalOp::Or,
            Operand::Comparison(ComparisonOp::Eq),
            NaryRelationalOp::In,
            false,
        )
    }
}
