//! Rules flattening logical structure

use std::sync::Arc;

use super::RewriteRule;
use crate::query::{Expr, NaryLogicalOp, QueryExpr};

/// `$and(q)` / `$or(q)` → `q`
#[derive(Debug, Clone, Copy, Default)]
pub struct EliminateSingleAndOr;

impl RewriteRule for EliminateSingleAndOr {
    fn name(&self) -> &'static str {
        "EliminateSingleANDOR"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        match q.as_ref() {
            Expr::Logical(le) if le.children.len() == 1 => Arc::clone(&le.children[0]),
            _ => Arc::clone(q),
        }
    }
}

/// `$and(a, $and(b, c))` → `$and(a, b, c)`
///
/// Nested children are spliced in at the position of the nested node.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromoteNestedAnd;

impl RewriteRule for PromoteNestedAnd {
    fn name(&self) -> &'static str {
        "PromoteNestedAND"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        let Some(le) = q.as_logical(NaryLogicalOp::And) else {
            return Arc::clone(q);
        };
        if !le
            .children
            .iter()
            .any(|c| c.as_logical(NaryLogicalOp::And).is_some())
        {
            return Arc::clone(q);
        }

        let mut children = Vec::with_capacity(le.children.len());
        for child in &le.children {
            match child.as_logical(NaryLogicalOp::And) {
                Some(nested) => children.extend(nested.children.iter().map(Arc::clone)),
                None => children.push(Arc::clone(child)),
            }
        }
        Expr::and(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_child_unwrapped() {
        let child = Expr::eq("a", 1);
        let out = EliminateSingleAndOr.rewrite(&Expr::or(vec![Arc::clone(&child)]));
        assert!(Arc::ptr_eq(&out, &child));

        let two = Expr::and(vec![Expr::eq("a", 1), Expr::eq("b", 1)]);
        assert!(Arc::ptr_eq(&EliminateSingleAndOr.rewrite(&two), &two));
    }

    #[test]
    fn test_empty_logical_unchanged() {
        let q = Expr::and(vec![]);
        assert!(Arc::ptr_eq(&EliminateSingleAndOr.rewrite(&q), &q));
    }

    #[test]
    fn test_promote_nested_and() {
        let q = Expr::and(vec![
            Expr::eq("v1", 1),
            Expr::and(vec![Expr::eq("v2", 2), Expr::eq("v3", 3)]),
            Expr::eq("v4", 4),
        ]);
        let out = PromoteNestedAnd.rewrite(&q);
        assert_eq!(
            out,
            Expr::and(vec![
                Expr::eq("v1", 1),
                Expr::eq("v2", 2),
                Expr::eq("v3", 3),
                Expr::eq("v4", 4),
            ])
        );
    }

    #[test]
    fn test_nested_or_not_promoted() {
        let q = Expr::and(vec![Expr::eq("a", 1), Expr::or(vec![Expr::eq("b", 1), Expr::eq("c", 1)])]);
        assert!(Arc::ptr_eq(&PromoteNestedAnd.rewrite(&q), &q));
    }
}
