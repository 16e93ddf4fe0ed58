//! Flattening of single-comparison `$elemMatch` into a wildcard path

use std::sync::Arc;

use super::RewriteRule;
use crate::query::{join_path, Expr, QueryExpr, ANY_ELEMENT, THIS};

/// `arr $elemMatch(f op v)` → `arr.*.f op v`, and
/// `arr $elemMatch($this op v)` → `arr.* op v`
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleElemMatchIsComparison;

impl RewriteRule for SimpleElemMatchIsComparison {
    fn name(&self) -> &'static str {
        "SimpleElemMatchIsComparison"
    }

    fn rewrite(&self, q: &QueryExpr) -> QueryExpr {
        let Expr::ArrayMatch(m) = q.as_ref() else {
            return Arc::clone(q);
        };
        let Expr::ValueComparison(c) = m.elem_match.as_ref() else {
            return Arc::clone(q);
        };
        let elements = join_path(&m.array, ANY_ELEMENT);
        let field = if c.field == THIS {
            elements
        } else {
            join_path(&elements, &c.field)
        };
        Expr::compare(field, c.op, c.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_comparison_flattened() {
        let out = SimpleElemMatchIsComparison.rewrite(&Expr::elem_match("items", Expr::gt("qty", 3)));
        assert_eq!(out, Expr::gt("items.*.qty", 3));
    }

    #[test]
    fn test_this_comparison_flattened() {
        let out = SimpleElemMatchIsComparison.rewrite(&Expr::elem_match("nums", Expr::eq(THIS, 7)));
        assert_eq!(out, Expr::eq("nums.*", 7));
    }

    #[test]
    fn test_compound_elem_match_unchanged() {
        let q = Expr::elem_match("items", Expr::and(vec![Expr::eq("a", 1), Expr::eq("b", 2)]));
        assert!(Arc::ptr_eq(&SimpleElemMatchIsComparison.rewrite(&q), &q));
    }
}
