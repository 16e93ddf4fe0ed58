//! Field extraction and conjunct decomposition
//!
//! elemMatch does not report the array itself: the fields of the nested
//! predicate are reported under `array.*`, so `arr $elemMatch(x = 1)`
//! references `arr.*.x`.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::ast::{join_path, Expr, NaryLogicalOp, QueryExpr, ANY_ELEMENT, THIS};

/// Returns every field reference in `q`, in visit order, duplicates included
pub fn query_fields(q: &Expr) -> Vec<String> {
    let mut fields = Vec::new();
    collect_fields(q, "", &mut fields);
    fields
}

/// Returns the distinct fields referenced by `q`
pub fn field_set(q: &Expr) -> BTreeSet<String> {
    query_fields(q).into_iter().collect()
}

fn resolve(ctx: &str, field: &str) -> String {
    if field == THIS {
        ctx.to_string()
    } else {
        join_path(ctx, field)
    }
}

fn collect_fields(q: &Expr, ctx: &str, out: &mut Vec<String>) {
    match q {
        Expr::ValueComparison(c) => out.push(resolve(ctx, &c.field)),
        Expr::FieldComparison(c) => {
            out.push(resolve(ctx, &c.field));
            out.push(resolve(ctx, &c.rfield));
        }
        Expr::NaryRelational(r) => out.push(resolve(ctx, &r.field)),
        Expr::RegexMatch(r) => out.push(resolve(ctx, &r.field)),
        Expr::ArrayContains(c) => out.push(resolve(ctx, &c.array)),
        Expr::ArrayMatch(m) => {
            let nested_ctx = join_path(&resolve(ctx, &m.array), ANY_ELEMENT);
            collect_fields(&m.elem_match, &nested_ctx, out);
        }
        Expr::Not(nested) => collect_fields(nested, ctx, out),
        Expr::Logical(le) => {
            for child in &le.children {
                collect_fields(child, ctx, out);
            }
        }
    }
}

/// Splits `q` into its top-level `$and` clauses.
///
/// A non-`$and` expression is its own single conjunct.
pub fn conjuncts(q: &QueryExpr) -> Vec<QueryExpr> {
    match q.as_logical(NaryLogicalOp::And) {
        Some(le) => le.children.iter().map(Arc::clone).collect(),
        None => vec![Arc::clone(q)],
    }
}
