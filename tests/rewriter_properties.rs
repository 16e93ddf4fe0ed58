//! Rewriter Property Tests
//!
//! Random predicates over every expression kind, evaluated against
//! documents holding scalars, arrays of scalars and arrays of objects:
//! - rewriting preserves which documents match
//! - the rewritten query is a fixed point

use std::sync::Arc;

use fedquery::query::{evaluate, ComparisonOp, ContainsOp, Expr, QueryExpr, RegexMatch};
use fedquery::rewrite::QueryRewriter;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Paths addressed from the document root
const DOC_PATHS: [&str; 5] = ["f1", "f2", "arr", "arr.*", "arr.*.x"];

/// Paths addressed from an array element inside `$elemMatch`
const ELEMENT_PATHS: [&str; 2] = ["x", "$this"];

const ARRAY_PATHS: [&str; 2] = ["arr", "f1"];

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0i64..3).prop_map(Value::from),
        prop_oneof![Just("a"), Just("b")].prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

fn arb_op() -> impl Strategy<Value = ComparisonOp> {
    prop_oneof![
        Just(ComparisonOp::Eq),
        Just(ComparisonOp::Neq),
        Just(ComparisonOp::Lt),
        Just(ComparisonOp::Lte),
        Just(ComparisonOp::Gt),
        Just(ComparisonOp::Gte),
    ]
}

fn arb_contains_op() -> impl Strategy<Value = ContainsOp> {
    prop_oneof![
        Just(ContainsOp::Any),
        Just(ContainsOp::All),
        Just(ContainsOp::None),
    ]
}

fn arb_values() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_value(), 0..3)
}

/// Comparison, field comparison, `$in`, `$nin` and regex leaves over `paths`
fn arb_comparison_leaf(paths: &'static [&'static str]) -> BoxedStrategy<QueryExpr> {
    let path = move || prop::sample::select(paths);
    prop_oneof![
        (path(), arb_op(), arb_value()).prop_map(|(f, op, v)| Expr::compare(f, op, v)),
        (path(), arb_op(), path()).prop_map(|(f, op, r)| Expr::compare_fields(f, op, r)),
        (path(), arb_values()).prop_map(|(f, v)| Expr::is_in(f, v)),
        (path(), arb_values()).prop_map(|(f, v)| Expr::not_in(f, v)),
        (path(), prop_oneof![Just("^a"), Just("B")], any::<bool>()).prop_map(|(f, p, ci)| {
            Expr::regex_with(RegexMatch {
                field: f.to_string(),
                pattern: p.to_string(),
                case_insensitive: ci,
                multiline: false,
                extended: false,
                dot_all: false,
            })
        }),
    ]
    .boxed()
}

fn arb_tree(leaf: BoxedStrategy<QueryExpr>) -> BoxedStrategy<QueryExpr> {
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Expr::and),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Expr::or),
            inner.prop_map(Expr::not),
        ]
    })
    .boxed()
}

fn arb_query() -> BoxedStrategy<QueryExpr> {
    let element_query = arb_tree(arb_comparison_leaf(&ELEMENT_PATHS));
    let leaf = prop_oneof![
        3 => arb_comparison_leaf(&DOC_PATHS),
        1 => (prop::sample::select(ARRAY_PATHS.to_vec()), arb_contains_op(), arb_values())
            .prop_map(|(a, op, v)| Expr::contains(a, op, v)),
        2 => element_query.prop_map(|body| Expr::elem_match("arr", body)),
    ]
    .boxed();
    arb_tree(leaf)
}

/// A scalar, or an object with an optional scalar `x`
fn arb_element() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_value(),
        prop::option::of(arb_value()).prop_map(|x| match x {
            Some(v) => json!({ "x": v }),
            None => json!({}),
        }),
    ]
}

/// `f1`, `f2` and `arr` are each missing, a scalar, or an array
fn arb_doc() -> impl Strategy<Value = Value> {
    let field = || {
        prop::option::of(prop_oneof![
            arb_value(),
            prop::collection::vec(arb_element(), 0..3).prop_map(Value::Array),
        ])
    };
    (field(), field(), field()).prop_map(|(f1, f2, arr)| {
        let mut doc = Map::new();
        for (name, value) in [("f1", f1), ("f2", f2), ("arr", arr)] {
            if let Some(value) = value {
                doc.insert(name.to_string(), value);
            }
        }
        Value::Object(doc)
    })
}

proptest! {
    #[test]
    fn rewrite_equivalence(q in arb_query(), docs in prop::collection::vec(arb_doc(), 1..8)) {
        let out = QueryRewriter::new().rewrite(&q).unwrap();
        for doc in &docs {
            prop_assert_eq!(evaluate(&q, doc), evaluate(&out, doc), "{} -> {} on {}", q, out, doc);
        }
    }

    #[test]
    fn rewrite_idempotent(q in arb_query()) {
        let rewriter = QueryRewriter::new();
        let out = rewriter.rewrite(&q).unwrap();
        let again = rewriter.rewrite(&out).unwrap();
        prop_assert!(Arc::ptr_eq(&again, &out), "{} -> {}", out, again);
    }
}
