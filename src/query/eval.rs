//! Expression evaluation against JSON documents
//!
//! Comparisons use a total order over JSON values
//! (null < bool < number < string < array < object), so each comparison
//! operator is the exact complement of its negation on single-valued
//! paths. A missing field resolves to `null`. Multi-valued paths (through
//! `*`) match when any resolved value matches.

use std::cmp::Ordering;

use regex::RegexBuilder;
use serde_json::Value;

use super::ast::{
    ArrayContains, ComparisonOp, ContainsOp, Expr, NaryLogicalOp, NaryRelationalOp, RegexMatch,
    ANY_ELEMENT, THIS,
};

static NULL: Value = Value::Null;

/// Evaluates `q` against `doc`
pub fn evaluate(q: &Expr, doc: &Value) -> bool {
    match q {
        Expr::ValueComparison(c) => resolve(doc, &c.field)
            .into_iter()
            .any(|v| compare_matches(c.op, compare_values(v, &c.value))),
        Expr::FieldComparison(c) => {
            let right = resolve(doc, &c.rfield);
            resolve(doc, &c.field).into_iter().any(|l| {
                right
                    .iter()
                    .any(|r| compare_matches(c.op, compare_values(l, r)))
            })
        }
        Expr::NaryRelational(r) => {
            let found = resolve(doc, &r.field)
                .into_iter()
                .any(|v| r.values.iter().any(|x| values_equal(v, x)));
            match r.op {
                NaryRelationalOp::In => found,
                NaryRelationalOp::NotIn => !found,
            }
        }
        Expr::RegexMatch(r) => regex_matches(r, doc),
        Expr::ArrayContains(c) => array_contains(c, doc),
        Expr::ArrayMatch(m) => resolve(doc, &m.array).into_iter().any(|v| match v {
            Value::Array(items) => items.iter().any(|item| evaluate(&m.elem_match, item)),
            _ => false,
        }),
        Expr::Not(nested) => !evaluate(nested, doc),
        Expr::Logical(le) => match le.op {
            NaryLogicalOp::And => le.children.iter().all(|c| evaluate(c, doc)),
            NaryLogicalOp::Or => le.children.iter().any(|c| evaluate(c, doc)),
        },
    }
}

/// Resolves a dotted path to the values it addresses
pub fn resolve<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    };
    let mut out = Vec::new();
    resolve_into(doc, &segments, &mut out);
    out
}

fn resolve_into<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(value);
        return;
    };
    match *head {
        THIS => resolve_into(value, rest, out),
        ANY_ELEMENT => {
            if let Value::Array(items) = value {
                for item in items {
                    resolve_into(item, rest, out);
                }
            }
        }
        key => {
            let next = match value {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            resolve_into(next.unwrap_or(&NULL), rest, out);
        }
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            for ((lk, lv), (rk, rv)) in x.iter().zip(y.iter()) {
                let ord = lk.cmp(rk).then_with(|| compare_values(lv, rv));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Equality consistent with [`compare_values`]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Ordering::Equal
}

fn compare_matches(op: ComparisonOp, ord: Ordering) -> bool {
    match op {
        ComparisonOp::Eq => ord == Ordering::Equal,
        ComparisonOp::Neq => ord != Ordering::Equal,
        ComparisonOp::Lt => ord == Ordering::Less,
        ComparisonOp::Lte => ord != Ordering::Greater,
        ComparisonOp::Gt => ord == Ordering::Greater,
        ComparisonOp::Gte => ord != Ordering::Less,
    }
}

fn regex_matches(r: &RegexMatch, doc: &Value) -> bool {
    let regex = match RegexBuilder::new(&r.pattern)
        .case_insensitive(r.case_insensitive)
        .multi_line(r.multiline)
        .ignore_whitespace(r.extended)
        .dot_matches_new_line(r.dot_all)
        .build()
    {
        Ok(regex) => regex,
        Err(_) => return false,
    };
    resolve(doc, &r.field).into_iter().any(|v| match v {
        Value::String(s) => regex.is_match(s),
        _ => false,
    })
}

fn array_contains(c: &ArrayContains, doc: &Value) -> bool {
    resolve(doc, &c.array).into_iter().any(|v| {
        let Value::Array(items) = v else {
            return false;
        };
        let held = |x: &Value| items.iter().any(|item| values_equal(item, x));
        match c.op {
            ContainsOp::Any => c.values.iter().any(held),
            ContainsOp::All => c.values.iter().all(held),
            ContainsOp::None => !c.values.iter().any(held),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::Expr;
    use serde_json::json;

    #[test]
    fn test_missing_field_is_null() {
        let doc = json!({ "a": 1 });
        assert!(evaluate(&Expr::eq("b", Value::Null), &doc));
        assert!(evaluate(&Expr::lt("b", 0), &doc));
        assert!(!evaluate(&Expr::eq("b", 0), &doc));
    }

    #[test]
    fn test_comparisons_complement() {
        let doc = json!({ "n": 5, "s": "abc" });
        for q in [Expr::lt("n", 5), Expr::gte("n", 5), Expr::eq("s", "abc"), Expr::neq("s", "abc")] {
            let Expr::ValueComparison(c) = q.as_ref() else {
                unreachable!()
            };
            let inverse = Expr::compare(c.field.clone(), c.op.negate(), c.value.clone());
            assert_ne!(evaluate(&q, &doc), evaluate(&inverse, &doc));
        }
    }

    #[test]
    fn test_type_order() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(true), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!(1), &json!(1.0)), Ordering::Equal);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1, 3])), Ordering::Less);
    }

    #[test]
    fn test_in_and_not_in() {
        let doc = json!({ "f": 2 });
        assert!(evaluate(&Expr::is_in("f", [1, 2, 3]), &doc));
        assert!(!evaluate(&Expr::not_in("f", [1, 2, 3]), &doc));
        assert!(evaluate(&Expr::not_in("f", [4]), &doc));
    }

    #[test]
    fn test_wildcard_paths() {
        let doc = json!({ "items": [{ "x": 1 }, { "x": 5 }] });
        assert_eq!(resolve(&doc, "items.*.x").len(), 2);
        assert!(evaluate(&Expr::gt("items.*.x", 3), &doc));
        assert!(!evaluate(&Expr::gt("items.*.x", 5), &doc));
        assert_eq!(resolve(&doc, "items.1.x"), vec![&json!(5)]);
    }

    #[test]
    fn test_elem_match() {
        let doc = json!({ "items": [{ "x": 1, "y": 2 }, { "x": 5, "y": 0 }] });
        let both = Expr::elem_match("items", Expr::and(vec![Expr::eq("x", 1), Expr::eq("y", 2)]));
        assert!(evaluate(&both, &doc));
        let split = Expr::elem_match("items", Expr::and(vec![Expr::eq("x", 1), Expr::eq("y", 0)]));
        assert!(!evaluate(&split, &doc));
        let this = Expr::elem_match("nums", Expr::gt(THIS, 2));
        assert!(evaluate(&this, &json!({ "nums": [1, 3] })));
        assert!(!evaluate(&this, &json!({ "nums": "x" })));
    }

    #[test]
    fn test_regex() {
        let doc = json!({ "name": "Alice" });
        assert!(evaluate(&Expr::regex("name", "^Al"), &doc));
        assert!(!evaluate(&Expr::regex("name", "^al"), &doc));
        assert!(!evaluate(&Expr::regex("missing", ".*"), &doc));
        assert!(!evaluate(&Expr::regex("name", "("), &doc));
    }

    #[test]
    fn test_array_contains() {
        let doc = json!({ "tags": ["a", "b"] });
        assert!(evaluate(&Expr::contains("tags", ContainsOp::Any, ["b", "z"]), &doc));
        assert!(!evaluate(&Expr::contains("tags", ContainsOp::All, ["b", "z"]), &doc));
        assert!(evaluate(&Expr::contains("tags", ContainsOp::None, ["z"]), &doc));
    }

    #[test]
    fn test_empty_logical() {
        let doc = json!({});
        assert!(evaluate(&Expr::and(vec![]), &doc));
        assert!(!evaluate(&Expr::or(vec![]), &doc));
    }
}
