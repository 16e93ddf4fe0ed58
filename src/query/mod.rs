//! Query expressions
//!
//! The predicate AST consumed by the rewriter and distributed over plan
//! nodes as conjuncts, plus the helpers that inspect it:
//!
//! - field extraction (which fields a clause constrains)
//! - conjunct decomposition (top-level `$and` clauses)
//! - evaluation against JSON documents

mod analyze;
mod ast;
mod eval;

pub use analyze::{conjuncts, field_set, query_fields};
pub use ast::{
    is_multi_valued, join_path, ArrayContains, ArrayMatch, ComparisonOp, ContainsOp, Expr,
    FieldComparison, NaryLogical, NaryLogicalOp, NaryRelational, NaryRelationalOp, QueryExpr,
    RegexMatch, ValueComparison, ANY_ELEMENT, THIS,
};
pub use eval::{compare_values, evaluate, resolve, values_equal};
