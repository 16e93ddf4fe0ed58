//! Query rewriting
//!
//! Canonicalizes predicate trees into equivalent, simpler forms before
//! they are split into conjuncts and distributed over a plan:
//!
//! - same-field comparisons merged into `$in` / `$nin`
//! - `$not` pushed inward and removed where possible
//! - single-child and nested `$and`/`$or` flattened
//! - single-comparison `$elemMatch` turned into a wildcard comparison
//!
//! # Usage
//!
//! ```ignore
//! use fedquery::query::Expr;
//! use fedquery::rewrite::QueryRewriter;
//!
//! let rewriter = QueryRewriter::new();
//! let q = Expr::not(Expr::or(vec![Expr::neq("f1", 1), Expr::lt("f2", 2)]));
//! let canonical = rewriter.rewrite(&q)?; // $and(f1 = 1, f2 >= 2)
//! ```

mod errors;
mod rewriter;
pub mod rules;

pub use errors::{RewriteError, RewriteResult};
pub use rewriter::QueryRewriter;
pub use rules::{default_rules, RewriteRule};
