//! fedquery - query rewriting and cost-based plan scoring for federated
//! composite entities
//!
//! A composite entity spans several collections joined by parent/child
//! keys. Before such a query runs, its predicate is canonicalized by the
//! rewriter, split into conjuncts, and distributed over a plan of entity
//! nodes; the scorer then ranks the candidate orientations of that plan.

pub mod config;
pub mod metadata;
pub mod observability;
pub mod plan;
pub mod query;
pub mod rewrite;
pub mod scorer;
