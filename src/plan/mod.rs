//! Query plans
//!
//! A plan assigns the conjuncts of a rewritten query to the entities of a
//! composite and orders those entities with dependency edges. A plan
//! chooser builds one skeleton per request, then scores its orientations
//! to find the cheapest:
//!
//! ```ignore
//! let mut it = BruteForcePlanIterator::new(&plan);
//! scorer.reset(&mut plan);
//! let mut best = (scorer.score(&plan)?, plan.clone());
//! while it.next(&mut plan)? {
//!     let score = scorer.score(&plan)?;
//!     if score < best.0 {
//!         best = (score, plan.clone());
//!     }
//! }
//! ```

mod conjunct;
mod errors;
mod iterator;
mod node;
mod query_plan;

pub use conjunct::Conjunct;
pub use errors::{PlanError, PlanResult};
pub use iterator::BruteForcePlanIterator;
pub use node::{NodeId, QueryPlanNode};
pub use query_plan::QueryPlan;
