//! Entity metadata consumed by the scorer
//!
//! Only what scoring needs: an entity's name, its parent in the composite
//! hierarchy and its declared indexes. Loading and validating full entity
//! schemas happens elsewhere.

mod entity;
mod index;

pub use entity::EntityMetadata;
pub use index::{Index, Indexes};
