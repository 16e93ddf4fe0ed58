//! Conjuncts: top-level `$and` clauses distributed over plan nodes

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::metadata::EntityMetadata;
use crate::query::{conjuncts, field_set, QueryExpr};

/// One clause of a rewritten query, with the fields it references
#[derive(Debug, Clone)]
pub struct Conjunct {
    clause: QueryExpr,
    fields: BTreeSet<String>,
    entity: Option<Arc<EntityMetadata>>,
}

impl Conjunct {
    pub fn new(clause: QueryExpr) -> Self {
        let fields = field_set(&clause);
        Self {
            clause,
            fields,
            entity: None,
        }
    }

    /// Splits a rewritten query into one conjunct per top-level clause
    pub fn split(query: &QueryExpr) -> Vec<Conjunct> {
        conjuncts(query).into_iter().map(Conjunct::new).collect()
    }

    /// Tags the conjunct with the entity owning its field
    pub fn with_entity(mut self, entity: Arc<EntityMetadata>) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn clause(&self) -> &QueryExpr {
        &self.clause
    }

    /// Distinct fields the clause references
    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    pub fn entity(&self) -> Option<&Arc<EntityMetadata>> {
        self.entity.as_ref()
    }

    /// The only field referenced, if there is exactly one
    pub fn single_field(&self) -> Option<&str> {
        if self.fields.len() == 1 {
            self.fields.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_single_field(&self) -> bool {
        self.single_field().is_some()
    }
}

impl fmt::Display for Conjunct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ComparisonOp, Expr};

    #[test]
    fn test_single_field() {
        let c = Conjunct::new(Expr::or(vec![Expr::eq("a", 1), Expr::gt("a", 5)]));
        assert_eq!(c.single_field(), Some("a"));

        let c = Conjunct::new(Expr::compare_fields("a", ComparisonOp::Lt, "b"));
        assert!(!c.is_single_field());
        assert_eq!(c.fields().len(), 2);
    }

    #[test]
    fn test_split() {
        let q = Expr::and(vec![Expr::eq("a", 1), Expr::or(vec![Expr::eq("b", 1), Expr::eq("c", 1)])]);
        let parts = Conjunct::split(&q);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].single_field(), Some("a"));
        assert_eq!(parts[1].single_field(), None);
        assert_eq!(parts[1].to_string(), "$or(b = 1, c = 1)");
    }

    #[test]
    fn test_entity_tag() {
        let entity = Arc::new(EntityMetadata::new("customer"));
        let c = Conjunct::new(Expr::eq("a", 1)).with_entity(Arc::clone(&entity));
        assert_eq!(c.entity().map(|e| e.name.as_str()), Some("customer"));
    }
}
