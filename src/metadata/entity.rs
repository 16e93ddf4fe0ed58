use serde::{Deserialize, Serialize};

use super::index::{Index, Indexes};

/// One entity of a composite hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub name: String,
    /// Parent entity; `None` for the composite root
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub indexes: Indexes,
}

impl EntityMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            indexes: Indexes::default(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.0.push(index);
        self
    }

    /// True for the entity with no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let e = EntityMetadata::new("order")
            .with_parent("customer")
            .with_index(Index::new("by_date", ["date"]));
        assert!(!e.is_root());
        assert_eq!(e.parent.as_deref(), Some("customer"));
        assert_eq!(e.indexes.len(), 1);
        assert!(EntityMetadata::new("customer").is_root());
    }

    #[test]
    fn test_deserialize_defaults() {
        let e: EntityMetadata = serde_json::from_str(r#"{"name": "customer"}"#).unwrap();
        assert!(e.is_root());
        assert!(e.indexes.is_empty());
    }
}
