//! Declared entity indexes

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// An index over an ordered list of field paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name, unique within an entity
    pub name: String,
    /// Covered field paths, in index key order
    pub fields: Vec<String>,
    /// Whether the index enforces uniqueness
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// True if the index covers `field`
    pub fn is_useful(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Covered fields that appear in `fields`, in index order
    pub fn matched_fields(&self, fields: &BTreeSet<String>) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| fields.contains(f.as_str()))
            .cloned()
            .collect()
    }
}

/// The indexes declared on one entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Indexes(pub Vec<Index>);

impl Indexes {
    pub fn new(indexes: Vec<Index>) -> Self {
        Self(indexes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Index> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&Index> {
        self.0.iter().find(|i| i.name == name)
    }

    /// Indexes covering at least one of `fields`, keyed by index name, each
    /// with the covered fields it matched in index order
    pub fn useful_indexes(&self, fields: &BTreeSet<String>) -> BTreeMap<String, Vec<String>> {
        self.0
            .iter()
            .filter_map(|index| {
                let matched = index.matched_fields(fields);
                if matched.is_empty() {
                    None
                } else {
                    Some((index.name.clone(), matched))
                }
            })
            .collect()
    }
}
