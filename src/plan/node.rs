//! Plan nodes and their ids

use std::fmt;
use std::sync::Arc;

use crate::metadata::EntityMetadata;

use super::conjunct::Conjunct;

/// Position of a node within its plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entity of a query plan with its assigned conjuncts and a
/// scorer-defined payload
#[derive(Debug, Clone)]
pub struct QueryPlanNode<D> {
    id: NodeId,
    name: String,
    metadata: Arc<EntityMetadata>,
    conjuncts: Vec<Conjunct>,
    data: D,
}

impl<D> QueryPlanNode<D> {
    pub(crate) fn new(id: NodeId, metadata: Arc<EntityMetadata>, data: D) -> Self {
        let name = format!("{}_{}", metadata.name, id.0);
        Self {
            id,
            name,
            metadata,
            conjuncts: Vec::new(),
            data,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// `<entity>_<index>`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Arc<EntityMetadata> {
        &self.metadata
    }

    pub fn conjuncts(&self) -> &[Conjunct] {
        &self.conjuncts
    }

    pub fn add_conjunct(&mut self, conjunct: Conjunct) {
        self.conjuncts.push(conjunct);
    }

    pub fn has_conjuncts(&self) -> bool {
        !self.conjuncts.is_empty()
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn set_data(&mut self, data: D) {
        self.data = data;
    }
}
