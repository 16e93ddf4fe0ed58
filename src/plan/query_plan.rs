//! Query plan DAG
//!
//! Nodes live in a vector indexed by `NodeId`. Edges are a connection
//! matrix: `conn[from][to]` means `from` is a source of `to`, so `to`
//! runs after `from`. Per-node out/in edge counts are kept alongside so
//! `sources()` and `flip()` do not rescan the matrix.

use std::fmt;
use std::sync::Arc;

use crate::metadata::EntityMetadata;

use super::errors::{PlanError, PlanResult};
use super::node::{NodeId, QueryPlanNode};

/// One candidate execution order over a set of entity nodes.
///
/// `Clone` is a deep copy: nodes, payloads and edges.
#[derive(Debug, Clone)]
pub struct QueryPlan<D> {
    nodes: Vec<QueryPlanNode<D>>,
    conn: Vec<Vec<bool>>,
    from_n: Vec<usize>,
    to_n: Vec<usize>,
}

impl<D> Default for QueryPlan<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> QueryPlan<D> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            conn: Vec::new(),
            from_n: Vec::new(),
            to_n: Vec::new(),
        }
    }

    /// Adds an unconnected node for `metadata`
    pub fn add_node(&mut self, metadata: Arc<EntityMetadata>, data: D) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(QueryPlanNode::new(id, metadata, data));
        for row in &mut self.conn {
            row.push(false);
        }
        self.conn.push(vec![false; self.nodes.len()]);
        self.from_n.push(0);
        self.to_n.push(0);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[QueryPlanNode<D>] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [QueryPlanNode<D>] {
        &mut self.nodes
    }

    pub fn node(&self, id: NodeId) -> PlanResult<&QueryPlanNode<D>> {
        self.nodes.get(id.0).ok_or(PlanError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> PlanResult<&mut QueryPlanNode<D>> {
        self.nodes.get_mut(id.0).ok_or(PlanError::UnknownNode(id))
    }

    fn check(&self, id: NodeId) -> PlanResult<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(PlanError::UnknownNode(id))
        }
    }

    /// Adds the edge `from -> to`; a no-op if it already exists
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> PlanResult<()> {
        self.check(from)?;
        self.check(to)?;
        if !self.conn[from.0][to.0] {
            self.conn[from.0][to.0] = true;
            self.from_n[from.0] += 1;
            self.to_n[to.0] += 1;
        }
        Ok(())
    }

    /// Reverses the edge between `x` and `y`, whichever way it points
    pub fn flip(&mut self, x: NodeId, y: NodeId) -> PlanResult<()> {
        self.check(x)?;
        self.check(y)?;
        if self.conn[x.0][y.0] {
            self.flip_edge(x.0, y.0);
        } else if self.conn[y.0][x.0] {
            self.flip_edge(y.0, x.0);
        } else {
            return Err(PlanError::NoEdge(x, y));
        }
        Ok(())
    }

    fn flip_edge(&mut self, from: usize, to: usize) {
        self.conn[from][to] = false;
        self.conn[to][from] = true;
        self.from_n[from] -= 1;
        self.from_n[to] += 1;
        self.to_n[to] -= 1;
        self.to_n[from] += 1;
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.conn
            .get(from.0)
            .and_then(|row| row.get(to.0))
            .copied()
            .unwrap_or(false)
    }

    /// Every edge as `(from, to)`, ordered by `from` then `to`
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::new();
        for (from, row) in self.conn.iter().enumerate() {
            for (to, &connected) in row.iter().enumerate() {
                if connected {
                    edges.push((NodeId(from), NodeId(to)));
                }
            }
        }
        edges
    }

    /// Nodes with no incoming edges
    pub fn sources(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&i| self.to_n[i] == 0)
            .map(NodeId)
            .collect()
    }

    /// Nodes with an edge into `id`
    pub fn node_sources(&self, id: NodeId) -> Vec<NodeId> {
        if id.0 >= self.nodes.len() || self.to_n[id.0] == 0 {
            return Vec::new();
        }
        (0..self.nodes.len())
            .filter(|&i| self.conn[i][id.0])
            .map(NodeId)
            .collect()
    }

    /// Nodes `id` has an edge into
    pub fn node_destinations(&self, id: NodeId) -> Vec<NodeId> {
        if id.0 >= self.nodes.len() || self.from_n[id.0] == 0 {
            return Vec::new();
        }
        self.conn[id.0]
            .iter()
            .enumerate()
            .filter(|&(_, &connected)| connected)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Nodes whose entity has no parent
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.metadata().is_root())
            .map(|n| n.id())
            .collect()
    }

    /// The unique node whose entity has no parent
    pub fn root(&self) -> Option<NodeId> {
        match self.roots().as_slice() {
            [root] => Some(*root),
            _ => None,
        }
    }

    /// One `from -> to` line per edge, walking down from each source
    pub fn tree_to_string(&self) -> String {
        let mut out = String::new();
        if self.nodes.len() == 1 {
            out.push_str(self.nodes[0].name());
        } else {
            for source in self.sources() {
                self.write_tree(source, &mut out, &mut vec![false; self.nodes.len()]);
            }
        }
        out
    }

    fn write_tree(&self, start: NodeId, out: &mut String, on_path: &mut [bool]) {
        on_path[start.0] = true;
        for dest in self.node_destinations(start) {
            out.push_str(self.nodes[start.0].name());
            out.push_str(" -> ");
            out.push_str(self.nodes[dest.0].name());
            out.push('\n');
            if !on_path[dest.0] {
                self.write_tree(dest, out, on_path);
            }
        }
        on_path[start.0] = false;
    }
}

impl<D> fmt::Display for QueryPlan<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree_to_string())
    }
}
