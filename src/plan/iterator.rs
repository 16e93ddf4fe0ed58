//! Exhaustive enumeration of edge orientations
//!
//! Edges are collected once, walking down from the plan's sources, and
//! then flipped like the bits of a binary counter: the last edge flips on
//! every step, the one before it every second step, and so on. After
//! `2^edges` steps every edge is back where it started.

use super::errors::PlanResult;
use super::node::NodeId;
use super::query_plan::QueryPlan;

#[derive(Debug, Clone)]
struct Edge {
    a: NodeId,
    b: NodeId,
    flipped: bool,
}

/// Walks a plan through every orientation of its edges
#[derive(Debug, Clone)]
pub struct BruteForcePlanIterator {
    edges: Vec<Edge>,
}

impl BruteForcePlanIterator {
    /// Records the edges of `plan` in its current orientation
    pub fn new<D>(plan: &QueryPlan<D>) -> Self {
        let mut edges = Vec::new();
        let mut seen = vec![false; plan.len()];
        for source in plan.sources() {
            collect_edges(plan, source, &mut edges, &mut seen);
        }
        Self { edges }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Moves `plan` to the next orientation.
    ///
    /// Returns `false` once every orientation has been visited, leaving the
    /// plan back in the orientation it had when the iterator was built.
    pub fn next<D>(&mut self, plan: &mut QueryPlan<D>) -> PlanResult<bool> {
        for edge in self.edges.iter_mut().rev() {
            plan.flip(edge.a, edge.b)?;
            edge.flipped = !edge.flipped;
            if edge.flipped {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Current orientation, one character per edge: `1` for an edge in
    /// its original direction, `0` for a flipped one
    pub fn state(&self) -> String {
        self.edges
            .iter()
            .map(|e| if e.flipped { '0' } else { '1' })
            .collect()
    }
}

fn collect_edges<D>(plan: &QueryPlan<D>, from: NodeId, edges: &mut Vec<Edge>, seen: &mut [bool]) {
    if seen[from.0] {
        return;
    }
    seen[from.0] = true;
    for to in plan.node_destinations(from) {
        edges.push(Edge {
            a: from,
            b: to,
            flipped: false,
        });
        collect_edges(plan, to, edges, seen);
    }
}
