//! Score breakdown
//!
//! Deterministic, human-readable account of how a plan's score was
//! reached.

use std::fmt;

use super::score::Score;

/// Cost contribution of one node on the path up to the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCost {
    pub node: String,
    /// Rows feeding the node (product of its source sizes), 1 for a
    /// source-less node
    pub input_size: u128,
    /// This node's own cost, excluding its sources
    pub cost: u128,
    /// Estimated result size
    pub size: u128,
}

/// Post-root factor of one queried descendant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescendantFactor {
    pub node: String,
    pub factor: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub root: String,
    /// Ancestors of the root and the root itself, sources first
    pub ancestors: Vec<NodeCost>,
    /// Total cost up to and including the root
    pub path_cost: u128,
    /// Estimated result size of the root
    pub root_size: u128,
    /// Queried nodes downstream of the root
    pub descendants: Vec<DescendantFactor>,
    /// Product of descendant factors
    pub penalty: u128,
    pub score: Score,
}

impl ScoreBreakdown {
    /// Cost entry for `node`
    pub fn node_cost(&self, node: &str) -> Option<&NodeCost> {
        self.ancestors.iter().find(|c| c.node == node)
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SCORE BREAKDOWN ===")?;
        writeln!(f, "Root: {}", self.root)?;
        writeln!(f, "Path:")?;
        for c in &self.ancestors {
            writeln!(
                f,
                "  - {}: input {} cost {} size {}",
                c.node, c.input_size, c.cost, c.size
            )?;
        }
        writeln!(f, "Path Cost: {}", self.path_cost)?;
        writeln!(f, "Root Size: {}", self.root_size)?;
        if !self.descendants.is_empty() {
            writeln!(f, "Descendants:")?;
            for d in &self.descendants {
                writeln!(f, "  - {}: x{}", d.node, d.factor)?;
            }
        }
        writeln!(f, "Penalty: {}", self.penalty)?;
        writeln!(f, "Score: {}", self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let breakdown = ScoreBreakdown {
            root: "customer_0".into(),
            ancestors: vec![
                NodeCost {
                    node: "order_1".into(),
                    input_size: 1,
                    cost: 2,
                    size: 10,
                },
                NodeCost {
                    node: "customer_0".into(),
                    input_size: 10,
                    cost: 10,
                    size: 1000,
                },
            ],
            path_cost: 12,
            root_size: 1000,
            descendants: vec![],
            penalty: 1,
            score: Score::Cost(12),
        };
        let out = breakdown.to_string();
        assert!(out.starts_with("=== SCORE BREAKDOWN ===\n"));
        assert!(out.contains("  - order_1: input 1 cost 2 size 10\n"));
        assert!(out.contains("Score: 12\n"));
        assert!(!out.contains("Descendants"));
        assert_eq!(breakdown.node_cost("customer_0").map(|c| c.cost), Some(10));
    }
}
