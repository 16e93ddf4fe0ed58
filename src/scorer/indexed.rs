//! Cost estimation from index coverage
//!
//! Each node gets a per-invocation cost and result size from the
//! `CostModel`, depending on whether it carries conjuncts and whether one
//! of its entity's indexes covers a single-field conjunct. The plan's
//! score is the cost of retrieving everything up to the root, multiplied
//! by a penalty for every queried node that can only be filtered after
//! the root is retrieved.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use crate::config::CostModel;
use crate::observability::{event_enabled, log_event_with_fields, Event, MetricsRegistry};
use crate::plan::{NodeId, QueryPlan, QueryPlanNode};

use super::errors::{ScorerError, ScorerResult};
use super::explain::{DescendantFactor, NodeCost, ScoreBreakdown};
use super::score::Score;
use super::QueryPlanScorer;

/// Per-node annotations computed by [`IndexedFieldScorer::reset`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedFieldScorerData {
    root: bool,
    indexable_fields: BTreeSet<String>,
    useful_indexes: BTreeMap<String, Vec<String>>,
}

impl IndexedFieldScorerData {
    /// True if the node's entity has no parent
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Fields referenced by the node's single-field conjuncts
    pub fn indexable_fields(&self) -> &BTreeSet<String> {
        &self.indexable_fields
    }

    /// Index name to the indexable fields it covers, in index order
    pub fn useful_indexes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.useful_indexes
    }

    pub fn has_useful_indexes(&self) -> bool {
        !self.useful_indexes.is_empty()
    }
}

type Node = QueryPlanNode<IndexedFieldScorerData>;

/// Scores plans by estimated retrieval cost.
///
/// `reset` must run on the plan skeleton before scoring; conjuncts do not
/// move between nodes while a chooser flips edges, so the annotations stay
/// valid for every orientation.
#[derive(Debug, Clone, Default)]
pub struct IndexedFieldScorer {
    cost_model: CostModel,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl IndexedFieldScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost_model(cost_model: CostModel) -> Self {
        Self {
            cost_model,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    fn annotate(node: &Node) -> IndexedFieldScorerData {
        let mut indexable_fields = BTreeSet::new();
        let mut entity = None;
        for conjunct in node.conjuncts() {
            if let Some(field) = conjunct.single_field() {
                indexable_fields.insert(field.to_string());
                entity = Some(conjunct.entity().unwrap_or(node.metadata()));
            }
        }
        let useful_indexes = entity
            .map(|e| e.indexes.useful_indexes(&indexable_fields))
            .unwrap_or_default();
        IndexedFieldScorerData {
            root: node.metadata().is_root(),
            indexable_fields,
            useful_indexes,
        }
    }

    fn estimated_cost(&self, node: &Node) -> u128 {
        let cost = if !node.has_conjuncts() {
            self.cost_model.no_query_cost
        } else if node.data().has_useful_indexes() {
            self.cost_model.indexed_cost
        } else {
            self.cost_model.unindexed_cost
        };
        u128::from(cost)
    }

    fn estimated_size(&self, node: &Node) -> u128 {
        if node.has_conjuncts() {
            u128::from(self.cost_model.query_size)
        } else {
            u128::from(self.cost_model.no_query_size)
        }
    }

    /// Explains the score of `plan`
    pub fn explain(&self, plan: &QueryPlan<IndexedFieldScorerData>) -> ScorerResult<ScoreBreakdown> {
        let root = match plan.roots().as_slice() {
            [] => return Err(ScorerError::NoRoot),
            [root] => *root,
            many => return Err(ScorerError::MultipleRoots(many.len())),
        };

        let mut walk = AncestorWalk::new(plan.len());
        let (path_cost, root_size) = self.ancestor_cost(plan, root, &mut walk)?;

        let mut descendants = Vec::new();
        let mut penalty: u128 = 1;
        let mut seen = vec![false; plan.len()];
        seen[root.0] = true;
        let mut queue: VecDeque<NodeId> = plan.node_destinations(root).into();
        while let Some(id) = queue.pop_front() {
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            let node = &plan.nodes()[id.0];
            if node.has_conjuncts() {
                let factor = u128::from(self.cost_model.post_root_factor).saturating_mul(root_size);
                penalty = penalty.saturating_mul(factor);
                descendants.push(DescendantFactor {
                    node: node.name().to_string(),
                    factor,
                });
            }
            queue.extend(plan.node_destinations(id));
        }

        Ok(ScoreBreakdown {
            root: plan.nodes()[root.0].name().to_string(),
            ancestors: walk.entries,
            path_cost,
            root_size,
            descendants,
            penalty,
            score: Score::Cost(path_cost.saturating_mul(penalty)),
        })
    }

    /// (total cost, result size) of `id` including everything upstream
    fn ancestor_cost(
        &self,
        plan: &QueryPlan<IndexedFieldScorerData>,
        id: NodeId,
        walk: &mut AncestorWalk,
    ) -> ScorerResult<(u128, u128)> {
        if let Some(done) = walk.memo[id.0] {
            return Ok(done);
        }
        let node = &plan.nodes()[id.0];
        if walk.on_path[id.0] {
            return Err(ScorerError::CyclicPlan(node.name().to_string()));
        }
        walk.on_path[id.0] = true;

        let mut input_size: u128 = 1;
        let mut sources_cost: u128 = 0;
        for source in plan.node_sources(id) {
            let (cost, size) = self.ancestor_cost(plan, source, walk)?;
            input_size = input_size.saturating_mul(size);
            sources_cost = sources_cost.saturating_add(cost);
        }

        let cost = input_size.saturating_mul(self.estimated_cost(node));
        let size = input_size.saturating_mul(self.estimated_size(node));
        let total = sources_cost.saturating_add(cost);

        walk.on_path[id.0] = false;
        walk.memo[id.0] = Some((total, size));
        walk.entries.push(NodeCost {
            node: node.name().to_string(),
            input_size,
            cost,
            size,
        });
        Ok((total, size))
    }
}

struct AncestorWalk {
    memo: Vec<Option<(u128, u128)>>,
    on_path: Vec<bool>,
    entries: Vec<NodeCost>,
}

impl AncestorWalk {
    fn new(n: usize) -> Self {
        Self {
            memo: vec![None; n],
            on_path: vec![false; n],
            entries: Vec::new(),
        }
    }
}

impl QueryPlanScorer for IndexedFieldScorer {
    type Data = IndexedFieldScorerData;

    fn new_data(&self) -> IndexedFieldScorerData {
        IndexedFieldScorerData::default()
    }

    fn reset(&self, plan: &mut QueryPlan<IndexedFieldScorerData>) {
        for node in plan.nodes_mut() {
            let data = Self::annotate(node);
            node.set_data(data);
        }

        if let Some(metrics) = &self.metrics {
            metrics.increment_scorer_resets();
        }
        if event_enabled(Event::ScorerReset) {
            let indexed = plan
                .nodes()
                .iter()
                .filter(|n| n.data().has_useful_indexes())
                .count();
            log_event_with_fields(
                Event::ScorerReset,
                &[
                    ("nodes", &plan.len().to_string()),
                    ("indexed_nodes", &indexed.to_string()),
                ],
            );
        }
    }

    fn score(&self, plan: &QueryPlan<IndexedFieldScorerData>) -> ScorerResult<Score> {
        let score = self.explain(plan)?.score;

        if let Some(metrics) = &self.metrics {
            metrics.increment_plans_scored();
        }
        if event_enabled(Event::PlanScored) {
            log_event_with_fields(
                Event::PlanScored,
                &[
                    ("score", &score.to_string()),
                    ("plan", &plan.tree_to_string()),
                ],
            );
        }
        Ok(score)
    }
}
