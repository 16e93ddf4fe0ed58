//! Fixed-point query rewriter
//!
//! One iteration rewrites the tree bottom-up: children of `$not`,
//! `$and`/`$or` and `$elemMatch` first, then every rule in order on the
//! node itself. Iterations repeat until one returns its input unchanged
//! (same `Arc`).

use std::sync::Arc;

use crate::config::RewriterConfig;
use crate::observability::{event_enabled, log_event_with_fields, Event, MetricsRegistry};
use crate::query::{Expr, QueryExpr};

use super::errors::{RewriteError, RewriteResult};
use super::rules::{default_rules, RewriteRule};

/// Applies an ordered rule list to a fixed point.
///
/// The rule list is fixed at construction; a rewriter can be shared
/// across threads.
#[derive(Debug)]
pub struct QueryRewriter {
    rules: Vec<Box<dyn RewriteRule>>,
    max_iterations: Option<usize>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl Default for QueryRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRewriter {
    /// Rewriter over [`default_rules`] with the default iteration cap
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Rewriter over the given rules, applied in order
    pub fn with_rules(rules: Vec<Box<dyn RewriteRule>>) -> Self {
        Self {
            rules,
            max_iterations: RewriterConfig::default().max_iterations,
            metrics: None,
        }
    }

    pub fn from_config(config: &RewriterConfig) -> Self {
        Self::new().with_max_iterations(config.max_iterations)
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Rule names in application order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    /// Rewrites `q` to its fixed point.
    ///
    /// Returns `q` itself when no rule applies anywhere in the tree.
    pub fn rewrite(&self, q: &QueryExpr) -> RewriteResult<QueryExpr> {
        if let Some(metrics) = &self.metrics {
            metrics.increment_rewrites();
        }
        if event_enabled(Event::RewriteBegin) {
            log_event_with_fields(Event::RewriteBegin, &[("query", &q.to_string())]);
        }

        let mut current = Arc::clone(q);
        let mut iterations = 0usize;
        loop {
            if let Some(limit) = self.max_iterations {
                if iterations >= limit {
                    return Err(self.limit_exceeded(limit, &current));
                }
            }

            let next = self.rewrite_iteration(&current);
            iterations += 1;

            if event_enabled(Event::RewriteIteration) {
                log_event_with_fields(
                    Event::RewriteIteration,
                    &[
                        ("iteration", &iterations.to_string()),
                        ("query", &next.to_string()),
                    ],
                );
            }

            if Arc::ptr_eq(&next, &current) {
                break;
            }
            current = next;
        }

        if let Some(metrics) = &self.metrics {
            metrics.add_rewrite_iterations(iterations as u64);
        }
        if event_enabled(Event::RewriteComplete) {
            log_event_with_fields(
                Event::RewriteComplete,
                &[
                    ("iterations", &iterations.to_string()),
                    ("query", &current.to_string()),
                ],
            );
        }
        Ok(current)
    }

    /// One bottom-up pass over `q`
    pub fn rewrite_iteration(&self, q: &QueryExpr) -> QueryExpr {
        let structural = match q.as_ref() {
            Expr::Not(nested) => {
                let rewritten = self.rewrite_iteration(nested);
                if Arc::ptr_eq(&rewritten, nested) {
                    Arc::clone(q)
                } else {
                    Expr::not(rewritten)
                }
            }
            Expr::Logical(le) => match self.rewrite_children(&le.children) {
                Some(children) => Expr::logical(le.op, children),
                None => Arc::clone(q),
            },
            Expr::ArrayMatch(m) => {
                let rewritten = self.rewrite_iteration(&m.elem_match);
                if Arc::ptr_eq(&rewritten, &m.elem_match) {
                    Arc::clone(q)
                } else {
                    Expr::elem_match(m.array.clone(), rewritten)
                }
            }
            _ => Arc::clone(q),
        };
        self.apply_rules(structural)
    }

    /// Copy-on-write: `None` if every child came back unchanged
    fn rewrite_children(&self, children: &[QueryExpr]) -> Option<Vec<QueryExpr>> {
        let mut rewritten: Option<Vec<QueryExpr>> = None;
        for (i, child) in children.iter().enumerate() {
            let out = self.rewrite_iteration(child);
            match rewritten {
                Some(ref mut list) => list.push(out),
                None if !Arc::ptr_eq(&out, child) => {
                    let mut list = Vec::with_capacity(children.len());
                    list.extend(children[..i].iter().map(Arc::clone));
                    list.push(out);
                    rewritten = Some(list);
                }
                None => {}
            }
        }
        rewritten
    }

    fn apply_rules(&self, q: QueryExpr) -> QueryExpr {
        self.rules.iter().fold(q, |current, rule| {
            let next = rule.rewrite(&current);
            if !Arc::ptr_eq(&next, &current) {
                self.rule_fired(rule.name(), &current, &next);
            }
            next
        })
    }

    fn rule_fired(&self, rule: &str, before: &Expr, after: &Expr) {
        if let Some(metrics) = &self.metrics {
            metrics.increment_rule_firings();
        }
        if event_enabled(Event::RewriteRuleFired) {
            log_event_with_fields(
                Event::RewriteRuleFired,
                &[
                    ("rule", rule),
                    ("before", &before.to_string()),
                    ("after", &after.to_string()),
                ],
            );
        }
    }

    fn limit_exceeded(&self, limit: usize, current: &Expr) -> RewriteError {
        if let Some(metrics) = &self.metrics {
            metrics.add_rewrite_iterations(limit as u64);
            metrics.increment_rewrite_limit_exceeded();
        }
        log_event_with_fields(
            Event::RewriteLimitExceeded,
            &[
                ("limit", &limit.to_string()),
                ("query", &current.to_string()),
            ],
        );
        RewriteError::IterationLimitExceeded { limit }
    }
}
