//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by rewriters and scorers
///
/// All counters use Relaxed ordering; values are exact once the
/// incrementing threads are joined.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// `rewrite` calls
    rewrites: AtomicU64,
    /// Whole-tree passes across all rewrites
    rewrite_iterations: AtomicU64,
    /// Rule applications that produced a new node
    rule_firings: AtomicU64,
    /// Rewrites stopped by the iteration cap
    rewrite_limit_exceeded: AtomicU64,
    /// Scorer resets
    scorer_resets: AtomicU64,
    /// Plans scored
    plans_scored: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Rewriter metrics

    pub fn increment_rewrites(&self) {
        self.rewrites.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rewrite_iterations(&self, n: u64) {
        self.rewrite_iterations.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_rule_firings(&self) {
        self.rule_firings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rewrite_limit_exceeded(&self) {
        self.rewrite_limit_exceeded.fetch_add(1, Ordering::Relaxed);
    }

    // Scorer metrics

    pub fn increment_scorer_resets(&self) {
        self.scorer_resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_plans_scored(&self) {
        self.plans_scored.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current values as a JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rewrites: self.rewrites.load(Ordering::Relaxed),
            rewrite_iterations: self.rewrite_iterations.load(Ordering::Relaxed),
            rule_firings: self.rule_firings.load(Ordering::Relaxed),
            rewrite_limit_exceeded: self.rewrite_limit_exceeded.load(Ordering::Relaxed),
            scorer_resets: self.scorer_resets.load(Ordering::Relaxed),
            plans_scored: self.plans_scored.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub rewrites: u64,
    pub rewrite_iterations: u64,
    pub rule_firings: u64,
    pub rewrite_limit_exceeded: u64,
    pub scorer_resets: u64,
    pub plans_scored: u64,
}
