//! Configuration Loading Tests
//!
//! Loading planner configuration from disk and wiring it into the
//! rewriter and scorer.

use std::fs;

use fedquery::config::{CostModel, PlannerConfig};
use fedquery::observability::{Logger, Severity};
use fedquery::query::Expr;
use fedquery::rewrite::{QueryRewriter, RewriteError};
use fedquery::scorer::IndexedFieldScorer;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("planner.json");
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_full_document() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "rewriter": { "max_iterations": 50 },
            "cost_model": {
                "indexed_cost": 3,
                "unindexed_cost": 30,
                "no_query_cost": 2,
                "query_size": 7,
                "no_query_size": 70,
                "post_root_factor": 4
            },
            "log_level": "WARN"
        }"#,
    );

    let config = PlannerConfig::load(&path).unwrap();

    assert_eq!(config.rewriter.max_iterations, Some(50));
    assert_eq!(
        config.cost_model,
        CostModel {
            indexed_cost: 3,
            unindexed_cost: 30,
            no_query_cost: 2,
            query_size: 7,
            no_query_size: 70,
            post_root_factor: 4,
        }
    );
    assert_eq!(config.log_level, Severity::Warn);
}

#[test]
fn test_load_empty_document_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "{}");

    let config = PlannerConfig::load(&path).unwrap();

    assert_eq!(config, PlannerConfig::default());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = PlannerConfig::load(&dir.path().join("absent.json")).unwrap_err();

    assert_eq!(err.code(), "FED_CONFIG_READ");
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"rewriter": "#);

    let err = PlannerConfig::load(&path).unwrap_err();

    assert_eq!(err.code(), "FED_CONFIG_PARSE");
}

#[test]
fn test_load_rejects_zero_factor() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"cost_model": {"post_root_factor": 0}}"#);

    let err = PlannerConfig::load(&path).unwrap_err();

    assert_eq!(err.code(), "FED_CONFIG_INVALID");
    assert!(err.to_string().contains("post_root_factor"));
}

// =============================================================================
// Wiring
// =============================================================================

#[test]
fn test_rewriter_from_config() {
    let config = PlannerConfig::from_json_str(r#"{"rewriter": {"max_iterations": 1}}"#).unwrap();
    let rewriter = QueryRewriter::from_config(&config.rewriter);
    assert_eq!(rewriter.max_iterations(), Some(1));

    let q = Expr::not(Expr::neq("f1", 1));
    let err = rewriter.rewrite(&q).unwrap_err();
    assert_eq!(err, RewriteError::IterationLimitExceeded { limit: 1 });

    let unbounded = PlannerConfig::from_json_str(r#"{"rewriter": {"max_iterations": null}}"#).unwrap();
    let rewriter = QueryRewriter::from_config(&unbounded.rewriter);
    assert_eq!(rewriter.rewrite(&q).unwrap(), Expr::eq("f1", 1));
}

#[test]
fn test_scorer_from_config() {
    let config = PlannerConfig::from_json_str(r#"{"cost_model": {"unindexed_cost": 99}}"#).unwrap();
    let scorer = IndexedFieldScorer::with_cost_model(config.cost_model);
    assert_eq!(scorer.cost_model().unindexed_cost, 99);
    assert_eq!(scorer.cost_model().indexed_cost, 2);
}

#[test]
fn test_apply_logging() {
    let config = PlannerConfig::from_json_str(r#"{"log_level": "trace"}"#);
    // Severity names are upper-case on the wire
    assert!(config.is_err());

    let config = PlannerConfig::from_json_str(r#"{"log_level": "ERROR"}"#).unwrap();
    config.apply_logging();
    assert_eq!(Logger::min_severity(), Severity::Error);
    assert!(!Logger::enabled(Severity::Warn));

    PlannerConfig::default().apply_logging();
    assert_eq!(Logger::min_severity(), Severity::Info);
}
