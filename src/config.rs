//! Planner configuration
//!
//! A JSON document with three optional sections:
//!
//! ```json
//! {
//!   "rewriter": { "max_iterations": 1000 },
//!   "cost_model": { "indexed_cost": 2, "unindexed_cost": 20, "no_query_cost": 1,
//!                   "query_size": 10, "no_query_size": 100, "post_root_factor": 2 },
//!   "log_level": "INFO"
//! }
//! ```
//!
//! Missing keys take their defaults. `load` validates before returning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "FED_CONFIG_READ",
            ConfigError::Parse(_) => "FED_CONFIG_PARSE",
            ConfigError::Invalid(_) => "FED_CONFIG_INVALID",
        }
    }
}

fn default_max_iterations() -> Option<usize> {
    Some(1000)
}

/// Rewriter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriterConfig {
    /// Safety cap on whole-tree passes; `null` disables it
    #[serde(default = "default_max_iterations")]
    pub max_iterations: Option<usize>,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

impl RewriterConfig {
    /// No iteration cap
    pub fn unbounded() -> Self {
        Self { max_iterations: None }
    }
}

fn default_indexed_cost() -> u64 {
    2
}
fn default_unindexed_cost() -> u64 {
    20
}
fn default_no_query_cost() -> u64 {
    1
}
fn default_query_size() -> u64 {
    10
}
fn default_no_query_size() -> u64 {
    100
}
fn default_post_root_factor() -> u64 {
    2
}

/// Per-invocation estimates used by the indexed-field scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModel {
    /// Cost of a node with queries and a useful index
    #[serde(default = "default_indexed_cost")]
    pub indexed_cost: u64,
    /// Cost of a node with queries and no useful index
    #[serde(default = "default_unindexed_cost")]
    pub unindexed_cost: u64,
    /// Cost of a node with no queries
    #[serde(default = "default_no_query_cost")]
    pub no_query_cost: u64,
    /// Result size of a node with queries
    #[serde(default = "default_query_size")]
    pub query_size: u64,
    /// Result size of a node with no queries
    #[serde(default = "default_no_query_size")]
    pub no_query_size: u64,
    /// Multiplier on the root result size for each queried descendant
    #[serde(default = "default_post_root_factor")]
    pub post_root_factor: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            indexed_cost: default_indexed_cost(),
            unindexed_cost: default_unindexed_cost(),
            no_query_cost: default_no_query_cost(),
            query_size: default_query_size(),
            no_query_size: default_no_query_size(),
            post_root_factor: default_post_root_factor(),
        }
    }
}

impl CostModel {
    /// Every estimate must be positive
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("indexed_cost", self.indexed_cost),
            ("unindexed_cost", self.unindexed_cost),
            ("no_query_cost", self.no_query_cost),
            ("query_size", self.query_size),
            ("no_query_size", self.no_query_size),
            ("post_root_factor", self.post_root_factor),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("cost_model.{} must be > 0", name)));
            }
        }
        Ok(())
    }
}

fn default_log_level() -> Severity {
    Severity::Info
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub rewriter: RewriterConfig,

    #[serde(default)]
    pub cost_model: CostModel,

    /// Minimum log severity
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rewriter: RewriterConfig::default(),
            cost_model: CostModel::default(),
            log_level: default_log_level(),
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a JSON document
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: PlannerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json_str(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("path", &path.display().to_string()),
                ("log_level", config.log_level.as_str()),
            ],
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rewriter.max_iterations == Some(0) {
            return Err(ConfigError::Invalid(
                "rewriter.max_iterations must be > 0 or null".to_string(),
            ));
        }
        self.cost_model.validate()
    }

    /// Sets the process-wide minimum log severity
    pub fn apply_logging(&self) {
        Logger::set_min_severity(self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.rewriter.max_iterations, Some(1000));
        assert_eq!(config.cost_model.indexed_cost, 2);
        assert_eq!(config.cost_model.unindexed_cost, 20);
        assert_eq!(config.cost_model.no_query_cost, 1);
        assert_eq!(config.cost_model.query_size, 10);
        assert_eq!(config.cost_model.no_query_size, 100);
        assert_eq!(config.cost_model.post_root_factor, 2);
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = PlannerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = PlannerConfig::from_json_str(
            r#"{"cost_model": {"unindexed_cost": 50}, "rewriter": {"max_iterations": null}}"#,
        )
        .unwrap();
        assert_eq!(config.cost_model.unindexed_cost, 50);
        assert_eq!(config.cost_model.indexed_cost, 2);
        assert_eq!(config.rewriter.max_iterations, None);
    }

    #[test]
    fn test_zero_cost_rejected() {
        let err = PlannerConfig::from_json_str(r#"{"cost_model": {"query_size": 0}}"#).unwrap_err();
        assert_eq!(err.code(), "FED_CONFIG_INVALID");
        assert!(err.to_string().contains("query_size"));
    }

    #[test]
    fn test_zero_iteration_cap_rejected() {
        let err = PlannerConfig::from_json_str(r#"{"rewriter": {"max_iterations": 0}}"#).unwrap_err();
        assert_eq!(err.code(), "FED_CONFIG_INVALID");
    }

    #[test]
    fn test_bad_json() {
        let err = PlannerConfig::from_json_str("{").unwrap_err();
        assert_eq!(err.code(), "FED_CONFIG_PARSE");
        let err = PlannerConfig::from_json_str(r#"{"log_level": "LOUD"}"#).unwrap_err();
        assert_eq!(err.code(), "FED_CONFIG_PARSE");
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = PlannerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"log_level\":\"INFO\""));
        assert_eq!(PlannerConfig::from_json_str(&json).unwrap(), config);
    }
}
