//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed events with fixed severities
//! - Atomic counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on rewriting or scoring results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use fedquery::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::PlanScored, &[("score", "12")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_plans_scored();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event at its own severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

/// True if `event` would be written at the current minimum severity
pub fn event_enabled(event: Event) -> bool {
    Logger::enabled(event.severity())
}
