//! Observability for schema validation
//!
//! - Structured logging (JSON lines)
//! - Counters for validation outcomes and reference resolution
//! - Begin/complete scopes around top-level validation runs
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes an outcome
//! 2. A failing log sink never fails validation
//! 3. Every degradation to Undecided is logged with its reason

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
