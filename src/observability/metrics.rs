//! Validation counters
//!
//! - Counters only, monotonic
//! - Relaxed atomics; safe to share across evaluation threads

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::outcome::Status;

/// Registry of validation counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    validations: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    undecided: AtomicU64,
    references_resolved: AtomicU64,
    references_unresolved: AtomicU64,
    cancellations: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished top-level validation by its status
    pub fn record_outcome(&self, status: Status) {
        self.validations.fetch_add(1, Ordering::Relaxed);
        let counter = match status {
            Status::Succeed => &self.succeeded,
            Status::Fail => &self.failed,
            Status::Undecided => &self.undecided,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_references_resolved(&self) {
        self.references_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_references_unresolved(&self) {
        self.references_unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cancellations(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            validations: self.validations.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            undecided: self.undecided.load(Ordering::Relaxed),
            references_resolved: self.references_resolved.load(Ordering::Relaxed),
            references_unresolved: self.references_unresolved.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
        }
    }
}

/// Immutable copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub validations: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub undecided: u64,
    pub references_resolved: u64,
    pub references_unresolved: u64,
    pub cancellations: u64,
}

impl MetricsSnapshot {
    /// Serialize as a single JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
