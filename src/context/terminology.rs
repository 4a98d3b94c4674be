//! Terminology lookups for bindings
//!
//! A binding asks whether a code belongs to a value set. The answer comes
//! from an external terminology service; errors from that service make
//! the binding Undecided rather than failing the data.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminologyError {
    /// The service does not know the value set
    #[error("unknown value set: {0}")]
    UnknownValueSet(String),

    /// The service could not be reached or answered badly
    #[error("terminology service unavailable: {0}")]
    Unavailable(String),
}

/// Code membership checks against value sets.
pub trait TerminologyService: Sync {
    /// Whether `code` is a member of `value_set`
    fn validate_code(&self, value_set: &str, code: &str) -> Result<bool, TerminologyError>;
}

/// Terminology service backed by in-memory value sets.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTerminology {
    value_sets: HashMap<String, HashSet<String>>,
}

impl InMemoryTerminology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a value set
    pub fn with_value_set<I, S>(mut self, value_set: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_sets
            .insert(value_set.into(), codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn value_set_count(&self) -> usize {
        self.value_sets.len()
    }
}

impl TerminologyService for InMemoryTerminology {
    fn validate_code(&self, value_set: &str, code: &str) -> Result<bool, TerminologyError> {
        self.value_sets
            .get(value_set)
            .map(|codes| codes.contains(code))
            .ok_or_else(|| TerminologyError::UnknownValueSet(value_set.to_string()))
    }
}
