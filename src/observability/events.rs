//! Observable validation events
//!
//! Events are explicit and typed. Anything that degrades an evaluation to
//! Undecided has an event so the reason is never silent.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Evaluation stopped because the run was cancelled
    ValidationCancelled,

    // Catalog
    /// A named schema was added to a catalog
    SchemaRegistered,
    /// A reference named a schema the catalog does not hold
    ReferenceUnresolved,
    /// A reference chain exceeded the configured depth
    ReferenceDepthExceeded,
    /// A reference was evaluated without any catalog in the context
    CatalogMissing,

    // Terminology
    /// A binding was evaluated without a terminology service
    TerminologyMissing,
    /// The terminology service could not answer
    TerminologyFailed,

    // Slicing
    /// A node's slice membership could not be decided
    SliceAmbiguous,
    /// A node matched no slice and no default bucket exists
    SliceUnmatched,
}

impl Event {
    /// Returns the event name as it appears in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ValidationCancelled => "VALIDATION_CANCELLED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::ReferenceUnresolved => "REFERENCE_UNRESOLVED",
            Event::ReferenceDepthExceeded => "REFERENCE_DEPTH_EXCEEDED",
            Event::CatalogMissing => "CATALOG_MISSING",
            Event::TerminologyMissing => "TERMINOLOGY_MISSING",
            Event::TerminologyFailed => "TERMINOLOGY_FAILED",
            Event::SliceAmbiguous => "SLICE_AMBIGUOUS",
            Event::SliceUnmatched => "SLICE_UNMATCHED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaRegistered => Severity::Info,
            Event::SliceUnmatched => Severity::Trace,
            Event::ValidationCancelled
            | Event::ReferenceUnresolved
            | Event::ReferenceDepthExceeded
            | Event::CatalogMissing
            | Event::TerminologyMissing
            | Event::TerminologyFailed
            | Event::SliceAmbiguous => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::ReferenceUnresolved.as_str(), "REFERENCE_UNRESOLVED");
        assert_eq!(Event::SliceAmbiguous.to_string(), "SLICE_AMBIGUOUS");
    }

    #[test]
    fn test_undecided_causes_warn() {
        assert_eq!(Event::ReferenceUnresolved.severity(), Severity::Warn);
        assert_eq!(Event::TerminologyFailed.severity(), Severity::Warn);
        assert_eq!(Event::SchemaRegistered.severity(), Severity::Info);
    }
}
