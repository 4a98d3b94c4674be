//! Validation context
//!
//! The context carries the cross-cutting collaborators a validation run
//! needs and is passed unchanged to every member and group evaluation:
//!
//! - configuration
//! - schema catalog (reference resolution)
//! - terminology service (bindings)
//! - metrics registry
//! - cancellation token
//!
//! Everything is borrowed; a context is `Copy` and `Sync`, so one context
//! can be shared across evaluation threads.

mod config;
mod terminology;

pub use config::ValidationConfig;
pub use terminology::{InMemoryTerminology, TerminologyError, TerminologyService};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::observability::MetricsRegistry;
use crate::schema::{Schema, SchemaCatalog};

/// Shared flag that stops an in-flight validation.
///
/// Work not yet started when the flag is raised reports Undecided.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Local definitions of the schemas enclosing the current evaluation,
/// innermost first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DefinitionScope<'a> {
    schema: &'a Schema,
    parent: Option<&'a DefinitionScope<'a>>,
}

impl<'a> DefinitionScope<'a> {
    pub(crate) fn new(schema: &'a Schema, parent: Option<&'a DefinitionScope<'a>>) -> Self {
        Self { schema, parent }
    }
}

/// Environment handed to every assertion evaluation.
#[derive(Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    config: ValidationConfig,
    catalog: Option<&'a dyn SchemaCatalog>,
    terminology: Option<&'a dyn TerminologyService>,
    metrics: Option<&'a MetricsRegistry>,
    cancellation: Option<&'a CancellationToken>,
    scope: Option<&'a DefinitionScope<'a>>,
    reference_depth: usize,
}

impl<'a> ValidationContext<'a> {
    /// A context with default configuration and no collaborators
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: &'a dyn SchemaCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_terminology(mut self, terminology: &'a dyn TerminologyService) -> Self {
        self.terminology = Some(terminology);
        self
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&'a dyn SchemaCatalog> {
        self.catalog
    }

    pub fn terminology(&self) -> Option<&'a dyn TerminologyService> {
        self.terminology
    }

    pub fn metrics(&self) -> Option<&'a MetricsRegistry> {
        self.metrics
    }

    /// Number of schema references followed to reach this point
    pub fn reference_depth(&self) -> usize {
        self.reference_depth
    }

    /// Context for evaluating a schema reached through one more reference
    pub fn follow_reference(&self) -> Self {
        Self {
            reference_depth: self.reference_depth + 1,
            ..*self
        }
    }

    /// Like `follow_reference`, but the target sees no enclosing definitions
    pub fn follow_catalog_reference(&self) -> Self {
        Self {
            reference_depth: self.reference_depth + 1,
            scope: None,
            ..*self
        }
    }

    /// Look a name up in the definitions of the enclosing schemas,
    /// innermost first
    pub fn resolve_local(&self, name: &str) -> Option<Arc<Schema>> {
        let mut scope = self.scope;
        while let Some(current) = scope {
            if let Some(schema) = current.schema.definition(name) {
                return Some(Arc::clone(schema));
            }
            scope = current.parent;
        }
        None
    }

    pub(crate) fn scope(&self) -> Option<&'a DefinitionScope<'a>> {
        self.scope
    }

    /// This context with `scope` as the innermost definitions
    pub(crate) fn within<'b>(&self, scope: &'b DefinitionScope<'b>) -> ValidationContext<'b>
    where
        'a: 'b,
    {
        ValidationContext {
            config: self.config,
            catalog: self.catalog,
            terminology: self.terminology,
            metrics: self.metrics,
            cancellation: self.cancellation,
            scope: Some(scope),
            reference_depth: self.reference_depth,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_some_and(CancellationToken::is_cancelled)
    }
}

impl std::fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("config", &self.config)
            .field("catalog", &self.catalog.is_some())
            .field("terminology", &self.terminology.is_some())
            .field("metrics", &self.metrics.is_some())
            .field("cancelled", &self.is_cancelled())
            .field("local_definitions", &self.scope.is_some())
            .field("reference_depth", &self.reference_depth)
            .finish()
    }
}
