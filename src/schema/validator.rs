//! Schema validator: the top-level entry point
//!
//! Wraps one validation run with:
//! - a fresh context built from the validator's collaborators
//! - begin/complete logging tagged with a run id
//! - outcome and cancellation counters
//!
//! Validation never mutates data and is deterministic for a given schema,
//! input and collaborator state.

use uuid::Uuid;

use crate::context::{CancellationToken, TerminologyService, ValidationConfig, ValidationContext};
use crate::element::ElementNode;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::outcome::{Outcome, OutcomeSet};

use super::assertion::GroupAssertion;
use super::catalog::SchemaCatalog;
use super::composite::Schema;
use super::errors::{SchemaError, SchemaResult};

/// Runs schemas against data with a fixed set of collaborators.
///
/// The validator borrows its catalog, terminology service and metrics; it
/// can be shared across threads and reused for any number of runs.
#[derive(Default)]
pub struct SchemaValidator<'a> {
    config: ValidationConfig,
    catalog: Option<&'a dyn SchemaCatalog>,
    terminology: Option<&'a dyn TerminologyService>,
    metrics: Option<&'a MetricsRegistry>,
    cancellation: Option<CancellationToken>,
}

impl<'a> SchemaValidator<'a> {
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

    /// Stop in-flight and future runs when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    fn context(&self) -> ValidationContext<'_> {
        let mut ctx = ValidationContext::new().with_config(self.config);
        if let Some(catalog) = self.catalog {
            ctx = ctx.with_catalog(catalog);
        }
        if let Some(terminology) = self.terminology {
            ctx = ctx.with_terminology(terminology);
        }
        if let Some(metrics) = self.metrics {
            ctx = ctx.with_metrics(metrics);
        }
        if let Some(token) = &self.cancellation {
            ctx = ctx.with_cancellation(token);
        }
        ctx
    }

    /// Validates a sequence of nodes against a schema.
    ///
    /// Always returns an outcome; environment problems degrade to Undecided.
    pub fn validate<N: ElementNode>(&self, schema: &Schema, nodes: &[N]) -> Outcome {
        let run_id = Uuid::new_v4().to_string();
        let count = nodes.len().to_string();
        let scope = self.config.trace_validation.then(|| {
            ObservationScope::with_fields(
                "VALIDATION",
                &[
                    ("nodes", count.as_str()),
                    ("run_id", run_id.as_str()),
                    ("schema", schema.name().unwrap_or("<anonymous>")),
                ],
            )
        });

        let ctx = self.context();
        let outcome = schema.validate_group(nodes, &ctx);

        if ctx.is_cancelled() {
            log_event_with_fields(Event::ValidationCancelled, &[("run_id", run_id.as_str())]);
            if let Some(metrics) = self.metrics {
                metrics.increment_cancellations();
            }
        }
        if let Some(metrics) = self.metrics {
            metrics.record_outcome(outcome.status());
        }
        if let Some(scope) = scope {
            let tags = outcome.tags().to_string();
            scope.complete_with_fields(&[
                ("status", outcome.status().as_str()),
                ("tags", tags.as_str()),
            ]);
        }

        outcome
    }

    /// Validates against a schema looked up by name in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownSchema` when no catalog is configured
    /// or the catalog has no schema with that name.
    pub fn validate_named<N: ElementNode>(&self, name: &str, nodes: &[N]) -> SchemaResult<Outcome> {
        let schema = self
            .catalog
            .and_then(|catalog| catalog.resolve(name))
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))?;

        Ok(self.validate(&schema, nodes))
    }

    /// Possible outcomes of a schema, with the configured duplicate policy
    pub fn possible_tags(&self, schema: &Schema) -> OutcomeSet {
        schema
            .possible_tags()
            .with_policy(self.config.duplicate_policy)
    }
}
