//! Group assertions: constraints on a whole sibling sequence
//!
//! - `Cardinality`: occurrence bounds
//! - `Reference`: a schema resolved by name, from enclosing definitions or the catalog
//! - `Group`: constraints on the nodes that satisfy a membership condition

use crate::context::ValidationContext;
use crate::element::ElementNode;
use crate::observability::{log_event_with_fields, Event};
use crate::outcome::{Outcome, OutcomeSet, Status};

use super::assertion::{membership, GroupAssertion};
use super::composite::Schema;
use super::errors::{SchemaError, SchemaResult};

/// Occurrence bounds on the number of nodes (`minItems` / `maxItems`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    min: usize,
    max: Option<usize>,
}

impl Cardinality {
    /// Bounds `min..=max`; an absent max means unbounded
    pub fn new(min: usize, max: Option<usize>) -> SchemaResult<Self> {
        if let Some(max) = max {
            if min > max {
                return Err(SchemaError::InvalidCardinality { min, max });
            }
        }
        Ok(Self { min, max })
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn at_most(max: usize) -> Self {
        Self { min: 0, max: Some(max) }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl GroupAssertion for Cardinality {
    fn validate_group<N: ElementNode>(
        &self,
        nodes: &[N],
        _ctx: &ValidationContext<'_>,
    ) -> Outcome {
        Outcome::check(self.admits(nodes.len()))
    }
}

/// A schema resolved by name.
///
/// Definitions of the enclosing schemas are searched first, innermost
/// outward, then the context's catalog. A catalog schema does not see the
/// caller's definitions. The resolved schema validates the same sequence.
/// Anything that keeps the reference from resolving makes the outcome
/// Undecided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    name: String,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyName("reference"));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn resolved(&self, ctx: &ValidationContext<'_>) {
        if let Some(metrics) = ctx.metrics() {
            metrics.increment_references_resolved();
        }
    }

    fn unresolved(&self, event: Event, ctx: &ValidationContext<'_>) -> Outcome {
        let depth = ctx.reference_depth().to_string();
        log_event_with_fields(
            event,
            &[("depth", depth.as_str()), ("reference", self.name.as_str())],
        );
        if let Some(metrics) = ctx.metrics() {
            metrics.increment_references_unresolved();
        }
        Outcome::undecided()
    }
}

impl GroupAssertion for Reference {
    fn validate_group<N: ElementNode>(
        &self,
        nodes: &[N],
        ctx: &ValidationContext<'_>,
    ) -> Outcome {
        if ctx.reference_depth() >= ctx.config().max_reference_depth {
            return self.unresolved(Event::ReferenceDepthExceeded, ctx);
        }

        if let Some(schema) = ctx.resolve_local(&self.name) {
            self.resolved(ctx);
            return schema.validate_group(nodes, &ctx.follow_reference());
        }

        let Some(catalog) = ctx.catalog() else {
            return self.unresolved(Event::CatalogMissing, ctx);
        };

        match catalog.resolve(&self.name) {
            Some(schema) => {
                self.resolved(ctx);
                schema.validate_group(nodes, &ctx.follow_catalog_reference())
            }
            None => self.unresolved(Event::ReferenceUnresolved, ctx),
        }
    }
}

/// `group { condition } : { constraints }`.
///
/// Each node is tested against the condition on its own. Nodes that pass
/// form the group, which the constraints validate (even when empty). Nodes
/// whose membership is Undecided make the whole result Undecided at best.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    condition: Schema,
    constraints: Schema,
}

impl Group {
    pub fn new(condition: Schema, constraints: Schema) -> Self {
        Self {
            condition,
            constraints,
        }
    }

    pub fn condition(&self) -> &Schema {
        &self.condition
    }

    pub fn constraints(&self) -> &Schema {
        &self.constraints
    }

    pub fn possible_tags(&self) -> OutcomeSet {
        self.constraints.possible_tags()
    }
}

impl GroupAssertion for Group {
    fn validate_group<N: ElementNode>(
        &self,
        nodes: &[N],
        ctx: &ValidationContext<'_>,
    ) -> Outcome {
        let mut members = Vec::new();
        let mut routing = Outcome::success();

        for node in nodes {
            match membership(&self.condition, node, ctx) {
                Status::Succeed => members.push(node.clone()),
                Status::Undecided => routing = routing + Outcome::undecided(),
                Status::Fail => {}
            }
        }

        routing + self.constraints.validate_group(&members, ctx)
    }
}
