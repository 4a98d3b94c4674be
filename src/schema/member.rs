//! Member assertions: constraints on a single node
//!
//! - `Fixed`: the node's value equals a fixed value
//! - `Binding`: the node's code belongs to a value set
//! - `Children`: the node's named children satisfy nested schemas

use serde_json::Value;
use std::collections::HashSet;

use crate::context::ValidationContext;
use crate::element::ElementNode;
use crate::observability::{log_event_with_fields, Event};
use crate::outcome::{Outcome, OutcomeSet};

use super::assertion::{GroupAssertion, MemberAssertion};
use super::composite::Schema;
use super::errors::{SchemaError, SchemaResult};

/// The node's primitive value must equal `value` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixed {
    value: Value,
}

impl Fixed {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl MemberAssertion for Fixed {
    fn validate_member<N: ElementNode>(&self, node: &N, _ctx: &ValidationContext<'_>) -> Outcome {
        Outcome::check(node.value() == Some(&self.value))
    }
}

/// The node's value must be a code in the named value set.
///
/// Membership is answered by the context's terminology service. Without
/// one, or when the service errors, the outcome is Undecided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    value_set: String,
}

impl Binding {
    pub fn new(value_set: impl Into<String>) -> SchemaResult<Self> {
        let value_set = value_set.into();
        if value_set.is_empty() {
            return Err(SchemaError::EmptyName("value set"));
        }
        Ok(Self { value_set })
    }

    pub fn value_set(&self) -> &str {
        &self.value_set
    }
}

impl MemberAssertion for Binding {
    fn validate_member<N: ElementNode>(&self, node: &N, ctx: &ValidationContext<'_>) -> Outcome {
        let Some(code) = node.value().and_then(Value::as_str) else {
            return Outcome::fail();
        };

        let Some(terminology) = ctx.terminology() else {
            log_event_with_fields(
                Event::TerminologyMissing,
                &[("value_set", self.value_set.as_str())],
            );
            return Outcome::undecided();
        };

        match terminology.validate_code(&self.value_set, code) {
            Ok(member) => Outcome::check(member),
            Err(e) => {
                let reason = e.to_string();
                log_event_with_fields(
                    Event::TerminologyFailed,
                    &[("reason", reason.as_str()), ("value_set", self.value_set.as_str())],
                );
                Outcome::undecided()
            }
        }
    }
}

/// Constraint on the children of one node that share a name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildConstraint {
    name: String,
    schema: Schema,
}

impl ChildConstraint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Per-name constraints on a node's children.
///
/// Each declared name selects the node's children with that name (possibly
/// none) and validates them as a group. When closed, any child with an
/// undeclared name fails the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Children {
    entries: Vec<ChildConstraint>,
    closed: bool,
}

impl Children {
    /// Open children block; undeclared children are allowed
    pub fn new<I, S>(entries: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut declared = Vec::new();

        for (name, schema) in entries {
            let name = name.into();
            if name.is_empty() {
                return Err(SchemaError::EmptyName("child"));
            }
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateChild(name));
            }
            declared.push(ChildConstraint { name, schema });
        }

        Ok(Self {
            entries: declared,
            closed: false,
        })
    }

    /// Reject children whose names are not declared
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn entries(&self) -> &[ChildConstraint] {
        &self.entries
    }

    fn declares(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Product of the child schemas' collections.
    ///
    /// A member check never runs on an empty sequence, so the untagged
    /// success is always possible as well.
    pub fn possible_tags(&self) -> OutcomeSet {
        let product = self
            .entries
            .iter()
            .fold(OutcomeSet::identity(), |sum, entry| {
                sum.product(&entry.schema.possible_tags())
            });

        if product.iter().any(|outcome| *outcome == Outcome::success()) {
            product
        } else {
            product.union(OutcomeSet::identity())
        }
    }
}

impl MemberAssertion for Children {
    fn validate_member<N: ElementNode>(&self, node: &N, ctx: &ValidationContext<'_>) -> Outcome {
        let children = node.children();

        let undeclared = self.closed && children.iter().any(|child| !self.declares(child.name()));

        let declared: Outcome = self
            .entries
            .iter()
            .map(|entry| {
                let selected: Vec<N> = children
                    .iter()
                    .filter(|child| child.name() == entry.name)
                    .cloned()
                    .collect();
                entry.schema.validate_group(&selected, ctx)
            })
            .sum();

        declared + Outcome::check(!undeclared)
    }
}
