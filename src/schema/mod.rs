//! Schema subsystem
//!
//! Schemas are immutable trees of assertions evaluated against sequences of
//! element nodes. Every evaluation produces a tri-state outcome.
//!
//! # Design Principles
//!
//! - Validation is pure: data is never mutated
//! - Environment problems (missing catalog, terminology outage, depth
//!   limit, cancellation) degrade to Undecided, never to errors
//! - Errors are reserved for invalid schema construction and lookups
//! - Static analysis (`possible_tags`) never touches data

mod assertion;
mod catalog;
mod composite;
mod errors;
mod group;
mod member;
mod slice;
mod validator;

pub use assertion::{Assertion, GroupAssertion, GroupRef, MemberAssertion, MemberRef};
pub use catalog::{InMemoryCatalog, SchemaCatalog};
pub use composite::Schema;
pub use errors::{SchemaError, SchemaResult};
pub use group::{Cardinality, Group, Reference};
pub use member::{Binding, ChildConstraint, Children, Fixed};
pub use slice::{Slice, SliceGroup, DEFAULT_BUCKET};
pub use validator::SchemaValidator;

use crate::context::ValidationContext;
use crate::element::ElementNode;
use crate::outcome::{Outcome, OutcomeSet};

/// Validate a sequence of nodes against a schema in the given context
pub fn validate<N: ElementNode>(
    schema: &Schema,
    nodes: &[N],
    ctx: &ValidationContext<'_>,
) -> Outcome {
    schema.validate_group(nodes, ctx)
}

/// Every outcome a schema could produce, without evaluating any data
pub fn collect_possible_tags(schema: &Schema) -> OutcomeSet {
    schema.possible_tags()
}
