//! fhirschema - tri-state assertion and schema validation
//!
//! Schemas are built from composable assertions and evaluated against
//! sequences of data nodes. Each evaluation yields an outcome that is
//! Succeed (with tags), Fail or Undecided; outcomes aggregate with a
//! monoid where Fail dominates Undecided dominates Succeed.
//!
//! Modules:
//! - `outcome`: the outcome algebra and possible-outcome collections
//! - `element`: the data-node abstraction and a JSON-backed node
//! - `schema`: assertions, composite schemas, catalogs and the validator
//! - `context`: per-run configuration and collaborators
//! - `observability`: structured logging, events and metrics

pub mod context;
pub mod element;
pub mod observability;
pub mod outcome;
pub mod schema;

pub use context::{CancellationToken, ValidationConfig, ValidationContext};
pub use element::{ElementNode, JsonElement};
pub use outcome::{Outcome, OutcomeSet, Status, Tag, Tags};
pub use schema::{
    collect_possible_tags, validate, Assertion, InMemoryCatalog, Schema, SchemaError,
    SchemaValidator,
};
