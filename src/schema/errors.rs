//! Schema error types
//!
//! Errors describe malformed schemas and misuse of the API. Data that does
//! not conform to a schema is never an error; it is a Fail outcome.
//!
//! Error codes:
//! - SCHEMA_INVALID_CARDINALITY
//! - SCHEMA_EMPTY_NAME
//! - SCHEMA_DUPLICATE_CHILD
//! - SCHEMA_DUPLICATE_SLICE
//! - SCHEMA_DUPLICATE_DEFINITION
//! - SCHEMA_ANONYMOUS
//! - SCHEMA_IMMUTABLE
//! - SCHEMA_UNKNOWN
//! - SCHEMA_INVALID_CONFIG

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    // ==================
    // Construction Errors
    // ==================
    /// Cardinality lower bound above the upper bound
    #[error("invalid cardinality: min {min} exceeds max {max}")]
    InvalidCardinality { min: usize, max: usize },

    /// A name that must identify something was empty
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Two `children` entries share a name
    #[error("child '{0}' declared more than once")]
    DuplicateChild(String),

    /// Two slice groups share a name
    #[error("slice group '{0}' declared more than once")]
    DuplicateSliceGroup(String),

    /// Two local definitions of one schema share a name
    #[error("definition '{0}' declared more than once")]
    DuplicateDefinition(String),

    // ==================
    // Catalog Errors
    // ==================
    /// Only named schemas can be registered
    #[error("cannot register an anonymous schema")]
    AnonymousSchema,

    /// A schema with this name is already registered
    #[error("schema '{0}' is already registered and is immutable")]
    SchemaImmutable(String),

    /// No schema with this name could be found
    #[error("schema '{0}' not found")]
    UnknownSchema(String),

    // ==================
    // Configuration Errors
    // ==================
    #[error("invalid validation config: {0}")]
    InvalidConfig(String),
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidCardinality { .. } => "SCHEMA_INVALID_CARDINALITY",
            SchemaError::EmptyName(_) => "SCHEMA_EMPTY_NAME",
            SchemaError::DuplicateChild(_) => "SCHEMA_DUPLICATE_CHILD",
            SchemaError::DuplicateSliceGroup(_) => "SCHEMA_DUPLICATE_SLICE",
            SchemaError::DuplicateDefinition(_) => "SCHEMA_DUPLICATE_DEFINITION",
            SchemaError::AnonymousSchema => "SCHEMA_ANONYMOUS",
            SchemaError::SchemaImmutable(_) => "SCHEMA_IMMUTABLE",
            SchemaError::UnknownSchema(_) => "SCHEMA_UNKNOWN",
            SchemaError::InvalidConfig(_) => "SCHEMA_INVALID_CONFIG",
        }
    }

    /// Whether the error was raised while building a schema tree
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidCardinality { .. }
                | SchemaError::EmptyName(_)
                | SchemaError::DuplicateChild(_)
                | SchemaError::DuplicateSliceGroup(_)
                | SchemaError::DuplicateDefinition(_)
        )
    }
}
