//! Schema catalog for reference resolution
//!
//! - Only named schemas are registered
//! - Registered schemas are immutable: a name cannot be registered twice
//! - Schemas are shared (`Arc`), never copied, between referencing parents

use std::collections::HashMap;
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};

use super::composite::Schema;
use super::errors::{SchemaError, SchemaResult};

/// Name-based schema lookup used by references.
pub trait SchemaCatalog: Sync {
    /// The schema registered under `name`, if any
    fn resolve(&self, name: &str) -> Option<Arc<Schema>>;
}

/// In-memory registry of named schemas.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    schemas: HashMap<String, Arc<Schema>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named schema, returning the shared handle
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        self.register_shared(Arc::new(schema))
    }

    /// Registers an already shared schema
    pub fn register_shared(&mut self, schema: Arc<Schema>) -> SchemaResult<Arc<Schema>> {
        let name = schema.name().ok_or(SchemaError::AnonymousSchema)?.to_string();

        // Check for immutability violation
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::SchemaImmutable(name));
        }

        let count = schema.assertions().len().to_string();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[("assertions", count.as_str()), ("schema", name.as_str())],
        );

        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaCatalog for InMemoryCatalog {
    fn resolve(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Assertion;

    fn quantity() -> Schema {
        Schema::named("Quantity", [Assertion::max_items(1)])
    }

    #[test]
    fn test_register_and_resolve() {
        let mut catalog = InMemoryCatalog::new();
        catalog.register(quantity()).unwrap();

        let schema = catalog.resolve("Quantity").unwrap();
        assert_eq!(schema.name(), Some("Quantity"));
        assert!(catalog.contains("Quantity"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_schema_immutability() {
        let mut catalog = InMemoryCatalog::new();
        catalog.register(quantity()).unwrap();

        let err = catalog.register(quantity()).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_anonymous_schema_rejected() {
        let mut catalog = InMemoryCatalog::new();
        let err = catalog.register(Schema::default()).unwrap_err();
        assert_eq!(err, SchemaError::AnonymousSchema);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_resolved_handles_are_shared() {
        let mut catalog = InMemoryCatalog::new();
        let registered = catalog.register(quantity()).unwrap();

        let a = catalog.resolve("Quantity").unwrap();
        let b = catalog.resolve("Quantity").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &registered));
    }

    #[test]
    fn test_unknown_schema() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.resolve("Patient").is_none());
        assert!(catalog.get("Patient").is_none());
    }

    #[test]
    fn test_names_sorted() {
        let mut catalog = InMemoryCatalog::new();
        catalog.register(Schema::named("b", [Assertion::Succeed])).unwrap();
        catalog.register(Schema::named("a", [Assertion::Succeed])).unwrap();
        assert_eq!(catalog.names(), vec!["a", "b"]);
    }
}
