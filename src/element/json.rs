//! `ElementNode` over `serde_json::Value`
//!
//! Mapping:
//! - an object is a complex node; each member becomes a child
//! - an array member expands into repeated siblings sharing the member name
//! - strings, numbers and booleans are primitive values
//! - null members are skipped

use serde_json::Value;

use super::ElementNode;

/// A named view into a JSON document.
#[derive(Debug, Clone)]
pub struct JsonElement<'a> {
    name: String,
    value: &'a Value,
}

impl<'a> JsonElement<'a> {
    /// Wrap a single value under the given name
    pub fn new(name: impl Into<String>, value: &'a Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Expand a value into sibling nodes.
    ///
    /// Arrays become one node per item; null becomes no nodes; anything
    /// else is a single node.
    pub fn sequence(name: &str, value: &'a Value) -> Vec<Self> {
        match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| Self::new(name, item))
                .collect(),
            other => vec![Self::new(name, other)],
        }
    }

    /// The underlying JSON value
    pub fn raw(&self) -> &'a Value {
        self.value
    }
}

impl ElementNode for JsonElement<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<&Value> {
        match self.value {
            Value::Object(_) | Value::Array(_) | Value::Null => None,
            primitive => Some(primitive),
        }
    }

    fn children(&self) -> Vec<Self> {
        match self.value {
            Value::Object(members) => members
                .iter()
                .flat_map(|(key, member)| JsonElement::sequence(key, member))
                .collect(),
            _ => Vec::new(),
        }
    }
}
