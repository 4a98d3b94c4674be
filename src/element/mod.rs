//! Data-node access
//!
//! Assertions never see a concrete document format. They inspect data
//! through `ElementNode`, a read-only view of one node in a tree:
//!
//! - its name (children are selected by name)
//! - its primitive value, if any
//! - its children, as a sequence of nodes of the same kind
//!
//! `JsonElement` adapts a `serde_json::Value` tree.

mod json;

pub use json::JsonElement;

use serde_json::Value;

/// Read-only view of one node in a data tree.
///
/// Nodes are handles: cloning one must be cheap, and `children` returns
/// fresh handles rather than references into internal storage. Grouping
/// assertions clone handles into buckets. `Sync` lets evaluation fan out
/// across threads.
pub trait ElementNode: Clone + Sync {
    /// The node's name within its parent
    fn name(&self) -> &str;

    /// The node's primitive value (absent for complex nodes)
    fn value(&self) -> Option<&Value>;

    /// The node's children, in document order
    fn children(&self) -> Vec<Self>;

    /// Children with the given name, in document order
    fn children_named(&self, name: &str) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter(|child| child.name() == name)
            .collect()
    }
}
