//! Success tags
//!
//! A tag names which success variant occurred (e.g. which slice matched).
//! Tag sets are ordered so that outcomes compare and print deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single label attached to a successful outcome.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Create a tag from any string-like label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Tag attached when nodes landed in the named slice bucket
    pub fn slice(group: &str) -> Self {
        Self(format!("slice:{}", group))
    }

    /// Returns the label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Tag {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// An ordered set of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<Tag>);

impl Tags {
    /// The empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning whether it was new
    pub fn insert(&mut self, tag: impl Into<Tag>) -> bool {
        self.0.insert(tag.into())
    }

    /// Set union, consuming both sides
    pub fn union(mut self, other: Tags) -> Tags {
        if self.0.is_empty() {
            return other;
        }
        self.0.extend(other.0);
        self
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl<T: Into<Tag>> FromIterator<T> for Tags {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::collections::btree_set::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tag)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_merges_and_dedups() {
        let a: Tags = ["x", "y"].into_iter().collect();
        let b: Tags = ["y", "z"].into_iter().collect();

        let merged = a.union(b);
        assert_eq!(merged.len(), 3);
        assert!(merged.contains(&Tag::new("z")));
    }

    #[test]
    fn test_union_with_empty_is_identity() {
        let a: Tags = ["x"].into_iter().collect();
        assert_eq!(Tags::new().union(a.clone()), a);
        assert_eq!(a.clone().union(Tags::new()), a);
    }

    #[test]
    fn test_slice_tag_label() {
        assert_eq!(Tag::slice("systolic").as_str(), "slice:systolic");
    }

    #[test]
    fn test_display_is_sorted() {
        let tags: Tags = ["b", "a"].into_iter().collect();
        assert_eq!(tags.to_string(), "[a, b]");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let tags: Tags = ["a"].into_iter().collect();
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, "[\"a\"]");
    }
}
