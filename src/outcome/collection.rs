//! Possible-outcome collections for static analysis
//!
//! An `OutcomeSet` lists mutually exclusive outcomes a schema could
//! produce. It is never the result of a data evaluation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::result::{Outcome, Status};

/// What to do with duplicate candidates produced by a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the raw cross product (m × n entries)
    #[default]
    Keep,
    /// Drop entries equal to an earlier one
    Collapse,
}

/// A collection of alternative outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeSet(Vec<Outcome>);

impl OutcomeSet {
    /// The product identity: a single empty-tag Succeed
    pub fn identity() -> Self {
        Self(vec![Outcome::success()])
    }

    /// A collection holding exactly one outcome
    pub fn single(outcome: Outcome) -> Self {
        Self(vec![outcome])
    }

    /// Cross-combine every pair of entries.
    ///
    /// Each pair combines with the same rule as aggregation. The result has
    /// exactly `self.len() * other.len()` entries.
    pub fn product(&self, other: &OutcomeSet) -> OutcomeSet {
        let mut out = Vec::with_capacity(self.0.len() * other.0.len());
        for left in &self.0 {
            for right in &other.0 {
                out.push(left.clone().aggregate(right.clone()));
            }
        }
        Self(out)
    }

    /// Alternatives from both collections, in order
    pub fn union(mut self, other: OutcomeSet) -> OutcomeSet {
        self.0.extend(other.0);
        self
    }

    /// Remove entries equal to an earlier entry, keeping first occurrences
    pub fn collapse(self) -> OutcomeSet {
        let mut seen = HashSet::with_capacity(self.0.len());
        Self(
            self.0
                .into_iter()
                .filter(|outcome| seen.insert(outcome.clone()))
                .collect(),
        )
    }

    /// Apply a duplicate policy
    pub fn with_policy(self, policy: DuplicatePolicy) -> OutcomeSet {
        match policy {
            DuplicatePolicy::Keep => self,
            DuplicatePolicy::Collapse => self.collapse(),
        }
    }

    /// Attach a tag to every successful alternative
    pub fn tag_all(self, tag: super::Tag) -> OutcomeSet {
        Self(
            self.0
                .into_iter()
                .map(|outcome| outcome.with_tag(tag.clone()))
                .collect(),
        )
    }

    /// Whether some alternative has the given status
    pub fn contains_status(&self, status: Status) -> bool {
        self.0.iter().any(|outcome| outcome.status() == status)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.0.iter()
    }
}

impl FromIterator<Outcome> for OutcomeSet {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for OutcomeSet {
    type Item = Outcome;
    type IntoIter = std::vec::IntoIter<Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OutcomeSet {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
