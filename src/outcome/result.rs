//! Tri-state outcome and the aggregation operator
//!
//! Aggregation rules:
//! - Fail if either side is Fail
//! - else Undecided if either side is Undecided
//! - else Succeed, with the union of both tag sets
//!
//! The empty-tag Succeed is the identity. Aggregation is associative and
//! commutative, so folds may run in any order or in parallel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use super::tags::{Tag, Tags};

/// Outcome discriminant.
///
/// Ordered by dominance: combining two statuses yields the greater one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Succeed,
    Undecided,
    Fail,
}

impl Status {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Succeed => "SUCCEED",
            Status::Undecided => "UNDECIDED",
            Status::Fail => "FAIL",
        }
    }

    /// Combine two statuses, failure dominating
    pub fn combine(self, other: Status) -> Status {
        self.max(other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of evaluating an assertion.
///
/// Only a Succeed outcome carries tags. Values are never mutated in
/// place; combining produces a new outcome.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "OutcomeRecord")]
pub struct Outcome {
    status: Status,
    #[serde(skip_serializing_if = "Tags::is_empty")]
    tags: Tags,
}

/// Unchecked wire form; only successes may bring tags along
#[derive(Deserialize)]
struct OutcomeRecord {
    status: Status,
    #[serde(default)]
    tags: Tags,
}

impl TryFrom<OutcomeRecord> for Outcome {
    type Error = String;

    fn try_from(record: OutcomeRecord) -> Result<Self, Self::Error> {
        if record.status != Status::Succeed && !record.tags.is_empty() {
            return Err(format!("{} outcome cannot carry tags", record.status));
        }
        Ok(Self {
            status: record.status,
            tags: record.tags,
        })
    }
}

impl Outcome {
    /// Succeed with no tags (the aggregation identity)
    pub fn success() -> Self {
        Self {
            status: Status::Succeed,
            tags: Tags::new(),
        }
    }

    /// Succeed carrying the given tags
    pub fn success_with(tags: Tags) -> Self {
        Self {
            status: Status::Succeed,
            tags,
        }
    }

    /// Succeed carrying a single tag
    pub fn tagged(tag: impl Into<Tag>) -> Self {
        Self::success_with(std::iter::once(tag.into()).collect())
    }

    pub fn fail() -> Self {
        Self {
            status: Status::Fail,
            tags: Tags::new(),
        }
    }

    pub fn undecided() -> Self {
        Self {
            status: Status::Undecided,
            tags: Tags::new(),
        }
    }

    /// Build from a bare status. Tags are empty.
    pub fn from_status(status: Status) -> Self {
        Self {
            status,
            tags: Tags::new(),
        }
    }

    /// Succeed when `holds`, Fail otherwise
    pub fn check(holds: bool) -> Self {
        if holds {
            Self::success()
        } else {
            Self::fail()
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Succeed
    }

    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }

    pub fn is_undecided(&self) -> bool {
        self.status == Status::Undecided
    }

    /// Attach an extra tag. No-op unless this outcome is a success.
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        if self.is_success() {
            self.tags.insert(tag);
        }
        self
    }

    /// Failure-dominant, tag-union combination of two outcomes.
    pub fn aggregate(self, other: Outcome) -> Outcome {
        match self.status.combine(other.status) {
            Status::Succeed => Outcome::success_with(self.tags.union(other.tags)),
            status => Outcome::from_status(status),
        }
    }

    /// Fold any number of outcomes, starting from the identity
    pub fn aggregate_all<I>(outcomes: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome>,
    {
        outcomes.into_iter().fold(Outcome::success(), Outcome::aggregate)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::success()
    }
}

impl Add for Outcome {
    type Output = Outcome;

    fn add(self, rhs: Outcome) -> Outcome {
        self.aggregate(rhs)
    }
}

impl Sum for Outcome {
    fn sum<I: Iterator<Item = Outcome>>(iter: I) -> Outcome {
        Outcome::aggregate_all(iter)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if !self.tags.is_empty() {
            write!(f, " {}", self.tags)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(labels: &[&str]) -> Tags {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_status_dominance_order() {
        assert!(Status::Succeed < Status::Undecided);
        assert!(Status::Undecided < Status::Fail);
        assert_eq!(Status::Succeed.combine(Status::Fail), Status::Fail);
        assert_eq!(Status::Undecided.combine(Status::Succeed), Status::Undecided);
    }

    #[test]
    fn test_fail_and_undecided_carry_no_tags() {
        assert!(Outcome::fail().tags().is_empty());
        assert!(Outcome::undecided().with_tag("x").tags().is_empty());
        assert!(Outcome::fail().with_tag("x").tags().is_empty());
    }

    #[test]
    fn test_aggregate_success_unions_tags() {
        let a = Outcome::success_with(tags(&["a"]));
        let b = Outcome::success_with(tags(&["b"]));

        let sum = a + b;
        assert!(sum.is_success());
        assert_eq!(sum.tags(), &tags(&["a", "b"]));
    }

    #[test]
    fn test_aggregate_fail_drops_tags() {
        let a = Outcome::success_with(tags(&["a"]));
        let sum = a + Outcome::fail();
        assert_eq!(sum, Outcome::fail());
    }

    #[test]
    fn test_aggregate_undecided_below_fail() {
        assert_eq!(Outcome::undecided() + Outcome::success(), Outcome::undecided());
        assert_eq!(Outcome::undecided() + Outcome::fail(), Outcome::fail());
    }

    #[test]
    fn test_empty_sum_is_identity() {
        let sum: Outcome = std::iter::empty().sum();
        assert_eq!(sum, Outcome::success());
    }

    #[test]
    fn test_single_sum_is_unchanged() {
        let only = Outcome::tagged("t");
        let sum: Outcome = std::iter::once(only.clone()).sum();
        assert_eq!(sum, only);
    }

    #[test]
    fn test_check() {
        assert!(Outcome::check(true).is_success());
        assert!(Outcome::check(false).is_fail());
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::fail().to_string(), "FAIL");
        assert_eq!(Outcome::tagged("slice:a").to_string(), "SUCCEED [slice:a]");
    }

    #[test]
    fn test_deserialize_round_trip() {
        let tagged = Outcome::success_with(tags(&["slice:a", "profile:bp"]));
        let json = serde_json::to_string(&tagged).unwrap();
        assert_eq!(serde_json::from_str::<Outcome>(&json).unwrap(), tagged);

        let fail: Outcome = serde_json::from_str(r#"{ "status": "fail" }"#).unwrap();
        assert_eq!(fail, Outcome::fail());
    }

    #[test]
    fn test_deserialize_rejects_tags_on_non_success() {
        let fail = serde_json::from_str::<Outcome>(r#"{ "status": "fail", "tags": ["x"] }"#);
        assert!(fail.unwrap_err().to_string().contains("cannot carry tags"));

        let undecided =
            serde_json::from_str::<Outcome>(r#"{ "status": "undecided", "tags": ["x"] }"#);
        assert!(undecided.is_err());
    }

    #[test]
    fn test_serialize_omits_empty_tags() {
        let json = serde_json::to_value(Outcome::undecided()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "undecided" }));
    }
}
