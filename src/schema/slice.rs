//! Slicing: partition a sequence into named buckets
//!
//! Routing rules, per node:
//! - groups are tried in declaration order; the first whose membership
//!   condition succeeds takes the node
//! - an Undecided condition before the first success makes the node's
//!   membership ambiguous (Undecided)
//! - a node matching no group goes to the default bucket; without a
//!   default bucket it fails the slice
//! - when ordered, bucket order must be non-decreasing along the sequence
//!   (the default bucket sorts last)
//!
//! Every bucket's constraints then validate that bucket's nodes, even when
//! there are none. Non-empty buckets tag a successful outcome with
//! `slice:<group>`.

use std::collections::HashSet;

use crate::context::ValidationContext;
use crate::element::ElementNode;
use crate::observability::{log_event_with_fields, Event};
use crate::outcome::{Outcome, OutcomeSet, Status, Tag};

use super::assertion::{membership, GroupAssertion};
use super::composite::Schema;
use super::errors::{SchemaError, SchemaResult};

/// Name used in the tag of the default bucket
pub const DEFAULT_BUCKET: &str = "@default";

/// One named bucket of a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceGroup {
    name: String,
    condition: Schema,
    constraints: Schema,
}

impl SliceGroup {
    pub fn new(name: impl Into<String>, condition: Schema, constraints: Schema) -> Self {
        Self {
            name: name.into(),
            condition,
            constraints,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Schema {
        &self.condition
    }

    pub fn constraints(&self) -> &Schema {
        &self.constraints
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    ordered: bool,
    groups: Vec<SliceGroup>,
    default: Option<Schema>,
}

/// Where a single node is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Bucket(usize),
    Default,
    Unmatched,
    Ambiguous,
}

impl Slice {
    /// Unordered slice without a default bucket
    pub fn new(groups: impl IntoIterator<Item = SliceGroup>) -> SchemaResult<Self> {
        let groups: Vec<SliceGroup> = groups.into_iter().collect();

        let mut seen = HashSet::new();
        for group in &groups {
            if group.name.is_empty() {
                return Err(SchemaError::EmptyName("slice group"));
            }
            if group.name == DEFAULT_BUCKET || !seen.insert(group.name.as_str()) {
                return Err(SchemaError::DuplicateSliceGroup(group.name.clone()));
            }
        }

        Ok(Self {
            ordered: false,
            groups,
            default: None,
        })
    }

    /// Require buckets to appear in declaration order
    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    /// Constraints for nodes matching no group
    pub fn with_default(mut self, default: Schema) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn groups(&self) -> &[SliceGroup] {
        &self.groups
    }

    pub fn default_bucket(&self) -> Option<&Schema> {
        self.default.as_ref()
    }

    fn route<N: ElementNode>(&self, node: &N, ctx: &ValidationContext<'_>) -> Route {
        let mut undecided_before = false;

        for (index, group) in self.groups.iter().enumerate() {
            match membership(&group.condition, node, ctx) {
                Status::Succeed if undecided_before => return Route::Ambiguous,
                Status::Succeed => return Route::Bucket(index),
                Status::Undecided => undecided_before = true,
                Status::Fail => {}
            }
        }

        if undecided_before {
            Route::Ambiguous
        } else if self.default.is_some() {
            Route::Default
        } else {
            Route::Unmatched
        }
    }

    /// Every combination of used and empty buckets.
    ///
    /// Each bucket contributes its constraints' collection twice: untagged
    /// (no node routed there) and tagged `slice:<name>` (at least one node).
    /// The product over all buckets then covers every subset of non-empty
    /// buckets, including none. A slice with no buckets is the identity.
    pub fn possible_tags(&self) -> OutcomeSet {
        let buckets = self
            .groups
            .iter()
            .map(|group| (group.name.as_str(), &group.constraints))
            .chain(self.default.iter().map(|default| (DEFAULT_BUCKET, default)));

        buckets.fold(OutcomeSet::identity(), |sum, (name, constraints)| {
            let empty = constraints.possible_tags();
            let used = empty.clone().tag_all(Tag::slice(name));
            sum.product(&empty.union(used))
        })
    }
}

impl GroupAssertion for Slice {
    fn validate_group<N: ElementNode>(
        &self,
        nodes: &[N],
        ctx: &ValidationContext<'_>,
    ) -> Outcome {
        let mut buckets: Vec<Vec<N>> = vec![Vec::new(); self.groups.len()];
        let mut defaults: Vec<N> = Vec::new();
        let mut routing = Outcome::success();
        let mut highest = 0;

        for (position, node) in nodes.iter().enumerate() {
            let index = match self.route(node, ctx) {
                Route::Bucket(index) => {
                    buckets[index].push(node.clone());
                    index
                }
                Route::Default => {
                    defaults.push(node.clone());
                    self.groups.len()
                }
                Route::Unmatched => {
                    let position = position.to_string();
                    log_event_with_fields(
                        Event::SliceUnmatched,
                        &[("position", position.as_str())],
                    );
                    routing = routing + Outcome::fail();
                    continue;
                }
                Route::Ambiguous => {
                    let position = position.to_string();
                    log_event_with_fields(
                        Event::SliceAmbiguous,
                        &[("position", position.as_str())],
                    );
                    routing = routing + Outcome::undecided();
                    continue;
                }
            };

            if self.ordered && index < highest {
                routing = routing + Outcome::fail();
            }
            highest = highest.max(index);
        }

        let mut outcome = routing;
        for (group, bucket) in self.groups.iter().zip(&buckets) {
            let result = group.constraints.validate_group(bucket, ctx);
            outcome = outcome + tag_if_used(result, bucket.len(), &group.name);
        }
        if let Some(default) = &self.default {
            let result = default.validate_group(&defaults, ctx);
            outcome = outcome + tag_if_used(result, defaults.len(), DEFAULT_BUCKET);
        }

        outcome
    }
}

fn tag_if_used(result: Outcome, count: usize, bucket: &str) -> Outcome {
    if count > 0 {
        result.with_tag(Tag::slice(bucket))
    } else {
        result
    }
}
