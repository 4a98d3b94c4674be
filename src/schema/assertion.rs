//! Assertions and their evaluation capabilities
//!
//! `Assertion` is a closed enum. Each variant implements zero, one or both
//! of the two capabilities:
//!
//! - `MemberAssertion`: evaluates one data node
//! - `GroupAssertion`: evaluates a whole sequence of sibling nodes
//!
//! Every variant also reports, without data, the collection of outcomes
//! its success could produce (`possible_tags`).

use serde_json::Value;

use crate::context::ValidationContext;
use crate::element::ElementNode;
use crate::outcome::{Outcome, OutcomeSet, Status, Tags};

use super::composite::Schema;
use super::errors::SchemaResult;
use super::group::{Cardinality, Group, Reference};
use super::member::{Binding, Children, Fixed};
use super::slice::Slice;

/// Evaluates exactly one data node.
///
/// Must not fail hard: environment problems are reported as Undecided.
pub trait MemberAssertion {
    fn validate_member<N: ElementNode>(&self, node: &N, ctx: &ValidationContext<'_>) -> Outcome;
}

/// Evaluates an entire ordered sequence of sibling nodes.
///
/// Must handle the empty sequence; cardinality checks rely on it.
pub trait GroupAssertion {
    fn validate_group<N: ElementNode>(&self, nodes: &[N], ctx: &ValidationContext<'_>)
        -> Outcome;
}

/// A single constraint unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Always succeeds
    Succeed,
    /// Always fails
    Fail,
    /// Always undecided
    Undecided,
    /// Always succeeds, carrying the given tags
    Emit(Tags),
    /// The node's value equals a fixed value
    Fixed(Fixed),
    /// The node's code is a member of a value set
    Binding(Binding),
    /// Constraints on a node's named children
    Children(Children),
    /// Occurrence bounds on the sequence
    Cardinality(Cardinality),
    /// A schema resolved by name from the catalog
    Reference(Reference),
    /// Constraints on the nodes that satisfy a membership condition
    Group(Group),
    /// Partition of the sequence into named buckets
    Slice(Slice),
    /// A nested schema evaluated against the same sequence
    Schema(Schema),
}

/// Borrowed view of a member-capable assertion.
#[derive(Debug, Clone, Copy)]
pub enum MemberRef<'a> {
    Fixed(&'a Fixed),
    Binding(&'a Binding),
    Children(&'a Children),
}

/// Borrowed view of a group-capable assertion.
#[derive(Debug, Clone)]
pub enum GroupRef<'a> {
    Constant(Outcome),
    Cardinality(&'a Cardinality),
    Reference(&'a Reference),
    Group(&'a Group),
    Slice(&'a Slice),
    Schema(&'a Schema),
}

impl Assertion {
    pub fn succeed() -> Self {
        Assertion::Succeed
    }

    pub fn fail() -> Self {
        Assertion::Fail
    }

    pub fn undecided() -> Self {
        Assertion::Undecided
    }

    /// Success tag block
    pub fn emit(tags: impl IntoIterator<Item = impl Into<crate::outcome::Tag>>) -> Self {
        Assertion::Emit(tags.into_iter().map(Into::into).collect())
    }

    pub fn fixed(value: impl Into<Value>) -> Self {
        Assertion::Fixed(Fixed::new(value))
    }

    pub fn binding(value_set: impl Into<String>) -> SchemaResult<Self> {
        Binding::new(value_set).map(Assertion::Binding)
    }

    pub fn cardinality(min: usize, max: Option<usize>) -> SchemaResult<Self> {
        Cardinality::new(min, max).map(Assertion::Cardinality)
    }

    pub fn min_items(min: usize) -> Self {
        Assertion::Cardinality(Cardinality::at_least(min))
    }

    pub fn max_items(max: usize) -> Self {
        Assertion::Cardinality(Cardinality::at_most(max))
    }

    pub fn reference(name: impl Into<String>) -> SchemaResult<Self> {
        Reference::new(name).map(Assertion::Reference)
    }

    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Assertion::Succeed => "succeed",
            Assertion::Fail => "fail",
            Assertion::Undecided => "undecided",
            Assertion::Emit(_) => "emit",
            Assertion::Fixed(_) => "fixed",
            Assertion::Binding(_) => "binding",
            Assertion::Children(_) => "children",
            Assertion::Cardinality(_) => "cardinality",
            Assertion::Reference(_) => "ref",
            Assertion::Group(_) => "group",
            Assertion::Slice(_) => "slice",
            Assertion::Schema(_) => "schema",
        }
    }

    /// The member capability, if this variant has it
    pub fn as_member(&self) -> Option<MemberRef<'_>> {
        match self {
            Assertion::Fixed(fixed) => Some(MemberRef::Fixed(fixed)),
            Assertion::Binding(binding) => Some(MemberRef::Binding(binding)),
            Assertion::Children(children) => Some(MemberRef::Children(children)),
            Assertion::Succeed
            | Assertion::Fail
            | Assertion::Undecided
            | Assertion::Emit(_)
            | Assertion::Cardinality(_)
            | Assertion::Reference(_)
            | Assertion::Group(_)
            | Assertion::Slice(_)
            | Assertion::Schema(_) => None,
        }
    }

    /// The group capability, if this variant has it
    pub fn as_group(&self) -> Option<GroupRef<'_>> {
        match self {
            Assertion::Succeed => Some(GroupRef::Constant(Outcome::success())),
            Assertion::Fail => Some(GroupRef::Constant(Outcome::fail())),
            Assertion::Undecided => Some(GroupRef::Constant(Outcome::undecided())),
            Assertion::Emit(tags) => Some(GroupRef::Constant(Outcome::success_with(tags.clone()))),
            Assertion::Cardinality(cardinality) => Some(GroupRef::Cardinality(cardinality)),
            Assertion::Reference(reference) => Some(GroupRef::Reference(reference)),
            Assertion::Group(group) => Some(GroupRef::Group(group)),
            Assertion::Slice(slice) => Some(GroupRef::Slice(slice)),
            Assertion::Schema(schema) => Some(GroupRef::Schema(schema)),
            Assertion::Fixed(_) | Assertion::Binding(_) | Assertion::Children(_) => None,
        }
    }

    pub fn is_member_capable(&self) -> bool {
        self.as_member().is_some()
    }

    pub fn is_group_capable(&self) -> bool {
        self.as_group().is_some()
    }

    /// Outcomes this assertion's success could produce, computed without data.
    pub fn possible_tags(&self) -> OutcomeSet {
        match self {
            Assertion::Succeed => OutcomeSet::identity(),
            Assertion::Fail => OutcomeSet::single(Outcome::fail()),
            Assertion::Undecided => OutcomeSet::single(Outcome::undecided()),
            Assertion::Emit(tags) => OutcomeSet::single(Outcome::success_with(tags.clone())),
            // Data-dependent checks attach no tags of their own
            Assertion::Fixed(_)
            | Assertion::Binding(_)
            | Assertion::Cardinality(_)
            | Assertion::Reference(_) => OutcomeSet::identity(),
            Assertion::Children(children) => children.possible_tags(),
            Assertion::Group(group) => group.possible_tags(),
            Assertion::Slice(slice) => slice.possible_tags(),
            Assertion::Schema(schema) => schema.possible_tags(),
        }
    }
}

impl MemberAssertion for MemberRef<'_> {
    fn validate_member<N: ElementNode>(&self, node: &N, ctx: &ValidationContext<'_>) -> Outcome {
        match self {
            MemberRef::Fixed(fixed) => fixed.validate_member(node, ctx),
            MemberRef::Binding(binding) => binding.validate_member(node, ctx),
            MemberRef::Children(children) => children.validate_member(node, ctx),
        }
    }
}

impl GroupAssertion for GroupRef<'_> {
    fn validate_group<N: ElementNode>(
        &self,
        nodes: &[N],
        ctx: &ValidationContext<'_>,
    ) -> Outcome {
        match self {
            GroupRef::Constant(outcome) => outcome.clone(),
            GroupRef::Cardinality(cardinality) => cardinality.validate_group(nodes, ctx),
            GroupRef::Reference(reference) => reference.validate_group(nodes, ctx),
            GroupRef::Group(group) => group.validate_group(nodes, ctx),
            GroupRef::Slice(slice) => slice.validate_group(nodes, ctx),
            GroupRef::Schema(schema) => schema.validate_group(nodes, ctx),
        }
    }
}

/// Status of evaluating a membership condition against one node
pub(super) fn membership<N: ElementNode>(
    condition: &Schema,
    node: &N,
    ctx: &ValidationContext<'_>,
) -> Status {
    condition
        .validate_group(std::slice::from_ref(node), ctx)
        .status()
}

impl From<Fixed> for Assertion {
    fn from(fixed: Fixed) -> Self {
        Assertion::Fixed(fixed)
    }
}

impl From<Binding> for Assertion {
    fn from(binding: Binding) -> Self {
        Assertion::Binding(binding)
    }
}

impl From<Children> for Assertion {
    fn from(children: Children) -> Self {
        Assertion::Children(children)
    }
}

impl From<Cardinality> for Assertion {
    fn from(cardinality: Cardinality) -> Self {
        Assertion::Cardinality(cardinality)
    }
}

impl From<Reference> for Assertion {
    fn from(reference: Reference) -> Self {
        Assertion::Reference(reference)
    }
}

impl From<Group> for Assertion {
    fn from(group: Group) -> Self {
        Assertion::Group(group)
    }
}

impl From<Slice> for Assertion {
    fn from(slice: Slice) -> Self {
        Assertion::Slice(slice)
    }
}

impl From<Schema> for Assertion {
    fn from(schema: Schema) -> Self {
        Assertion::Schema(schema)
    }
}
