//! Composite schema
//!
//! A schema is a group assertion holding an ordered list of child
//! assertions. Evaluating it against a sequence of nodes:
//!
//! 1. every group-capable child runs once against the whole sequence
//! 2. every member-capable child runs once per node
//! 3. all results are aggregated into one outcome
//!
//! The empty sequence is not special-cased: member checks contribute the
//! identity, group checks (e.g. a minimum cardinality) still run.
//!
//! Local definitions (`define`) are named subschemas that only references
//! from inside the schema can reach. They are never evaluated directly.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::context::{DefinitionScope, ValidationContext};
use crate::element::ElementNode;
use crate::outcome::{Outcome, OutcomeSet};

use super::assertion::{Assertion, GroupAssertion, GroupRef, MemberAssertion, MemberRef};
use super::errors::{SchemaError, SchemaResult};

/// Named or anonymous composite of assertions. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    name: Option<String>,
    definitions: BTreeMap<String, Arc<Schema>>,
    assertions: Vec<Assertion>,
}

impl Schema {
    /// An anonymous schema
    pub fn new(assertions: impl IntoIterator<Item = Assertion>) -> Self {
        Self {
            name: None,
            definitions: BTreeMap::new(),
            assertions: assertions.into_iter().collect(),
        }
    }

    /// A schema that can be registered and referenced by name
    pub fn named(name: impl Into<String>, assertions: impl IntoIterator<Item = Assertion>) -> Self {
        Self {
            name: Some(name.into()),
            definitions: BTreeMap::new(),
            assertions: assertions.into_iter().collect(),
        }
    }

    /// Attach named subschemas visible to references inside this schema.
    ///
    /// Every definition must be named, and names must be unique within
    /// one schema. A definition of an inner schema shadows an outer one.
    pub fn with_definitions(
        mut self,
        definitions: impl IntoIterator<Item = Schema>,
    ) -> SchemaResult<Self> {
        for definition in definitions {
            let name = definition
                .name()
                .ok_or(SchemaError::AnonymousSchema)?
                .to_string();
            if self.definitions.contains_key(&name) {
                return Err(SchemaError::DuplicateDefinition(name));
            }
            self.definitions.insert(name, Arc::new(definition));
        }
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn definition(&self, name: &str) -> Option<&Arc<Schema>> {
        self.definitions.get(name)
    }

    /// Local definitions, ordered by name
    pub fn definitions(&self) -> impl Iterator<Item = &Schema> {
        self.definitions.values().map(Arc::as_ref)
    }

    /// Child assertions in declaration order
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Member-capable children, in declaration order
    pub fn member_assertions(&self) -> impl Iterator<Item = MemberRef<'_>> {
        self.assertions.iter().filter_map(Assertion::as_member)
    }

    /// Group-capable children, in declaration order
    pub fn group_assertions(&self) -> impl Iterator<Item = GroupRef<'_>> {
        self.assertions.iter().filter_map(Assertion::as_group)
    }

    /// Every outcome a successful evaluation could produce.
    ///
    /// Product of each child's collection, seeded with the identity.
    /// Definitions are not part of it. Never touches data.
    pub fn possible_tags(&self) -> OutcomeSet {
        self.assertions
            .iter()
            .fold(OutcomeSet::identity(), |sum, assertion| {
                sum.product(&assertion.possible_tags())
            })
    }

    /// Validate a sequence of nodes against this schema
    pub fn validate<N: ElementNode>(&self, nodes: &[N], ctx: &ValidationContext<'_>) -> Outcome {
        self.validate_group(nodes, ctx)
    }

    fn evaluate<N: ElementNode>(&self, nodes: &[N], ctx: &ValidationContext<'_>) -> Outcome {

        let groups: Vec<GroupRef<'_>> = self.group_assertions().collect();
        let members: Vec<MemberRef<'_>> = self.member_assertions().collect();

        if ctx.config().parallel {
            let (group_result, member_result) = rayon::join(
                || group_pass(&groups, nodes, ctx),
                || member_pass(&members, nodes, ctx),
            );
            group_result + member_result
        } else {
            group_pass(&groups, nodes, ctx) + member_pass(&members, nodes, ctx)
        }
    }
}

impl GroupAssertion for Schema {
    fn validate_group<N: ElementNode>(
        &self,
        nodes: &[N],
        ctx: &ValidationContext<'_>,
    ) -> Outcome {
        if ctx.is_cancelled() {
            return Outcome::undecided();
        }

        if self.definitions.is_empty() {
            self.evaluate(nodes, ctx)
        } else {
            let scope = DefinitionScope::new(self, ctx.scope());
            self.evaluate(nodes, &ctx.within(&scope))
        }
    }
}

fn group_pass<N: ElementNode>(
    groups: &[GroupRef<'_>],
    nodes: &[N],
    ctx: &ValidationContext<'_>,
) -> Outcome {
    groups
        .iter()
        .map(|group| {
            if ctx.is_cancelled() {
                Outcome::undecided()
            } else {
                group.validate_group(nodes, ctx)
            }
        })
        .sum()
}

fn member_pass<N: ElementNode>(
    members: &[MemberRef<'_>],
    nodes: &[N],
    ctx: &ValidationContext<'_>,
) -> Outcome {
    if members.is_empty() || nodes.is_empty() {
        return Outcome::success();
    }

    if ctx.config().fans_out(nodes.len() * members.len()) {
        nodes
            .par_iter()
            .map(|node| member_cells(members, node, ctx))
            .reduce(Outcome::success, Outcome::aggregate)
    } else {
        nodes
            .iter()
            .map(|node| member_cells(members, node, ctx))
            .sum()
    }
}

/// One node against every member assertion
fn member_cells<N: ElementNode>(
    members: &[MemberRef<'_>],
    node: &N,
    ctx: &ValidationContext<'_>,
) -> Outcome {
    members
        .iter()
        .map(|member| {
            if ctx.is_cancelled() {
                Outcome::undecided()
            } else {
                member.validate_member(node, ctx)
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CancellationToken, ValidationConfig};
    use crate::element::JsonElement;
    use crate::outcome::{Status, Tag};
    use crate::schema::Reference;
    use serde_json::json;

    fn nodes(values: &[serde_json::Value]) -> Vec<JsonElement<'_>> {
        values.iter().map(|v| JsonElement::new("value", v)).collect()
    }

    #[test]
    fn test_fixed_value_scenario() {
        let schema = Schema::new([Assertion::fixed(5)]);
        let ctx = ValidationContext::new();

        let five = [json!(5)];
        let seven = [json!(7)];
        let none: [serde_json::Value; 0] = [];

        let outcome = schema.validate(&nodes(&five), &ctx);
        assert_eq!(outcome, Outcome::success());
        assert!(schema.validate(&nodes(&seven), &ctx).is_fail());
        assert!(schema.validate(&nodes(&none), &ctx).is_success());
    }

    #[test]
    fn test_empty_sequence_still_runs_group_checks() {
        let schema = Schema::new([Assertion::fixed(5), Assertion::min_items(1)]);
        let ctx = ValidationContext::new();
        let empty: Vec<JsonElement<'_>> = Vec::new();

        assert!(schema.validate(&empty, &ctx).is_fail());
    }

    #[test]
    fn test_member_checks_run_per_node() {
        let schema = Schema::new([Assertion::fixed("final")]);
        let ctx = ValidationContext::new();
        let values = [json!("final"), json!("final"), json!("amended")];

        assert!(schema.validate(&nodes(&values), &ctx).is_fail());
        assert!(schema.validate(&nodes(&values[..2]), &ctx).is_success());
    }

    #[test]
    fn test_group_and_member_results_aggregate() {
        let schema = Schema::new([
            Assertion::emit(["a"]),
            Assertion::Undecided,
            Assertion::fixed(1),
        ]);
        let ctx = ValidationContext::new();
        let values = [json!(1)];

        assert!(schema.validate(&nodes(&values), &ctx).is_undecided());
    }

    #[test]
    fn test_tags_union_across_children() {
        let schema = Schema::new([Assertion::emit(["a"]), Assertion::emit(["b"])]);
        let ctx = ValidationContext::new();
        let empty: Vec<JsonElement<'_>> = Vec::new();

        let outcome = schema.validate(&empty, &ctx);
        assert!(outcome.tags().contains(&Tag::new("a")));
        assert!(outcome.tags().contains(&Tag::new("b")));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let schema = Schema::named("Obs", [Assertion::min_items(1), Assertion::fixed(1)]);
        let kinds: Vec<_> = schema.assertions().iter().map(Assertion::kind).collect();
        assert_eq!(kinds, vec!["cardinality", "fixed"]);
        assert_eq!(schema.name(), Some("Obs"));
    }

    #[test]
    fn test_possible_tags_of_empty_schema_is_identity() {
        assert_eq!(Schema::default().possible_tags(), OutcomeSet::identity());
    }

    #[test]
    fn test_possible_tags_product() {
        let schema = Schema::new([
            Assertion::emit(["a"]),
            Assertion::fixed(1),
            Assertion::Fail,
        ]);

        let possible = schema.possible_tags();
        assert_eq!(possible.len(), 1);
        assert!(possible.contains_status(Status::Fail));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let schema = Schema::new([Assertion::fixed(1), Assertion::max_items(200)]);
        let values: Vec<_> = (0..150).map(|i| json!(if i == 77 { 2 } else { 1 })).collect();
        let nodes = nodes(&values);

        let sequential = ValidationContext::new();
        let parallel = ValidationContext::new().with_config(ValidationConfig {
            parallel_threshold: 1,
            ..ValidationConfig::parallel()
        });

        assert_eq!(schema.validate(&nodes, &sequential), schema.validate(&nodes, &parallel));
        assert!(schema.validate(&nodes, &parallel).is_fail());
    }

    #[test]
    fn test_cancelled_context_is_undecided() {
        let schema = Schema::new([Assertion::fixed(1)]);
        let token = CancellationToken::new();
        token.cancel();
        let ctx = ValidationContext::new().with_cancellation(&token);
        let values = [json!(1)];

        assert!(schema.validate(&nodes(&values), &ctx).is_undecided());
    }

    #[test]
    fn test_local_definition_resolves_without_catalog() {
        let schema = Schema::new([Assertion::reference("Single").unwrap()])
            .with_definitions([Schema::named("Single", [Assertion::max_items(1)])])
            .unwrap();
        let ctx = ValidationContext::new();
        let values = [json!(1), json!(2)];

        assert!(ctx.catalog().is_none());
        assert!(schema.validate(&nodes(&values[..1]), &ctx).is_success());
        assert!(schema.validate(&nodes(&values), &ctx).is_fail());
    }

    #[test]
    fn test_definitions_are_never_evaluated_directly() {
        let schema = Schema::new([Assertion::Succeed])
            .with_definitions([
                Schema::named("Broken", [Assertion::Fail]),
                Schema::named("Tagged", [Assertion::emit(["hidden"])]),
            ])
            .unwrap();
        let ctx = ValidationContext::new();
        let values = [json!(1)];

        assert_eq!(schema.validate(&nodes(&values), &ctx), Outcome::success());
        assert_eq!(schema.possible_tags(), OutcomeSet::identity());
        assert_eq!(schema.definitions().count(), 2);
    }

    #[test]
    fn test_nested_schema_sees_enclosing_definitions() {
        let inner = Schema::new([Assertion::reference("Final").unwrap()]);
        let schema = Schema::new([Assertion::Schema(inner)])
            .with_definitions([Schema::named("Final", [Assertion::fixed("final")])])
            .unwrap();
        let ctx = ValidationContext::new();

        let good = [json!("final")];
        let bad = [json!("amended")];
        assert!(schema.validate(&nodes(&good), &ctx).is_success());
        assert!(schema.validate(&nodes(&bad), &ctx).is_fail());
    }

    #[test]
    fn test_inner_definition_shadows_outer() {
        let inner = Schema::new([Assertion::reference("Code").unwrap()])
            .with_definitions([Schema::named("Code", [Assertion::fixed("inner")])])
            .unwrap();
        let schema = Schema::new([Assertion::Schema(inner)])
            .with_definitions([Schema::named("Code", [Assertion::fixed("outer")])])
            .unwrap();
        let ctx = ValidationContext::new();

        let values = [json!("inner")];
        assert!(schema.validate(&nodes(&values), &ctx).is_success());
    }

    #[test]
    fn test_definitions_are_invisible_outside_their_schema() {
        let with_local = Schema::new([Assertion::Succeed])
            .with_definitions([Schema::named("Local", [Assertion::Succeed])])
            .unwrap();
        let schema = Schema::new([
            Assertion::Schema(with_local),
            Assertion::Reference(Reference::new("Local").unwrap()),
        ]);
        let ctx = ValidationContext::new();
        let values = [json!(1)];

        assert!(schema.validate(&nodes(&values), &ctx).is_undecided());
    }

    #[test]
    fn test_definition_errors() {
        let duplicate = Schema::default().with_definitions([
            Schema::named("A", [Assertion::Succeed]),
            Schema::named("A", [Assertion::Fail]),
        ]);
        assert_eq!(
            duplicate.unwrap_err(),
            SchemaError::DuplicateDefinition("A".into())
        );

        let anonymous = Schema::default().with_definitions([Schema::new([Assertion::Succeed])]);
        assert_eq!(anonymous.unwrap_err(), SchemaError::AnonymousSchema);
    }
}
