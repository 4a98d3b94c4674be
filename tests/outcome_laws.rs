//! Outcome Algebra Laws
//!
//! Property tests for aggregation and product:
//! - Aggregation is associative and commutative with the empty success as identity
//! - Fail dominates Undecided dominates Succeed
//! - Successful aggregation unions tags
//! - Product size is the product of input sizes

use fhirschema::outcome::{DuplicatePolicy, Outcome, OutcomeSet, Status, Tag, Tags};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn tags() -> impl Strategy<Value = Tags> {
    prop::collection::btree_set("[a-e]", 0..4).prop_map(|labels| labels.into_iter().collect())
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        4 => tags().prop_map(Outcome::success_with),
        1 => Just(Outcome::fail()),
        1 => Just(Outcome::undecided()),
    ]
}

fn outcome_set() -> impl Strategy<Value = OutcomeSet> {
    prop::collection::vec(outcome(), 0..5).prop_map(|outcomes| outcomes.into_iter().collect())
}

// =============================================================================
// Aggregation Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_aggregate_is_associative(a in outcome(), b in outcome(), c in outcome()) {
        let left = (a.clone() + b.clone()) + c.clone();
        let right = a + (b + c);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_aggregate_is_commutative(a in outcome(), b in outcome()) {
        prop_assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn prop_success_is_identity(a in outcome()) {
        prop_assert_eq!(a.clone() + Outcome::success(), a.clone());
        prop_assert_eq!(Outcome::success() + a.clone(), a);
    }

    #[test]
    fn prop_fail_dominates(a in outcome()) {
        prop_assert_eq!(a.clone() + Outcome::fail(), Outcome::fail());
        prop_assert_eq!(Outcome::fail() + a, Outcome::fail());
    }

    #[test]
    fn prop_undecided_dominates_success(t in tags()) {
        let result = Outcome::success_with(t) + Outcome::undecided();
        prop_assert_eq!(result.status(), Status::Undecided);
        prop_assert!(result.tags().is_empty());
    }

    #[test]
    fn prop_success_unions_tags(x in tags(), y in tags()) {
        let result = Outcome::success_with(x.clone()) + Outcome::success_with(y.clone());
        prop_assert!(result.is_success());
        for tag in x.iter().chain(y.iter()) {
            prop_assert!(result.tags().contains(tag));
        }
        prop_assert!(result.tags().len() <= x.len() + y.len());
    }

    #[test]
    fn prop_sum_matches_fold(outcomes in prop::collection::vec(outcome(), 0..8)) {
        let folded = outcomes
            .iter()
            .cloned()
            .fold(Outcome::success(), Outcome::aggregate);
        let summed: Outcome = outcomes.into_iter().sum();
        prop_assert_eq!(summed, folded);
    }

    #[test]
    fn prop_status_is_max(a in outcome(), b in outcome()) {
        let expected = a.status().max(b.status());
        prop_assert_eq!((a + b).status(), expected);
    }
}

// =============================================================================
// Product Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_product_size(left in outcome_set(), right in outcome_set()) {
        prop_assert_eq!(left.product(&right).len(), left.len() * right.len());
    }

    #[test]
    fn prop_product_identity(set in outcome_set()) {
        prop_assert_eq!(OutcomeSet::identity().product(&set), set.clone());
        prop_assert_eq!(set.product(&OutcomeSet::identity()), set);
    }

    #[test]
    fn prop_collapse_never_grows(set in outcome_set()) {
        let collapsed = set.clone().with_policy(DuplicatePolicy::Collapse);
        prop_assert!(collapsed.len() <= set.len());
        for outcome in &set {
            prop_assert!(collapsed.iter().any(|kept| kept == outcome));
        }
    }
}

#[test]
fn test_product_two_by_three() {
    let left: OutcomeSet = vec![Outcome::tagged("a"), Outcome::tagged("b")]
        .into_iter()
        .collect();
    let right: OutcomeSet = vec![
        Outcome::tagged("x"),
        Outcome::tagged("y"),
        Outcome::tagged("z"),
    ]
    .into_iter()
    .collect();

    let product = left.product(&right);
    assert_eq!(product.len(), 6);
    assert!(product.iter().all(|o| o.tags().len() == 2));
    assert!(product
        .iter()
        .any(|o| o.tags().contains(&Tag::new("b")) && o.tags().contains(&Tag::new("z"))));
}

#[test]
fn test_outcome_json_shape() {
    let outcome = Outcome::tagged("slice:systolic");
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "succeed");
    assert_eq!(json["tags"][0], "slice:systolic");

    let fail = serde_json::to_value(Outcome::fail()).unwrap();
    assert!(fail.get("tags").is_none());
}
