//! Property-based tests for the interval algebra and the section solver.
//!
//! Uses proptest to check that the six-way overlap classification is total
//! and consistent, and that arbitrary occupancy sets always simplify into
//! valid trees carrying unit contribution mass.

use chrono::NaiveDate;
use meterlog::interval::{DateSpan, Intersection};
use meterlog::invoice::{contributions, Occupancy, SectionNode};
use meterlog::model::Person;
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    base_date() + chrono::Duration::days(offset)
}

/// A proper span within a ten-year window.
fn span_strategy() -> impl Strategy<Value = DateSpan> {
    (0i64..3650, 1i64..720)
        .prop_map(|(low, len)| DateSpan::new(day(low), day(low + len)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// The classification is total and each variant implies its defining
    /// endpoint conditions.
    #[test]
    fn classification_matches_endpoint_conditions(a in span_strategy(), b in span_strategy()) {
        let class = a.intersect(&b);

        match class {
            Intersection::Equal => {
                prop_assert_eq!(a.low(), b.low());
                prop_assert_eq!(a.high(), b.high());
            }
            Intersection::Disjoint => {
                prop_assert!(b.high() < a.low() || b.low() > a.high());
            }
            Intersection::SubSet => {
                prop_assert!(b.low() < a.low());
                prop_assert!(b.high() >= a.high());
            }
            Intersection::SuperSet => {
                prop_assert!(b.low() >= a.low());
                prop_assert!(b.high() <= a.high());
            }
            Intersection::PartialLeft => {
                prop_assert!(b.low() < a.low());
                prop_assert!(b.high() >= a.low());
                prop_assert!(b.high() < a.high());
            }
            Intersection::PartialRight => {
                prop_assert!(b.low() >= a.low());
                prop_assert!(b.low() <= a.high());
                prop_assert!(b.high() > a.high());
            }
        }
    }

    /// Strict containment always classifies as subset/superset, matching
    /// set semantics.
    #[test]
    fn strict_containment_is_consistent(a in span_strategy(), b in span_strategy()) {
        if b.low() < a.low() && b.high() > a.high() {
            prop_assert_eq!(a.intersect(&b), Intersection::SubSet);
            prop_assert_eq!(b.intersect(&a), Intersection::SuperSet);
        }
    }

    /// Disjointness and equality are symmetric.
    #[test]
    fn disjoint_and_equal_are_symmetric(a in span_strategy(), b in span_strategy()) {
        prop_assert_eq!(
            a.intersect(&b) == Intersection::Disjoint,
            b.intersect(&a) == Intersection::Disjoint
        );
        prop_assert_eq!(
            a.intersect(&b) == Intersection::Equal,
            b.intersect(&a) == Intersection::Equal
        );
    }

    /// Overlap agrees with the numeric overlap test.
    #[test]
    fn overlap_matches_numeric_test(a in span_strategy(), b in span_strategy()) {
        let overlaps = b.low() <= a.high() && b.high() >= a.low();
        prop_assert_eq!(a.intersect(&b) != Intersection::Disjoint, overlaps);
    }
}

/// Occupancies drawn from a bounded window around the invoice range.
fn occupancies_strategy() -> impl Strategy<Value = Vec<Occupancy>> {
    prop::collection::vec((0i64..1200, 1i64..900), 0..8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (low, len))| {
                let span = DateSpan::new(day(low), day(low + len));
                Occupancy {
                    person: Person::new(
                        format!("Person {i}"),
                        Some(span.low()),
                        Some(span.high()),
                    ),
                    span,
                }
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any occupancy set simplifies into a valid tree (or nothing), and a
    /// valid tree always carries contribution mass one.
    #[test]
    fn solver_trees_are_valid_and_mass_one(occupancies in occupancies_strategy()) {
        let range = DateSpan::new(day(365), day(730));
        let tree = SectionNode::build(range, &occupancies).simplify();

        if let Some(tree) = tree {
            let validity = tree.validate();
            prop_assert!(validity.is_ok(), "invalid tree: {:?}", validity.err());
            prop_assert!(tree.node_count() <= 2 * occupancies.len().max(1));

            let contrib = contributions(&tree);
            prop_assert!((contrib.sum() - 1.0).abs() < 1e-9);
            for (_, share) in contrib.iter() {
                prop_assert!(share >= 0.0);
            }
        }
    }

    /// The solver is deterministic regardless of input order.
    #[test]
    fn solver_is_order_independent(occupancies in occupancies_strategy()) {
        let range = DateSpan::new(day(365), day(730));

        let mut reversed = occupancies.clone();
        reversed.reverse();

        let forward = SectionNode::build(range, &occupancies).simplify();
        let backward = SectionNode::build(range, &reversed).simplify();
        prop_assert_eq!(forward, backward);
    }
}
