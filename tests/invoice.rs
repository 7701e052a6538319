//! Integration tests for invoice distribution.
//!
//! The fixed-point scenarios pin the distribution to three decimals; the
//! law tests cover the tree invariant, conservation, non-negativity,
//! exclusion behavior and output determinism.

use chrono::NaiveDate;
use meterlog::invoice::{build_invoice, distribute, InvoiceOptions};
use meterlog::model::{Person, Reading};
use meterlog::store::{MemoryStore, MeterStore, Repository};
use meterlog::MeterError;
use pretty_assertions::assert_eq;

const EPSILON: f64 = 1e-3;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A fixed "today" so open move-out dates resolve deterministically.
fn today() -> NaiveDate {
    date(2024, 1, 1)
}

fn options() -> InvoiceOptions {
    InvoiceOptions::new(today())
}

/// The four-person household of the reference scenario.
fn household() -> Vec<Person> {
    vec![
        Person::new("Person A", Some(date(2023, 2, 1)), None),
        Person::new("Person B", Some(date(2023, 2, 1)), Some(date(2023, 5, 2))),
        Person::new("Person C", Some(date(2023, 5, 6)), None),
        Person::new("Person D", Some(date(2023, 3, 18)), Some(date(2023, 9, 2))),
    ]
}

fn amounts(lines: &[meterlog::invoice::InvoiceLine]) -> Vec<(String, f64)> {
    lines
        .iter()
        .map(|l| (l.person.name.clone(), l.amount))
        .collect()
}

fn assert_amounts(actual: &[(String, f64)], expected: &[(&str, f64)]) {
    assert_eq!(
        actual.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        expected.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
        "line ordering"
    );
    for ((name, actual), (_, expected)) in actual.iter().zip(expected) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "{name}: expected {expected}, got {actual}"
        );
    }
}

mod scenarios {
    use super::*;

    /// Scenario A: four overlapping occupants share 100.0.
    #[test]
    fn test_overlapping_household() {
        let invoice = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();

        assert_amounts(
            &amounts(&invoice.lines),
            &[
                ("Person A", 50.300),
                ("Person B", 9.985),
                ("Person C", 26.952),
                ("Person D", 12.763),
            ],
        );

        let sum: f64 = invoice.lines.iter().map(|l| l.amount).sum();
        assert!((sum - 100.0).abs() < EPSILON);
    }

    /// Scenario B: the same household with two occupants excluded; their
    /// sections fall to whoever covers them, without compensation lines.
    #[test]
    fn test_overlapping_household_with_exclusions() {
        let opts = options()
            .with_excluded(vec!["Person B".to_string(), "Person D".to_string()]);
        let invoice = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &opts,
        )
        .unwrap();

        assert_amounts(
            &amounts(&invoice.lines),
            &[("Person A", 64.114), ("Person C", 35.886)],
        );

        let sum: f64 = invoice.lines.iter().map(|l| l.amount).sum();
        assert!((sum - 100.0).abs() < EPSILON);
    }

    /// Scenario F: two identical full-range occupants split evenly.
    #[test]
    fn test_identical_intervals_split_evenly() {
        let persons = vec![
            Person::new("Ada", Some(date(2023, 1, 1)), Some(date(2023, 12, 31))),
            Person::new("Bob", Some(date(2023, 1, 1)), Some(date(2023, 12, 31))),
        ];
        let invoice = distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 100.0, &options())
            .unwrap();

        assert_amounts(&amounts(&invoice.lines), &[("Ada", 50.0), ("Bob", 50.0)]);
    }
}

mod laws {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Law: the simplified tree satisfies its structural invariants.
    #[test]
    fn test_section_tree_invariants() {
        let invoice = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();

        let tree = invoice.sections.expect("household produces sections");
        tree.validate().expect("simplified tree must be valid");
        assert!(tree.range().is_proper());
    }

    /// Law: every payment is non-negative.
    #[test]
    fn test_non_negativity() {
        let invoice = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();

        assert!(invoice.lines.iter().all(|l| l.amount >= 0.0));
    }

    /// Law: normalized payments sum to the invoiced amount.
    #[test]
    fn test_conservation_under_normalize() {
        for amount in [1.0, 100.0, 1234.56] {
            let invoice = distribute(
                &household(),
                date(2023, 2, 1),
                date(2023, 12, 31),
                amount,
                &options(),
            )
            .unwrap();
            let sum: f64 = invoice.lines.iter().map(|l| l.amount).sum();
            assert!((sum - amount).abs() < EPSILON, "sum {sum} != {amount}");
        }
    }

    /// Law: excluding a person absent from the range changes nothing.
    #[test]
    fn test_exclusion_of_absent_person_is_idempotent() {
        let baseline = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();

        let opts = options().with_excluded(vec!["Person X".to_string()]);
        let excluded = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &opts,
        )
        .unwrap();

        assert_eq!(amounts(&baseline.lines), amounts(&excluded.lines));
    }

    /// Law: identical inputs produce identical output, names ascending.
    #[test]
    fn test_deterministic_name_ordering() {
        let first = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();
        let second = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();

        assert_eq!(amounts(&first.lines), amounts(&second.lines));

        let names: Vec<String> = first.lines.iter().map(|l| l.person.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    /// Shuffled input ordering does not change the result.
    #[test]
    fn test_input_order_independence() {
        let mut reversed = household();
        reversed.reverse();

        let invoice_a = distribute(
            &household(),
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();
        let invoice_b = distribute(
            &reversed,
            date(2023, 2, 1),
            date(2023, 12, 31),
            100.0,
            &options(),
        )
        .unwrap();

        assert_eq!(amounts(&invoice_a.lines), amounts(&invoice_b.lines));
    }
}

mod boundaries {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_range_is_rejected() {
        let result = distribute(&household(), date(2023, 6, 1), date(2023, 6, 1), 100.0, &options());
        assert!(matches!(result, Err(MeterError::InvalidDateRange { .. })));

        let result = distribute(&household(), date(2023, 7, 1), date(2023, 6, 1), 100.0, &options());
        assert!(matches!(result, Err(MeterError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_no_persons_is_an_empty_invoice() {
        let invoice =
            distribute(&[], date(2023, 1, 1), date(2023, 12, 31), 100.0, &options()).unwrap();
        assert!(invoice.lines.is_empty());
        assert!(invoice.sections.is_none());
    }

    #[test]
    fn test_person_without_move_in_is_not_accountable() {
        let persons = vec![
            Person::new("Ada", Some(date(2023, 1, 1)), None),
            Person::new("Ghost", None, Some(date(2023, 6, 1))),
        ];
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 100.0, &options()).unwrap();

        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].person.name, "Ada");
    }

    #[test]
    fn test_everyone_disjoint_is_an_empty_invoice() {
        let persons = vec![Person::new(
            "Past",
            Some(date(2020, 1, 1)),
            Some(date(2020, 6, 1)),
        )];
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 100.0, &options()).unwrap();
        assert!(invoice.lines.is_empty());
    }
}

mod repositories {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invoice_through_memory_store() {
        let store = MemoryStore::new(Vec::new(), household());
        let invoice =
            build_invoice(&store, date(2023, 2, 1), date(2023, 12, 31), 100.0, &options()).unwrap();

        assert_eq!(invoice.lines.len(), 4);
        let sum: f64 = invoice.lines.iter().map(|l| l.amount).sum();
        assert!((sum - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_invoice_through_sqlite_store() {
        let store = MeterStore::open_in_memory().unwrap();
        for person in household() {
            store.add_person(&person).unwrap();
        }
        // Readings in range are returned alongside but do not affect the
        // distribution.
        store
            .add_reading(&Reading::new(date(2023, 3, 1), [Some(100.0), None, None]))
            .unwrap();

        let invoice =
            build_invoice(&store, date(2023, 2, 1), date(2023, 12, 31), 100.0, &options()).unwrap();

        assert_amounts(
            &amounts(&invoice.lines),
            &[
                ("Person A", 50.300),
                ("Person B", 9.985),
                ("Person C", 26.952),
                ("Person D", 12.763),
            ],
        );
    }

    #[test]
    fn test_invoice_against_on_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meterlog.db");

        {
            let store = MeterStore::open(&path).unwrap();
            for person in household() {
                store.add_person(&person).unwrap();
            }
        }

        // Reopen and query through the repository boundary.
        let store = MeterStore::open(&path).unwrap();
        let (_, persons) = store.data_between(date(2023, 2, 1), date(2023, 12, 31)).unwrap();
        assert_eq!(persons.len(), 4);

        let invoice =
            build_invoice(&store, date(2023, 2, 1), date(2023, 12, 31), 100.0, &options()).unwrap();
        let sum: f64 = invoice.lines.iter().map(|l| l.amount).sum();
        assert!((sum - 100.0).abs() < EPSILON);
    }
}
