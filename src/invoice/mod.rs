//! Fair cost-distribution invoices.
//!
//! This module composes the section tree builder and the contribution
//! solver into the invoice entry point: given a date range, a total cost
//! and the occupancy records overlapping the range, [`build_invoice`]
//! produces one payment line per responsible occupant.
//!
//! Excluding a person simply removes their occupancy before the tree is
//! built; the section they would have claimed falls to whoever covers it,
//! so no compensation line for the excluded person appears.

pub mod chart;
pub mod contribution;
pub mod section;

pub use contribution::{contributions, Contribution};
pub use section::{Occupancy, SectionNode};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeterError, Result};
use crate::interval::DateSpan;
use crate::model::Person;
use crate::store::Repository;

/// Options controlling invoice computation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceOptions {
    /// Names excluded from the distribution.
    pub exclude_names: Vec<String>,
    /// Divide the contribution vector by its total mass before scaling.
    pub normalize: bool,
    /// Substitute for open move-out dates.
    pub today: NaiveDate,
}

impl InvoiceOptions {
    /// Default options: no exclusions, normalization on.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            exclude_names: Vec::new(),
            normalize: true,
            today,
        }
    }

    /// Exclude the given names from the distribution.
    #[must_use]
    pub fn with_excluded(mut self, names: Vec<String>) -> Self {
        self.exclude_names = names;
        self
    }

    /// Enable or disable normalization.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// One payment line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// The paying occupant.
    pub person: Person,
    /// The amount owed.
    pub amount: f64,
}

/// An invoice over a date range, with the simplified section tree kept for
/// inspection and chart rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoiced date range.
    pub range: DateSpan,
    /// Total invoiced amount.
    pub total: f64,
    /// Payment lines, ordered by person name.
    pub lines: Vec<InvoiceLine>,
    /// The simplified responsibility tree, absent when nobody was
    /// accountable.
    pub sections: Option<SectionNode>,
}

/// Compute a cost-distribution invoice from repository data.
///
/// Queries the repository for persons overlapping `[start, end]`, filters
/// them down to the accountable set (a move-in date is required; excluded
/// names are removed; open move-outs close at `options.today`), and
/// distributes `amount` over the resulting responsibility sections.
///
/// # Errors
///
/// - [`MeterError::InvalidDateRange`] when `start ≥ end`.
/// - [`MeterError::InvalidTreeStructure`] when the simplified tree violates
///   its invariants (a bug, not a data error).
/// - Repository errors are passed through.
pub fn build_invoice(
    repository: &dyn Repository,
    start: NaiveDate,
    end: NaiveDate,
    amount: f64,
    options: &InvoiceOptions,
) -> Result<Invoice> {
    if start >= end {
        return Err(MeterError::InvalidDateRange { start, end });
    }

    let (_, persons) = repository.data_between(start, end)?;
    distribute(&persons, start, end, amount, options)
}

/// Distribute `amount` over already-loaded person records.
///
/// This is the repository-free core of [`build_invoice`]; see there for
/// semantics and errors.
pub fn distribute(
    persons: &[Person],
    start: NaiveDate,
    end: NaiveDate,
    amount: f64,
    options: &InvoiceOptions,
) -> Result<Invoice> {
    if start >= end {
        return Err(MeterError::InvalidDateRange { start, end });
    }
    let range = DateSpan::new(start, end);

    let accountable: Vec<(Person, Occupancy)> = persons
        .iter()
        .filter(|p| !options.exclude_names.iter().any(|n| n == &p.name))
        .filter_map(|p| {
            p.occupancy(options.today).map(|span| {
                (
                    p.clone(),
                    Occupancy {
                        person: p.clone(),
                        span,
                    },
                )
            })
        })
        .collect();

    debug!(
        %range,
        accountable = accountable.len(),
        excluded = options.exclude_names.len(),
        "distributing invoice"
    );

    if accountable.is_empty() {
        return Ok(Invoice {
            range,
            total: amount,
            lines: Vec::new(),
            sections: None,
        });
    }

    let occupancies: Vec<Occupancy> = accountable.iter().map(|(_, o)| o.clone()).collect();
    let Some(tree) = SectionNode::build(range, &occupancies).simplify() else {
        // Every accountable occupancy was disjoint from the range.
        return Ok(Invoice {
            range,
            total: amount,
            lines: Vec::new(),
            sections: None,
        });
    };
    tree.validate()?;

    let mut contrib = contributions(&tree);
    if options.normalize {
        contrib.normalize();
    }
    contrib.scale(amount);

    let mut lines: Vec<InvoiceLine> = contrib
        .iter()
        .map(|(name, share)| {
            let person = accountable
                .iter()
                .map(|(p, _)| p)
                .find(|p| p.name == name)
                .cloned()
                .ok_or_else(|| MeterError::tree(format!("section occupant '{name}' unknown")))?;
            Ok(InvoiceLine {
                person,
                amount: share,
            })
        })
        .collect::<Result<_>>()?;
    lines.sort_by(|a, b| a.person.name.cmp(&b.person.name));

    Ok(Invoice {
        range,
        total: amount,
        lines,
        sections: Some(tree),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn options() -> InvoiceOptions {
        InvoiceOptions::new(date(2024, 1, 1))
    }

    #[test]
    fn test_rejects_inverted_range() {
        let persons = vec![Person::new("Ada", Some(date(2023, 1, 1)), None)];
        let err = distribute(&persons, date(2023, 6, 1), date(2023, 6, 1), 100.0, &options());
        assert!(matches!(err, Err(MeterError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_no_accountable_persons_yields_empty_invoice() {
        // Missing move_in makes a person unaccountable.
        let persons = vec![Person::new("Ada", None, Some(date(2023, 6, 1)))];
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 100.0, &options()).unwrap();
        assert!(invoice.lines.is_empty());
        assert!(invoice.sections.is_none());
    }

    #[test]
    fn test_single_person_pays_everything() {
        let persons = vec![Person::new("Ada", Some(date(2023, 1, 1)), None)];
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 240.0, &options()).unwrap();

        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].person.name, "Ada");
        assert!((invoice.lines[0].amount - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_exclusion_removes_person_without_compensation() {
        let persons = vec![
            Person::new("Ada", Some(date(2023, 1, 1)), None),
            Person::new("Bob", Some(date(2023, 1, 1)), None),
        ];

        let opts = options().with_excluded(vec!["Bob".to_string()]);
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 100.0, &opts).unwrap();

        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].person.name, "Ada");
        assert!((invoice.lines[0].amount - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_lines_are_name_ordered() {
        let persons = vec![
            Person::new("Zoe", Some(date(2023, 1, 1)), None),
            Person::new("Ada", Some(date(2023, 1, 1)), None),
            Person::new("Mia", Some(date(2023, 1, 1)), None),
        ];
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 90.0, &options()).unwrap();

        let names: Vec<&str> = invoice.lines.iter().map(|l| l.person.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Mia", "Zoe"]);
    }

    #[test]
    fn test_unnormalized_distribution_scales_raw_mass() {
        let persons = vec![Person::new("Ada", Some(date(2023, 1, 1)), None)];
        let opts = options().with_normalize(false);
        let invoice =
            distribute(&persons, date(2023, 1, 1), date(2023, 12, 31), 100.0, &opts).unwrap();

        // A lone occupant's raw mass is already one.
        assert!((invoice.lines[0].amount - 100.0).abs() < 1e-9);
    }
}
