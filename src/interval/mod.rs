//! Date interval algebra.
//!
//! [`DateSpan`] is the closed interval `[low, high]` value object used by
//! the section tree builder, and [`Intersection`] its six-valued overlap
//! classification.
//!
//! The classification reads *self relative to other*:
//! `a.intersect(&b) == Intersection::SubSet` means "a is a subset of b".
//! Spans sharing their low endpoint classify as [`Intersection::PartialRight`]
//! even when one contains the other; the section tree builder relies on this
//! exact decision tree, so it must not be "corrected" toward pure set
//! semantics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mean length of a calendar year in days.
pub const DAYS_IN_YEAR: f64 = 365.25;

/// Mean length of a calendar month in days.
pub const DAYS_IN_MONTH: f64 = DAYS_IN_YEAR / 12.0;

/// Overlap classification of two date spans, read *self relative to other*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intersection {
    /// The spans do not overlap.
    Disjoint,
    /// Both endpoints coincide.
    Equal,
    /// Self is contained in other.
    SubSet,
    /// Self contains other.
    SuperSet,
    /// Other extends past self's low end.
    PartialLeft,
    /// Other extends past self's high end.
    PartialRight,
}

/// A closed date interval `[low, high]`.
///
/// `days()` may be zero or negative; consumers treat such spans as
/// degenerate and discard them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    low: NaiveDate,
    high: NaiveDate,
}

impl DateSpan {
    /// Create a new span. Both endpoints are kept as given, even when
    /// `high < low`, so that degenerate spans stay observable.
    #[must_use]
    pub const fn new(low: NaiveDate, high: NaiveDate) -> Self {
        Self { low, high }
    }

    /// Lower endpoint.
    #[must_use]
    pub const fn low(&self) -> NaiveDate {
        self.low
    }

    /// Upper endpoint.
    #[must_use]
    pub const fn high(&self) -> NaiveDate {
        self.high
    }

    /// Signed length in days, `high − low`.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.high - self.low).num_days()
    }

    /// Length in mean months.
    #[must_use]
    pub fn months(&self) -> f64 {
        self.days() as f64 / DAYS_IN_MONTH
    }

    /// Length in mean years.
    #[must_use]
    pub fn years(&self) -> f64 {
        self.days() as f64 / DAYS_IN_YEAR
    }

    /// Whether the span covers at least one day.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.days() > 0
    }

    /// Classify the overlap of `self` relative to `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Intersection {
        if self.low == other.low && self.high == other.high {
            return Intersection::Equal;
        }

        if other.low < self.low {
            if other.high < self.low {
                Intersection::Disjoint
            } else if other.high >= self.high {
                Intersection::SubSet
            } else {
                Intersection::PartialLeft
            }
        } else if other.low > self.high {
            Intersection::Disjoint
        } else if other.high > self.high {
            Intersection::PartialRight
        } else {
            Intersection::SuperSet
        }
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} .. {}]", self.low, self.high)
    }
}
