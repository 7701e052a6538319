//! Data model for meter readings and occupancy records.
//!
//! This module provides the two record types the rest of the crate operates
//! on: [`Reading`] (a dated meter snapshot carrying up to
//! [`ATTRIBUTE_COUNT`] cumulative counter values) and [`Person`] (an
//! occupancy interval identified by name).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MeterError, Result};
use crate::interval::DateSpan;

/// Number of meter attributes tracked per reading.
///
/// The attribute slots are shared across the whole system: the store schema,
/// the analyzer and the CLI all assume exactly this many channels.
pub const ATTRIBUTE_COUNT: usize = 3;

/// Display names of the meter attributes, in slot order.
pub const ATTRIBUTE_NAMES: [&str; ATTRIBUTE_COUNT] = ["electricity", "gas", "water"];

/// A dated meter snapshot.
///
/// Each attribute slot holds the cumulative counter value of one meter
/// channel, or `None` when that channel was not read on this date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Calendar date of the observation. Unique within one store.
    pub date: NaiveDate,
    /// Cumulative counter values, one per channel.
    pub attributes: [Option<f64>; ATTRIBUTE_COUNT],
}

impl Reading {
    /// Create a new reading.
    #[must_use]
    pub fn new(date: NaiveDate, attributes: [Option<f64>; ATTRIBUTE_COUNT]) -> Self {
        Self { date, attributes }
    }

    /// Get the value of attribute `k`, if present.
    #[must_use]
    pub fn attribute(&self, k: usize) -> Option<f64> {
        self.attributes.get(k).copied().flatten()
    }

    /// Check whether any attribute carries a value.
    #[must_use]
    pub fn has_values(&self) -> bool {
        self.attributes.iter().any(Option::is_some)
    }
}

/// An occupancy record.
///
/// `move_in`/`move_out` bound the inhabited interval; an open `move_out`
/// means the person still lives there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub name: String,
    /// First inhabited day.
    pub move_in: Option<NaiveDate>,
    /// Last inhabited day, or `None` while the person still lives there.
    pub move_out: Option<NaiveDate>,
}

impl Person {
    /// Create a new person record.
    #[must_use]
    pub fn new(name: impl Into<String>, move_in: Option<NaiveDate>, move_out: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            move_in,
            move_out,
        }
    }

    /// Validate the record: non-empty name, `move_in ≤ move_out` when both
    /// dates are present.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MeterError::InvalidPerson {
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        if let (Some(move_in), Some(move_out)) = (self.move_in, self.move_out) {
            if move_out < move_in {
                return Err(MeterError::InvalidPerson {
                    name: self.name.clone(),
                    reason: format!("move_out {move_out} lies before move_in {move_in}"),
                });
            }
        }
        Ok(())
    }

    /// The inhabited interval, with an open `move_out` closed at `today`.
    ///
    /// Returns `None` when `move_in` is missing; such a person is not
    /// accountable for any costs.
    #[must_use]
    pub fn occupancy(&self, today: NaiveDate) -> Option<DateSpan> {
        self.move_in
            .map(|move_in| DateSpan::new(move_in, self.move_out.unwrap_or(today)))
    }
}
