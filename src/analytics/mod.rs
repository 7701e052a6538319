//! Statistical analysis of meter readings.
//!
//! This module provides:
//! - Per-attribute consumption totals, per-day means and deviations
//! - Meter-reset and missing-sample handling
//! - Extrapolation of observed rates to requested frame bounds
//! - Monthly, yearly and whole-range framing
//!
//! Meter values are cumulative, so all rate statistics are computed over
//! the *differences* of consecutive usable values, expressed per day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Reading, ATTRIBUTE_COUNT};

/// A statistical triple with optional extreme-value witnesses.
///
/// `W` is the witness type: the days measurement reuses the witness slots
/// for the frame bounds (`W = NaiveDate`), attribute measurements carry the
/// readings holding the smallest and largest observed value (`W = Reading`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement<W = f64> {
    /// Total over the frame. Absent when no usable pair of values exists.
    pub absolute: Option<f64>,
    /// Per-day mean.
    pub mean: Option<f64>,
    /// Per-day sample standard deviation. Needs more than one usable pair.
    pub deviation: Option<f64>,
    /// Witness of the smallest value.
    pub minimum: Option<W>,
    /// Witness of the largest value.
    pub maximum: Option<W>,
}

impl<W> Measurement<W> {
    /// A zero-filled measurement without witnesses.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            absolute: Some(0.0),
            mean: Some(0.0),
            deviation: Some(0.0),
            minimum: None,
            maximum: None,
        }
    }
}

/// Statistics of one date frame of readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStatistics {
    /// Number of readings in the frame.
    pub readings_count: usize,
    /// Statistics over the day gaps between consecutive readings; the
    /// witness slots hold the frame bounds.
    pub days_stats: Measurement<NaiveDate>,
    /// Per-attribute consumption statistics, one entry per channel.
    pub attribute_stats: Vec<Measurement<Reading>>,
}

impl FrameStatistics {
    /// The empty result used whenever a frame has fewer than two readings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            readings_count: 0,
            days_stats: Measurement::zeroed(),
            attribute_stats: (0..ATTRIBUTE_COUNT).map(|_| Measurement::zeroed()).collect(),
        }
    }
}

/// Statistics of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedMonth {
    /// Month number, 1-based.
    pub month: u32,
    /// Frame statistics over `[first of month, first of next month]`.
    pub stats: FrameStatistics,
}

/// Statistics of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedYear {
    /// Calendar year.
    pub year: i32,
    /// Frame statistics over `[Jan 1, Jan 1 of the next year]`.
    pub stats: FrameStatistics,
}

/// Monthly statistics grouped under their calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedYearMonths {
    /// Calendar year.
    pub year: i32,
    /// Analyzed months of this year, ascending.
    pub months: Vec<AnalyzedMonth>,
}

/// Statistically analyze a set of readings by different framings.
///
/// Readings can be analyzed:
/// - in monthly frames grouped and ordered by year
/// - in yearly frames
/// - as a single frame spanning the whole data set
#[derive(Debug, Clone)]
pub struct ReadingAnalyzer {
    readings: Vec<Reading>,
    years: Vec<i32>,
}

impl ReadingAnalyzer {
    /// Create an analyzer over raw store data.
    ///
    /// Readings are sorted by date; the sort is stable, so of two readings
    /// sharing a date the one stored later wins any tie downstream.
    #[must_use]
    pub fn new(mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.date);

        let mut years: Vec<i32> = readings.iter().map(|r| r.date.year()).collect();
        years.dedup();

        Self { readings, years }
    }

    /// The analyzed readings, date ascending.
    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Analyze per calendar month, grouped by year.
    ///
    /// Months with fewer than two readings are dropped (no statistics can
    /// be derived), as are years left without any analyzable month. Each
    /// month is framed `[first of month, first of next month]` so totals
    /// extrapolate to full months.
    #[must_use]
    pub fn monthly(&self) -> Vec<AnalyzedYearMonths> {
        let mut out = Vec::new();

        for &year in &self.years {
            let in_year: Vec<&Reading> =
                self.readings.iter().filter(|r| r.date.year() == year).collect();

            let mut months = Vec::new();
            for month in 1..=12 {
                let points: Vec<Reading> = in_year
                    .iter()
                    .filter(|r| r.date.month() == month)
                    .map(|r| (*r).clone())
                    .collect();
                if points.len() < 2 {
                    continue;
                }

                let frame_lower = first_of_month(year, month);
                let frame_upper = first_of_next_month(year, month);
                months.push(AnalyzedMonth {
                    month,
                    stats: frame_statistics(&points, Some(frame_lower), Some(frame_upper)),
                });
            }

            if !months.is_empty() {
                out.push(AnalyzedYearMonths { year, months });
            }
        }

        out
    }

    /// Analyze per calendar year.
    ///
    /// Every year present in the data yields an entry; years with fewer
    /// than two readings carry the empty statistics.
    #[must_use]
    pub fn yearly(&self) -> Vec<AnalyzedYear> {
        self.years
            .iter()
            .map(|&year| {
                let points: Vec<Reading> = self
                    .readings
                    .iter()
                    .filter(|r| r.date.year() == year)
                    .cloned()
                    .collect();

                AnalyzedYear {
                    year,
                    stats: frame_statistics(
                        &points,
                        Some(first_of_month(year, 1)),
                        Some(first_of_month(year + 1, 1)),
                    ),
                }
            })
            .collect()
    }

    /// Analyze the complete data set as a single frame spanning the actual
    /// first and last reading dates.
    #[must_use]
    pub fn completely(&self) -> FrameStatistics {
        frame_statistics(&self.readings, None, None)
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month in 1..=12")
}

fn first_of_next_month(year: i32, month: u32) -> NaiveDate {
    if month < 12 {
        first_of_month(year, month + 1)
    } else {
        first_of_month(year + 1, 1)
    }
}

/// Usable as an extrapolation anchor: present and non-zero.
fn is_anchor(reading: &Reading, k: usize) -> bool {
    reading.attribute(k).is_some_and(|v| v != 0.0)
}

/// Sample standard deviation of `samples`, two-pass form.
fn sample_deviation(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let squared: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    Some((squared / (samples.len() - 1) as f64).sqrt())
}

/// Statistically analyze a frame of reading points.
///
/// Computes, for the day gaps and for each attribute: total, per-day mean,
/// per-day standard deviation and extreme-value witnesses. When a frame
/// bound is given, attribute totals are extrapolated across the days the
/// samples did not cover; unset bounds default to the first and last point
/// dates. Expect noisy values for very small frames or few data points.
///
/// Fewer than two points yield [`FrameStatistics::empty`]; the function is
/// total over well-typed input.
#[must_use]
pub fn frame_statistics(
    points: &[Reading],
    frame_lower: Option<NaiveDate>,
    frame_upper: Option<NaiveDate>,
) -> FrameStatistics {
    let count = points.len();
    if count < 2 {
        return FrameStatistics::empty();
    }
    debug_assert!(points.windows(2).all(|w| w[0].date <= w[1].date));

    let frame_lower = frame_lower.unwrap_or(points[0].date);
    let frame_upper = frame_upper.unwrap_or(points[count - 1].date);

    // Day gaps between consecutive readings.
    let day_deltas: Vec<f64> = points
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days() as f64)
        .collect();
    let total_days: f64 = day_deltas.iter().sum();

    let days_stats = Measurement {
        absolute: Some(total_days),
        mean: Some(total_days / (count - 1) as f64),
        deviation: sample_deviation(&day_deltas),
        minimum: Some(frame_lower),
        maximum: Some(frame_upper),
    };

    let attribute_stats = (0..ATTRIBUTE_COUNT)
        .map(|k| attribute_statistics(points, k, frame_lower, frame_upper))
        .collect();

    FrameStatistics {
        readings_count: count,
        days_stats,
        attribute_stats,
    }
}

/// Rate statistics of a single attribute channel over a frame.
///
/// The channel's values are cumulative, so consumption is accumulated over
/// the deltas of consecutive present values. A negative delta means the
/// meter was reset or replaced; that pair is excluded from the rate
/// statistics and its day span accrues as a gap. Gap days and frame days
/// outside the observed anchor range are backfilled with the mean rate.
fn attribute_statistics(
    points: &[Reading],
    k: usize,
    frame_lower: NaiveDate,
    frame_upper: NaiveDate,
) -> Measurement<Reading> {
    // Anchor dates bound the observed range for extrapolation. Zero values
    // do not anchor: a freshly reset meter says nothing about consumption
    // before the reset.
    let first_anchor = points.iter().find(|r| is_anchor(r, k)).map(|r| r.date);
    let last_anchor = points.iter().rev().find(|r| is_anchor(r, k)).map(|r| r.date);

    let mut total = 0.0;
    let mut rates: Vec<f64> = Vec::new();
    let mut gap_days: i64 = 0;
    let mut prev: Option<(NaiveDate, f64)> = None;

    for reading in points {
        let Some(value) = reading.attribute(k) else {
            continue;
        };

        if let Some((earlier_date, earlier_value)) = prev {
            let delta = value - earlier_value;
            let span_days = (reading.date - earlier_date).num_days();

            if span_days > 0 {
                if delta < 0.0 {
                    gap_days += span_days;
                } else {
                    total += delta;
                    rates.push(delta / span_days as f64);
                }
            }
            // Duplicate dates carry no span; the later reading wins.
        }

        prev = Some((reading.date, value));
    }

    let (minimum, maximum) = attribute_witnesses(points, k);

    if rates.is_empty() {
        return Measurement {
            absolute: None,
            mean: None,
            deviation: None,
            minimum,
            maximum,
        };
    }

    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    let deviation = sample_deviation(&rates);

    // Spread the mean daily rate over reset gaps and the frame days outside
    // the observed anchor range.
    let extra_days = match (first_anchor, last_anchor) {
        (Some(first), Some(last)) => {
            (first - frame_lower).num_days() + (frame_upper - last).num_days()
        }
        _ => 0,
    };
    total += (gap_days + extra_days) as f64 * mean;

    Measurement {
        absolute: Some(total),
        mean: Some(mean),
        deviation,
        minimum,
        maximum,
    }
}

/// The readings holding the smallest and largest present value of
/// attribute `k`. Ties resolve to the earliest reading.
fn attribute_witnesses(points: &[Reading], k: usize) -> (Option<Reading>, Option<Reading>) {
    let mut minimum: Option<&Reading> = None;
    let mut maximum: Option<&Reading> = None;

    for reading in points {
        let Some(value) = reading.attribute(k) else {
            continue;
        };
        let min_value = minimum.and_then(|m| m.attribute(k));
        if min_value.map_or(true, |m| value < m) {
            minimum = Some(reading);
        }
        let max_value = maximum.and_then(|m| m.attribute(k));
        if max_value.map_or(true, |m| value > m) {
            maximum = Some(reading);
        }
    }

    (minimum.cloned(), maximum.cloned())
}
