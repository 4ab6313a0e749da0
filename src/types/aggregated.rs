//! Output rows of the resampling engine.

use crate::types::filters::{Direction, WeekdaySet};
use crate::types::resolution::{AggMode, Resolution};
use chrono::{NaiveDateTime, Weekday};

/// One bucket of an aggregated series.
///
/// Counts are floats because `Mean` aggregation produces fractional values;
/// `None` marks a bucket whose every source sample was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct AggRow {
    /// Label of the bucket, at the resolution's alignment.
    pub bucket_start: NaiveDateTime,
    pub in_count: Option<f64>,
    pub out_count: Option<f64>,
    pub combined: Option<f64>,
    /// Day of week of `bucket_start` itself, not of any source sample.
    pub day_of_week: Weekday,
}

impl AggRow {
    /// The value of the requested count column.
    pub fn value(&self, direction: Direction) -> Option<f64> {
        match direction {
            Direction::In => self.in_count,
            Direction::Out => self.out_count,
            Direction::Combined => self.combined,
        }
    }
}

/// An ordered sequence of buckets at one resolution.
///
/// Produced by [`aggregate()`](crate::aggregate()); never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    resolution: Resolution,
    mode: AggMode,
    rows: Vec<AggRow>,
}

impl AggregatedSeries {
    pub(crate) fn new(resolution: Resolution, mode: AggMode, rows: Vec<AggRow>) -> Self {
        Self {
            resolution,
            mode,
            rows,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn mode(&self) -> AggMode {
        self.mode
    }

    pub fn rows(&self) -> &[AggRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggRow> {
        self.rows.iter()
    }

    /// A copy keeping only buckets whose day of week is in `days`, in the
    /// original order.
    pub fn filter_weekdays(&self, days: WeekdaySet) -> AggregatedSeries {
        let rows = self
            .rows
            .iter()
            .filter(|row| days.contains(row.day_of_week))
            .cloned()
            .collect();
        AggregatedSeries::new(self.resolution, self.mode, rows)
    }

    /// Gap-aware sum of one column over all buckets.
    ///
    /// `None` when every bucket is missing for that column; otherwise the
    /// sum of the present buckets.
    pub fn total(&self, direction: Direction) -> Option<f64> {
        let mut sum = 0.0;
        let mut present = 0usize;
        for row in &self.rows {
            if let Some(value) = row.value(direction) {
                sum += value;
                present += 1;
            }
        }
        (present > 0).then_some(sum)
    }

    /// Gap-aware mean of one column over the buckets where it is present.
    pub fn mean(&self, direction: Direction) -> Option<f64> {
        let mut sum = 0.0;
        let mut present = 0usize;
        for row in &self.rows {
            if let Some(value) = row.value(direction) {
                sum += value;
                present += 1;
            }
        }
        (present > 0).then(|| sum / present as f64)
    }
}
