//! The canonical gap-aware representation of one site's raw counts.

use crate::series::error::SeriesError;
use crate::types::span::DateSpan;
use chrono::{NaiveDate, NaiveDateTime};

/// One sensor sample: a timestamp with directional counts.
///
/// `None` is the explicit missing marker and is never interchangeable with
/// zero: a gap means the sensor reported nothing, a zero means it reported
/// no traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRecord {
    pub timestamp: NaiveDateTime,
    pub in_count: Option<u32>,
    pub out_count: Option<u32>,
}

impl CountRecord {
    /// The combined count, present only when both directions are.
    ///
    /// A sample with one direction missing has no meaningful total, so the
    /// gap propagates instead of silently halving the traffic.
    pub fn combined(&self) -> Option<u32> {
        self.in_count.zip(self.out_count).map(|(i, o)| i + o)
    }
}

/// An ordered, duplicate-free series of [`CountRecord`]s for one site.
///
/// Within the site's collection window every expected sampling timestamp is
/// present, with absent slots carrying the missing marker. The series is
/// immutable once built; aggregation always returns fresh output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSeries {
    site_id: String,
    interval_minutes: u32,
    records: Vec<CountRecord>,
}

impl CanonicalSeries {
    /// Builds a series from raw records, sorting them by timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::DuplicateTimestamp`] if two records share a
    /// timestamp; a series with ambiguous samples cannot be aggregated
    /// meaningfully.
    pub fn from_records(
        site_id: impl Into<String>,
        interval_minutes: u32,
        mut records: Vec<CountRecord>,
    ) -> Result<Self, SeriesError> {
        let site_id = site_id.into();
        records.sort_by_key(|record| record.timestamp);
        for pair in records.windows(2) {
            if pair[0].timestamp == pair[1].timestamp {
                return Err(SeriesError::DuplicateTimestamp {
                    site: site_id,
                    timestamp: pair[0].timestamp,
                });
            }
        }
        Ok(Self {
            site_id,
            interval_minutes,
            records,
        })
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// The expected sampling interval, in minutes.
    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn records(&self) -> &[CountRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountRecord> {
        self.records.iter()
    }

    /// The first calendar day with any record, for date-picker bounds.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|record| record.timestamp.date())
    }

    /// The last calendar day with any record.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|record| record.timestamp.date())
    }

    /// The span from the first to the last record's day, if any.
    pub fn collection_span(&self) -> Option<DateSpan> {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => DateSpan::new(first, last).ok(),
            _ => None,
        }
    }
}
