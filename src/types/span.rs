//! Closed calendar-date intervals used for collection windows, outage
//! windows and query ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a [`DateSpan`] would end before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid date span: start {start} is after end {end}")]
pub struct InvalidDateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A closed interval of calendar days, `start..=end`.
///
/// Spans are validated at construction and on deserialization, so an
/// inverted range can never reach the query layer.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use velostat::DateSpan;
///
/// let start = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 5, 14).unwrap();
/// let span = DateSpan::new(start, end).unwrap();
///
/// assert!(span.contains(start));
/// assert!(span.contains(end));
/// assert!(DateSpan::new(end, start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SpanParts", into = "SpanParts")]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Creates a span from `start` to `end`, both inclusive.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateSpan> {
        if start > end {
            Err(InvalidDateSpan { start, end })
        } else {
            Ok(Self { start, end })
        }
    }

    /// A span covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The first day of the span.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day of the span.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `day` falls inside the span, boundaries included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Serialize, Deserialize)]
struct SpanParts {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<SpanParts> for DateSpan {
    type Error = InvalidDateSpan;

    fn try_from(parts: SpanParts) -> Result<Self, Self::Error> {
        DateSpan::new(parts.start, parts.end)
    }
}

impl From<DateSpan> for SpanParts {
    fn from(span: DateSpan) -> Self {
        SpanParts {
            start: span.start,
            end: span.end,
        }
    }
}
