//! Bucket resolutions and aggregation modes accepted by the resampling
//! engine.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The bucket width used when resampling a canonical series.
///
/// Sub-daily resolutions bucket by fixed-width wall-clock intervals aligned
/// to midnight. Daily buckets start at midnight. Weekly buckets cover a
/// Monday-started week and are labeled with the Monday *following* that
/// week, matching the dashboard's week convention. Monthly buckets are
/// labeled with the first of the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Fixed 15-minute intervals, the native sampling rate of most counters.
    #[serde(rename = "15min")]
    FifteenMin,
    /// Fixed 30-minute intervals.
    #[serde(rename = "30min")]
    ThirtyMin,
    /// One bucket per wall-clock hour.
    #[serde(rename = "hourly")]
    Hourly,
    /// One bucket per calendar day.
    #[default]
    #[serde(rename = "daily")]
    Daily,
    /// One bucket per Monday-started week, labeled by the following Monday.
    #[serde(rename = "weekly")]
    Weekly,
    /// One bucket per calendar month, labeled by the first of the month.
    #[serde(rename = "monthly")]
    Monthly,
}

impl Resolution {
    /// Returns the label of the bucket containing `ts`.
    ///
    /// Labels are the only bucket identity the engine uses: two samples
    /// belong to the same bucket exactly when they map to the same label.
    pub fn bucket_start(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let date = ts.date();
        let midnight = date.and_time(NaiveTime::MIN);
        match self {
            Resolution::FifteenMin => midnight + Duration::minutes(floor_minutes(ts, 15)),
            Resolution::ThirtyMin => midnight + Duration::minutes(floor_minutes(ts, 30)),
            Resolution::Hourly => midnight + Duration::hours(i64::from(ts.hour())),
            Resolution::Daily => midnight,
            Resolution::Weekly => {
                let days_past_monday = i64::from(date.weekday().num_days_from_monday());
                (date + Duration::days(7 - days_past_monday)).and_time(NaiveTime::MIN)
            }
            Resolution::Monthly => {
                (date - Duration::days(i64::from(date.day()) - 1)).and_time(NaiveTime::MIN)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Resolution::FifteenMin => "15min",
            Resolution::ThirtyMin => "30min",
            Resolution::Hourly => "hourly",
            Resolution::Daily => "daily",
            Resolution::Weekly => "weekly",
            Resolution::Monthly => "monthly",
        }
    }
}

/// Formats a `Resolution` with the same short name its serde form uses.
///
/// # Examples
///
/// ```
/// use velostat::Resolution;
///
/// assert_eq!(format!("{}", Resolution::FifteenMin), "15min");
/// assert_eq!(Resolution::Weekly.to_string(), "weekly");
/// ```
impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The sub-daily resolutions a cross-tabulation can be built from.
///
/// Distribution views group fine buckets by hour or weekday; feeding them a
/// daily or coarser series would collapse every group to one sample, so the
/// accepted inputs are closed off here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FineResolution {
    /// 15-minute buckets.
    FifteenMin,
    /// Hourly buckets.
    Hourly,
}

impl FineResolution {
    /// The plain [`Resolution`] this fine resolution aggregates at.
    pub fn resolution(&self) -> Resolution {
        match self {
            FineResolution::FifteenMin => Resolution::FifteenMin,
            FineResolution::Hourly => Resolution::Hourly,
        }
    }
}

/// How samples inside a bucket are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggMode {
    /// Sum of the present samples.
    Sum,
    /// Mean of the present samples.
    Mean,
}

fn floor_minutes(ts: NaiveDateTime, width: i64) -> i64 {
    let into_day = i64::from(ts.hour()) * 60 + i64::from(ts.minute());
    (into_day / width) * width
}
