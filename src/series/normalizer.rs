//! Turns a raw `time`/`in`/`out` frame into the canonical gap-aware series
//! for one site.

use crate::series::error::SeriesError;
use crate::series::loader::{COL_IN, COL_OUT, COL_TIME};
use crate::types::count_series::{CanonicalSeries, CountRecord};
use crate::types::site::SiteConfig;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use log::{info, warn};
use polars::prelude::*;
use std::collections::BTreeMap;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M"];

/// Builds the canonical series for `site` from its raw counter frame.
///
/// Rows outside the site's collection window are dropped. Afterwards every
/// expected sampling timestamp inside the window is present, with absent
/// slots marked missing, and rows inside a declared outage are masked to
/// missing regardless of what the export contained. Rows that parse but
/// sit off the sampling grid are kept as-is.
///
/// # Errors
///
/// Any malformed timestamp fails the whole load; a partially loaded series
/// would silently skew one direction's totals. Negative or oversized
/// counts and duplicate timestamps are rejected the same way.
pub(crate) fn normalize(df: &DataFrame, site: &SiteConfig) -> Result<CanonicalSeries, SeriesError> {
    let time = str_column(df, COL_TIME)?;
    let in_counts = i64_column(df, COL_IN)?;
    let out_counts = i64_column(df, COL_OUT)?;

    let window = site.date_range;
    let mut rows: BTreeMap<NaiveDateTime, CountRecord> = BTreeMap::new();
    let mut off_grid = 0usize;
    let mut dropped = 0usize;

    for idx in 0..df.height() {
        let raw = time.get(idx).unwrap_or("");
        let timestamp = parse_timestamp(raw).ok_or_else(|| SeriesError::Timestamp {
            site: site.id.clone(),
            row: idx,
            value: raw.to_string(),
        })?;
        if !window.contains(timestamp.date()) {
            dropped += 1;
            continue;
        }
        let record = CountRecord {
            timestamp,
            in_count: count_value(in_counts.get(idx), site, idx)?,
            out_count: count_value(out_counts.get(idx), site, idx)?,
        };
        if !on_grid(timestamp, site.sample_interval_minutes) {
            off_grid += 1;
        }
        if rows.insert(timestamp, record).is_some() {
            return Err(SeriesError::DuplicateTimestamp {
                site: site.id.clone(),
                timestamp,
            });
        }
    }

    if dropped > 0 {
        info!(
            "Dropped {} rows outside the collection window for site '{}'",
            dropped, site.id
        );
    }
    if off_grid > 0 {
        warn!(
            "{} rows for site '{}' are off the {}-minute sampling grid",
            off_grid, site.id, site.sample_interval_minutes
        );
    }

    fill_sampling_grid(&mut rows, site);
    mask_outages(&mut rows, site);

    CanonicalSeries::from_records(
        site.id.clone(),
        site.sample_interval_minutes,
        rows.into_values().collect(),
    )
}

/// Inserts a missing record at every expected sampling slot of the window
/// that the export did not cover.
fn fill_sampling_grid(rows: &mut BTreeMap<NaiveDateTime, CountRecord>, site: &SiteConfig) {
    let step = Duration::minutes(i64::from(site.sample_interval_minutes.max(1)));
    let mut slot = site.date_range.start().and_time(NaiveTime::MIN);
    let end = site.date_range.end().and_time(NaiveTime::MIN) + Duration::days(1);
    while slot < end {
        rows.entry(slot).or_insert(CountRecord {
            timestamp: slot,
            in_count: None,
            out_count: None,
        });
        slot += step;
    }
}

/// Overwrites counts inside declared outage windows with the missing
/// marker. An offline sensor must never read as zero traffic.
fn mask_outages(rows: &mut BTreeMap<NaiveDateTime, CountRecord>, site: &SiteConfig) {
    if site.outages.is_empty() {
        return;
    }
    let mut masked = 0usize;
    for record in rows.values_mut() {
        let day = record.timestamp.date();
        if site.outages.iter().any(|outage| outage.contains(day)) {
            if record.in_count.is_some() || record.out_count.is_some() {
                masked += 1;
            }
            record.in_count = None;
            record.out_count = None;
        }
    }
    if masked > 0 {
        info!(
            "Masked {} recorded rows inside declared outages for site '{}'",
            masked, site.id
        );
    }
}

fn count_value(value: Option<i64>, site: &SiteConfig, row: usize) -> Result<Option<u32>, SeriesError> {
    match value {
        None => Ok(None),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| SeriesError::InvalidCount {
                site: site.id.clone(),
                row,
                value: v,
            }),
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn on_grid(ts: NaiveDateTime, interval_minutes: u32) -> bool {
    if interval_minutes == 0 {
        return true;
    }
    let into_day = ts.hour() * 60 + ts.minute();
    ts.second() == 0 && into_day % interval_minutes == 0
}

fn str_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, SeriesError> {
    df.column(name)
        .and_then(|column| column.str())
        .map_err(|e| SeriesError::ColumnType(name.to_string(), e))
}

fn i64_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Int64Chunked, SeriesError> {
    df.column(name)
        .and_then(|column| column.i64())
        .map_err(|e| SeriesError::ColumnType(name.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::site::DirectionLabels;
    use crate::types::span::DateSpan;
    use chrono::NaiveDate;
    use polars::df;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, d).unwrap()
    }

    fn site_config(start: u32, end: u32, interval: u32) -> SiteConfig {
        SiteConfig {
            id: "test-site".to_string(),
            name: "Test Site".to_string(),
            location: None,
            counts_file: "counts.csv".to_string(),
            weather_file: None,
            notes_file: None,
            directions: DirectionLabels::new("In", "Out"),
            date_range: DateSpan::new(day(start), day(end)).unwrap(),
            outages: Vec::new(),
            sample_interval_minutes: interval,
            skip_rows: 0,
            default_resolution: Default::default(),
        }
    }

    fn frame(times: &[&str], ins: &[Option<i64>], outs: &[Option<i64>]) -> DataFrame {
        df!(
            COL_TIME => times,
            COL_IN => ins,
            COL_OUT => outs,
        )
        .unwrap()
    }

    #[test]
    fn fills_every_expected_slot_in_the_window() {
        // One recorded sample on a two-day window at hourly sampling.
        let site = site_config(1, 2, 60);
        let df = frame(
            &["2023-05-01 06:00:00"],
            &[Some(4)],
            &[Some(1)],
        );
        let series = normalize(&df, &site).unwrap();
        assert_eq!(series.len(), 48);
        let recorded: Vec<&CountRecord> = series
            .iter()
            .filter(|record| record.in_count.is_some())
            .collect();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].in_count, Some(4));
        assert_eq!(recorded[0].out_count, Some(1));
    }

    #[test]
    fn drops_rows_outside_the_collection_window() {
        let site = site_config(2, 2, 60);
        let df = frame(
            &[
                "2023-05-01 10:00:00",
                "2023-05-02 10:00:00",
                "2023-05-03 10:00:00",
            ],
            &[Some(1), Some(2), Some(3)],
            &[Some(1), Some(2), Some(3)],
        );
        let series = normalize(&df, &site).unwrap();
        assert_eq!(series.first_date(), Some(day(2)));
        assert_eq!(series.last_date(), Some(day(2)));
        let present: Vec<Option<u32>> = series
            .iter()
            .filter(|r| r.in_count.is_some())
            .map(|r| r.in_count)
            .collect();
        assert_eq!(present, vec![Some(2)]);
    }

    #[test]
    fn masks_outage_days_even_over_recorded_zeros() {
        let mut site = site_config(1, 3, 60);
        site.outages = vec![DateSpan::single_day(day(2))];
        let times: Vec<String> = (1..=3)
            .map(|d| format!("2023-05-0{d} 12:00:00"))
            .collect();
        let time_refs: Vec<&str> = times.iter().map(String::as_str).collect();
        let df = frame(&time_refs, &[Some(5), Some(0), Some(7)], &[Some(2), Some(0), Some(3)]);
        let series = normalize(&df, &site).unwrap();

        let on = |d: u32| {
            series
                .iter()
                .find(|r| r.timestamp == day(d).and_hms_opt(12, 0, 0).unwrap())
                .copied()
                .unwrap()
        };
        assert_eq!(on(1).in_count, Some(5));
        assert_eq!(on(2).in_count, None);
        assert_eq!(on(2).out_count, None);
        assert_eq!(on(3).out_count, Some(3));
    }

    #[test]
    fn malformed_timestamp_fails_the_whole_load() {
        let site = site_config(1, 1, 60);
        let df = frame(
            &["2023-05-01 00:00:00", "garbage"],
            &[Some(1), Some(2)],
            &[Some(1), Some(2)],
        );
        let err = normalize(&df, &site).unwrap_err();
        match err {
            SeriesError::Timestamp { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "garbage");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_counts_are_rejected() {
        let site = site_config(1, 1, 60);
        let df = frame(&["2023-05-01 00:00:00"], &[Some(-3)], &[Some(1)]);
        let err = normalize(&df, &site).unwrap_err();
        match err {
            SeriesError::InvalidCount { value, .. } => assert_eq!(value, -3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_timestamps_are_rejected() {
        let site = site_config(1, 1, 60);
        let df = frame(
            &["2023-05-01 08:00:00", "2023-05-01 08:00:00"],
            &[Some(1), Some(2)],
            &[Some(1), Some(2)],
        );
        assert!(matches!(
            normalize(&df, &site).unwrap_err(),
            SeriesError::DuplicateTimestamp { .. }
        ));
    }

    #[test]
    fn off_grid_rows_are_kept() {
        let site = site_config(1, 1, 60);
        let df = frame(&["2023-05-01 08:42:00"], &[Some(9)], &[Some(4)]);
        let series = normalize(&df, &site).unwrap();
        // 24 grid slots plus the off-grid sample.
        assert_eq!(series.len(), 25);
        assert!(series
            .iter()
            .any(|r| r.timestamp.time() == NaiveTime::from_hms_opt(8, 42, 0).unwrap()
                && r.in_count == Some(9)));
    }

    #[test]
    fn missing_counts_stay_missing_not_zero() {
        let site = site_config(1, 1, 60);
        let df = frame(
            &["2023-05-01 08:00:00", "2023-05-01 09:00:00"],
            &[Some(3), None],
            &[None, Some(2)],
        );
        let series = normalize(&df, &site).unwrap();
        let at = |h: u32| {
            series
                .iter()
                .find(|r| r.timestamp == day(1).and_hms_opt(h, 0, 0).unwrap())
                .copied()
                .unwrap()
        };
        assert_eq!(at(8).in_count, Some(3));
        assert_eq!(at(8).out_count, None);
        assert_eq!(at(8).combined(), None);
        assert_eq!(at(9).combined(), None);
        assert_eq!(at(10).in_count, None);
    }

    #[test]
    fn parses_all_supported_timestamp_formats() {
        let expected = day(1).and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2023-05-01 08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-05-01 08:30"), Some(expected));
        assert_eq!(parse_timestamp("05/01/2023 08:30"), Some(expected));
        assert_eq!(parse_timestamp("08:30 on May 1"), None);
    }
}
