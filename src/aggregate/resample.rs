//! The gap-aware resampling engine.

use crate::types::aggregated::{AggRow, AggregatedSeries};
use crate::types::count_series::{CanonicalSeries, CountRecord};
use crate::types::resolution::{AggMode, Resolution};
use crate::types::span::DateSpan;
use chrono::{Datelike, NaiveDateTime};
use std::collections::BTreeMap;

/// Per-bucket running sums, with a present-sample count per column.
#[derive(Default)]
struct Accum {
    in_sum: f64,
    in_n: u32,
    out_sum: f64,
    out_n: u32,
    combined_sum: f64,
    combined_n: u32,
}

impl Accum {
    fn push(&mut self, record: &CountRecord) {
        if let Some(value) = record.in_count {
            self.in_sum += f64::from(value);
            self.in_n += 1;
        }
        if let Some(value) = record.out_count {
            self.out_sum += f64::from(value);
            self.out_n += 1;
        }
        if let Some(value) = record.combined() {
            self.combined_sum += f64::from(value);
            self.combined_n += 1;
        }
    }
}

fn reduce(sum: f64, present: u32, mode: AggMode) -> Option<f64> {
    (present > 0).then(|| match mode {
        AggMode::Sum => sum,
        AggMode::Mean => sum / f64::from(present),
    })
}

/// Resamples a canonical series into buckets at `resolution`.
///
/// Missing samples never contribute: a bucket's column is the sum or mean
/// of the present samples only, and is itself missing exactly when every
/// source sample was. The whole series is bucketed first and a bucket is
/// kept when its label date falls inside `range` (inclusive), so a weekly
/// or monthly edge bucket can fold in samples from just outside the range.
///
/// The same inputs always produce an identical result; the input series is
/// never mutated.
pub fn aggregate(
    series: &CanonicalSeries,
    resolution: Resolution,
    mode: AggMode,
    range: &DateSpan,
) -> AggregatedSeries {
    let mut buckets: BTreeMap<NaiveDateTime, Accum> = BTreeMap::new();
    for record in series.iter() {
        buckets
            .entry(resolution.bucket_start(record.timestamp))
            .or_default()
            .push(record);
    }

    let rows = buckets
        .into_iter()
        .filter(|(label, _)| range.contains(label.date()))
        .map(|(label, acc)| AggRow {
            bucket_start: label,
            in_count: reduce(acc.in_sum, acc.in_n, mode),
            out_count: reduce(acc.out_sum, acc.out_n, mode),
            combined: reduce(acc.combined_sum, acc.combined_n, mode),
            day_of_week: label.weekday(),
        })
        .collect();

    AggregatedSeries::new(resolution, mode, rows)
}
