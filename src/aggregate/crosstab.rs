//! Week-by-position cross-tabulation for distribution views.

use crate::types::aggregated::AggregatedSeries;
use crate::types::filters::{Direction, PivotAxis};
use crate::types::resolution::AggMode;
use chrono::{Datelike, IsoWeek, Timelike};
use std::collections::BTreeMap;

/// A sparse `(ISO week, position)` table of counts.
///
/// Positions are hours of day or Monday-first weekday indices depending on
/// the axis; a cell exists only when at least one present bucket fed it.
/// Keys are ordered, so day-of-week output is always Mon..Sun no matter
/// how the input rows were ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    axis: PivotAxis,
    stat: AggMode,
    cells: BTreeMap<(IsoWeek, u8), f64>,
}

impl CrossTab {
    pub fn axis(&self) -> PivotAxis {
        self.axis
    }

    pub fn stat(&self) -> AggMode {
        self.stat
    }

    /// The value of one cell, `None` when no present bucket fed it.
    pub fn value(&self, week: IsoWeek, position: u8) -> Option<f64> {
        self.cells.get(&(week, position)).copied()
    }

    /// The ISO weeks with at least one cell, ascending.
    pub fn weeks(&self) -> Vec<IsoWeek> {
        let mut weeks: Vec<IsoWeek> = self.cells.keys().map(|&(week, _)| week).collect();
        weeks.dedup();
        weeks
    }

    /// One week's profile across every axis position, in axis order.
    pub fn row(&self, week: IsoWeek) -> Vec<Option<f64>> {
        self.axis
            .positions()
            .map(|position| self.value(week, position))
            .collect()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All populated cells as `(week, position, value)`, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (IsoWeek, u8, f64)> + '_ {
        self.cells
            .iter()
            .map(|(&(week, position), &value)| (week, position, value))
    }
}

/// Cross-tabulates an aggregated series by `(ISO week, position)`.
///
/// Each cell reduces the present buckets of `field` that fall on that week
/// and position with `stat`; missing buckets contribute nothing, and a cell
/// with no contributions at all stays absent rather than becoming zero.
/// The ISO week is taken from the bucket label.
pub fn cross_tab(
    series: &AggregatedSeries,
    field: Direction,
    axis: PivotAxis,
    stat: AggMode,
) -> CrossTab {
    let mut acc: BTreeMap<(IsoWeek, u8), (f64, u32)> = BTreeMap::new();
    for row in series.iter() {
        let value = match row.value(field) {
            Some(value) => value,
            None => continue,
        };
        let position = match axis {
            PivotAxis::HourOfDay => row.bucket_start.hour() as u8,
            PivotAxis::DayOfWeek => row.day_of_week.num_days_from_monday() as u8,
        };
        let cell = acc
            .entry((row.bucket_start.iso_week(), position))
            .or_insert((0.0, 0));
        cell.0 += value;
        cell.1 += 1;
    }

    let cells = acc
        .into_iter()
        .map(|(key, (sum, n))| {
            let value = match stat {
                AggMode::Sum => sum,
                AggMode::Mean => sum / f64::from(n),
            };
            (key, value)
        })
        .collect();

    CrossTab { axis, stat, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::aggregated::AggRow;
    use crate::types::resolution::Resolution;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn week_of(y: i32, m: u32, d: u32) -> IsoWeek {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().iso_week()
    }

    fn row(bucket_start: NaiveDateTime, in_count: Option<f64>) -> AggRow {
        AggRow {
            bucket_start,
            in_count,
            out_count: Some(0.0),
            combined: in_count,
            day_of_week: bucket_start.weekday(),
        }
    }

    fn series(rows: Vec<AggRow>) -> AggregatedSeries {
        AggregatedSeries::new(Resolution::Hourly, AggMode::Sum, rows)
    }

    #[test]
    fn day_positions_run_monday_first_regardless_of_input_order() {
        // One ISO week (2023-05-01 is a Monday), rows deliberately shuffled.
        let tab = cross_tab(
            &series(vec![
                row(dt(2023, 5, 4, 12), Some(4.0)),
                row(dt(2023, 5, 1, 8), Some(1.0)),
                row(dt(2023, 5, 7, 9), Some(7.0)),
                row(dt(2023, 5, 6, 10), Some(6.0)),
            ]),
            Direction::In,
            PivotAxis::DayOfWeek,
            AggMode::Sum,
        );
        let week = week_of(2023, 5, 1);
        assert_eq!(tab.weeks(), vec![week]);
        assert_eq!(
            tab.row(week),
            vec![
                Some(1.0), // Mon
                None,
                None,
                Some(4.0), // Thu
                None,
                Some(6.0), // Sat
                Some(7.0), // Sun
            ]
        );
    }

    #[test]
    fn hourly_cells_group_by_week_and_hour() {
        let tab = cross_tab(
            &series(vec![
                row(dt(2023, 5, 1, 8), Some(10.0)),
                row(dt(2023, 5, 2, 8), Some(20.0)),
                row(dt(2023, 5, 8, 8), Some(5.0)),
            ]),
            Direction::In,
            PivotAxis::HourOfDay,
            AggMode::Sum,
        );
        assert_eq!(tab.value(week_of(2023, 5, 1), 8), Some(30.0));
        assert_eq!(tab.value(week_of(2023, 5, 8), 8), Some(5.0));
        assert_eq!(tab.value(week_of(2023, 5, 1), 9), None);
        assert_eq!(tab.len(), 2);
    }

    #[test]
    fn mean_stat_divides_by_contributions_per_cell() {
        let tab = cross_tab(
            &series(vec![
                row(dt(2023, 5, 1, 8), Some(10.0)),
                row(dt(2023, 5, 2, 8), Some(20.0)),
            ]),
            Direction::In,
            PivotAxis::HourOfDay,
            AggMode::Mean,
        );
        assert_eq!(tab.value(week_of(2023, 5, 1), 8), Some(15.0));
    }

    #[test]
    fn missing_buckets_leave_cells_absent() {
        let tab = cross_tab(
            &series(vec![
                row(dt(2023, 5, 1, 8), None),
                row(dt(2023, 5, 1, 9), Some(3.0)),
            ]),
            Direction::In,
            PivotAxis::HourOfDay,
            AggMode::Sum,
        );
        // The all-missing cell never appears; it must not read as zero.
        assert_eq!(tab.value(week_of(2023, 5, 1), 8), None);
        assert_eq!(tab.value(week_of(2023, 5, 1), 9), Some(3.0));
        assert_eq!(tab.len(), 1);
    }

    #[test]
    fn iso_week_keys_respect_year_boundaries() {
        // Week 1 of 2026 starts on Mon 2025-12-29; the Sunday before
        // belongs to week 52 of 2025.
        let tab = cross_tab(
            &series(vec![
                row(dt(2025, 12, 28, 8), Some(1.0)),
                row(dt(2025, 12, 29, 8), Some(2.0)),
                row(dt(2026, 1, 1, 8), Some(4.0)),
            ]),
            Direction::In,
            PivotAxis::HourOfDay,
            AggMode::Sum,
        );
        let old_week = week_of(2025, 12, 28);
        let new_week = week_of(2026, 1, 1);
        assert_eq!(old_week.year(), 2025);
        assert_eq!(old_week.week(), 52);
        assert_eq!(new_week.year(), 2026);
        assert_eq!(new_week.week(), 1);
        assert_eq!(tab.weeks(), vec![old_week, new_week]);
        assert_eq!(tab.value(old_week, 8), Some(1.0));
        assert_eq!(tab.value(new_week, 8), Some(6.0));
    }

    #[test]
    fn empty_series_gives_an_empty_table() {
        let tab = cross_tab(
            &series(Vec::new()),
            Direction::Combined,
            PivotAxis::DayOfWeek,
            AggMode::Sum,
        );
        assert!(tab.is_empty());
        assert!(tab.weeks().is_empty());
    }
}
