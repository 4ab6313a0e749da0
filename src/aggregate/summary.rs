//! The totals, daily averages and share table behind the summary view.

use crate::aggregate::error::AggregateError;
use crate::types::aggregated::AggregatedSeries;
use crate::types::filters::Direction;
use crate::types::resolution::Resolution;
use crate::types::site::DirectionLabels;

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub direction: Direction,
    /// Site-specific display label for the direction.
    pub label: String,
    /// Gap-aware total over the range.
    pub total: f64,
    /// Mean over the days that have data for this direction.
    pub daily_average: f64,
    /// This direction's share of the combined total; exactly `1.0` for the
    /// combined row.
    pub share: f64,
}

/// The summary table: one row each for combined, in and out traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    rows: [SummaryRow; 3],
}

impl SummaryStats {
    /// The rows in combined, in, out order.
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn row(&self, direction: Direction) -> &SummaryRow {
        match direction {
            Direction::Combined => &self.rows[0],
            Direction::In => &self.rows[1],
            Direction::Out => &self.rows[2],
        }
    }
}

/// Builds summary statistics from a daily series.
///
/// Totals sum the present days only and daily averages divide by the number
/// of present days, so gaps shrink the denominator instead of dragging the
/// average down.
///
/// # Errors
///
/// Returns [`AggregateError::NoDataInRange`] when the combined total is
/// zero or fully missing; a share of something that is not there is an
/// empty state for the caller to render, never a NaN. Returns
/// [`AggregateError::NotDailyResolution`] when handed a series at any other
/// resolution.
pub fn summarize(
    daily: &AggregatedSeries,
    labels: &DirectionLabels,
) -> Result<SummaryStats, AggregateError> {
    if daily.resolution() != Resolution::Daily {
        return Err(AggregateError::NotDailyResolution(daily.resolution()));
    }
    let combined_total = match daily.total(Direction::Combined) {
        Some(total) if total > 0.0 => total,
        _ => return Err(AggregateError::NoDataInRange),
    };

    let row = |direction: Direction| -> Result<SummaryRow, AggregateError> {
        let total = daily
            .total(direction)
            .ok_or(AggregateError::NoDataInRange)?;
        let daily_average = daily.mean(direction).ok_or(AggregateError::NoDataInRange)?;
        let share = match direction {
            Direction::Combined => 1.0,
            _ => total / combined_total,
        };
        Ok(SummaryRow {
            direction,
            label: labels.label(direction).to_string(),
            total,
            daily_average,
            share,
        })
    };

    Ok(SummaryStats {
        rows: [
            row(Direction::Combined)?,
            row(Direction::In)?,
            row(Direction::Out)?,
        ],
    })
}
