//! Daily traffic joined with weather and notes, the hover payload of the
//! daily views.

use crate::aggregate::error::AggregateError;
use crate::types::aggregated::AggregatedSeries;
use crate::types::filters::RainFilter;
use crate::types::resolution::Resolution;
use crate::types::weather::WeatherRecord;
use chrono::{NaiveDate, Weekday};
use std::collections::BTreeMap;

/// One day of the overlay: a daily traffic bucket with that day's weather
/// observation and note attached when they exist.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyOverlayRow {
    pub date: NaiveDate,
    pub day_of_week: Weekday,
    pub in_count: Option<f64>,
    pub out_count: Option<f64>,
    pub combined: Option<f64>,
    pub weather: Option<WeatherRecord>,
    pub note: Option<String>,
}

/// Joins a daily series with weather and notes by calendar day.
///
/// The traffic series drives the output: days without a bucket produce no
/// row, and weather or notes on such days are ignored. With
/// [`RainFilter::DryOnly`] only days whose weather row records exactly zero
/// precipitation survive; a day without a weather row is not known to be
/// dry and is dropped.
///
/// # Errors
///
/// Returns [`AggregateError::NotDailyResolution`] when the series is not
/// daily.
pub fn build_overlay(
    daily: &AggregatedSeries,
    weather: &BTreeMap<NaiveDate, WeatherRecord>,
    notes: &BTreeMap<NaiveDate, String>,
    rain: RainFilter,
) -> Result<Vec<DailyOverlayRow>, AggregateError> {
    if daily.resolution() != Resolution::Daily {
        return Err(AggregateError::NotDailyResolution(daily.resolution()));
    }
    let rows = daily
        .iter()
        .filter_map(|row| {
            let date = row.bucket_start.date();
            let day_weather = weather.get(&date).cloned();
            if !rain.keeps(day_weather.as_ref().and_then(|w| w.precipitation)) {
                return None;
            }
            Some(DailyOverlayRow {
                date,
                day_of_week: row.day_of_week,
                in_count: row.in_count,
                out_count: row.out_count,
                combined: row.combined,
                weather: day_weather,
                note: notes.get(&date).cloned(),
            })
        })
        .collect();
    Ok(rows)
}
