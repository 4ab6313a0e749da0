//! Daily weather observations and free-text site notes.

use chrono::NaiveDate;

/// One day of weather observations for a site.
///
/// Fields mirror the NOAA daily-summaries export: precipitation total plus
/// the day's temperature extremes, any of which may be unreported.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

/// A dated free-text annotation ("counter recalibrated", "trail closed").
///
/// Sparse: most days have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteNote {
    pub date: NaiveDate,
    pub text: String,
}
