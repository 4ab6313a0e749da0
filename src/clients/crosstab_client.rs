//! Provides the `CrosstabClient` for querying week-by-position
//! cross-tabulations.
//!
//! This client is obtained via [`Velostat::crosstab()`]. It aggregates the
//! site's series at a fine resolution and pivots the buckets by ISO week
//! and hour-of-day or day-of-week.

use crate::aggregate::crosstab::{cross_tab, CrossTab};
use crate::error::VelostatError;
use crate::types::filters::{Direction, PivotAxis, WeekdaySet};
use crate::types::resolution::{AggMode, FineResolution};
use crate::types::span::DateSpan;
use crate::velostat::Velostat;
use bon::bon;

/// A client builder for cross-tabulations.
///
/// Instances are created by calling [`Velostat::crosstab()`]. The site id
/// and the pivot axis are required; the input series is always bucketed at
/// a fine resolution (hourly unless 15-min is requested), since the
/// distribution views are only meaningful over sub-daily buckets.
pub struct CrosstabClient<'a> {
    /// A reference to the main Velostat handle.
    client: &'a Velostat,
}

#[bon]
impl<'a> CrosstabClient<'a> {
    /// Creates a new `CrosstabClient`.
    ///
    /// This is typically called internally by [`Velostat::crosstab()`] and
    /// not directly by users.
    pub(crate) fn new(client: &'a Velostat) -> Self {
        Self { client }
    }

    /// Cross-tabulates one site's traffic by `(ISO week, position)`.
    ///
    /// # Arguments
    ///
    /// * `.site(&str)`: **Required.** The site id to query.
    /// * `.axis(PivotAxis)`: **Required.** Hour-of-day or day-of-week.
    /// * `.direction(Direction)`: Optional. Count column; defaults to
    ///   `Combined`.
    /// * `.stat(AggMode)`: Optional. Per-cell reduction across buckets,
    ///   `Sum` (default) or `Mean` (the "average hourly traffic" view).
    /// * `.resolution(FineResolution)`: Optional. Bucket width of the
    ///   underlying series; defaults to hourly.
    /// * `.range(DateSpan)`: Optional. Defaults to the site's collection
    ///   window.
    /// * `.weekdays(WeekdaySet)`: Optional. Restricts the buckets to the
    ///   given days of the week before pivoting.
    ///
    /// # Errors
    ///
    /// Returns [`VelostatError::Registry`] for an unknown site id and
    /// [`VelostatError::SeriesData`] when the site's files cannot be
    /// loaded.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use velostat::{PivotAxis, Velostat, VelostatError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), VelostatError> {
    /// let velostat = Velostat::open("./data").await?;
    /// let by_hour = velostat
    ///     .crosstab()
    ///     .site("riverside-trail")
    ///     .axis(PivotAxis::HourOfDay)
    ///     .call()
    ///     .await?;
    /// for week in by_hour.weeks() {
    ///     println!("{week:?}: {:?}", by_hour.row(week));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = site)]
    #[doc(hidden)]
    pub async fn build_site(
        &self,
        #[builder(start_fn)] site: &str,
        axis: PivotAxis,
        direction: Option<Direction>,
        stat: Option<AggMode>,
        resolution: Option<FineResolution>,
        range: Option<DateSpan>,
        weekdays: Option<WeekdaySet>,
    ) -> Result<CrossTab, VelostatError> {
        let config = self.client.registry().get(site)?;
        let data = self.client.site_data(site).await?;

        // Fine buckets are always summed; `stat` reduces across buckets
        // per cell.
        let fine = resolution.unwrap_or(FineResolution::Hourly);
        let series = crate::aggregate::resample::aggregate(
            &data.series,
            fine.resolution(),
            AggMode::Sum,
            &range.unwrap_or(config.date_range),
        );
        let series = match weekdays {
            Some(days) => series.filter_weekdays(days),
            None => series,
        };
        Ok(cross_tab(
            &series,
            direction.unwrap_or(Direction::Combined),
            axis,
            stat.unwrap_or(AggMode::Sum),
        ))
    }
}
