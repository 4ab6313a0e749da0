//! Provides the `OverlayClient` for daily traffic joined with weather and
//! notes.
//!
//! Obtained via [`Velostat::overlay()`]; the result drives the daily bar
//! chart hovers and the weather scatter.

use crate::aggregate::overlay::{build_overlay, DailyOverlayRow};
use crate::aggregate::resample::aggregate;
use crate::error::VelostatError;
use crate::types::filters::{RainFilter, WeekdaySet};
use crate::types::resolution::{AggMode, Resolution};
use crate::types::span::DateSpan;
use crate::velostat::Velostat;
use bon::bon;

/// A client builder for the daily overlay view.
///
/// Instances are created by calling [`Velostat::overlay()`].
pub struct OverlayClient<'a> {
    /// A reference to the main Velostat handle.
    client: &'a Velostat,
}

#[bon]
impl<'a> OverlayClient<'a> {
    /// Creates a new `OverlayClient`.
    pub(crate) fn new(client: &'a Velostat) -> Self {
        Self { client }
    }

    /// Builds the daily overlay rows for one site.
    ///
    /// # Arguments
    ///
    /// * `.site(&str)`: **Required.** The site id to query.
    /// * `.range(DateSpan)`: Optional. Defaults to the site's collection
    ///   window.
    /// * `.weekdays(WeekdaySet)`: Optional. Keeps only the given days of
    ///   the week.
    /// * `.rain(RainFilter)`: Optional. `DryOnly` keeps only days whose
    ///   weather row records exactly zero precipitation.
    ///
    /// # Errors
    ///
    /// Returns [`VelostatError::Registry`] for an unknown site id and
    /// [`VelostatError::SeriesData`] when the site's files cannot be
    /// loaded.
    #[builder(start_fn = site)]
    #[doc(hidden)]
    pub async fn build_site(
        &self,
        #[builder(start_fn)] site: &str,
        range: Option<DateSpan>,
        weekdays: Option<WeekdaySet>,
        rain: Option<RainFilter>,
    ) -> Result<Vec<DailyOverlayRow>, VelostatError> {
        let config = self.client.registry().get(site)?;
        let data = self.client.site_data(site).await?;
        let daily = aggregate(
            &data.series,
            Resolution::Daily,
            AggMode::Sum,
            &range.unwrap_or(config.date_range),
        );
        let daily = match weekdays {
            Some(days) => daily.filter_weekdays(days),
            None => daily,
        };
        Ok(build_overlay(
            &daily,
            &data.weather,
            &data.notes,
            rain.unwrap_or_default(),
        )?)
    }
}
