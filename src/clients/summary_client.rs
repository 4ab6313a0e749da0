//! Provides the `SummaryClient` for the totals/averages/share table.
//!
//! Obtained via [`Velostat::summary()`]; resamples the site's series to
//! daily buckets and reduces them to one [`SummaryStats`].

use crate::aggregate::resample::aggregate;
use crate::aggregate::summary::{summarize, SummaryStats};
use crate::error::VelostatError;
use crate::types::resolution::{AggMode, Resolution};
use crate::types::span::DateSpan;
use crate::velostat::Velostat;
use bon::bon;

/// A client builder for summary statistics.
///
/// Instances are created by calling [`Velostat::summary()`].
pub struct SummaryClient<'a> {
    /// A reference to the main Velostat handle.
    client: &'a Velostat,
}

#[bon]
impl<'a> SummaryClient<'a> {
    /// Creates a new `SummaryClient`.
    pub(crate) fn new(client: &'a Velostat) -> Self {
        Self { client }
    }

    /// Builds the summary table for one site.
    ///
    /// `.range(DateSpan)` is optional and defaults to the site's collection
    /// window.
    ///
    /// # Errors
    ///
    /// Returns [`VelostatError::Aggregate`] with
    /// [`AggregateError::NoDataInRange`](crate::AggregateError::NoDataInRange)
    /// when the range holds no traffic at all; callers render that as an
    /// empty state. Registry and load errors surface as with the other
    /// clients.
    #[builder(start_fn = site)]
    #[doc(hidden)]
    pub async fn build_site(
        &self,
        #[builder(start_fn)] site: &str,
        range: Option<DateSpan>,
    ) -> Result<SummaryStats, VelostatError> {
        let config = self.client.registry().get(site)?;
        let data = self.client.site_data(site).await?;
        let daily = aggregate(
            &data.series,
            Resolution::Daily,
            AggMode::Sum,
            &range.unwrap_or(config.date_range),
        );
        Ok(summarize(&daily, &config.directions)?)
    }
}
