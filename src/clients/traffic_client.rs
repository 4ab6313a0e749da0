//! Provides the `TrafficClient` for querying aggregated traffic series.
//!
//! This client acts as an intermediate builder, obtained via
//! [`Velostat::traffic()`], allowing the user to pick a resolution, date
//! range and aggregation mode before executing the query.

use crate::aggregate::resample::aggregate;
use crate::error::VelostatError;
use crate::types::aggregated::AggregatedSeries;
use crate::types::resolution::{AggMode, Resolution};
use crate::types::span::DateSpan;
use crate::velostat::Velostat;
use bon::bon;

/// A client builder for aggregated traffic series.
///
/// Instances are created by calling [`Velostat::traffic()`]. The site id is
/// required; everything else falls back to the site's configuration.
///
/// Calling `.site(..)` starts the builder and `.call().await` executes the
/// query, returning a `Result<AggregatedSeries, VelostatError>`.
pub struct TrafficClient<'a> {
    /// A reference to the main Velostat handle.
    client: &'a Velostat,
}

#[bon]
impl<'a> TrafficClient<'a> {
    /// Creates a new `TrafficClient`.
    ///
    /// This is typically called internally by [`Velostat::traffic()`] and
    /// not directly by users.
    pub(crate) fn new(client: &'a Velostat) -> Self {
        Self { client }
    }

    /// Aggregates one site's series into buckets.
    ///
    /// # Arguments
    ///
    /// * `.site(&str)`: **Required.** The site id to query.
    /// * `.resolution(Resolution)`: Optional. Bucket width; defaults to the
    ///   site's `default_resolution`.
    /// * `.range(DateSpan)`: Optional. Closed date range to keep, compared
    ///   against bucket labels; defaults to the site's collection window.
    /// * `.mode(AggMode)`: Optional. `Sum` (default) or `Mean` per bucket.
    ///
    /// # Errors
    ///
    /// Returns [`VelostatError::Registry`] for an unknown site id and
    /// [`VelostatError::SeriesData`] when the site's files cannot be loaded.
    /// Aggregation itself cannot fail: an empty range yields an empty
    /// series.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use velostat::{Resolution, Velostat, VelostatError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), VelostatError> {
    /// let velostat = Velostat::open("./data").await?;
    /// let weekly = velostat
    ///     .traffic()
    ///     .site("riverside-trail")
    ///     .resolution(Resolution::Weekly)
    ///     .call()
    ///     .await?;
    /// for row in weekly.iter() {
    ///     println!("{}: {:?}", row.bucket_start, row.combined);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = site)]
    #[doc(hidden)]
    pub async fn build_site(
        &self,
        #[builder(start_fn)] site: &str,
        resolution: Option<Resolution>,
        range: Option<DateSpan>,
        mode: Option<AggMode>,
    ) -> Result<AggregatedSeries, VelostatError> {
        let config = self.client.registry().get(site)?;
        let data = self.client.site_data(site).await?;
        Ok(aggregate(
            &data.series,
            resolution.unwrap_or(config.default_resolution),
            mode.unwrap_or(AggMode::Sum),
            &range.unwrap_or(config.date_range),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::filters::Direction;
    use chrono::NaiveDate;

    const SITES_JSON: &str = r#"[
        {
            "id": "riverside-trail",
            "name": "Riverside Trail Counter",
            "counts_file": "riverside-trail-counts.csv",
            "directions": { "in": "Northbound", "out": "Southbound" },
            "date_range": { "start": "2023-05-01", "end": "2023-05-02" },
            "sample_interval_minutes": 60,
            "skip_rows": 2
        }
    ]"#;

    async fn open_fixture() -> (tempfile::TempDir, Velostat) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sites.json"), SITES_JSON).unwrap();
        let mut counts = String::from("Riverside Trail Counter\nExported 2023-06-01\n");
        for hour in 0..24 {
            counts.push_str(&format!("2023-05-01 {hour:02}:00:00,5,2\n"));
            counts.push_str(&format!("2023-05-02 {hour:02}:00:00,3,1\n"));
        }
        std::fs::write(dir.path().join("riverside-trail-counts.csv"), counts).unwrap();
        let velostat = Velostat::open(dir.path()).await.unwrap();
        (dir, velostat)
    }

    #[tokio::test]
    async fn defaults_to_daily_sums_over_the_collection_window() {
        let (_dir, velostat) = open_fixture().await;
        let daily = velostat.traffic().site("riverside-trail").call().await.unwrap();

        assert_eq!(daily.resolution(), Resolution::Daily);
        assert_eq!(daily.mode(), AggMode::Sum);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.rows()[0].in_count, Some(120.0));
        assert_eq!(daily.rows()[0].out_count, Some(48.0));
        assert_eq!(daily.rows()[0].combined, Some(168.0));
        assert_eq!(daily.rows()[1].combined, Some(96.0));
    }

    #[tokio::test]
    async fn default_range_matches_the_explicit_full_window() {
        let (_dir, velostat) = open_fixture().await;
        let implicit = velostat.traffic().site("riverside-trail").call().await.unwrap();
        let explicit = velostat
            .traffic()
            .site("riverside-trail")
            .range(
                DateSpan::new(
                    NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
                )
                .unwrap(),
            )
            .call()
            .await
            .unwrap();
        assert_eq!(implicit, explicit);
    }

    #[tokio::test]
    async fn resolution_and_mode_can_be_overridden() {
        let (_dir, velostat) = open_fixture().await;
        let hourly_means = velostat
            .traffic()
            .site("riverside-trail")
            .resolution(Resolution::Hourly)
            .mode(AggMode::Mean)
            .call()
            .await
            .unwrap();

        assert_eq!(hourly_means.resolution(), Resolution::Hourly);
        assert_eq!(hourly_means.len(), 48);
        // One sample per hourly bucket, so the mean equals the sample.
        assert_eq!(hourly_means.rows()[0].value(Direction::In), Some(5.0));
    }

    #[tokio::test]
    async fn narrowed_ranges_keep_only_matching_buckets() {
        let (_dir, velostat) = open_fixture().await;
        let single = velostat
            .traffic()
            .site("riverside-trail")
            .range(DateSpan::single_day(
                NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
            ))
            .call()
            .await
            .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.rows()[0].combined, Some(96.0));
    }

    #[tokio::test]
    async fn unknown_site_fails_before_touching_files() {
        let (_dir, velostat) = open_fixture().await;
        assert!(velostat.traffic().site("nope").call().await.is_err());
    }
}
