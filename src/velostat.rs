//! This module provides the main entry point for querying bicycle counter
//! data. A [`Velostat`] handle owns the site registry and a per-site data
//! cache; the view clients obtained from it run one query per call.

use crate::clients::crosstab_client::CrosstabClient;
use crate::clients::overlay_client::OverlayClient;
use crate::clients::summary_client::SummaryClient;
use crate::clients::traffic_client::TrafficClient;
use crate::error::VelostatError;
use crate::series::fetcher::{SiteData, SiteDataCache};
use crate::sites::registry::SiteRegistry;
use std::path::PathBuf;
use std::sync::Arc;

/// File name of the site registry inside a data directory.
const SITES_FILE: &str = "sites.json";

/// The main handle for accessing counter data.
///
/// A `Velostat` owns the [`SiteRegistry`] and caches each site's loaded
/// data, so repeated queries against the same site parse its files only
/// once. Create one with [`Velostat::open()`] pointing at a data directory,
/// or [`Velostat::with_registry()`] when the configs come from elsewhere.
///
/// # Examples
///
/// ```no_run
/// # use velostat::{Velostat, VelostatError};
/// # async fn run() -> Result<(), VelostatError> {
/// let velostat = Velostat::open("./data").await?;
/// let daily = velostat.traffic().site("riverside-trail").call().await?;
/// println!("{} daily buckets", daily.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Velostat {
    registry: SiteRegistry,
    cache: SiteDataCache,
}

impl Velostat {
    /// Opens a data directory: reads `sites.json` and prepares the cache.
    ///
    /// Site files referenced by the registry are not touched yet; each
    /// site's data is loaded lazily on its first query.
    ///
    /// # Errors
    ///
    /// Returns [`VelostatError::Registry`] when `sites.json` is missing,
    /// unreadable or invalid.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, VelostatError> {
        let data_dir = data_dir.into();
        let registry = SiteRegistry::from_json_file(data_dir.join(SITES_FILE)).await?;
        Ok(Self::with_registry(registry, data_dir))
    }

    /// Builds a handle from an already-validated registry.
    ///
    /// `data_dir` is still needed to resolve the per-site file references.
    pub fn with_registry(registry: SiteRegistry, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            registry,
            cache: SiteDataCache::new(&data_dir),
        }
    }

    /// The site registry backing this handle.
    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    /// The loaded data of one site, from cache when already loaded.
    ///
    /// # Errors
    ///
    /// Returns [`VelostatError::Registry`] for an unknown site id and
    /// [`VelostatError::SeriesData`] when loading or normalizing the
    /// site's files fails.
    pub async fn site_data(&self, site_id: &str) -> Result<Arc<SiteData>, VelostatError> {
        let config = self.registry.get(site_id)?;
        Ok(self.cache.get(config).await?)
    }

    /// A client for aggregated traffic series (the bar charts).
    pub fn traffic(&self) -> TrafficClient {
        TrafficClient::new(self)
    }

    /// A client for week-by-position cross-tabulations (distribution plots).
    pub fn crosstab(&self) -> CrosstabClient {
        CrosstabClient::new(self)
    }

    /// A client for the totals/averages/share summary table.
    pub fn summary(&self) -> SummaryClient {
        SummaryClient::new(self)
    }

    /// A client for daily rows joined with weather and notes.
    pub fn overlay(&self) -> OverlayClient {
        OverlayClient::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::error::SiteRegistryError;

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

    fn write_fixture(dir: &tempfile::TempDir) {
        std::fs::write(dir.path().join("sites.json"), SITES_JSON).unwrap();
        let mut counts = String::from("Riverside Trail Counter\nExported 2023-06-01\n");
        for hour in 0..24 {
            counts.push_str(&format!("2023-05-01 {hour:02}:00:00,5,2\n"));
        }
        std::fs::write(dir.path().join("riverside-trail-counts.csv"), counts).unwrap();
    }

    #[tokio::test]
    async fn open_reads_the_registry_and_serves_site_data() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(&dir);

        let velostat = Velostat::open(dir.path()).await.unwrap();
        assert_eq!(velostat.registry().len(), 1);

        let data = velostat.site_data("riverside-trail").await.unwrap();
        // Two days of hourly slots on the sampling grid.
        assert_eq!(data.series.len(), 48);

        let again = velostat.site_data("riverside-trail").await.unwrap();
        assert!(Arc::ptr_eq(&data, &again));
    }

    #[tokio::test]
    async fn unknown_sites_surface_as_registry_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(&dir);

        let velostat = Velostat::open(dir.path()).await.unwrap();
        let err = velostat.site_data("nope").await.unwrap_err();
        assert!(matches!(
            err,
            VelostatError::Registry(SiteRegistryError::UnknownSite(_))
        ));
    }

    #[tokio::test]
    async fn open_requires_a_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Velostat::open(dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            VelostatError::Registry(SiteRegistryError::RegistryRead(..))
        ));
    }
}
