//! Per-site load-once cache of canonical series and their sidecars.

use crate::series::error::SeriesError;
use crate::series::{loader, normalizer};
use crate::types::count_series::CanonicalSeries;
use crate::types::site::SiteConfig;
use crate::types::weather::WeatherRecord;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::{hash_map::Entry, BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything loaded for one site: the canonical count series plus the
/// date-keyed weather and note sidecars.
///
/// Shared read-only between queries; aggregation never mutates it.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub series: CanonicalSeries,
    pub weather: BTreeMap<NaiveDate, WeatherRecord>,
    pub notes: BTreeMap<NaiveDate, String>,
}

/// Loads each site's files at most once and hands out shared snapshots.
///
/// Source files never change at runtime, so entries are never invalidated.
#[derive(Debug)]
pub(crate) struct SiteDataCache {
    data_dir: PathBuf,
    cache: Mutex<HashMap<String, Arc<SiteData>>>,
}

impl SiteDataCache {
    pub(crate) fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the loaded data for a site, reading its files on first
    /// access.
    pub(crate) async fn get(&self, site: &SiteConfig) -> Result<Arc<SiteData>, SeriesError> {
        {
            let cache = self.cache.lock().await;
            if let Some(data) = cache.get(&site.id) {
                info!("Cache hit for site '{}'", site.id);
                return Ok(Arc::clone(data));
            }
        }

        // Load outside the lock; a concurrent loader may win the race
        // below, in which case its snapshot is used.
        let data = Arc::new(self.load(site).await?);

        let mut cache = self.cache.lock().await;
        match cache.entry(site.id.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&data));
                Ok(data)
            }
        }
    }

    async fn load(&self, site: &SiteConfig) -> Result<SiteData, SeriesError> {
        info!("Loading data files for site '{}'", site.id);
        let frame = loader::load_counts(site.counts_path(&self.data_dir), site.skip_rows).await?;
        let series = normalizer::normalize(&frame, site)?;

        let mut weather = BTreeMap::new();
        if let Some(path) = site.weather_path(&self.data_dir) {
            for record in loader::load_weather(path).await? {
                let date = record.date;
                if weather.insert(date, record).is_some() {
                    warn!(
                        "Duplicate weather date {} for site '{}', keeping the last row",
                        date, site.id
                    );
                }
            }
        }

        let mut notes = BTreeMap::new();
        if let Some(path) = site.notes_path(&self.data_dir) {
            for note in loader::load_notes(path).await? {
                notes.insert(note.date, note.text);
            }
        }

        Ok(SiteData {
            series,
            weather,
            notes,
        })
    }
}
