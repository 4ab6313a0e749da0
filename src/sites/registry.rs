//! The enumerable registry of configured counter sites.

use crate::sites::error::SiteRegistryError;
use crate::types::site::SiteConfig;
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// All configured sites, looked up by id and iterated in declaration
/// order.
///
/// Validation happens here, once, so every [`SiteConfig`] handed out
/// afterwards is well-formed. Inverted date ranges never get this far;
/// they are rejected when a [`DateSpan`](crate::DateSpan) is built or
/// deserialized.
#[derive(Debug)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
    index: HashMap<String, usize>,
}

impl SiteRegistry {
    /// Builds a registry from in-code configs.
    ///
    /// # Errors
    ///
    /// Returns [`SiteRegistryError::DuplicateSite`] when two configs share
    /// an id and [`SiteRegistryError::InvalidSampleInterval`] when a config
    /// declares a zero-minute sampling interval.
    pub fn new(sites: Vec<SiteConfig>) -> Result<Self, SiteRegistryError> {
        let mut index = HashMap::with_capacity(sites.len());
        for (position, site) in sites.iter().enumerate() {
            if site.sample_interval_minutes == 0 {
                return Err(SiteRegistryError::InvalidSampleInterval(site.id.clone()));
            }
            if index.insert(site.id.clone(), position).is_some() {
                return Err(SiteRegistryError::DuplicateSite(site.id.clone()));
            }
        }
        info!("Site registry holds {} sites", sites.len());
        Ok(Self { sites, index })
    }

    /// Reads a registry from a JSON file holding an array of site configs.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SiteRegistryError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SiteRegistryError::RegistryRead(path.to_path_buf(), e))?;
        let sites: Vec<SiteConfig> = serde_json::from_str(&text)
            .map_err(|e| SiteRegistryError::RegistryParse(path.to_path_buf(), e))?;
        Self::new(sites)
    }

    /// Looks a site up by id.
    ///
    /// # Errors
    ///
    /// Returns [`SiteRegistryError::UnknownSite`] for ids not in the
    /// registry; callers surface this as a "data unavailable" state.
    pub fn get(&self, site_id: &str) -> Result<&SiteConfig, SiteRegistryError> {
        self.index
            .get(site_id)
            .map(|&position| &self.sites[position])
            .ok_or_else(|| SiteRegistryError::UnknownSite(site_id.to_string()))
    }

    /// The sites in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
