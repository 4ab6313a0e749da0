//! Static per-site descriptors, normally deserialized from `sites.json`.

use crate::types::filters::Direction;
use crate::types::resolution::Resolution;
use crate::types::span::DateSpan;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Display labels for a site's two directions.
///
/// Counter hardware reports plain in/out channels; what those mean on the
/// ground ("Northbound", "Eastbound", ...) is site-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionLabels {
    #[serde(rename = "in")]
    pub in_label: String,
    #[serde(rename = "out")]
    pub out_label: String,
}

impl DirectionLabels {
    /// Label used for the combined column in summary tables.
    pub const COMBINED_LABEL: &'static str = "Both directions";

    pub fn new(in_label: impl Into<String>, out_label: impl Into<String>) -> Self {
        Self {
            in_label: in_label.into(),
            out_label: out_label.into(),
        }
    }

    /// The display label for a direction.
    pub fn label(&self, direction: Direction) -> &str {
        match direction {
            Direction::In => &self.in_label,
            Direction::Out => &self.out_label,
            Direction::Combined => Self::COMBINED_LABEL,
        }
    }
}

/// Static descriptor of one counter site: where its files live, how its
/// export is shaped, and which dates are trustworthy.
///
/// Immutable once the registry is built. File references are resolved
/// relative to the data directory the [`Velostat`](crate::Velostat) handle
/// was opened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Stable identifier used in lookups and cache keys.
    pub id: String,
    /// Human-readable site name.
    pub name: String,
    /// Optional free-text location description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Counter export CSV, relative to the data directory.
    pub counts_file: String,
    /// Optional daily weather CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_file: Option<String>,
    /// Optional notes CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_file: Option<String>,
    pub directions: DirectionLabels,
    /// Closed window of trustworthy collection dates.
    pub date_range: DateSpan,
    /// Sub-ranges where the sensor was not operating. Counts inside these
    /// are masked to missing no matter what the export contains.
    #[serde(default)]
    pub outages: Vec<DateSpan>,
    /// Expected spacing of samples in the export.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_minutes: u32,
    /// Leading metadata lines in the export before the first data row.
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,
    /// Resolution used when a query does not name one.
    #[serde(default)]
    pub default_resolution: Resolution,
}

impl SiteConfig {
    pub fn counts_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.counts_file)
    }

    pub fn weather_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.weather_file.as_ref().map(|file| data_dir.join(file))
    }

    pub fn notes_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.notes_file.as_ref().map(|file| data_dir.join(file))
    }
}

fn default_sample_interval() -> u32 {
    15
}

fn default_skip_rows() -> usize {
    3
}
