mod aggregate;
mod clients;
mod error;
mod series;
mod sites;
mod types;
mod velostat;

pub use error::VelostatError;
pub use velostat::*;

pub use clients::crosstab_client::*;
pub use clients::overlay_client::*;
pub use clients::summary_client::*;
pub use clients::traffic_client::*;

pub use types::aggregated::{AggRow, AggregatedSeries};
pub use types::count_series::{CanonicalSeries, CountRecord};
pub use types::filters::{Direction, PivotAxis, RainFilter, WeekdaySet};
pub use types::resolution::{AggMode, FineResolution, Resolution};
pub use types::site::{DirectionLabels, SiteConfig};
pub use types::span::{DateSpan, InvalidDateSpan};
pub use types::weather::{SiteNote, WeatherRecord};

pub use aggregate::crosstab::{cross_tab, CrossTab};
pub use aggregate::overlay::{build_overlay, DailyOverlayRow};
pub use aggregate::resample::aggregate;
pub use aggregate::summary::{summarize, SummaryRow, SummaryStats};

pub use aggregate::error::AggregateError;
pub use series::error::SeriesError;
pub use series::fetcher::SiteData;
pub use sites::error::SiteRegistryError;
pub use sites::registry::SiteRegistry;
