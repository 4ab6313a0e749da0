use crate::types::resolution::Resolution;
use thiserror::Error;

/// Errors from the aggregation layer.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// The requested range holds no traffic data at all, so there is no
    /// total to report. Distinct from a range of recorded zeros, which is
    /// real data.
    #[error("no traffic data in the requested range")]
    NoDataInRange,

    /// A computation defined over daily buckets was handed a series at a
    /// different resolution.
    #[error("expected a daily series, got {0}")]
    NotDailyResolution(Resolution),
}
