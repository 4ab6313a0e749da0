use crate::aggregate::error::AggregateError;
use crate::series::error::SeriesError;
use crate::sites::error::SiteRegistryError;
use crate::types::span::InvalidDateSpan;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VelostatError {
    #[error(transparent)]
    Registry(#[from] SiteRegistryError),

    #[error(transparent)]
    SeriesData(#[from] SeriesError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    InvalidSpan(#[from] InvalidDateSpan),
}
