use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteRegistryError {
    #[error("failed to read site registry '{0}'")]
    RegistryRead(PathBuf, #[source] std::io::Error),

    #[error("failed to parse site registry '{0}'")]
    RegistryParse(PathBuf, #[source] serde_json::Error),

    #[error("no site with id '{0}'")]
    UnknownSite(String),

    #[error("duplicate site id '{0}'")]
    DuplicateSite(String),

    #[error("site '{0}': sampling interval must be positive")]
    InvalidSampleInterval(String),
}
