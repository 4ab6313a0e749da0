use chrono::NaiveDateTime;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("data file not found: '{0}'")]
    FileNotFound(PathBuf),

    #[error("failed to read CSV data from '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("'{path}' has {found} columns, expected {expected}")]
    SchemaMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("required column '{column}' not found in '{path}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("column '{0}' has an unexpected type")]
    ColumnType(String, #[source] PolarsError),

    #[error("unparseable timestamp '{value}' in row {row} for site '{site}'")]
    Timestamp {
        site: String,
        row: usize,
        value: String,
    },

    #[error("invalid count {value} in row {row} for site '{site}'")]
    InvalidCount { site: String, row: usize, value: i64 },

    #[error("duplicate timestamp {timestamp} for site '{site}'")]
    DuplicateTimestamp {
        site: String,
        timestamp: NaiveDateTime,
    },

    #[error("unparseable date '{value}' in row {row} of '{path}'")]
    Date {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
