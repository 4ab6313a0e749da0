//! CSV readers for the three per-site file kinds: counter exports, daily
//! weather and notes.

use crate::series::error::SeriesError;
use crate::types::weather::{SiteNote, WeatherRecord};
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

pub(crate) const COL_TIME: &str = "time";
pub(crate) const COL_IN: &str = "in";
pub(crate) const COL_OUT: &str = "out";

// NOAA daily-summaries column names.
const COL_DATE: &str = "DATE";
const COL_PRCP: &str = "PRCP";
const COL_TMAX: &str = "TMAX";
const COL_TMIN: &str = "TMIN";

const COL_NOTE_DATE: &str = "date";
const COL_NOTE_TEXT: &str = "note";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Reads a counter export into a `time`/`in`/`out` DataFrame.
///
/// Exports carry no header row; `skip_rows` leading metadata lines are
/// skipped and the three columns are named explicitly. Count columns are
/// cast to integers, so a non-numeric cell becomes a gap rather than a
/// fabricated value.
pub(crate) async fn load_counts(path: PathBuf, skip_rows: usize) -> Result<DataFrame, SeriesError> {
    ensure_exists(&path).await?;
    let df = task::spawn_blocking(move || read_counts_frame(&path, skip_rows)).await??;
    info!("Loaded {} raw count rows", df.height());
    Ok(df)
}

fn read_counts_frame(path: &Path, skip_rows: usize) -> Result<DataFrame, SeriesError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(false)
        .with_skip_rows(skip_rows)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| csv_read(path, e))?
        .finish()
        .map_err(|e| csv_read(path, e))?;

    if df.width() != 3 {
        return Err(SeriesError::SchemaMismatch {
            path: path.to_path_buf(),
            expected: 3,
            found: df.width(),
        });
    }
    df.set_column_names([COL_TIME, COL_IN, COL_OUT])
        .map_err(|e| csv_read(path, e))?;

    for name in [COL_IN, COL_OUT] {
        let cast = df
            .column(name)
            .map_err(|e| SeriesError::ColumnType(name.to_string(), e))?
            .cast(&DataType::Int64)
            .map_err(|e| SeriesError::ColumnType(name.to_string(), e))?;
        df.with_column(cast).map_err(|e| csv_read(path, e))?;
    }
    Ok(df)
}

/// Reads a daily weather export, keeping date, precipitation and the
/// temperature extremes.
///
/// NOAA exports carry many more columns; only the four the dashboard uses
/// are projected out, with values cast so unreported cells become `None`.
pub(crate) async fn load_weather(path: PathBuf) -> Result<Vec<WeatherRecord>, SeriesError> {
    ensure_exists(&path).await?;
    let records = task::spawn_blocking(move || read_weather_rows(&path)).await??;
    info!("Loaded {} weather rows", records.len());
    Ok(records)
}

fn read_weather_rows(path: &Path) -> Result<Vec<WeatherRecord>, SeriesError> {
    let df = read_csv_with_header(path)?;
    require_columns(&df, path, &[COL_DATE, COL_PRCP, COL_TMAX, COL_TMIN])?;

    let df = df
        .lazy()
        .select([
            col(COL_DATE).cast(DataType::String),
            col(COL_PRCP).cast(DataType::Float64),
            col(COL_TMAX).cast(DataType::Float64),
            col(COL_TMIN).cast(DataType::Float64),
        ])
        .collect()
        .map_err(|e| csv_read(path, e))?;

    let dates = str_column(&df, COL_DATE)?;
    let prcp = f64_column(&df, COL_PRCP)?;
    let tmax = f64_column(&df, COL_TMAX)?;
    let tmin = f64_column(&df, COL_TMIN)?;

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let raw = match dates.get(idx) {
            Some(value) => value,
            None => {
                warn!("Skipping weather row {} with no date in {:?}", idx, path);
                continue;
            }
        };
        let date = parse_date(raw).ok_or_else(|| SeriesError::Date {
            path: path.to_path_buf(),
            row: idx,
            value: raw.to_string(),
        })?;
        rows.push(WeatherRecord {
            date,
            precipitation: prcp.get(idx),
            temp_max: tmax.get(idx),
            temp_min: tmin.get(idx),
        });
    }
    Ok(rows)
}

/// Reads a notes file: one `date`,`note` row per annotation.
pub(crate) async fn load_notes(path: PathBuf) -> Result<Vec<SiteNote>, SeriesError> {
    ensure_exists(&path).await?;
    let notes = task::spawn_blocking(move || read_note_rows(&path)).await??;
    info!("Loaded {} site notes", notes.len());
    Ok(notes)
}

fn read_note_rows(path: &Path) -> Result<Vec<SiteNote>, SeriesError> {
    let df = read_csv_with_header(path)?;
    require_columns(&df, path, &[COL_NOTE_DATE, COL_NOTE_TEXT])?;

    let df = df
        .lazy()
        .select([
            col(COL_NOTE_DATE).cast(DataType::String),
            col(COL_NOTE_TEXT).cast(DataType::String),
        ])
        .collect()
        .map_err(|e| csv_read(path, e))?;

    let dates = str_column(&df, COL_NOTE_DATE)?;
    let texts = str_column(&df, COL_NOTE_TEXT)?;

    let mut notes = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let (raw, text) = match (dates.get(idx), texts.get(idx)) {
            (Some(raw), Some(text)) => (raw, text),
            _ => {
                warn!("Skipping incomplete note row {} in {:?}", idx, path);
                continue;
            }
        };
        let date = parse_date(raw).ok_or_else(|| SeriesError::Date {
            path: path.to_path_buf(),
            row: idx,
            value: raw.to_string(),
        })?;
        notes.push(SiteNote {
            date,
            text: text.to_string(),
        });
    }
    Ok(notes)
}

fn read_csv_with_header(path: &Path) -> Result<DataFrame, SeriesError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| csv_read(path, e))?
        .finish()
        .map_err(|e| csv_read(path, e))
}

fn require_columns(df: &DataFrame, path: &Path, names: &[&str]) -> Result<(), SeriesError> {
    for name in names {
        if df.column(name).is_err() {
            return Err(SeriesError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            });
        }
    }
    Ok(())
}

fn str_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, SeriesError> {
    df.column(name)
        .and_then(|column| column.str())
        .map_err(|e| SeriesError::ColumnType(name.to_string(), e))
}

fn f64_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, SeriesError> {
    df.column(name)
        .and_then(|column| column.f64())
        .map_err(|e| SeriesError::ColumnType(name.to_string(), e))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn csv_read(path: &Path, source: PolarsError) -> SeriesError {
    SeriesError::CsvRead {
        path: path.to_path_buf(),
        source,
    }
}

async fn ensure_exists(path: &Path) -> Result<(), SeriesError> {
    if fs::metadata(path).await.is_err() {
        return Err(SeriesError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}
