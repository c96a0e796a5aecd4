//! CSV loading and best-effort date coercion.
//!
//! The loader is glue around the polars CSV reader. After parsing, textual
//! columns whose values mostly look like dates are converted to a
//! millisecond `Datetime` column; entries that fail to parse become missing.

use super::{Dataset, SemanticType};
use crate::config::LoaderConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::utils::text_values;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use rand::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/.]\d{1,2}[-/.]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Fixed seed so repeated loads sample the same values.
const SAMPLE_SEED: u64 = 42;

/// Result of the date coercion pass.
#[derive(Debug, Clone)]
pub struct TemporalCoercion {
    pub dataset: Dataset,
    /// Names of the columns that were converted, in dataset order.
    pub converted: Vec<String>,
}

/// Load a headered CSV file and run the date coercion pass.
pub fn load_csv(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    let header = header_row_options()
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Reading header of {}", path.display()))?;
    ensure_unique_header(&header)?;

    let frame = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))?;

    finish_loading(frame, config)
}

/// Parse CSV text already held in memory.
pub fn read_csv_str(content: &str, config: &LoaderConfig) -> Result<Dataset> {
    let header = header_row_options()
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()
        .context("Reading CSV header")?;
    ensure_unique_header(&header)?;

    let frame = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()
        .context("Parsing CSV content")?;

    finish_loading(frame, config)
}

/// Reads only the header line, as a single all-text row.
///
/// Polars renames repeated header names (`a`, `a_duplicated_0`), so the raw
/// names have to be checked before the real read.
fn header_row_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(false)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
}

fn ensure_unique_header(header: &DataFrame) -> Result<()> {
    let mut seen = HashSet::new();
    for column in header.get_columns() {
        let Some(Some(name)) = text_values(column.as_materialized_series())?
            .into_iter()
            .next()
        else {
            continue;
        };
        if !seen.insert(name.clone()) {
            return Err(EdaError::DuplicateColumn(name));
        }
    }
    Ok(())
}

fn finish_loading(frame: DataFrame, config: &LoaderConfig) -> Result<Dataset> {
    config.validate()?;
    let dataset = Dataset::from_frame(frame)?;
    info!(
        "Dataset loaded: {} rows x {} columns",
        dataset.height(),
        dataset.width()
    );

    if !config.coerce_dates {
        return Ok(dataset);
    }
    Ok(coerce_temporal_columns(&dataset, config)?.dataset)
}

/// Convert textual columns that look like dates into datetime columns.
///
/// Up to `date_sample_size` non-missing values are sampled per textual
/// column; when more than `date_parse_ratio` of them parse, the whole
/// column is converted. A new dataset is returned.
pub fn coerce_temporal_columns(
    dataset: &Dataset,
    config: &LoaderConfig,
) -> Result<TemporalCoercion> {
    let mut converted = Vec::new();
    let mut series = Vec::with_capacity(dataset.width());

    for column in dataset.columns() {
        if column.semantic_type == SemanticType::Text
            && column.series.dtype() == &DataType::String
            && looks_temporal(column.series, config)?
        {
            debug!("Coercing column '{}' to datetime", column.name);
            series.push(parse_datetime_column(column.series)?);
            converted.push(column.name.to_string());
        } else {
            series.push(column.series.clone());
        }
    }

    if converted.is_empty() {
        return Ok(TemporalCoercion {
            dataset: dataset.clone(),
            converted,
        });
    }

    info!("Converted {} column(s) to datetime: {:?}", converted.len(), converted);
    Ok(TemporalCoercion {
        dataset: Dataset::from_series(series)?,
        converted,
    })
}

fn looks_temporal(series: &Series, config: &LoaderConfig) -> Result<bool> {
    let present: Vec<&str> = series.str()?.into_iter().flatten().collect();
    if present.is_empty() {
        return Ok(false);
    }

    let sample_size = config.date_sample_size.min(present.len());
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let sample: Vec<&str> = present
        .choose_multiple(&mut rng, sample_size)
        .copied()
        .collect();

    let parsed = sample
        .iter()
        .filter(|v| parse_timestamp_millis(v).is_some())
        .count();
    let parse_ratio = parsed as f64 / sample.len() as f64;

    debug!(
        "Column '{}': {}/{} sampled values parse as dates",
        series.name(),
        parsed,
        sample.len()
    );
    Ok(parse_ratio > config.date_parse_ratio)
}

fn parse_datetime_column(series: &Series) -> Result<Series> {
    let timestamps: Vec<Option<i64>> = series
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_timestamp_millis))
        .collect();

    let timestamp_series = Series::new(series.name().clone(), timestamps);
    Ok(timestamp_series.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

/// Parse a date or datetime string into milliseconds since the epoch.
pub fn parse_timestamp_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    if !DATE_PATTERNS.iter().any(|p| p.is_match(value)) {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
    })
}
