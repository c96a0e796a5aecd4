//! Read-only view of a loaded tabular dataset.
//!
//! A [`Dataset`] wraps a polars `DataFrame` whose shape has been validated
//! (unique names, one shared row count) and whose columns carry an inferred
//! [`SemanticType`]. Analyzers only ever borrow it.

pub mod loader;

use crate::error::{EdaError, Result};
use crate::utils::{is_float_dtype, semantic_type_of};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Semantic type of a column, as far as the analyzers are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Integer,
    Float,
    Boolean,
    Text,
    Temporal,
    /// Nested, binary or null-typed columns the engine cannot classify.
    Unknown,
}

impl SemanticType {
    /// Integer or float.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Text or boolean; both are treated as categorical values.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Boolean)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Temporal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Temporal => "temporal",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A borrowed column of a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct DatasetColumn<'a> {
    pub name: &'a str,
    pub series: &'a Series,
    pub semantic_type: SemanticType,
}

/// A validated, immutable dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    types: Vec<SemanticType>,
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Build a dataset from named series.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::DuplicateColumn`] or [`EdaError::LengthMismatch`]
    /// when the series do not form a rectangle with unique names.
    pub fn from_series(series: Vec<Series>) -> Result<Self> {
        validate_shape(series.iter().map(|s| (s.name().as_str(), s.len())))?;

        let columns = series
            .into_iter()
            .map(|s| normalize_missing(s).map(IntoColumn::into_column))
            .collect::<Result<Vec<_>>>()?;
        let frame = DataFrame::new(columns)?;
        Ok(Self::with_inferred_types(frame))
    }

    /// Wrap an existing `DataFrame`.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        let series = frame
            .get_columns()
            .iter()
            .map(|c| c.as_materialized_series().clone())
            .collect();
        Self::from_series(series)
    }

    fn with_inferred_types(frame: DataFrame) -> Self {
        let types = frame
            .get_columns()
            .iter()
            .map(|c| semantic_type_of(c.dtype()))
            .collect::<Vec<_>>();
        debug!(
            "Dataset ready: {} rows x {} columns, types {:?}",
            frame.height(),
            frame.width(),
            types
        );
        Self { frame, types }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// The underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().as_str())
            .collect()
    }

    /// Iterate over columns in dataset order.
    pub fn columns(&self) -> impl Iterator<Item = DatasetColumn<'_>> {
        self.frame
            .get_columns()
            .iter()
            .zip(self.types.iter())
            .map(|(col, ty)| DatasetColumn {
                name: col.name().as_str(),
                series: col.as_materialized_series(),
                semantic_type: *ty,
            })
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<DatasetColumn<'_>> {
        self.columns()
            .find(|c| c.name == name)
            .ok_or_else(|| EdaError::ColumnNotFound(name.to_string()))
    }

    /// Numeric columns in dataset order.
    pub fn numeric_columns(&self) -> Vec<DatasetColumn<'_>> {
        self.columns()
            .filter(|c| c.semantic_type.is_numeric())
            .collect()
    }

    /// Return a new dataset with `replacement` substituted for the column of
    /// the same name. The receiver is left untouched.
    pub fn with_replaced_column(&self, replacement: Series) -> Result<Self> {
        let name = replacement.name().as_str().to_string();
        self.column(&name)?;

        let series = self
            .columns()
            .map(|c| {
                if c.name == name {
                    replacement.clone()
                } else {
                    c.series.clone()
                }
            })
            .collect();
        Self::from_series(series)
    }
}

/// Reject duplicate names and ragged lengths.
fn validate_shape<'a>(columns: impl IntoIterator<Item = (&'a str, usize)>) -> Result<()> {
    let mut seen = HashSet::new();
    let mut expected: Option<usize> = None;

    for (name, len) in columns {
        if !seen.insert(name) {
            return Err(EdaError::DuplicateColumn(name.to_string()));
        }
        match expected {
            None => expected = Some(len),
            Some(rows) if rows != len => {
                return Err(EdaError::LengthMismatch {
                    column: name.to_string(),
                    expected: rows,
                    found: len,
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Floating point NaN counts as a missing cell.
fn normalize_missing(series: Series) -> Result<Series> {
    if !is_float_dtype(series.dtype()) {
        return Ok(series);
    }

    let float_series = series.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;
    if !ca.into_iter().any(|v| v.is_some_and(f64::is_nan)) {
        return Ok(series);
    }

    // Keep the column's own float width
    let cleaned = ca.apply(|v| v.filter(|val| !val.is_nan())).into_series();
    Ok(cleaned.cast(series.dtype())?)
}
