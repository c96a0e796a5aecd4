//! Shared helpers for reading column values out of polars series.
//!
//! Analyzers never touch polars chunked arrays directly; they go through
//! these helpers so that missing-value semantics stay identical everywhere.

use crate::dataset::SemanticType;
use crate::error::Result;
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Check if a DataType is a date, time or duration type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time | DataType::Duration(_)
    )
}

/// Check if a DataType holds text or dictionary-encoded categories.
#[inline]
pub fn is_textual_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String) || dtype.is_categorical() || dtype.is_enum()
}

/// Map a physical polars dtype onto the engine's semantic type.
pub fn semantic_type_of(dtype: &DataType) -> SemanticType {
    if is_integer_dtype(dtype) {
        SemanticType::Integer
    } else if is_float_dtype(dtype) {
        SemanticType::Float
    } else if matches!(dtype, DataType::Boolean) {
        SemanticType::Boolean
    } else if is_textual_dtype(dtype) {
        SemanticType::Text
    } else if is_temporal_dtype(dtype) {
        SemanticType::Temporal
    } else {
        SemanticType::Unknown
    }
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Read a column as optional `f64` values in row order.
///
/// Nulls and NaN both come back as `None`.
pub fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    let values = float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|val| !val.is_nan()))
        .collect();
    Ok(values)
}

/// Read only the present `f64` values of a column, in row order.
pub fn present_numeric_values(series: &Series) -> Result<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

/// Read a column as optional strings in row order.
///
/// Non-text columns are rendered through polars' string cast, so booleans
/// become `true`/`false` and dates their ISO form.
pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let string_series = series.cast(&DataType::String)?;
    let values = string_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Number of distinct non-missing values in a column.
pub fn distinct_count(series: &Series) -> Result<usize> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(0);
    }
    Ok(non_null.n_unique()?)
}

/// `part / whole * 100`, or 0 when `whole` is zero.
#[inline]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

/// `part / whole`, or 0 when `whole` is zero.
#[inline]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
