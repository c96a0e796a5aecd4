use crate::profiler::BoxSummary;
use serde::{Deserialize, Serialize};

/// One histogram bin. Bins are half-open `[start, end)` except the last,
/// which also holds `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Occurrences of one distinct value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Occurrences of one `(a, b)` value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub a: String,
    pub b: String,
    pub count: usize,
}

/// Distribution of a numeric column within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub summary: BoxSummary,
}

/// A column with too many distinct values to chart legibly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClutterWarning {
    pub column: String,
    pub distinct: usize,
    pub threshold: usize,
}

/// Renderer-agnostic chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualizationSpec {
    Histogram {
        column: String,
        /// `None` when the column has no present values.
        min: Option<f64>,
        max: Option<f64>,
        bins: Vec<HistogramBin>,
    },
    CategoryFrequency {
        column: String,
        /// Most frequent first, ties in order of first appearance.
        entries: Vec<CategoryCount>,
        distinct_total: usize,
        truncated: bool,
    },
    CorrelationMatrix {
        columns: Vec<String>,
        /// Row-major, `values[i][j]` pairs `columns[i]` with `columns[j]`.
        /// Undefined correlations are NaN and serialize as `null`.
        #[serde(deserialize_with = "nan_matrix::deserialize")]
        values: Vec<Vec<f64>>,
    },
    BivariateCategorical {
        column_a: String,
        column_b: String,
        cells: Vec<PairCount>,
        warnings: Vec<ClutterWarning>,
    },
    NumericByCategory {
        numeric: String,
        category: String,
        groups: Vec<CategoryGroup>,
        warnings: Vec<ClutterWarning>,
    },
}

impl VisualizationSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Histogram { .. } => "histogram",
            Self::CategoryFrequency { .. } => "category_frequency",
            Self::CorrelationMatrix { .. } => "correlation_matrix",
            Self::BivariateCategorical { .. } => "bivariate_categorical",
            Self::NumericByCategory { .. } => "numeric_by_category",
        }
    }

    /// Columns the chart is drawn from.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Histogram { column, .. } | Self::CategoryFrequency { column, .. } => {
                vec![column.as_str()]
            }
            Self::CorrelationMatrix { columns, .. } => columns.iter().map(String::as_str).collect(),
            Self::BivariateCategorical {
                column_a, column_b, ..
            } => vec![column_a.as_str(), column_b.as_str()],
            Self::NumericByCategory {
                numeric, category, ..
            } => vec![numeric.as_str(), category.as_str()],
        }
    }

    pub fn warnings(&self) -> &[ClutterWarning] {
        match self {
            Self::BivariateCategorical { warnings, .. } | Self::NumericByCategory { warnings, .. } => {
                warnings
            }
            _ => &[],
        }
    }
}

/// serde_json writes NaN as `null`; read it back as NaN.
mod nan_matrix {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect())
    }
}
