use crate::dataset::SemanticType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-column descriptive facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub semantic_type: SemanticType,
    /// Physical polars dtype, e.g. `i64` or `str`.
    pub dtype: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
    /// Distinct non-missing values.
    pub distinct_count: usize,
}

/// Column summaries keyed by column name, in dataset order.
pub type ColumnSummaries = IndexMap<String, ColumnSummary>;

/// Dataset-level aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub total_cells: usize,
    pub missing_cells: usize,
    pub missing_percentage: f64,
    pub duplicate_rows: usize,
    pub duplicate_percentage: f64,
}

/// Structural risk flags per column.
///
/// Each list holds column names in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// More than half of the cells are missing.
    pub high_missing: Vec<String>,
    /// Exactly one distinct non-missing value.
    pub constant: Vec<String>,
    /// Nearly every row holds a different value; likely an identifier.
    pub high_cardinality: Vec<String>,
    /// True when all three lists are empty.
    pub clean: bool,
}

/// Summary view of a [`HealthReport`] for renderers that show a single
/// success message instead of three empty lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum HealthStatus {
    Clean,
    NeedsAttention { flagged_columns: usize },
}

impl HealthReport {
    pub fn new(high_missing: Vec<String>, constant: Vec<String>, high_cardinality: Vec<String>) -> Self {
        let clean = high_missing.is_empty() && constant.is_empty() && high_cardinality.is_empty();
        Self {
            high_missing,
            constant,
            high_cardinality,
            clean,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn status(&self) -> HealthStatus {
        if self.clean {
            return HealthStatus::Clean;
        }
        let mut flagged: Vec<&String> = self
            .high_missing
            .iter()
            .chain(&self.constant)
            .chain(&self.high_cardinality)
            .collect();
        flagged.sort();
        flagged.dedup();
        HealthStatus::NeedsAttention {
            flagged_columns: flagged.len(),
        }
    }
}

/// IQR outlier findings for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierEntry {
    pub column: String,
    pub outlier_count: usize,
    /// Outliers as a percentage of all rows, missing cells included.
    pub outlier_percentage: f64,
    /// First outliers in row order.
    pub samples: Vec<f64>,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

/// Sparse outlier report: only columns with at least one outlier.
pub type OutlierReport = IndexMap<String, OutlierEntry>;

/// Feature-engineering role assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MlRole {
    Identifier,
    BinaryCategorical,
    LowCardinalityCategorical,
    Numerical,
    Datetime,
    Unknown,
}

impl MlRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::BinaryCategorical => "Binary Categorical",
            Self::LowCardinalityCategorical => "Low-Cardinality Categorical",
            Self::Numerical => "Numerical",
            Self::Datetime => "Datetime",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for MlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Transform suggested for a numerical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericTransform {
    /// Variance-stabilizing `log1p`.
    Log,
    /// Zero mean, unit variance.
    Standardize,
}

/// Role and suggested preprocessing for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlSuggestion {
    pub column: String,
    pub role: MlRole,
    pub suggestion: String,
    /// Illustrative transform code. Never executed.
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<NumericTransform>,
}

/// Suggestions keyed by column name, in dataset order.
pub type MlSuggestions = IndexMap<String, MlSuggestion>;

/// A degraded analyzer, recorded instead of aborting the whole analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerIssue {
    pub analyzer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub code: String,
    pub message: String,
}
