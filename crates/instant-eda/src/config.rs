//! Configuration types for the analysis engine.
//!
//! Every heuristic threshold used by the analyzers is a policy parameter
//! here rather than a literal in the rule code. Defaults reproduce the
//! classic InstantEDA behaviour.

use serde::{Deserialize, Serialize};

/// Thresholds for the analyzers and the visualization generator.
///
/// Use [`AnalysisConfig::builder()`] to create a customised configuration.
///
/// # Example
///
/// ```rust,ignore
/// use instant_eda::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .skew_threshold(2.0)
///     .category_top_n(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Missing percentage (0 - 100) above which a column is flagged.
    /// Default: 50.0
    pub high_missing_pct: f64,

    /// Distinct/rows ratio above which a column is flagged high-cardinality.
    /// Default: 0.95
    pub high_cardinality_ratio: f64,

    /// Distinct/rows ratio above which a textual column is an identifier.
    /// Default: 0.95
    pub identifier_ratio: f64,

    /// Integer columns with fewer distinct values than this are treated as
    /// categorical by the suggestion engine. Also the exclusive upper bound
    /// of the low-cardinality role.
    /// Default: 25
    pub categorical_max_distinct: usize,

    /// Absolute skewness above which a log transform is suggested.
    /// Default: 1.5
    pub skew_threshold: f64,

    /// IQR multiplier for outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Maximum number of sample outlier values kept per column.
    /// Default: 5
    pub outlier_sample_size: usize,

    /// Number of categories kept by a category frequency chart.
    /// Default: 20
    pub category_top_n: usize,

    /// Distinct count above which grouped charts carry a clutter warning.
    /// Default: 20
    pub clutter_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_missing_pct: 50.0,
            high_cardinality_ratio: 0.95,
            identifier_ratio: 0.95,
            categorical_max_distinct: 25,
            skew_threshold: 1.5,
            iqr_multiplier: 1.5,
            outlier_sample_size: 5,
            category_top_n: 20,
            clutter_threshold: 20,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&self.high_missing_pct) {
            return Err(ConfigValidationError::InvalidPercentage {
                field: "high_missing_pct".to_string(),
                value: self.high_missing_pct,
            });
        }

        for (field, value) in [
            ("high_cardinality_ratio", self.high_cardinality_ratio),
            ("identifier_ratio", self.identifier_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidRatio {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("skew_threshold", self.skew_threshold),
            ("iqr_multiplier", self.iqr_multiplier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::NegativeValue {
                    field: field.to_string(),
                    value,
                });
            }
        }

        // The low-cardinality role covers 3..categorical_max_distinct.
        if self.categorical_max_distinct < 3 {
            return Err(ConfigValidationError::InvalidCount {
                field: "categorical_max_distinct".to_string(),
                value: self.categorical_max_distinct,
                min: 3,
            });
        }

        if self.category_top_n == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "category_top_n".to_string(),
                value: self.category_top_n,
                min: 1,
            });
        }

        Ok(())
    }
}

/// Options for the CSV loader and its date coercion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Whether textual columns that look like dates are converted.
    /// Default: true
    pub coerce_dates: bool,

    /// Number of non-missing values sampled per textual column.
    /// Default: 50
    pub date_sample_size: usize,

    /// Fraction of sampled values that must parse as dates (exclusive).
    /// Default: 0.8
    pub date_parse_ratio: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            coerce_dates: true,
            date_sample_size: 50,
            date_parse_ratio: 0.8,
        }
    }
}

impl LoaderConfig {
    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.date_parse_ratio) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "date_parse_ratio".to_string(),
                value: self.date_parse_ratio,
            });
        }
        if self.date_sample_size == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "date_sample_size".to_string(),
                value: 0,
                min: 1,
            });
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid ratio for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidRatio { field: String, value: f64 },

    #[error("Invalid percentage for '{field}': {value} (must be between 0 and 100)")]
    InvalidPercentage { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be a non-negative number)")]
    NegativeValue { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be at least {min})")]
    InvalidCount {
        field: String,
        value: usize,
        min: usize,
    },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    high_missing_pct: Option<f64>,
    high_cardinality_ratio: Option<f64>,
    identifier_ratio: Option<f64>,
    categorical_max_distinct: Option<usize>,
    skew_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    outlier_sample_size: Option<usize>,
    category_top_n: Option<usize>,
    clutter_threshold: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the missing percentage (0 - 100) above which a column is flagged.
    pub fn high_missing_pct(mut self, pct: f64) -> Self {
        self.high_missing_pct = Some(pct);
        self
    }

    /// Set the distinct/rows ratio for the high-cardinality flag.
    pub fn high_cardinality_ratio(mut self, ratio: f64) -> Self {
        self.high_cardinality_ratio = Some(ratio);
        self
    }

    /// Set the distinct/rows ratio for textual identifiers.
    pub fn identifier_ratio(mut self, ratio: f64) -> Self {
        self.identifier_ratio = Some(ratio);
        self
    }

    /// Set the distinct limit for integer columns treated as categorical.
    pub fn categorical_max_distinct(mut self, limit: usize) -> Self {
        self.categorical_max_distinct = Some(limit);
        self
    }

    /// Set the absolute skewness that triggers a log transform suggestion.
    pub fn skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = Some(threshold);
        self
    }

    /// Set the IQR multiplier for outlier fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the number of sample outliers kept per column.
    pub fn outlier_sample_size(mut self, size: usize) -> Self {
        self.outlier_sample_size = Some(size);
        self
    }

    /// Set the number of categories kept by frequency charts.
    pub fn category_top_n(mut self, n: usize) -> Self {
        self.category_top_n = Some(n);
        self
    }

    /// Set the distinct count above which grouped charts warn about clutter.
    pub fn clutter_threshold(mut self, threshold: usize) -> Self {
        self.clutter_threshold = Some(threshold);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            high_missing_pct: self.high_missing_pct.unwrap_or(defaults.high_missing_pct),
            high_cardinality_ratio: self
                .high_cardinality_ratio
                .unwrap_or(defaults.high_cardinality_ratio),
            identifier_ratio: self.identifier_ratio.unwrap_or(defaults.identifier_ratio),
            categorical_max_distinct: self
                .categorical_max_distinct
                .unwrap_or(defaults.categorical_max_distinct),
            skew_threshold: self.skew_threshold.unwrap_or(defaults.skew_threshold),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            outlier_sample_size: self
                .outlier_sample_size
                .unwrap_or(defaults.outlier_sample_size),
            category_top_n: self.category_top_n.unwrap_or(defaults.category_top_n),
            clutter_threshold: self.clutter_threshold.unwrap_or(defaults.clutter_threshold),
        };

        config.validate()?;
        Ok(config)
    }
}
