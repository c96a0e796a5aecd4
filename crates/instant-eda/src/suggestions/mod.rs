//! Heuristic ML-readiness suggestions.
//!
//! Every column gets exactly one [`MlRole`] from the ordered rule chain in
//! [`rules`], plus a human-readable suggestion and an illustrative polars
//! snippet. The snippet is documentation only; the dataset is never changed.

mod rules;

use crate::config::AnalysisConfig;
use crate::dataset::{Dataset, DatasetColumn};
use crate::error::{Result, ResultExt};
use crate::profiler::statistics::skewness;
use crate::types::{MlRole, MlSuggestion, MlSuggestions, NumericTransform};
use crate::utils::{distinct_count, present_numeric_values, text_values};
use rules::{RuleInput, classify};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Assigns roles and transform suggestions per column.
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Suggest a role for every column, keyed by name in dataset order.
    pub fn suggest(dataset: &Dataset, config: &AnalysisConfig) -> Result<MlSuggestions> {
        dataset
            .columns()
            .map(|column| {
                Self::suggest_column(dataset, column, config).map(|s| (s.column.clone(), s))
            })
            .collect()
    }

    /// Suggest a role for a single column.
    pub fn suggest_column(
        dataset: &Dataset,
        column: DatasetColumn<'_>,
        config: &AnalysisConfig,
    ) -> Result<MlSuggestion> {
        let input = RuleInput {
            semantic_type: column.semantic_type,
            distinct: distinct_count(column.series)
                .context(format!("Counting distinct values of '{}'", column.name))?,
            rows: dataset.height(),
        };
        let role = classify(&input, config);
        debug!("Column '{}' classified as {}", column.name, role);

        let name = column.name;
        let suggestion = match role {
            MlRole::Identifier => MlSuggestion {
                column: name.to_string(),
                role,
                suggestion: format!(
                    "Likely a unique identifier ({} distinct values in {} rows). Drop it before modeling.",
                    input.distinct, input.rows
                ),
                snippet: format!("let df = df.drop(\"{name}\")?;"),
                skewness: None,
                transform: None,
            },
            MlRole::BinaryCategorical => {
                let labels = Self::sorted_labels(column)?;
                let positive = labels.last().cloned().unwrap_or_default();
                MlSuggestion {
                    column: name.to_string(),
                    role,
                    suggestion: format!(
                        "Two distinct values ({}). Encode as 0/1 with a binary or label encoder.",
                        labels.join(" / ")
                    ),
                    snippet: format!(
                        "col(\"{name}\").cast(DataType::String).eq(lit(\"{positive}\")).cast(DataType::UInt8)"
                    ),
                    skewness: None,
                    transform: None,
                }
            }
            MlRole::LowCardinalityCategorical => MlSuggestion {
                column: name.to_string(),
                role,
                suggestion: format!(
                    "{} categories. One-hot encode into indicator columns.",
                    input.distinct
                ),
                snippet: format!("let df = df.columns_to_dummies(vec![\"{name}\"], None, false)?;"),
                skewness: None,
                transform: None,
            },
            MlRole::Numerical => {
                let values = present_numeric_values(column.series)
                    .context(format!("Reading numeric values of '{}'", name))?;
                Self::numerical_suggestion(name, skewness(&values), config)
            }
            MlRole::Datetime => MlSuggestion {
                column: name.to_string(),
                role,
                suggestion:
                    "Decompose into calendar features (year, month, day of week) and drop the raw timestamp."
                        .to_string(),
                snippet: format!(
                    "df.lazy().with_columns([\n    col(\"{name}\").dt().year().alias(\"{name}_year\"),\n    col(\"{name}\").dt().month().alias(\"{name}_month\"),\n    col(\"{name}\").dt().weekday().alias(\"{name}_weekday\"),\n])"
                ),
                skewness: None,
                transform: None,
            },
            MlRole::Unknown => {
                warn!(
                    "No role rule matched column '{}' ({} with {} distinct values)",
                    name, input.semantic_type, input.distinct
                );
                MlSuggestion {
                    column: name.to_string(),
                    role,
                    suggestion: format!(
                        "No rule matched this {} column with {} distinct values. Review it manually.",
                        input.semantic_type, input.distinct
                    ),
                    snippet: format!("// no automatic transform for \"{name}\""),
                    skewness: None,
                    transform: None,
                }
            }
        };

        Ok(suggestion)
    }

    fn numerical_suggestion(name: &str, skew: f64, config: &AnalysisConfig) -> MlSuggestion {
        let (transform, suggestion, snippet) = if skew.abs() > config.skew_threshold {
            (
                NumericTransform::Log,
                format!(
                    "Highly skewed (skewness {skew:.2}). Apply a log transform such as log1p to stabilize variance."
                ),
                format!("col(\"{name}\").log1p()"),
            )
        } else {
            (
                NumericTransform::Standardize,
                format!(
                    "Roughly symmetric (skewness {skew:.2}). Standardize to zero mean and unit variance."
                ),
                format!("(col(\"{name}\") - col(\"{name}\").mean()) / col(\"{name}\").std(1)"),
            )
        };

        MlSuggestion {
            column: name.to_string(),
            role: MlRole::Numerical,
            suggestion,
            snippet,
            skewness: Some(skew),
            transform: Some(transform),
        }
    }

    /// Distinct present values rendered as text, sorted.
    fn sorted_labels(column: DatasetColumn<'_>) -> Result<Vec<String>> {
        let labels: BTreeSet<String> = text_values(column.series)?.into_iter().flatten().collect();
        Ok(labels.into_iter().collect())
    }
}
