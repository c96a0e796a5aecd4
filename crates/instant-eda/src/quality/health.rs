//! Column health audit.
//!
//! [`HealthAuditor::audit`] lists the columns worth a look before modelling,
//! using the thresholds in [`AnalysisConfig`].

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::ColumnAnalyzer;
use crate::types::{ColumnSummary, HealthReport};
use crate::utils::ratio;
use tracing::debug;

/// Flags columns that are mostly missing, constant, or near-unique.
pub struct HealthAuditor;

impl HealthAuditor {
    /// Audit every column of the dataset.
    pub fn audit(dataset: &Dataset, config: &AnalysisConfig) -> Result<HealthReport> {
        let summaries = ColumnAnalyzer::analyze(dataset)?;
        Ok(Self::audit_summaries(
            summaries.values(),
            dataset.height(),
            config,
        ))
    }

    /// Audit precomputed column summaries.
    ///
    /// A dataset without rows produces no flags.
    pub fn audit_summaries<'a>(
        summaries: impl IntoIterator<Item = &'a ColumnSummary>,
        rows: usize,
        config: &AnalysisConfig,
    ) -> HealthReport {
        let mut high_missing = Vec::new();
        let mut constant = Vec::new();
        let mut high_cardinality = Vec::new();

        if rows == 0 {
            return HealthReport::new(high_missing, constant, high_cardinality);
        }

        for summary in summaries {
            if summary.missing_percentage > config.high_missing_pct {
                high_missing.push(summary.name.clone());
            }

            // All-missing columns have zero distinct values and match neither
            // of the distinct-count rules.
            if summary.distinct_count == 1 {
                constant.push(summary.name.clone());
            }

            if summary.distinct_count > 1
                && ratio(summary.distinct_count, rows) > config.high_cardinality_ratio
            {
                high_cardinality.push(summary.name.clone());
            }
        }

        debug!(
            "Health audit: {} high-missing, {} constant, {} high-cardinality",
            high_missing.len(),
            constant.len(),
            high_cardinality.len()
        );

        HealthReport::new(high_missing, constant, high_cardinality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HealthStatus;
    use polars::prelude::*;

    fn audit(df: DataFrame) -> HealthReport {
        let ds = Dataset::from_frame(df).unwrap();
        HealthAuditor::audit(&ds, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_high_missing_flag() {
        let report = audit(
            df![
                "sparse" => [Some(1i64), None, None, Some(2)],
                "mostly_gone" => [Some(1i64), None, None, None],
                "dense" => [1i64, 2, 1, 2],
            ]
            .unwrap(),
        );
        // Exactly 50% is not above the threshold
        assert_eq!(report.high_missing, vec!["mostly_gone".to_string()]);
    }

    #[test]
    fn test_constant_never_high_cardinality() {
        let report = audit(
            df![
                "same" => ["x", "x", "x", "x"],
                "mixed" => ["a", "b", "a", "b"],
            ]
            .unwrap(),
        );
        assert_eq!(report.constant, vec!["same".to_string()]);
        assert!(report.high_cardinality.is_empty());
    }

    #[test]
    fn test_single_row_is_constant_only() {
        // distinct/rows = 1.0 but distinct == 1
        let report = audit(df!["v" => [42i64]].unwrap());
        assert_eq!(report.constant, vec!["v".to_string()]);
        assert!(report.high_cardinality.is_empty());
    }

    #[test]
    fn test_high_cardinality_flag() {
        let ids: Vec<String> = (0..20).map(|i| format!("user-{i}")).collect();
        let mut almost: Vec<i64> = (0..20).collect();
        almost[19] = 0; // 19/20 = 0.95, not above the threshold

        let report = audit(
            df![
                "ids" => ids,
                "almost" => almost,
            ]
            .unwrap(),
        );
        assert_eq!(report.high_cardinality, vec!["ids".to_string()]);
    }

    #[test]
    fn test_all_missing_column_neither_constant_nor_high_cardinality() {
        let report = audit(
            df![
                "empty" => [None::<f64>, None, None],
                "ok" => [1i64, 1, 2],
            ]
            .unwrap(),
        );
        assert_eq!(report.high_missing, vec!["empty".to_string()]);
        assert!(report.constant.is_empty());
        assert!(report.high_cardinality.is_empty());
    }

    #[test]
    fn test_clean_report() {
        let report = audit(
            df![
                "a" => [1i64, 2, 1, 2],
                "b" => ["x", "y", "y", "x"],
            ]
            .unwrap(),
        );
        assert!(report.is_clean());
        assert_eq!(report.status(), HealthStatus::Clean);
    }

    #[test]
    fn test_zero_rows_no_flags() {
        let ds = Dataset::from_series(vec![Series::new("a".into(), Vec::<f64>::new())]).unwrap();
        let report = HealthAuditor::audit(&ds, &AnalysisConfig::default()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_custom_threshold() {
        let ds = Dataset::from_frame(df!["a" => [Some(1i64), None, Some(2), Some(3)]].unwrap())
            .unwrap();
        let config = AnalysisConfig::builder().high_missing_pct(20.0).build().unwrap();
        let report = HealthAuditor::audit(&ds, &config).unwrap();
        assert_eq!(report.high_missing, vec!["a".to_string()]);
    }
}
