//! Column and dataset profiling.
//!
//! - [`ColumnAnalyzer`] computes the per-column facts (type, missing,
//!   distinct) every other analyzer builds on.
//! - [`DatasetProfiler`] computes dataset-level aggregates.

pub mod statistics;

use crate::dataset::{Dataset, DatasetColumn};
use crate::error::{Result, ResultExt};
use crate::types::{ColumnSummaries, ColumnSummary, DatasetProfile};
use crate::utils::{distinct_count, percentage};
use polars::prelude::*;
use tracing::debug;

pub use statistics::BoxSummary;

/// Per-column descriptive statistics.
pub struct ColumnAnalyzer;

impl ColumnAnalyzer {
    /// Summarize every column, keyed by name in dataset order.
    pub fn analyze(dataset: &Dataset) -> Result<ColumnSummaries> {
        dataset
            .columns()
            .map(|column| {
                Self::summarize(dataset, column).map(|s| (s.name.clone(), s))
            })
            .collect()
    }

    /// Summarize a single column.
    pub fn summarize(dataset: &Dataset, column: DatasetColumn<'_>) -> Result<ColumnSummary> {
        let missing_count = column.series.null_count();
        let distinct_count = distinct_count(column.series)
            .context(format!("Counting distinct values of '{}'", column.name))?;

        Ok(ColumnSummary {
            name: column.name.to_string(),
            semantic_type: column.semantic_type,
            dtype: column.series.dtype().to_string(),
            missing_count,
            missing_percentage: percentage(missing_count, dataset.height()),
            distinct_count,
        })
    }
}

/// Dataset-level aggregate statistics.
pub struct DatasetProfiler;

impl DatasetProfiler {
    /// Profile the dataset shape, missing cells and duplicate rows.
    pub fn profile(dataset: &Dataset) -> Result<DatasetProfile> {
        let rows = dataset.height();
        let columns = dataset.width();
        let total_cells = rows * columns;

        let missing_cells: usize = dataset.columns().map(|c| c.series.null_count()).sum();
        let duplicate_rows = Self::count_duplicate_rows(dataset.frame())?;

        debug!(
            "Profiled {} cells: {} missing, {} duplicate rows",
            total_cells, missing_cells, duplicate_rows
        );

        Ok(DatasetProfile {
            rows,
            columns,
            total_cells,
            missing_cells,
            missing_percentage: percentage(missing_cells, total_cells),
            duplicate_rows,
            duplicate_percentage: percentage(duplicate_rows, rows),
        })
    }

    /// Rows that repeat an earlier row exactly.
    fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(0);
        }
        let unique_rows = df
            .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)
            .context("Detecting duplicate rows")?
            .height();
        Ok(df.height() - unique_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SemanticType;

    fn sample_dataset() -> Dataset {
        Dataset::from_frame(
            df![
                "a" => [Some(1i64), Some(2), None, Some(1)],
                "b" => [Some("x"), Some("y"), None, Some("x")],
                "c" => [1.5f64, 2.5, 3.5, 1.5],
            ]
            .unwrap(),
        )
        .unwrap()
    }

    // ==================== ColumnAnalyzer tests ====================

    #[test]
    fn test_column_summaries() {
        let ds = sample_dataset();
        let summaries = ColumnAnalyzer::analyze(&ds).unwrap();

        assert_eq!(
            summaries.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );

        let a = &summaries["a"];
        assert_eq!(a.semantic_type, SemanticType::Integer);
        assert_eq!(a.missing_count, 1);
        assert_eq!(a.missing_percentage, 25.0);
        assert_eq!(a.distinct_count, 2);

        let b = &summaries["b"];
        assert_eq!(b.semantic_type, SemanticType::Text);
        assert_eq!(b.distinct_count, 2);

        let c = &summaries["c"];
        assert_eq!(c.missing_count, 0);
        assert_eq!(c.distinct_count, 3);
    }

    #[test]
    fn test_column_summary_empty_dataset() {
        let ds = Dataset::from_series(vec![Series::new("a".into(), Vec::<i64>::new())]).unwrap();
        let summaries = ColumnAnalyzer::analyze(&ds).unwrap();
        assert_eq!(summaries["a"].missing_percentage, 0.0);
        assert_eq!(summaries["a"].distinct_count, 0);
    }

    // ==================== DatasetProfiler tests ====================

    #[test]
    fn test_profile_counts() {
        let ds = sample_dataset();
        let profile = DatasetProfiler::profile(&ds).unwrap();

        assert_eq!(profile.rows, 4);
        assert_eq!(profile.columns, 3);
        assert_eq!(profile.total_cells, 12);
        assert_eq!(profile.missing_cells, 2);
        assert!((profile.missing_percentage - 100.0 * 2.0 / 12.0).abs() < 1e-9);
        // Row 4 repeats row 1
        assert_eq!(profile.duplicate_rows, 1);
        assert_eq!(profile.duplicate_percentage, 25.0);
    }

    #[test]
    fn test_profile_duplicates_count_each_repeat() {
        let ds = Dataset::from_frame(
            df![
                "k" => ["a", "a", "a", "b"],
            ]
            .unwrap(),
        )
        .unwrap();
        let profile = DatasetProfiler::profile(&ds).unwrap();
        assert_eq!(profile.duplicate_rows, 2);
    }

    #[test]
    fn test_profile_empty_dataset() {
        let ds = Dataset::from_series(vec![
            Series::new("a".into(), Vec::<f64>::new()),
            Series::new("b".into(), Vec::<String>::new()),
            Series::new("c".into(), Vec::<i64>::new()),
        ])
        .unwrap();
        let profile = DatasetProfiler::profile(&ds).unwrap();

        assert_eq!(profile.rows, 0);
        assert_eq!(profile.columns, 3);
        assert_eq!(profile.missing_percentage, 0.0);
        assert_eq!(profile.duplicate_rows, 0);
        assert_eq!(profile.duplicate_percentage, 0.0);
    }

    #[test]
    fn test_profile_no_columns() {
        let ds = Dataset::from_series(vec![]).unwrap();
        let profile = DatasetProfiler::profile(&ds).unwrap();
        assert_eq!(profile.total_cells, 0);
        assert_eq!(profile.missing_percentage, 0.0);
    }
}
