use super::specs::{
    CategoryCount, CategoryGroup, ClutterWarning, HistogramBin, PairCount, VisualizationSpec,
};
use crate::config::AnalysisConfig;
use crate::dataset::{Dataset, DatasetColumn};
use crate::error::{EdaError, Result, ResultExt};
use crate::profiler::statistics::{box_summary, pearson, sturges_bins};
use crate::utils::{distinct_count, numeric_values, present_numeric_values, text_values};
use indexmap::IndexMap;
use tracing::debug;

/// Builds chart descriptions from a dataset.
pub struct VisualizationGenerator;

impl VisualizationGenerator {
    /// Histogram of a numeric column with Sturges' bin count.
    pub fn histogram(dataset: &Dataset, column: &str) -> Result<VisualizationSpec> {
        let column = dataset.column(column)?;
        ensure_numeric(column)?;

        let values = present_numeric_values(column.series)
            .context(format!("Reading numeric values of '{}'", column.name))?;
        let (min, max, bins) = match min_max(&values) {
            Some((min, max)) => (Some(min), Some(max), histogram_bins(&values, min, max)),
            None => (None, None, Vec::new()),
        };

        Ok(VisualizationSpec::Histogram {
            column: column.name.to_string(),
            min,
            max,
            bins,
        })
    }

    /// Value counts of a column, capped to `config.category_top_n`.
    pub fn category_frequency(
        dataset: &Dataset,
        column: &str,
        config: &AnalysisConfig,
    ) -> Result<VisualizationSpec> {
        let column = dataset.column(column)?;
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for value in text_values(column.series)?.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        let distinct_total = counts.len();
        let mut entries: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(value, count)| CategoryCount { value, count })
            .collect();
        // Stable sort keeps first-appearance order among equal counts
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        let truncated = distinct_total > config.category_top_n;
        entries.truncate(config.category_top_n);
        if truncated {
            debug!(
                "Category chart for '{}' truncated to {} of {} values",
                column.name, config.category_top_n, distinct_total
            );
        }

        Ok(VisualizationSpec::CategoryFrequency {
            column: column.name.to_string(),
            entries,
            distinct_total,
            truncated,
        })
    }

    /// Pairwise Pearson correlation across all numeric columns.
    ///
    /// # Errors
    ///
    /// [`EdaError::InsufficientColumns`] when fewer than two numeric
    /// columns exist.
    pub fn correlation_matrix(dataset: &Dataset) -> Result<VisualizationSpec> {
        let numeric = dataset.numeric_columns();
        if numeric.len() < 2 {
            return Err(EdaError::InsufficientColumns {
                needed: 2,
                found: numeric.len(),
            });
        }

        let values = numeric
            .iter()
            .map(|c| numeric_values(c.series))
            .collect::<Result<Vec<_>>>()?;

        let n = values.len();
        let mut matrix = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            matrix[i][i] = if pearson(&values[i], &values[i]).is_nan() {
                f64::NAN
            } else {
                1.0
            };
            for j in (i + 1)..n {
                let r = pearson(&values[i], &values[j]);
                matrix[i][j] = r;
                matrix[j][i] = r;
            }
        }

        Ok(VisualizationSpec::CorrelationMatrix {
            columns: numeric.iter().map(|c| c.name.to_string()).collect(),
            values: matrix,
        })
    }

    /// Joint counts of two columns over rows where both are present.
    pub fn bivariate_categorical(
        dataset: &Dataset,
        column_a: &str,
        column_b: &str,
        config: &AnalysisConfig,
    ) -> Result<VisualizationSpec> {
        let a = dataset.column(column_a)?;
        let b = dataset.column(column_b)?;

        let mut counts: IndexMap<(String, String), usize> = IndexMap::new();
        let pairs = text_values(a.series)?
            .into_iter()
            .zip(text_values(b.series)?)
            .filter_map(|(x, y)| Some((x?, y?)));
        for pair in pairs {
            *counts.entry(pair).or_insert(0) += 1;
        }

        let warnings = clutter_warnings(&[a, b], config)?;
        Ok(VisualizationSpec::BivariateCategorical {
            column_a: a.name.to_string(),
            column_b: b.name.to_string(),
            cells: counts
                .into_iter()
                .map(|((a, b), count)| PairCount { a, b, count })
                .collect(),
            warnings,
        })
    }

    /// Box summary of a numeric column per category value.
    pub fn numeric_by_category(
        dataset: &Dataset,
        numeric: &str,
        category: &str,
        config: &AnalysisConfig,
    ) -> Result<VisualizationSpec> {
        let numeric = dataset.column(numeric)?;
        ensure_numeric(numeric)?;
        let category = dataset.column(category)?;

        let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
        let rows = numeric_values(numeric.series)?
            .into_iter()
            .zip(text_values(category.series)?)
            .filter_map(|(value, label)| Some((value?, label?)));
        for (value, label) in rows {
            groups.entry(label).or_default().push(value);
        }

        let warnings = clutter_warnings(&[category], config)?;
        Ok(VisualizationSpec::NumericByCategory {
            numeric: numeric.name.to_string(),
            category: category.name.to_string(),
            groups: groups
                .into_iter()
                .filter_map(|(category, values)| {
                    box_summary(&values).map(|summary| CategoryGroup { category, summary })
                })
                .collect(),
            warnings,
        })
    }

    /// Histogram for numeric columns, category frequency for the rest.
    pub fn univariate(
        dataset: &Dataset,
        column: &str,
        config: &AnalysisConfig,
    ) -> Result<VisualizationSpec> {
        if dataset.column(column)?.semantic_type.is_numeric() {
            Self::histogram(dataset, column)
        } else {
            Self::category_frequency(dataset, column, config)
        }
    }
}

fn ensure_numeric(column: DatasetColumn<'_>) -> Result<()> {
    if column.semantic_type.is_numeric() {
        Ok(())
    } else {
        Err(EdaError::UnsupportedColumn {
            column: column.name.to_string(),
            expected: "numeric".to_string(),
            found: column.semantic_type.to_string(),
        })
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    )
}

fn histogram_bins(values: &[f64], min: f64, max: f64) -> Vec<HistogramBin> {
    if min == max {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let bin_count = sturges_bins(values.len());
    // Interpolated edges stay finite even when max - min overflows
    let edges: Vec<f64> = (0..=bin_count)
        .map(|i| {
            let t = i as f64 / bin_count as f64;
            min * (1.0 - t) + max * t
        })
        .collect();
    let interior = &edges[1..bin_count];

    let mut counts = vec![0usize; bin_count];
    for v in values {
        counts[interior.partition_point(|edge| edge <= v)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: edges[i],
            end: edges[i + 1],
            count,
        })
        .collect()
}

fn clutter_warnings(
    columns: &[DatasetColumn<'_>],
    config: &AnalysisConfig,
) -> Result<Vec<ClutterWarning>> {
    let mut warnings = Vec::new();
    for column in columns {
        let distinct = distinct_count(column.series)?;
        if distinct > config.clutter_threshold {
            warnings.push(ClutterWarning {
                column: column.name.to_string(),
                distinct,
                threshold: config.clutter_threshold,
            });
        }
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn dataset(df: DataFrame) -> Dataset {
        Dataset::from_frame(df).unwrap()
    }

    // ==================== histogram tests ====================

    #[test]
    fn test_histogram_bins_cover_range() {
        let ds = dataset(df!["v" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]].unwrap());
        let spec = VisualizationGenerator::histogram(&ds, "v").unwrap();

        let VisualizationSpec::Histogram { min, max, bins, .. } = spec else {
            panic!("expected histogram");
        };
        assert_eq!(min, Some(1.0));
        assert_eq!(max, Some(9.0));
        // ceil(log2 9) + 1
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.first().unwrap().start, 1.0);
        assert_eq!(bins.last().unwrap().end, 9.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 9);
        // Max lands in the closed last bin
        assert!(bins.last().unwrap().count >= 1);
    }

    #[test]
    fn test_histogram_extreme_range_stays_finite() {
        let ds = dataset(df!["v" => [-1.7e308f64, 0.0, 1.7e308]].unwrap());
        let spec = VisualizationGenerator::histogram(&ds, "v").unwrap();
        let VisualizationSpec::Histogram { bins, .. } = spec else {
            panic!("expected histogram");
        };

        assert_eq!(bins.len(), 3);
        assert!(bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert_eq!(bins[0].start, -1.7e308);
        assert_eq!(bins[2].end, 1.7e308);
        assert!(bins.windows(2).all(|w| w[0].end == w[1].start));
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1]);
    }

    #[test]
    fn test_histogram_constant_single_bin() {
        let ds = dataset(df!["v" => [3i64, 3, 3]].unwrap());
        let spec = VisualizationGenerator::histogram(&ds, "v").unwrap();
        let VisualizationSpec::Histogram { bins, .. } = spec else {
            panic!("expected histogram");
        };
        assert_eq!(
            bins,
            vec![HistogramBin {
                start: 3.0,
                end: 3.0,
                count: 3
            }]
        );
    }

    #[test]
    fn test_histogram_all_missing() {
        let ds = dataset(df!["v" => [None::<f64>, None]].unwrap());
        let spec = VisualizationGenerator::histogram(&ds, "v").unwrap();
        let VisualizationSpec::Histogram { min, bins, .. } = spec else {
            panic!("expected histogram");
        };
        assert_eq!(min, None);
        assert!(bins.is_empty());
    }

    #[test]
    fn test_histogram_rejects_text() {
        let ds = dataset(df!["name" => ["a", "b"]].unwrap());
        let err = VisualizationGenerator::histogram(&ds, "name").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN");
    }

    #[test]
    fn test_missing_column() {
        let ds = dataset(df!["v" => [1.0f64]].unwrap());
        let err = VisualizationGenerator::histogram(&ds, "nope").unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(name) if name == "nope"));
    }

    // ==================== category frequency tests ====================

    #[test]
    fn test_category_frequency_order_and_ties() {
        let ds = dataset(df!["c" => ["b", "a", "c", "a", "b", "d", "c"]].unwrap());
        let spec =
            VisualizationGenerator::category_frequency(&ds, "c", &AnalysisConfig::default())
                .unwrap();
        let VisualizationSpec::CategoryFrequency {
            entries,
            distinct_total,
            truncated,
            ..
        } = spec
        else {
            panic!("expected category frequency");
        };

        let order: Vec<(&str, usize)> = entries
            .iter()
            .map(|e| (e.value.as_str(), e.count))
            .collect();
        assert_eq!(order, vec![("b", 2), ("a", 2), ("c", 2), ("d", 1)]);
        assert_eq!(distinct_total, 4);
        assert!(!truncated);
    }

    #[test]
    fn test_category_frequency_truncates_at_top_n() {
        let values: Vec<String> = (0..25).map(|i| format!("v{i:02}")).collect();
        let ds = dataset(df!["c" => values].unwrap());
        let spec =
            VisualizationGenerator::category_frequency(&ds, "c", &AnalysisConfig::default())
                .unwrap();
        let VisualizationSpec::CategoryFrequency {
            entries,
            distinct_total,
            truncated,
            ..
        } = spec
        else {
            panic!("expected category frequency");
        };
        assert_eq!(entries.len(), 20);
        assert_eq!(distinct_total, 25);
        assert!(truncated);
    }

    #[test]
    fn test_category_frequency_at_limit_not_truncated() {
        let values: Vec<String> = (0..20).map(|i| format!("v{i}")).collect();
        let ds = dataset(df!["c" => values].unwrap());
        let spec =
            VisualizationGenerator::category_frequency(&ds, "c", &AnalysisConfig::default())
                .unwrap();
        let VisualizationSpec::CategoryFrequency {
            entries, truncated, ..
        } = spec
        else {
            panic!("expected category frequency");
        };
        assert_eq!(entries.len(), 20);
        assert!(!truncated);
    }

    #[test]
    fn test_category_frequency_skips_missing() {
        let ds = dataset(df!["c" => [Some("x"), None, Some("x")]].unwrap());
        let spec =
            VisualizationGenerator::category_frequency(&ds, "c", &AnalysisConfig::default())
                .unwrap();
        let VisualizationSpec::CategoryFrequency { entries, .. } = spec else {
            panic!("expected category frequency");
        };
        assert_eq!(
            entries,
            vec![CategoryCount {
                value: "x".to_string(),
                count: 2
            }]
        );
    }

    // ==================== correlation tests ====================

    #[test]
    fn test_correlation_matrix() {
        let ds = dataset(
            df![
                "x" => [1.0f64, 2.0, 3.0, 4.0],
                "label" => ["a", "b", "c", "d"],
                "y" => [2.0f64, 4.0, 6.0, 8.0],
                "flat" => [1i64, 1, 1, 1],
            ]
            .unwrap(),
        );
        let spec = VisualizationGenerator::correlation_matrix(&ds).unwrap();
        let VisualizationSpec::CorrelationMatrix { columns, values } = spec else {
            panic!("expected correlation matrix");
        };

        assert_eq!(columns, vec!["x", "y", "flat"]);
        assert_eq!(values[0][0], 1.0);
        assert!((values[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(values[0][1], values[1][0]);
        assert!(values[0][2].is_nan());
        assert!(values[2][2].is_nan());
    }

    #[test]
    fn test_correlation_needs_two_numeric_columns() {
        let ds = dataset(df!["x" => [1.0f64, 2.0], "s" => ["a", "b"]].unwrap());
        let err = VisualizationGenerator::correlation_matrix(&ds).unwrap_err();
        assert!(matches!(
            err,
            EdaError::InsufficientColumns {
                needed: 2,
                found: 1
            }
        ));
    }

    // ==================== bivariate tests ====================

    #[test]
    fn test_bivariate_counts_complete_pairs() {
        let ds = dataset(
            df![
                "a" => [Some("x"), Some("x"), Some("y"), None],
                "b" => [Some("p"), Some("p"), Some("q"), Some("q")],
            ]
            .unwrap(),
        );
        let spec =
            VisualizationGenerator::bivariate_categorical(&ds, "a", "b", &AnalysisConfig::default())
                .unwrap();
        let VisualizationSpec::BivariateCategorical {
            cells, warnings, ..
        } = spec
        else {
            panic!("expected bivariate chart");
        };
        assert_eq!(
            cells,
            vec![
                PairCount {
                    a: "x".to_string(),
                    b: "p".to_string(),
                    count: 2
                },
                PairCount {
                    a: "y".to_string(),
                    b: "q".to_string(),
                    count: 1
                },
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bivariate_clutter_warning_without_truncation() {
        let many: Vec<String> = (0..30).map(|i| format!("k{i}")).collect();
        let few: Vec<&str> = (0..30).map(|i| if i % 2 == 0 { "even" } else { "odd" }).collect();
        let ds = dataset(df!["many" => many, "few" => few].unwrap());
        let spec = VisualizationGenerator::bivariate_categorical(
            &ds,
            "many",
            "few",
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(
            spec.warnings(),
            &[ClutterWarning {
                column: "many".to_string(),
                distinct: 30,
                threshold: 20
            }]
        );
        let VisualizationSpec::BivariateCategorical { cells, .. } = spec else {
            panic!("expected bivariate chart");
        };
        assert_eq!(cells.len(), 30);
    }

    // ==================== numeric by category tests ====================

    #[test]
    fn test_numeric_by_category_groups() {
        let ds = dataset(
            df![
                "price" => [Some(1.0f64), Some(3.0), Some(10.0), None, Some(20.0)],
                "city" => [Some("a"), Some("a"), Some("b"), Some("b"), Some("b")],
            ]
            .unwrap(),
        );
        let spec = VisualizationGenerator::numeric_by_category(
            &ds,
            "price",
            "city",
            &AnalysisConfig::default(),
        )
        .unwrap();
        let VisualizationSpec::NumericByCategory { groups, .. } = spec else {
            panic!("expected numeric by category");
        };

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "a");
        assert_eq!(groups[0].summary.count, 2);
        assert_eq!(groups[0].summary.median, 2.0);
        assert_eq!(groups[1].category, "b");
        assert_eq!(groups[1].summary.count, 2);
        assert_eq!(groups[1].summary.mean, 15.0);
    }

    #[test]
    fn test_numeric_by_category_clutter_warning_keeps_all_groups() {
        let labels: Vec<String> = (0..42).map(|i| format!("g{:02}", i % 21)).collect();
        let values: Vec<f64> = (0..42).map(|i| i as f64).collect();
        let ds = dataset(df!["value" => values, "group" => labels].unwrap());
        let spec = VisualizationGenerator::numeric_by_category(
            &ds,
            "value",
            "group",
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(
            spec.warnings(),
            &[ClutterWarning {
                column: "group".to_string(),
                distinct: 21,
                threshold: 20
            }]
        );
        let VisualizationSpec::NumericByCategory { groups, .. } = spec else {
            panic!("expected numeric by category");
        };
        assert_eq!(groups.len(), 21);
        assert_eq!(groups[0].category, "g00");
        assert_eq!(groups[20].category, "g20");
        assert!(groups.iter().all(|g| g.summary.count == 2));
    }

    #[test]
    fn test_numeric_by_category_requires_numeric() {
        let ds = dataset(df!["a" => ["x"], "b" => ["y"]].unwrap());
        let err = VisualizationGenerator::numeric_by_category(
            &ds,
            "a",
            "b",
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN");
    }

    #[test]
    fn test_univariate_dispatch() {
        let ds = dataset(df!["n" => [1.0f64, 2.0], "s" => ["a", "b"]].unwrap());
        let config = AnalysisConfig::default();
        assert_eq!(
            VisualizationGenerator::univariate(&ds, "n", &config)
                .unwrap()
                .kind(),
            "histogram"
        );
        assert_eq!(
            VisualizationGenerator::univariate(&ds, "s", &config)
                .unwrap()
                .kind(),
            "category_frequency"
        );
    }
}
