//! Outlier detection module.
//!
//! Uses the IQR fence method on every numeric column.

use crate::config::AnalysisConfig;
use crate::dataset::{Dataset, DatasetColumn};
use crate::error::{Result, ResultExt};
use crate::profiler::statistics::{quantile_linear, sorted};
use crate::types::{OutlierEntry, OutlierReport};
use crate::utils::{numeric_values, percentage};
use tracing::debug;

/// Quartiles and fences of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFences {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Strictly outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Compute `[Q1 - k*IQR, Q3 + k*IQR]` with linearly interpolated quartiles.
pub fn iqr_fences(values: &[f64], multiplier: f64) -> Option<IqrFences> {
    let sorted = sorted(values);
    let q1 = quantile_linear(&sorted, 0.25)?;
    let q3 = quantile_linear(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some(IqrFences {
        q1,
        q3,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

/// Handles outlier detection for numeric columns.
pub struct OutlierDetector;

impl OutlierDetector {
    /// Detect outliers in every numeric column.
    ///
    /// Columns without outliers, and numeric columns with no present
    /// values, are left out of the report.
    pub fn detect(dataset: &Dataset, config: &AnalysisConfig) -> Result<OutlierReport> {
        let mut report = OutlierReport::new();

        for column in dataset.numeric_columns() {
            if let Some(entry) = Self::detect_column(column, dataset.height(), config)? {
                report.insert(entry.column.clone(), entry);
            }
        }

        debug!("Outliers found in {} numeric columns", report.len());
        Ok(report)
    }

    fn detect_column(
        column: DatasetColumn<'_>,
        rows: usize,
        config: &AnalysisConfig,
    ) -> Result<Option<OutlierEntry>> {
        let values = numeric_values(column.series)
            .context(format!("Reading numeric values of '{}'", column.name))?;
        Ok(Self::entry_for_values(column.name, &values, rows, config))
    }

    /// Build the outlier entry for one column's values in row order.
    ///
    /// When all quartiles coincide (IQR of zero), every value that differs
    /// from that constant is an outlier.
    pub fn entry_for_values(
        name: &str,
        values: &[Option<f64>],
        rows: usize,
        config: &AnalysisConfig,
    ) -> Option<OutlierEntry> {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let fences = iqr_fences(&present, config.iqr_multiplier)?;

        let outliers: Vec<f64> = present
            .iter()
            .copied()
            .filter(|v| fences.is_outlier(*v))
            .collect();

        if outliers.is_empty() {
            return None;
        }

        debug!(
            "Column '{}': {} outliers outside [{:.2}, {:.2}]",
            name,
            outliers.len(),
            fences.lower,
            fences.upper
        );

        Some(OutlierEntry {
            column: name.to_string(),
            outlier_count: outliers.len(),
            outlier_percentage: percentage(outliers.len(), rows),
            samples: outliers
                .iter()
                .copied()
                .take(config.outlier_sample_size)
                .collect(),
            q1: fences.q1,
            q3: fences.q3,
            iqr: fences.iqr(),
            lower_fence: fences.lower,
            upper_fence: fences.upper,
        })
    }
}
