//! Orchestration of every analyzer over one dataset.
//!
//! [`AnalysisEngine::analyze`] runs each analyzer once and collects the
//! results into an immutable [`AnalysisBundle`]. Analyzers are independent:
//! a failure is logged, recorded as an [`AnalyzerIssue`], and the affected
//! artifact falls back to its empty value while the rest still run.

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::{EdaError, Result};
use crate::profiler::{ColumnAnalyzer, DatasetProfiler};
use crate::quality::{HealthAuditor, OutlierDetector};
use crate::suggestions::SuggestionEngine;
use crate::types::{
    AnalyzerIssue, ColumnSummaries, DatasetProfile, HealthReport, MlSuggestions, OutlierReport,
};
use crate::visualization::{VisualizationGenerator, VisualizationSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Every artifact of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    /// `None` only when profiling failed.
    pub profile: Option<DatasetProfile>,
    pub columns: ColumnSummaries,
    pub health: HealthReport,
    pub outliers: OutlierReport,
    pub suggestions: MlSuggestions,
    /// One univariate chart per column, in dataset order.
    pub charts: Vec<VisualizationSpec>,
    /// `None` when fewer than two numeric columns exist.
    pub correlation: Option<VisualizationSpec>,
    pub issues: Vec<AnalyzerIssue>,
}

impl AnalysisBundle {
    /// True when every analyzer completed.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Runs the full analysis with one configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
}

static_assertions::assert_impl_all!(AnalysisEngine: Send, Sync);
static_assertions::assert_impl_all!(AnalysisBundle: Send, Sync);

impl AnalysisEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `dataset`. Never fails; see [`AnalysisBundle::issues`].
    pub fn analyze(&self, dataset: &Dataset) -> AnalysisBundle {
        info!(
            "Analyzing dataset: {} rows x {} columns",
            dataset.height(),
            dataset.width()
        );
        let mut issues = Vec::new();

        info!("Step 1: Profiling dataset...");
        let profile = DatasetProfiler::profile(dataset)
            .map_err(|e| issues.push(issue("profiler", None, &e)))
            .ok();

        info!("Step 2: Summarizing columns...");
        let mut columns = ColumnSummaries::new();
        for column in dataset.columns() {
            match ColumnAnalyzer::summarize(dataset, column) {
                Ok(summary) => {
                    columns.insert(summary.name.clone(), summary);
                }
                Err(e) => issues.push(issue("column_analyzer", Some(column.name), &e)),
            }
        }

        info!("Step 3: Auditing column health...");
        let health =
            HealthAuditor::audit_summaries(columns.values(), dataset.height(), &self.config);

        info!("Step 4: Detecting outliers...");
        let outliers = OutlierDetector::detect(dataset, &self.config).unwrap_or_else(|e| {
            issues.push(issue("outlier_detector", None, &e));
            OutlierReport::new()
        });

        info!("Step 5: Suggesting ML roles...");
        let mut suggestions = MlSuggestions::new();
        for column in dataset.columns() {
            match SuggestionEngine::suggest_column(dataset, column, &self.config) {
                Ok(suggestion) => {
                    suggestions.insert(suggestion.column.clone(), suggestion);
                }
                Err(e) => issues.push(issue("suggestion_engine", Some(column.name), &e)),
            }
        }

        info!("Step 6: Generating charts...");
        let mut charts = Vec::with_capacity(dataset.width());
        for name in dataset.column_names() {
            match VisualizationGenerator::univariate(dataset, name, &self.config) {
                Ok(chart) => charts.push(chart),
                Err(e) => issues.push(issue("visualization", Some(name), &e)),
            }
        }

        let correlation = match VisualizationGenerator::correlation_matrix(dataset) {
            Ok(matrix) => Some(matrix),
            Err(EdaError::InsufficientColumns { found, .. }) => {
                debug!("Skipping correlation matrix: {} numeric columns", found);
                None
            }
            Err(e) => {
                issues.push(issue("correlation", None, &e));
                None
            }
        };

        if issues.is_empty() {
            info!("Analysis complete");
        } else {
            warn!("Analysis complete with {} degraded analyzers", issues.len());
        }

        AnalysisBundle {
            profile,
            columns,
            health,
            outliers,
            suggestions,
            charts,
            correlation,
            issues,
        }
    }
}

fn issue(analyzer: &str, column: Option<&str>, error: &EdaError) -> AnalyzerIssue {
    match column {
        Some(column) => warn!("{} failed on column '{}': {}", analyzer, column, error),
        None => warn!("{} failed: {}", analyzer, error),
    }
    AnalyzerIssue {
        analyzer: analyzer.to_string(),
        column: column.map(str::to_string),
        code: error.error_code().to_string(),
        message: error.to_string(),
    }
}
