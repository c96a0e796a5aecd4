//! Instant exploratory data analysis for tabular datasets.
//!
//! A heuristic profiling engine built on Polars. Given a loaded dataset it
//! produces descriptive artifacts a front end can render directly:
//!
//! - **Profiling**: row/column counts, missing cells, duplicate rows, and a
//!   per-column summary of type, missing share, and distinct values
//! - **Health audit**: columns that are mostly missing, constant, or
//!   near-unique
//! - **Outliers**: IQR fences per numeric column with sample values
//! - **ML suggestions**: a feature-engineering role per column with a
//!   suggested transform and an illustrative snippet
//! - **Charts**: renderer-agnostic descriptions of histograms, category
//!   frequencies, correlation matrices, and bivariate views
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use instant_eda::{AnalysisEngine, LoaderConfig, load_csv};
//!
//! let dataset = load_csv("data.csv", &LoaderConfig::default())?;
//! let bundle = AnalysisEngine::default().analyze(&dataset);
//!
//! println!("Duplicate rows: {:?}", bundle.profile.map(|p| p.duplicate_rows));
//! for (column, suggestion) in &bundle.suggestions {
//!     println!("{column}: {} - {}", suggestion.role, suggestion.suggestion);
//! }
//! ```
//!
//! # Configuration
//!
//! Every threshold lives in [`AnalysisConfig`]:
//!
//! ```rust,ignore
//! use instant_eda::{AnalysisConfig, AnalysisEngine};
//!
//! let config = AnalysisConfig::builder()
//!     .skew_threshold(1.0)        // Suggest log transforms more eagerly
//!     .category_top_n(10)         // Shorter category charts
//!     .build()?;
//! let engine = AnalysisEngine::new(config)?;
//! ```
//!
//! # Individual analyzers
//!
//! Each analyzer is usable on its own and only borrows the dataset:
//!
//! ```rust,ignore
//! use instant_eda::{AnalysisConfig, HealthAuditor, VisualizationGenerator};
//!
//! let config = AnalysisConfig::default();
//! let health = HealthAuditor::audit(&dataset, &config)?;
//! let chart = VisualizationGenerator::numeric_by_category(&dataset, "price", "city", &config)?;
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod suggestions;
pub mod types;
pub mod utils;
pub mod visualization;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, LoaderConfig};
pub use dataset::loader::{TemporalCoercion, coerce_temporal_columns, load_csv, read_csv_str};
pub use dataset::{Dataset, DatasetColumn, SemanticType};
pub use engine::{AnalysisBundle, AnalysisEngine};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use profiler::{BoxSummary, ColumnAnalyzer, DatasetProfiler};
pub use quality::{HealthAuditor, IqrFences, OutlierDetector};
pub use reporting::{AnalysisReport, ReportWriter, render_overview};
pub use suggestions::SuggestionEngine;
pub use types::{
    AnalyzerIssue, ColumnSummaries, ColumnSummary, DatasetProfile, HealthReport, HealthStatus,
    MlRole, MlSuggestion, MlSuggestions, NumericTransform, OutlierEntry, OutlierReport,
};
pub use visualization::{ClutterWarning, VisualizationGenerator, VisualizationSpec};
