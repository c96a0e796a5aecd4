//! Report output for the analysis bundle.
//!
//! An [`AnalysisReport`] wraps an [`AnalysisBundle`] with run metadata and is
//! what the CLI prints with `--json` and writes with `--emit-report`.
//! [`render_overview`] produces the human-readable text summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use instant_eda::reporting::{AnalysisReport, ReportWriter};
//!
//! let report = AnalysisReport::new("data/train.csv", bundle);
//! println!("{}", report.to_json()?);
//! ReportWriter::write(&report, "out/train_report.json")?;
//! ```

mod overview;

pub use overview::render_overview;

use crate::engine::AnalysisBundle;
use crate::error::{Result, ResultExt};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Analysis results plus metadata about the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Local time the report was generated, RFC 3339.
    pub generated_at: String,
    pub input_file: String,
    pub tool_version: String,
    #[serde(flatten)]
    pub bundle: AnalysisBundle,
}

impl AnalysisReport {
    pub fn new(input_file: impl Into<String>, bundle: AnalysisBundle) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            input_file: input_file.into(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            bundle,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes reports to disk.
pub struct ReportWriter;

impl ReportWriter {
    /// Write `report` as JSON to `path`, creating parent directories.
    pub fn write(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Creating report directory {}", parent.display()))?;
        }

        let mut file =
            File::create(path).context(format!("Creating report file {}", path.display()))?;
        file.write_all(report.to_json()?.as_bytes())?;

        info!("Report saved: {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Default report path for an input file: `<stem>_report.json` next to it.
    pub fn default_path(input: impl AsRef<Path>) -> PathBuf {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        input.with_file_name(format!("{stem}_report.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::engine::AnalysisEngine;
    use polars::prelude::*;

    fn report() -> AnalysisReport {
        let ds = Dataset::from_frame(df!["x" => [1.0f64, 2.0, 3.0], "s" => ["a", "b", "a"]].unwrap())
            .unwrap();
        AnalysisReport::new("data.csv", AnalysisEngine::default().analyze(&ds))
    }

    #[test]
    fn test_report_json_flattens_bundle() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["input_file"], "data.csv");
        assert_eq!(json["profile"]["rows"], 3);
        assert!(json["suggestions"]["s"]["role"].is_string());
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = std::env::temp_dir().join(format!("instant_eda_report_{}", std::process::id()));
        let path = dir.join("nested").join("data_report.json");

        let written = ReportWriter::write(&report(), &path).unwrap();
        assert_eq!(written, path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"generated_at\""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            ReportWriter::default_path("data/train.csv"),
            PathBuf::from("data/train_report.json")
        );
    }
}
