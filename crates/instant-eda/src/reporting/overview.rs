use crate::engine::AnalysisBundle;
use crate::types::HealthStatus;
use crate::visualization::VisualizationSpec;
use std::fmt::Write;

const WIDE_RULE: usize = 80;
const SECTION_RULE: usize = 40;

/// Render the bundle as plain text sections.
pub fn render_overview(input: &str, bundle: &AnalysisBundle) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_overview(&mut out, input, bundle);
    out
}

fn write_overview(out: &mut String, input: &str, bundle: &AnalysisBundle) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(WIDE_RULE))?;
    writeln!(out, "EXPLORATORY DATA ANALYSIS")?;
    writeln!(out, "{}", "=".repeat(WIDE_RULE))?;
    writeln!(out)?;

    section(out, "DATASET OVERVIEW")?;
    writeln!(out, "  File: {input}")?;
    match &bundle.profile {
        Some(p) => {
            writeln!(out, "  Rows: {}", p.rows)?;
            writeln!(out, "  Columns: {}", p.columns)?;
            writeln!(
                out,
                "  Missing cells: {} ({:.1}%)",
                p.missing_cells, p.missing_percentage
            )?;
            writeln!(
                out,
                "  Duplicate rows: {} ({:.1}%)",
                p.duplicate_rows, p.duplicate_percentage
            )?;
        }
        None => writeln!(out, "  Profile unavailable")?,
    }
    writeln!(out)?;

    section(out, "COLUMNS")?;
    writeln!(
        out,
        "{:<20} {:<10} {:<10} {:<10} {:<28}",
        "Column", "Type", "Missing %", "Distinct", "ML Role"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;
    for (name, summary) in &bundle.columns {
        let role = bundle
            .suggestions
            .get(name)
            .map(|s| s.role.label())
            .unwrap_or("-");
        writeln!(
            out,
            "{:<20} {:<10} {:<10.1} {:<10} {:<28}",
            truncate_str(name, 19),
            summary.semantic_type,
            summary.missing_percentage,
            summary.distinct_count,
            role
        )?;
    }
    writeln!(out)?;

    section(out, "DATA HEALTH")?;
    match bundle.health.status() {
        HealthStatus::Clean => writeln!(out, "  No structural issues detected")?,
        HealthStatus::NeedsAttention { flagged_columns } => {
            writeln!(out, "  {flagged_columns} columns need attention")?;
            flag_line(out, "High missing", &bundle.health.high_missing)?;
            flag_line(out, "Constant", &bundle.health.constant)?;
            flag_line(out, "High cardinality", &bundle.health.high_cardinality)?;
        }
    }
    writeln!(out)?;

    section(out, "OUTLIERS (IQR)")?;
    if bundle.outliers.is_empty() {
        writeln!(out, "  No outliers detected")?;
    }
    for entry in bundle.outliers.values() {
        let samples: Vec<String> = entry.samples.iter().map(|v| format!("{v}")).collect();
        writeln!(
            out,
            "  - {}: {} outliers ({:.1}%) outside [{:.2}, {:.2}], e.g. {}",
            entry.column,
            entry.outlier_count,
            entry.outlier_percentage,
            entry.lower_fence,
            entry.upper_fence,
            samples.join(", ")
        )?;
    }
    writeln!(out)?;

    section(out, "ML SUGGESTIONS")?;
    for suggestion in bundle.suggestions.values() {
        writeln!(out, "  [{}] {}", suggestion.role, suggestion.column)?;
        writeln!(out, "      {}", suggestion.suggestion)?;
        for line in suggestion.snippet.lines() {
            writeln!(out, "      > {line}")?;
        }
    }
    writeln!(out)?;

    section(out, "CHARTS")?;
    for chart in &bundle.charts {
        writeln!(out, "  - {}", describe_chart(chart))?;
    }
    match &bundle.correlation {
        Some(chart) => writeln!(out, "  - {}", describe_chart(chart))?,
        None => writeln!(out, "  - correlation matrix skipped (fewer than 2 numeric columns)")?,
    }

    if !bundle.issues.is_empty() {
        writeln!(out)?;
        section(out, "ANALYZER ISSUES")?;
        for issue in &bundle.issues {
            match &issue.column {
                Some(column) => writeln!(
                    out,
                    "  - [{}] {} on '{}': {}",
                    issue.code, issue.analyzer, column, issue.message
                )?,
                None => writeln!(out, "  - [{}] {}: {}", issue.code, issue.analyzer, issue.message)?,
            }
        }
    }

    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(SECTION_RULE))
}

fn flag_line(out: &mut String, label: &str, columns: &[String]) -> std::fmt::Result {
    if columns.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {label}: {}", columns.join(", "))
}

fn describe_chart(chart: &VisualizationSpec) -> String {
    match chart {
        VisualizationSpec::Histogram { column, bins, .. } => {
            format!("histogram of {column} ({} bins)", bins.len())
        }
        VisualizationSpec::CategoryFrequency {
            column,
            entries,
            distinct_total,
            truncated,
        } => {
            if *truncated {
                format!(
                    "top {} of {} values in {column}",
                    entries.len(),
                    distinct_total
                )
            } else {
                format!("{} values in {column}", entries.len())
            }
        }
        VisualizationSpec::CorrelationMatrix { columns, .. } => {
            format!("correlation matrix over {} numeric columns", columns.len())
        }
        other => format!("{} of {}", other.kind(), other.columns().join(" x ")),
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
