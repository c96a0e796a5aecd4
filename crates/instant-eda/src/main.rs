//! CLI entry point for instant exploratory data analysis.

use anyhow::{Result, anyhow};
use clap::Parser;
use instant_eda::{
    AnalysisConfig, AnalysisEngine, AnalysisReport, LoaderConfig, ReportWriter, load_csv,
    render_overview,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Instant exploratory data analysis for CSV files",
    long_about = "Profiles a CSV file and reports data health, outliers, ML feature \
                  suggestions and chart descriptions.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable overview\n  \
                  instant-eda -i data.csv\n\n  \
                  # Full analysis as JSON\n  \
                  instant-eda -i data.csv --json | jq .suggestions\n\n  \
                  # Write the JSON report next to the input (data_report.json)\n  \
                  instant-eda -i data.csv -r"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON to stdout instead of the human-readable overview
    ///
    /// Disables all logs; only the final JSON report is written.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to this path
    ///
    /// Without a value the report goes to `<stem>_report.json` next to the input.
    #[arg(short = 'r', long, num_args = 0..=1, value_name = "PATH")]
    emit_report: Option<Option<PathBuf>>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long)]
    quiet: bool,

    /// Keep date-like text columns as text
    #[arg(long)]
    no_date_coercion: bool,

    /// Absolute skewness above which a log transform is suggested
    #[arg(long)]
    skew_threshold: Option<f64>,

    /// Distinct/rows ratio above which a column is flagged high-cardinality
    #[arg(long)]
    cardinality_ratio: Option<f64>,

    /// Number of categories kept in category frequency charts
    #[arg(long)]
    top_n: Option<usize>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries
/// the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder();
    if let Some(threshold) = args.skew_threshold {
        builder = builder.skew_threshold(threshold);
    }
    if let Some(ratio) = args.cardinality_ratio {
        builder = builder.high_cardinality_ratio(ratio);
    }
    if let Some(n) = args.top_n {
        builder = builder.category_top_n(n);
    }
    Ok(builder.build()?)
}

/// Where `--emit-report` should write, if it was given at all.
fn report_path(args: &Args) -> Option<PathBuf> {
    args.emit_report
        .as_ref()
        .map(|path| path.clone().unwrap_or_else(|| ReportWriter::default_path(&args.input)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let engine = AnalysisEngine::new(build_config(&args)?)?;
    let loader = LoaderConfig {
        coerce_dates: !args.no_date_coercion,
        ..LoaderConfig::default()
    };

    let dataset = load_csv(&args.input, &loader)?;
    info!(
        "Dataset loaded successfully: ({}, {})",
        dataset.height(),
        dataset.width()
    );

    let bundle = engine.analyze(&dataset);
    let input = args.input.display().to_string();
    let report = AnalysisReport::new(input.clone(), bundle);

    if let Some(path) = report_path(&args) {
        ReportWriter::write(&report, &path)?;
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        // Overview goes to stdout regardless of log level
        print!("{}", render_overview(&input, &report.bundle));
    }

    Ok(())
}
