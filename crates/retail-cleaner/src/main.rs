//! CLI entry point for the retail record cleaner.

use anyhow::Result;
use clap::Parser;
use retail_cleaner::{CleaningConfig, CleaningError, CleaningResult, Pipeline, load_clean_save};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_INPUT: &str = "Retail_Live_Project_Dataset.xlsx";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Retail record cleaner",
    long_about = "Cleans a retail transaction table and writes <name>_cleaned.<ext> next to it.\n\n\
                  Supported inputs are CSV (.csv) and Excel (.xls, .xlsx).\n\n\
                  EXAMPLES:\n  \
                  # Clean the default workbook in the current directory\n  \
                  retail-cleaner\n\n  \
                  # Clean a CSV export with custom lookup tables\n  \
                  retail-cleaner sales.csv --config cleaning.json\n\n  \
                  # Machine-readable summary\n  \
                  retail-cleaner sales.xlsx --json | jq .summary.rows_with_issues"
)]
struct Args {
    /// Path to the CSV or Excel file to clean
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// JSON file overriding the default cleaning tables
    ///
    /// Missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON summary.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
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

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if let Err(e) = run(&args) {
        eprintln!("❌ {}", e);
        if e
            .downcast_ref::<CleaningError>()
            .is_some_and(CleaningError::is_input_error)
        {
            eprintln!("   Expected an existing .csv, .xls or .xlsx file.");
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let input = std::path::absolute(&args.input).unwrap_or_else(|_| args.input.clone());
    if !input.exists() {
        return Err(CleaningError::FileNotFound(input.display().to_string()).into());
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading cleaning configuration from: {}", path.display());
            CleaningConfig::from_json_file(path)?
        }
        None => CleaningConfig::default(),
    };
    debug!("Configuration: {:?}", config);

    let pipeline = Pipeline::builder().config(config).build()?;
    let (output, result) = load_clean_save(&input, &pipeline)?;

    if args.json {
        let report = json!({
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "summary": result.summary,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&output, &result);
    Ok(())
}

/// Print the human-readable run summary.
///
/// Uses `println!` intentionally: this is the primary output of the command
/// and must be visible regardless of log level.
fn print_summary(output: &Path, result: &CleaningResult) {
    let summary = &result.summary;

    println!("✔ Saved cleaned data → {}", output.display());
    println!();
    println!("Cleaning Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!("  Rows: {}  Columns: {}", summary.rows, summary.columns);
    println!("  Rows with issues: {}", summary.rows_with_issues);
    println!("    Missing customer name: {}", summary.missing_customer_name);
    println!("    Invalid email: {}", summary.invalid_email);
    println!("    Invalid purchase amount: {}", summary.invalid_purchase_amount);
    println!("  Categories corrected: {}", summary.categories_corrected);

    if !summary.steps.is_empty() {
        println!();
        println!("Steps Applied:");
        for step in &summary.steps {
            println!("  - {}", step);
        }
    }

    println!();
    println!("Missing values per column:");
    let width = summary
        .null_counts
        .iter()
        .map(|c| c.column.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);
    for count in &summary.null_counts {
        println!("  {:<width$}  {}", count.column, count.nulls, width = width);
    }
}
