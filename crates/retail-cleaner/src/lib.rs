//! Retail Record Cleaning Library
//!
//! A batch cleaner for retail transaction tables built with Rust and Polars.
//!
//! # Overview
//!
//! A table of customer purchases is read from CSV or a spreadsheet, passed
//! through a fixed sequence of ten cleaning steps and written back in the
//! same format next to the input:
//!
//! - **Column hygiene**: whitespace trimmed from column names and text cells
//! - **Category correction**: product names containing a keyword set the category
//! - **Type coercion**: numeric and date columns parsed, bad cells become null
//! - **Harmonisation**: payment mode, delivery status and gender mapped to labels
//! - **Email validation**: addresses normalised and flagged valid or invalid
//! - **Range clipping**: satisfaction clamped into 1..=5
//! - **Proper casing**: city and country title-cased
//! - **Quality flagging**: every row annotated with the checks it fails
//!
//! Malformed values never abort a run. Only unreadable files, unsupported
//! formats, broken tables and invalid configuration surface as
//! [`CleaningError`]s.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use retail_cleaner::{io, Pipeline};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::builder().build()?;
//! let (output, result) = io::load_clean_save(Path::new("sales.xlsx"), &pipeline)?;
//!
//! println!("Saved {}", output.display());
//! println!("{} rows with issues", result.summary.rows_with_issues);
//! ```
//!
//! # Configuration
//!
//! Every lookup table and column name is part of [`CleaningConfig`]. The
//! defaults match the retail live-project workbook:
//!
//! ```rust,ignore
//! use retail_cleaner::{CleaningConfig, Pipeline};
//!
//! let config = CleaningConfig::builder()
//!     .category_mappings([("tablet", "Electronics"), ("sofa", "Home")])
//!     .satisfaction_range(1.0, 10.0)
//!     .build()?;
//!
//! let result = Pipeline::builder().config(config).build()?.process(&df)?;
//! ```
//!
//! # Progress Reporting
//!
//! ```rust,ignore
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .process(&df)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, category_for, parse_date};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ClipRange, ColumnRoles, ConfigValidationError,
    DEFAULT_EMAIL_PATTERN,
};
pub use error::{CleaningError, ResultExt};
pub use io::{FileFormat, cleaned_path, load_clean_save, read_dataset, write_dataset};
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use quality::{QualityCheck, QualityCounts, QualityFlagger, annotate_row};
pub use types::{CleaningResult, CleaningSummary, ColumnNullCount};
