//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline announces each step before running it. Reporting is purely
//! observational; installing a reporter never changes the cleaned output.
//!
//! # Example
//!
//! ```rust,ignore
//! use retail_cleaner::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Steps of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Trimming whitespace around column names
    ColumnNames,
    /// Casting declared text columns and trimming values
    TextNormalisation,
    /// Reassigning product categories from name keywords
    CategoryCorrection,
    /// Coercing declared numeric columns
    NumericCoercion,
    /// Parsing declared date columns
    DateParsing,
    /// Mapping payment, delivery and gender values to labels
    Harmonisation,
    /// Normalising emails and flagging validity
    EmailValidation,
    /// Clamping the satisfaction score
    SatisfactionClipping,
    /// Title-casing city and country
    ProperCasing,
    /// Writing the per-row quality annotation
    QualityFlagging,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// The ten working stages in the order the pipeline runs them.
    pub const STEPS: [CleaningStage; 10] = [
        Self::ColumnNames,
        Self::TextNormalisation,
        Self::CategoryCorrection,
        Self::NumericCoercion,
        Self::DateParsing,
        Self::Harmonisation,
        Self::EmailValidation,
        Self::SatisfactionClipping,
        Self::ProperCasing,
        Self::QualityFlagging,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnNames => "Column Names",
            Self::TextNormalisation => "Text Normalisation",
            Self::CategoryCorrection => "Category Correction",
            Self::NumericCoercion => "Numeric Coercion",
            Self::DateParsing => "Date Parsing",
            Self::Harmonisation => "Categorical Harmonisation",
            Self::EmailValidation => "Email Validation",
            Self::SatisfactionClipping => "Satisfaction Clipping",
            Self::ProperCasing => "Proper Casing",
            Self::QualityFlagging => "Quality Flagging",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Fraction of the pipeline finished when this stage starts.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => {
                let index = Self::STEPS
                    .iter()
                    .position(|s| s == stage)
                    .unwrap_or_default();
                index as f32 / Self::STEPS.len() as f32
            }
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates an update announcing the start of a stage.
    pub fn new(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.base_progress().clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Complete, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Failed, message)
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so a pipeline carrying a reporter
/// can be moved to a worker thread.
pub trait ProgressReporter: Send + Sync {
    /// Called once per stage. Implementations should be cheap and non-blocking.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
