//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the ten cleaning steps.

use crate::cleaner::DataCleaner;
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::Result;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::quality::QualityFlagger;
use crate::types::{CleaningResult, CleaningSummary};
use crate::utils::null_counts;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The retail record cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
/// A built pipeline holds no per-run state and can process any number of
/// frames.
///
/// # Example
///
/// ```rust,ignore
/// use retail_cleaner::{CleaningConfig, Pipeline};
///
/// let result = Pipeline::builder()
///     .config(CleaningConfig::builder().satisfaction_range(1.0, 10.0).build()?)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .process(&df)?;
///
/// println!("{} rows flagged", result.summary.rows_with_issues);
/// ```
pub struct Pipeline {
    cleaner: DataCleaner,
    flagger: QualityFlagger,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Pipelines are handed to worker threads by callers processing several files.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &CleaningConfig {
        self.cleaner.config()
    }

    /// Clean a DataFrame.
    ///
    /// The input frame is left untouched; the cleaned copy is returned in
    /// the [`CleaningResult`] together with a summary of what changed.
    pub fn process(&self, df: &DataFrame) -> Result<CleaningResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn start_stage(&self, stage: CleaningStage, message: &str) {
        info!("{}...", message);
        self.report_progress(ProgressUpdate::new(stage, format!("{}...", message)));
    }

    fn process_internal(&self, input: &DataFrame) -> Result<CleaningResult> {
        let start_time = Instant::now();
        info!(
            "Starting cleaning pipeline on {} rows x {} columns",
            input.height(),
            input.width()
        );

        let mut df = input.clone();
        let mut summary = CleaningSummary::new();
        let cleaner = &self.cleaner;

        // Step 1: Column names
        self.start_stage(CleaningStage::ColumnNames, "Trimming column names");
        let renamed = cleaner.strip_column_names(&mut df)?;
        if renamed > 0 {
            summary.add_step(format!("Trimmed whitespace from {} column names", renamed));
        }

        // Step 2: Text normalisation
        self.start_stage(CleaningStage::TextNormalisation, "Normalising text columns");
        let trimmed = cleaner.normalize_text(&mut df)?;
        debug!("Trimmed {} text cells", trimmed);
        if trimmed > 0 {
            summary.add_step(format!("Trimmed whitespace in {} text cells", trimmed));
        }

        // Step 3: Category correction
        self.start_stage(CleaningStage::CategoryCorrection, "Correcting product categories");
        let corrected = cleaner.correct_categories(&mut df)?;
        summary.categories_corrected = corrected;
        if corrected > 0 {
            summary.add_step(format!(
                "Corrected product category for {} rows",
                corrected
            ));
        }

        // Step 4: Numeric coercion
        self.start_stage(CleaningStage::NumericCoercion, "Coercing numeric columns");
        let unparsable = cleaner.coerce_numeric(&mut df)?;
        if unparsable > 0 {
            summary.add_step(format!(
                "Set {} unparsable numeric values to null",
                unparsable
            ));
        }

        // Step 5: Date parsing
        self.start_stage(CleaningStage::DateParsing, "Parsing date columns");
        let bad_dates = cleaner.parse_dates(&mut df)?;
        if bad_dates > 0 {
            summary.add_step(format!("Set {} unparsable dates to null", bad_dates));
        }

        // Step 6: Categorical harmonisation
        self.start_stage(CleaningStage::Harmonisation, "Harmonising categorical values");
        let harmonised = cleaner.harmonise_categoricals(&mut df)?;
        if harmonised > 0 {
            summary.add_step(format!("Harmonised {} categorical values", harmonised));
        }

        // Step 7: Email validation
        self.start_stage(CleaningStage::EmailValidation, "Validating emails");
        let invalid_emails = cleaner.validate_emails(&mut df)?;
        debug!("{} emails failed validation", invalid_emails);

        // Step 8: Satisfaction clipping
        self.start_stage(CleaningStage::SatisfactionClipping, "Clipping satisfaction scores");
        let clipped = cleaner.clip_satisfaction(&mut df)?;
        if clipped > 0 {
            summary.add_step(format!("Clipped {} satisfaction scores into range", clipped));
        }

        // Step 9: Proper casing
        self.start_stage(CleaningStage::ProperCasing, "Title-casing place names");
        let recased = cleaner.proper_case(&mut df)?;
        if recased > 0 {
            summary.add_step(format!("Title-cased {} place names", recased));
        }

        // Step 10: Quality flagging
        self.start_stage(CleaningStage::QualityFlagging, "Flagging data quality issues");
        let counts = self.flagger.flag(&mut df)?;
        summary.missing_customer_name = counts.missing_customer_name;
        summary.invalid_email = counts.invalid_email;
        summary.invalid_purchase_amount = counts.invalid_purchase_amount;
        summary.rows_with_issues = counts.rows_with_issues;
        if counts.rows_with_issues > 0 {
            summary.add_step(format!(
                "Flagged {} rows with data quality issues",
                counts.rows_with_issues
            ));
        }

        summary.rows = df.height();
        summary.columns = df.width();
        summary.null_counts = null_counts(&df);
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Cleaning complete in {}ms: {} of {} rows flagged",
            summary.duration_ms, summary.rows_with_issues, summary.rows
        );

        Ok(CleaningResult { data: df, summary })
    }
}

/// Builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the cleaning configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use retail_cleaner::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct StageLogger;
    ///
    /// impl ProgressReporter for StageLogger {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         eprintln!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(StageLogger))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Convenience over [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        let flagger = QualityFlagger::new(config.columns.clone());
        let cleaner = DataCleaner::new(config)?;

        Ok(Pipeline {
            cleaner,
            flagger,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn sample_frame() -> DataFrame {
        df![
            " Customer_Name " => [Some(" Asha Rao "), Some(""), Some("Ravi")],
            "Email" => [Some(" ASHA@Shop.com "), Some("bad-email"), None],
            "Product_Name" => ["Gaming Laptop Pro", "Leather Sofa", "Mystery Box"],
            "Product_Category" => ["Toys", "Home", "Misc"],
            "Purchase_Amount" => [Some("1200.50"), Some("-4"), Some("abc")],
            "Customer_Satisfaction" => [Some(7.0), Some(0.0), Some(3.0)],
            "Payment_Mode" => ["upi", "CREDIT CARD", "Wallet"],
            "Delivery_Status" => ["delivered", "Pending", "lost"],
            "Gender" => ["m", "Female", "x"],
            "City" => ["new delhi", "MUMBAI", "pune"],
            "Purchase_Date" => ["03/15/2024", "2024-01-05", "not a date"],
        ]
        .unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert_eq!(pipeline.config(), &CleaningConfig::default());
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = CleaningConfig {
            email_pattern: "[unclosed".to_string(),
            ..CleaningConfig::default()
        };
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_process_full_frame() {
        let df = sample_frame();
        let result = Pipeline::builder().build().unwrap().process(&df).unwrap();
        let out = &result.data;

        assert_eq!(out.height(), 3);
        assert!(out.column("Customer_Name").is_ok());

        assert_eq!(
            strings(out, "Product_Category"),
            vec![s("Electronics"), s("Home"), s("Misc")]
        );
        assert_eq!(
            strings(out, "Payment_Mode"),
            vec![s("UPI"), s("Credit Card"), s("Wallet")]
        );
        assert_eq!(
            strings(out, "Delivery_Status"),
            vec![s("Delivered"), s("Pending"), s("lost")]
        );
        assert_eq!(strings(out, "Gender"), vec![s("Male"), s("Female"), s("x")]);
        assert_eq!(
            strings(out, "City"),
            vec![s("New Delhi"), s("Mumbai"), s("Pune")]
        );
        assert_eq!(
            strings(out, "Email"),
            vec![s("asha@shop.com"), s("bad-email"), None]
        );

        let satisfaction = out
            .column("Customer_Satisfaction")
            .unwrap()
            .as_materialized_series();
        let satisfaction: Vec<Option<f64>> = satisfaction.f64().unwrap().into_iter().collect();
        assert_eq!(satisfaction, vec![Some(5.0), Some(1.0), Some(3.0)]);

        let dates = out.column("Purchase_Date").unwrap();
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.null_count(), 1);

        assert_eq!(
            strings(out, "Data_Quality_Issues"),
            vec![
                s(""),
                s("Missing Customer Name; Invalid Email; Invalid Purchase Amount; "),
                s("Invalid Email; Invalid Purchase Amount; "),
            ]
        );

        let summary = &result.summary;
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 13);
        assert_eq!(summary.rows_with_issues, 2);
        assert_eq!(summary.missing_customer_name, 1);
        assert_eq!(summary.invalid_email, 2);
        assert_eq!(summary.invalid_purchase_amount, 2);
        assert_eq!(summary.null_counts.len(), 13);
        assert!(!summary.steps.is_empty());
    }

    #[test]
    fn test_input_frame_is_not_modified() {
        let df = sample_frame();
        let before = df.clone();
        Pipeline::builder().build().unwrap().process(&df).unwrap();
        assert!(df.equals_missing(&before));
    }

    #[test]
    fn test_processing_is_idempotent() {
        let pipeline = Pipeline::builder().build().unwrap();
        let once = pipeline.process(&sample_frame()).unwrap().data;
        let twice = pipeline.process(&once).unwrap().data;
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_frame_without_known_columns() {
        let df = df!["Store" => ["A", "B"], "Units" => [1, 2]].unwrap();
        let result = Pipeline::builder().build().unwrap().process(&df).unwrap();

        assert_eq!(result.data.width(), 3);
        assert_eq!(
            strings(&result.data, "Data_Quality_Issues"),
            vec![s(""), s("")]
        );
        assert_eq!(result.summary.rows_with_issues, 0);
    }

    #[test]
    fn test_progress_reports_every_stage() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = Pipeline::builder()
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();
        pipeline.process(&sample_frame()).unwrap();

        let seen = stages.lock().unwrap();
        let mut expected = CleaningStage::STEPS.to_vec();
        expected.push(CleaningStage::Complete);
        assert_eq!(*seen, expected);
    }

    #[test]
    fn test_failure_is_reported() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();
        let pipeline = Pipeline::builder()
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();

        let df = df!["City" => ["a"], " City" => ["b"]].unwrap();
        let err = pipeline.process(&df).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
        assert_eq!(stages.lock().unwrap().last(), Some(&CleaningStage::Failed));
    }
}
