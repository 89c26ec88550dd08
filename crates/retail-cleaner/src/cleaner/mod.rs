//! Column-level cleaning steps.
//!
//! This module provides the per-column transforms the pipeline applies:
//! - Column-name hygiene and text trimming
//! - Product category correction from name keywords
//! - Numeric coercion and date parsing
//! - Categorical harmonisation
//! - Email normalisation and validity flags
//! - Range clipping and proper-casing
//!
//! Each step is a no-op for columns absent from the input.

mod converters;
mod email;
mod harmonizers;
mod sanitizers;

pub use converters::parse_date;
pub use harmonizers::category_for;

pub(crate) use converters::{date_from_epoch_days, epoch_days, to_float_series};

use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::Result;
use polars::prelude::*;
use regex::Regex;

/// Applies the configured column transforms to a DataFrame.
///
/// Holds the configuration and the compiled email pattern; every method
/// mutates the frame it is given and returns how many cells or rows it
/// touched.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    config: CleaningConfig,
    email_pattern: Regex,
}

impl DataCleaner {
    /// Create a cleaner, validating the configuration.
    pub fn new(config: CleaningConfig) -> std::result::Result<Self, ConfigValidationError> {
        config.validate()?;
        let email_pattern = Regex::new(&config.email_pattern).map_err(|e| {
            ConfigValidationError::InvalidEmailPattern {
                pattern: config.email_pattern.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            config,
            email_pattern,
        })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Trim whitespace around column names.
    pub fn strip_column_names(&self, df: &mut DataFrame) -> Result<usize> {
        sanitizers::strip_column_names(df)
    }

    /// Cast declared text columns to text and trim them.
    pub fn normalize_text(&self, df: &mut DataFrame) -> Result<usize> {
        sanitizers::normalize_text_columns(df, &self.config.text_columns)
    }

    /// Reassign product categories from name keywords.
    pub fn correct_categories(&self, df: &mut DataFrame) -> Result<usize> {
        harmonizers::correct_categories(
            df,
            &self.config.columns.product_name,
            &self.config.columns.category,
            &self.config.category_mappings,
        )
    }

    /// Coerce declared numeric columns to Float64.
    pub fn coerce_numeric(&self, df: &mut DataFrame) -> Result<usize> {
        converters::coerce_numeric_columns(df, &self.config.numeric_columns)
    }

    /// Parse declared date columns.
    pub fn parse_dates(&self, df: &mut DataFrame) -> Result<usize> {
        converters::parse_date_columns(df, &self.config.date_columns)
    }

    /// Map payment mode, delivery status and gender values to their labels.
    pub fn harmonise_categoricals(&self, df: &mut DataFrame) -> Result<usize> {
        let columns = &self.config.columns;
        let mut changed = 0;
        for (name, map) in [
            (&columns.payment_mode, &self.config.payment_mode_map),
            (&columns.delivery_status, &self.config.delivery_status_map),
            (&columns.gender, &self.config.gender_map),
        ] {
            changed += harmonizers::harmonise_column(df, name, map)?;
        }
        Ok(changed)
    }

    /// Normalise emails and add the validity flag column.
    pub fn validate_emails(&self, df: &mut DataFrame) -> Result<usize> {
        email::validate_emails(
            df,
            &self.config.columns.email,
            &self.config.columns.email_valid,
            &self.email_pattern,
        )
    }

    /// Clamp the satisfaction score into its configured range.
    pub fn clip_satisfaction(&self, df: &mut DataFrame) -> Result<usize> {
        converters::clip_column(
            df,
            &self.config.columns.satisfaction,
            self.config.satisfaction_range,
        )
    }

    /// Title-case city and country columns.
    pub fn proper_case(&self, df: &mut DataFrame) -> Result<usize> {
        sanitizers::proper_case_columns(df, &self.config.columns.proper_case)
    }
}
