//! Custom error types for the cleaning pipeline.
//!
//! Only boundary problems surface as errors: unreadable or unsupported files,
//! structurally broken tables and invalid configuration. Malformed cell values
//! are never errors; they become nulls or quality annotations.
//!
//! Errors are serializable so callers can forward them as `{code, message}`
//! JSON objects.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input path does not exist.
    #[error("File not found → {0}")]
    FileNotFound(String),

    /// Input path has an extension we cannot read or write.
    #[error("Unsupported file format '{0}' → use CSV or Excel.")]
    UnsupportedFormat(String),

    /// Two columns share a name once surrounding whitespace is removed.
    #[error("Duplicate column name '{0}' after trimming column names")]
    DuplicateColumn(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// The workbook has no worksheet to read.
    #[error("Workbook '{0}' contains no worksheets")]
    EmptyWorkbook(String),

    /// Spreadsheet reader error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Spreadsheet writer error.
    #[error("Spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::DuplicateColumn(_) => "SCHEMA_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyWorkbook(_) => "EMPTY_WORKBOOK",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::XlsxWrite(_) => "SPREADSHEET_WRITE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was raised before any data was read.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::FileNotFound(_) | Self::UnsupportedFormat(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
