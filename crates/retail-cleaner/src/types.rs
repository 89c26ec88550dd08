use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Number of null cells in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNullCount {
    pub column: String,
    pub nulls: usize,
}

/// Counters gathered while cleaning one dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows: usize,
    pub columns: usize,
    /// Rows whose quality annotation is non-empty.
    pub rows_with_issues: usize,
    pub missing_customer_name: usize,
    pub invalid_email: usize,
    pub invalid_purchase_amount: usize,
    /// Rows whose category was set from a product keyword.
    pub categories_corrected: usize,
    /// Null count per column of the cleaned data.
    pub null_counts: Vec<ColumnNullCount>,
    /// One line per applied cleaning step, in order.
    pub steps: Vec<String>,
    pub duration_ms: u64,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step description.
    pub fn add_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    /// The cleaned table.
    pub data: DataFrame,
    pub summary: CleaningSummary,
}
