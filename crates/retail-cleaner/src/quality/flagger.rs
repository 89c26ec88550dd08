use crate::cleaner::to_float_series;
use crate::config::ColumnRoles;
use crate::error::Result;
use crate::utils::{as_string_series, has_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single row-level quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCheck {
    MissingCustomerName,
    InvalidEmail,
    InvalidPurchaseAmount,
}

impl QualityCheck {
    /// Checks in the order their messages appear in an annotation.
    pub const ORDERED: [QualityCheck; 3] = [
        QualityCheck::MissingCustomerName,
        QualityCheck::InvalidEmail,
        QualityCheck::InvalidPurchaseAmount,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingCustomerName => "Missing Customer Name",
            Self::InvalidEmail => "Invalid Email",
            Self::InvalidPurchaseAmount => "Invalid Purchase Amount",
        }
    }
}

/// Build the annotation for one row from the checks it failed.
///
/// Each message is followed by `"; "`; no failures gives an empty string.
pub fn annotate_row<I>(failed: I) -> String
where
    I: IntoIterator<Item = QualityCheck>,
{
    failed.into_iter().fold(String::new(), |mut acc, check| {
        acc.push_str(check.message());
        acc.push_str("; ");
        acc
    })
}

/// Per-check failure counts from one flagging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCounts {
    pub missing_customer_name: usize,
    pub invalid_email: usize,
    pub invalid_purchase_amount: usize,
    pub rows_with_issues: usize,
}

impl QualityCounts {
    fn record(&mut self, check: QualityCheck) {
        match check {
            QualityCheck::MissingCustomerName => self.missing_customer_name += 1,
            QualityCheck::InvalidEmail => self.invalid_email += 1,
            QualityCheck::InvalidPurchaseAmount => self.invalid_purchase_amount += 1,
        }
    }
}

/// Writes the quality annotation column.
///
/// Expects emails to be validated already: the email check reads the flag
/// column, not the raw address.
#[derive(Debug, Clone)]
pub struct QualityFlagger {
    columns: ColumnRoles,
}

impl QualityFlagger {
    pub fn new(columns: ColumnRoles) -> Self {
        Self { columns }
    }

    /// Per-row failure mask for one check, or `None` when its column is absent.
    fn failures(&self, df: &DataFrame, check: QualityCheck) -> Result<Option<Vec<bool>>> {
        let mask: Vec<bool> = match check {
            QualityCheck::MissingCustomerName => {
                if !has_column(df, &self.columns.customer_name) {
                    return Ok(None);
                }
                let names = as_string_series(
                    df.column(&self.columns.customer_name)?
                        .as_materialized_series(),
                )?;
                names
                    .str()?
                    .into_iter()
                    .map(|name| name.is_none_or(str::is_empty))
                    .collect()
            }
            QualityCheck::InvalidEmail => {
                if !has_column(df, &self.columns.email) {
                    return Ok(None);
                }
                df.column(&self.columns.email_valid)?
                    .as_materialized_series()
                    .bool()?
                    .into_iter()
                    .map(|valid| !valid.unwrap_or(false))
                    .collect()
            }
            QualityCheck::InvalidPurchaseAmount => {
                if !has_column(df, &self.columns.purchase_amount) {
                    return Ok(None);
                }
                let amounts = to_float_series(
                    df.column(&self.columns.purchase_amount)?
                        .as_materialized_series(),
                )?;
                amounts
                    .f64()?
                    .into_iter()
                    .map(|amount| amount.is_none_or(|a| a.is_nan() || a <= 0.0))
                    .collect()
            }
        };
        Ok(Some(mask))
    }

    /// Compute the annotation column and add it to the frame.
    ///
    /// The column is always written, holding empty strings for clean rows.
    pub fn flag(&self, df: &mut DataFrame) -> Result<QualityCounts> {
        let mut masks: Vec<(QualityCheck, Vec<bool>)> = Vec::new();
        for check in QualityCheck::ORDERED {
            if let Some(mask) = self.failures(df, check)? {
                masks.push((check, mask));
            }
        }

        let mut counts = QualityCounts::default();
        let annotations: Vec<String> = (0..df.height())
            .map(|row| {
                let failed: Vec<QualityCheck> = masks
                    .iter()
                    .filter(|(_, mask)| mask[row])
                    .map(|(check, _)| *check)
                    .collect();
                for check in &failed {
                    counts.record(*check);
                }
                if !failed.is_empty() {
                    counts.rows_with_issues += 1;
                }
                annotate_row(failed)
            })
            .collect();

        debug!(
            "Flagged {} of {} rows with quality issues",
            counts.rows_with_issues,
            df.height()
        );

        df.with_column(Series::new(
            self.columns.quality_issues.as_str().into(),
            annotations,
        ))?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn issues(df: &DataFrame) -> Vec<String> {
        df.column("Data_Quality_Issues")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_annotate_row() {
        assert_eq!(annotate_row(Vec::new()), "");
        assert_eq!(
            annotate_row(QualityCheck::ORDERED),
            "Missing Customer Name; Invalid Email; Invalid Purchase Amount; "
        );
        assert_eq!(
            annotate_row([QualityCheck::InvalidPurchaseAmount]),
            "Invalid Purchase Amount; "
        );
    }

    #[test]
    fn test_flag_all_checks() {
        let mut df = df![
            "Customer_Name" => [Some(""), Some("Asha"), None],
            "Email" => [Some("not-an-email"), Some("asha@shop.com"), Some("ravi@shop.com")],
            "Email_Valid" => [false, true, true],
            "Purchase_Amount" => [Some(-5.0), Some(120.0), None],
        ]
        .unwrap();

        let counts = QualityFlagger::new(ColumnRoles::default())
            .flag(&mut df)
            .unwrap();

        assert_eq!(
            issues(&df),
            vec![
                "Missing Customer Name; Invalid Email; Invalid Purchase Amount; ".to_string(),
                String::new(),
                "Missing Customer Name; Invalid Purchase Amount; ".to_string(),
            ]
        );
        assert_eq!(
            counts,
            QualityCounts {
                missing_customer_name: 2,
                invalid_email: 1,
                invalid_purchase_amount: 2,
                rows_with_issues: 2,
            }
        );
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let mut df = df!["Purchase_Amount" => [0.0, 0.01]].unwrap();
        QualityFlagger::new(ColumnRoles::default())
            .flag(&mut df)
            .unwrap();
        assert_eq!(
            issues(&df),
            vec!["Invalid Purchase Amount; ".to_string(), String::new()]
        );
    }

    #[test]
    fn test_nan_amount_is_invalid() {
        let mut df = df!["Purchase_Amount" => [f64::NAN, f64::NEG_INFINITY, 15.0]].unwrap();
        let counts = QualityFlagger::new(ColumnRoles::default())
            .flag(&mut df)
            .unwrap();

        assert_eq!(counts.invalid_purchase_amount, 2);
        assert_eq!(
            issues(&df),
            vec![
                "Invalid Purchase Amount; ".to_string(),
                "Invalid Purchase Amount; ".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_absent_columns_yield_empty_annotations() {
        let mut df = df!["City" => ["Pune", "Delhi"]].unwrap();
        let counts = QualityFlagger::new(ColumnRoles::default())
            .flag(&mut df)
            .unwrap();

        assert_eq!(counts, QualityCounts::default());
        assert_eq!(issues(&df), vec![String::new(), String::new()]);
    }
}
