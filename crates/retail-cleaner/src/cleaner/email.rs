//! Email normalisation and validity flagging.

use crate::error::Result;
use crate::utils::{has_column, map_string_column};
use polars::prelude::*;
use regex::Regex;

/// Lower-case and trim the email column, then store a validity flag column.
///
/// Null emails are flagged invalid. Returns the number of invalid rows; an
/// absent email column adds no flag and reports zero.
pub(crate) fn validate_emails(
    df: &mut DataFrame,
    email_column: &str,
    flag_column: &str,
    pattern: &Regex,
) -> Result<usize> {
    if !has_column(df, email_column) {
        return Ok(0);
    }

    map_string_column(df, email_column, |v| v.map(|s| s.to_lowercase().trim().to_string()))?;

    let flags: Vec<bool> = df
        .column(email_column)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|opt_val| opt_val.is_some_and(|email| pattern.is_match(email)))
        .collect();

    let invalid = flags.iter().filter(|valid| !**valid).count();
    df.with_column(Series::new(flag_column.into(), flags))?;
    Ok(invalid)
}
