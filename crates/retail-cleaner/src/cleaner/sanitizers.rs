//! Whitespace and casing fixes for column names and text cells.

use crate::error::{CleaningError, Result};
use crate::utils::{has_column, map_string_column, title_case};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Trim surrounding whitespace from every column name.
///
/// Returns the number of renamed columns. Fails if two columns end up with
/// the same name.
pub(crate) fn strip_column_names(df: &mut DataFrame) -> Result<usize> {
    let original: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let trimmed: Vec<String> = original.iter().map(|s| s.trim().to_string()).collect();

    let mut seen = HashSet::with_capacity(trimmed.len());
    for name in &trimmed {
        if !seen.insert(name.as_str()) {
            return Err(CleaningError::DuplicateColumn(name.clone()));
        }
    }

    let renamed = original
        .iter()
        .zip(&trimmed)
        .filter(|(before, after)| before != after)
        .count();

    if renamed > 0 {
        df.set_column_names(trimmed.iter().map(String::as_str))?;
        debug!("Trimmed {} column names", renamed);
    }

    Ok(renamed)
}

/// Cast the given columns to text and trim every value.
///
/// Nulls stay null. Returns the number of cells that changed.
pub(crate) fn normalize_text_columns(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut changed = 0;
    for name in columns {
        if !has_column(df, name) {
            continue;
        }
        let count = map_string_column(df, name, |v| v.map(|s| s.trim().to_string()))?;
        if count > 0 {
            debug!("Trimmed {} values in '{}'", count, name);
        }
        changed += count;
    }
    Ok(changed)
}

/// Title-case the given columns.
pub(crate) fn proper_case_columns(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut changed = 0;
    for name in columns {
        if !has_column(df, name) {
            continue;
        }
        changed += map_string_column(df, name, |v| v.map(title_case))?;
    }
    Ok(changed)
}
