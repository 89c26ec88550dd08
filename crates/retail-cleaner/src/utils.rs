//! Shared utilities for the cleaning pipeline.
//!
//! Column helpers used by several cleaning steps, plus the small string
//! routines (numeric parsing, title casing) that operate on single cells.

use crate::types::ColumnNullCount;
use polars::prelude::*;

// =============================================================================
// Column Utilities
// =============================================================================

/// Check whether a column exists in the DataFrame.
#[inline]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Return the series as text, casting non-string dtypes.
///
/// Nulls stay null; every other value is rendered by polars' string cast.
pub fn as_string_series(series: &Series) -> PolarsResult<Series> {
    if series.dtype() == &DataType::String {
        Ok(series.clone())
    } else {
        series.cast(&DataType::String)
    }
}

/// Rewrite a column cell by cell as text.
///
/// The column is cast to text first. Returns the number of cells whose value
/// changed. Absent columns are left alone and report zero changes.
pub fn map_string_column<F>(df: &mut DataFrame, name: &str, mut f: F) -> PolarsResult<usize>
where
    F: FnMut(Option<&str>) -> Option<String>,
{
    let Ok(col) = df.column(name) else {
        return Ok(0);
    };

    let text = as_string_series(col.as_materialized_series())?;
    let str_series = text.str()?;
    let mut changed = 0;
    let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        let mapped = f(opt_val);
        if mapped.as_deref() != opt_val {
            changed += 1;
        }
        values.push(mapped);
    }

    df.replace(name, Series::new(name.into(), values))?;
    Ok(changed)
}

/// Count nulls per column, in column order.
pub fn null_counts(df: &DataFrame) -> Vec<ColumnNullCount> {
    df.get_columns()
        .iter()
        .map(|col| ColumnNullCount {
            column: col.name().to_string(),
            nulls: col.null_count(),
        })
        .collect()
}

// =============================================================================
// String Utilities
// =============================================================================

/// Parse a text cell as a float.
///
/// Surrounding whitespace is ignored. Empty strings, unparsable text and NaN
/// all yield `None`.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Title-case a string.
///
/// A letter is upper-cased when the character before it is not a letter and
/// lower-cased otherwise, so `"new york"` becomes `"New York"` and
/// `"o'fallon"` becomes `"O'Fallon"`.
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_is_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }

    result
}
