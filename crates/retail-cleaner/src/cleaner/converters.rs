//! Type conversion functions for data cleaning.
//!
//! Malformed cells never fail a conversion; they become nulls.

use crate::config::ClipRange;
use crate::error::Result;
use crate::utils::{as_string_series, has_column, is_numeric_dtype, parse_numeric_string};
use chrono::{DateTime, Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

/// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Date layouts tried in order, month before day.
///
/// Two-digit years come before four-digit ones because `%Y` would otherwise
/// accept `24` as year 24. Layouts that start with `%Y` are only tried when
/// the value starts with four digits.
const MONTH_FIRST_FORMATS: [&str; 22] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y",
    "%m-%d-%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
];

/// Only consulted when no month-first reading exists, e.g. `13/01/2024`.
const DAY_FIRST_FALLBACK_FORMATS: [&str; 6] = [
    "%d/%m/%y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%Y %H:%M",
];

/// Convert a series to Float64.
///
/// Numeric and boolean dtypes are cast; everything else is parsed as text.
/// NaN never survives: it becomes null like any other unusable value.
pub(crate) fn to_float_series(series: &Series) -> PolarsResult<Series> {
    let dtype = series.dtype();
    if is_numeric_dtype(dtype) || dtype == &DataType::Boolean {
        let floats = series.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = floats
            .f64()?
            .into_iter()
            .map(|opt_val| opt_val.filter(|v| !v.is_nan()))
            .collect();
        return Ok(Series::new(series.name().clone(), values));
    }

    let text = as_string_series(series)?;
    let values: Vec<Option<f64>> = text
        .str()?
        .into_iter()
        .map(|opt_val| opt_val.and_then(parse_numeric_string))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Coerce each present column to Float64.
///
/// Returns the number of non-null cells that could not be parsed.
pub(crate) fn coerce_numeric_columns(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut coerced = 0;
    for name in columns {
        let Ok(col) = df.column(name) else {
            continue;
        };
        let series = col.as_materialized_series();
        let nulls_before = series.null_count();
        let converted = to_float_series(series)?;
        let lost = converted.null_count().saturating_sub(nulls_before);

        if lost > 0 {
            debug!("'{}': {} values could not be parsed as numbers", name, lost);
        }
        coerced += lost;
        df.replace(name, converted)?;
    }
    Ok(coerced)
}

fn starts_with_year(value: &str) -> bool {
    value.len() >= 4 && value.as_bytes()[..4].iter().all(u8::is_ascii_digit)
}

fn try_formats(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    let year_first = starts_with_year(value);
    formats
        .iter()
        .filter(|fmt| year_first || !fmt.starts_with("%Y"))
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Parse a date string, month before day when ambiguous.
///
/// Time components are accepted and dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    try_formats(trimmed, &MONTH_FIRST_FORMATS)
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| try_formats(trimmed, &DAY_FIRST_FALLBACK_FORMATS))
}

/// Days since the Unix epoch, the physical representation of polars dates.
#[inline]
pub(crate) fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`epoch_days`].
#[inline]
pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Convert a series to the Date dtype.
pub(crate) fn to_date_series(series: &Series) -> PolarsResult<Series> {
    match series.dtype() {
        DataType::Date => Ok(series.clone()),
        DataType::Datetime(_, _) => series.cast(&DataType::Date),
        _ => {
            let text = as_string_series(series)?;
            let days: Vec<Option<i32>> = text
                .str()?
                .into_iter()
                .map(|opt_val| opt_val.and_then(parse_date).map(epoch_days))
                .collect();
            Series::new(series.name().clone(), days).cast(&DataType::Date)
        }
    }
}

/// Parse each present column as a calendar date.
///
/// Returns the number of non-null cells that could not be parsed.
pub(crate) fn parse_date_columns(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut unparsed = 0;
    for name in columns {
        let Ok(col) = df.column(name) else {
            continue;
        };
        let series = col.as_materialized_series();
        let nulls_before = series.null_count();
        let converted = to_date_series(series)?;
        let lost = converted.null_count().saturating_sub(nulls_before);

        if lost > 0 {
            debug!("'{}': {} values could not be parsed as dates", name, lost);
        }
        unparsed += lost;
        df.replace(name, converted)?;
    }
    Ok(unparsed)
}

/// Clamp a numeric column into an inclusive range.
///
/// The column is coerced to Float64 first. Returns the number of values that
/// were moved onto a bound.
pub(crate) fn clip_column(df: &mut DataFrame, name: &str, range: ClipRange) -> Result<usize> {
    if !has_column(df, name) {
        return Ok(0);
    }

    let converted = to_float_series(df.column(name)?.as_materialized_series())?;
    let mut clipped = 0;
    let values: Vec<Option<f64>> = converted
        .f64()?
        .into_iter()
        .map(|opt_val| {
            opt_val.map(|v| {
                let bounded = range.clip(v);
                if bounded != v {
                    clipped += 1;
                }
                bounded
            })
        })
        .collect();

    df.replace(name, Series::new(name.into(), values))?;
    Ok(clipped)
}
