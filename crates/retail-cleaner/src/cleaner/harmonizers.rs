//! Category correction and categorical value harmonisation.

use crate::error::Result;
use crate::utils::{as_string_series, has_column, map_string_column};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Category assigned to a lower-cased product name.
///
/// Every matching pair overwrites the previous match, so the last matching
/// pair in `mappings` order decides.
pub fn category_for<'a>(product_lower: &str, mappings: &'a [(String, String)]) -> Option<&'a str> {
    mappings
        .iter()
        .filter(|(keyword, _)| product_lower.contains(keyword.as_str()))
        .map(|(_, category)| category.as_str())
        .last()
}

/// Overwrite the category of every row whose product name contains a keyword.
///
/// Rows without a match keep their category. Both columns must exist for the
/// step to apply. Returns the number of rows that matched a keyword.
pub(crate) fn correct_categories(
    df: &mut DataFrame,
    product_column: &str,
    category_column: &str,
    mappings: &[(String, String)],
) -> Result<usize> {
    if !has_column(df, product_column) || !has_column(df, category_column) {
        return Ok(0);
    }

    let products = as_string_series(df.column(product_column)?.as_materialized_series())?;
    let categories = as_string_series(df.column(category_column)?.as_materialized_series())?;

    let mut matched = 0;
    let values: Vec<Option<String>> = products
        .str()?
        .into_iter()
        .zip(categories.str()?.into_iter())
        .map(|(product, category)| {
            let corrected =
                product.and_then(|name| category_for(&name.to_lowercase(), mappings));
            match corrected {
                Some(label) => {
                    matched += 1;
                    Some(label.to_string())
                }
                None => category.map(str::to_string),
            }
        })
        .collect();

    df.replace(category_column, Series::new(category_column.into(), values))?;
    Ok(matched)
}

/// Replace each value found (lower-cased) in `map` with its display label.
///
/// Values missing from the map keep their current text. Returns the number of
/// cells whose text changed.
pub(crate) fn harmonise_column(
    df: &mut DataFrame,
    name: &str,
    map: &BTreeMap<String, String>,
) -> Result<usize> {
    let changed = map_string_column(df, name, |v| {
        v.map(|s| {
            map.get(&s.to_lowercase())
                .cloned()
                .unwrap_or_else(|| s.to_string())
        })
    })?;
    Ok(changed)
}
