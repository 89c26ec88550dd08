//! Spreadsheet reading (xls/xlsx) and writing (xlsx).
//!
//! Only the first worksheet is read and its first row is the header. Each
//! column gets a single dtype from its non-empty cells: all numbers become
//! Float64, all booleans Boolean, all dates Date, and anything mixed is read
//! as text.

use crate::cleaner::{date_from_epoch_days, epoch_days};
use crate::error::{CleaningError, Result};
use crate::utils::is_numeric_dtype;
use calamine::{Data, DataType as _, Reader, open_workbook_auto};
use chrono::Datelike;
use polars::prelude::*;
use rust_xlsxwriter::{ColNum, ExcelDateTime, Format, RowNum, Workbook, XlsxError};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn is_date_cell(cell: &Data) -> bool {
    matches!(cell, Data::DateTime(_) | Data::DateTimeIso(_))
}

/// Render a cell as text for columns that mix value kinds.
fn cell_text(cell: &Data) -> Option<String> {
    if is_blank(cell) {
        return None;
    }
    match cell {
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.to_string())
            .or_else(|| Some(cell.to_string())),
        other => Some(other.to_string()),
    }
}

/// Header text, keeping surrounding whitespace for column-name trimming.
fn header_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => cell_text(other),
    }
}

/// Header names with empty cells replaced by `Unnamed: <index>` and repeats
/// suffixed `.1`, `.2`, ...
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(header.len());
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = header_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx));
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Build one typed series from the cells of a column.
fn column_series(name: &str, cells: &[&Data]) -> PolarsResult<Series> {
    let filled: Vec<&Data> = cells.iter().copied().filter(|c| !is_blank(c)).collect();

    if !filled.is_empty() && filled.iter().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| if is_blank(c) { None } else { c.as_f64() })
            .collect();
        return Ok(Series::new(name.into(), values));
    }

    if !filled.is_empty() && filled.iter().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells.iter().map(|c| c.get_bool()).collect();
        return Ok(Series::new(name.into(), values));
    }

    if !filled.is_empty() && filled.iter().all(|c| is_date_cell(c)) {
        let days: Vec<Option<i32>> = cells
            .iter()
            .map(|c| c.as_date().map(epoch_days))
            .collect();
        return Series::new(name.into(), days).cast(&DataType::Date);
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| cell_text(c)).collect();
    Ok(Series::new(name.into(), values))
}

/// Load the first worksheet of a workbook.
pub(super) fn read_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleaningError::EmptyWorkbook(path.display().to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names = header_names(header);
    let body: Vec<&[Data]> = rows.collect();
    debug!("Worksheet has {} columns and {} data rows", names.len(), body.len());

    let empty = Data::Empty;
    let mut columns = Vec::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        let cells: Vec<&Data> = body.iter().map(|row| row.get(idx).unwrap_or(&empty)).collect();
        columns.push(Column::from(column_series(name, &cells)?));
    }

    Ok(DataFrame::new(columns)?)
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: RowNum,
    col: ColNum,
    value: AnyValue,
    date_format: &Format,
) -> Result<()> {
    match value {
        AnyValue::Null => {}
        AnyValue::Boolean(b) => {
            worksheet.write_boolean(row, col, b)?;
        }
        AnyValue::Date(days) => {
            if let Some(date) = date_from_epoch_days(days) {
                let year = u16::try_from(date.year())
                    .map_err(|_| XlsxError::DateTimeRangeError(date.to_string()))?;
                let datetime =
                    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?;
                worksheet.write_datetime_with_format(row, col, &datetime, date_format)?;
            }
        }
        AnyValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        AnyValue::StringOwned(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        other => match other.extract::<f64>() {
            Some(number) if is_numeric_dtype(&other.dtype()) => {
                worksheet.write_number(row, col, number)?;
            }
            _ => {
                worksheet.write_string(row, col, other.to_string())?;
            }
        },
    }
    Ok(())
}

/// Write a DataFrame to a single-sheet workbook.
///
/// Nulls are left as empty cells; dates use a `yyyy-mm-dd` number format.
/// A `.xls` path still receives xlsx content.
pub(super) fn write_workbook(df: &DataFrame, path: &Path) -> Result<()> {
    let legacy = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xls"));
    if legacy {
        warn!("Writing xlsx content to {}; the legacy .xls format is read-only", path.display());
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = ColNum::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string_with_format(0, col, column.name().as_str(), &header_format)?;

        let series = column.as_materialized_series();
        for row_idx in 0..series.len() {
            let row = RowNum::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            write_cell(worksheet, row, col, series.get(row_idx)?, &date_format)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_names() {
        let header = vec![
            Data::String("City".to_string()),
            Data::Empty,
            Data::String("City".to_string()),
            Data::String(" Email ".to_string()),
            Data::String("   ".to_string()),
        ];
        assert_eq!(
            header_names(&header),
            vec!["City", "Unnamed: 1", "City.1", " Email ", "   "]
        );
    }

    #[test]
    fn test_column_series_dtypes() {
        let numbers = [Data::Int(3), Data::Empty, Data::Float(2.5)];
        let refs: Vec<&Data> = numbers.iter().collect();
        let series = column_series("Age", &refs).unwrap();
        assert_eq!(series.dtype(), &DataType::Float64);
        assert_eq!(series.null_count(), 1);

        let mixed = [Data::Int(3), Data::String("abc".to_string())];
        let refs: Vec<&Data> = mixed.iter().collect();
        let series = column_series("Purchase_Amount", &refs).unwrap();
        assert_eq!(series.dtype(), &DataType::String);
        assert_eq!(series.str().unwrap().get(0), Some("3"));

        let flags = [Data::Bool(true), Data::Bool(false)];
        let refs: Vec<&Data> = flags.iter().collect();
        let series = column_series("Email_Valid", &refs).unwrap();
        assert_eq!(series.dtype(), &DataType::Boolean);
    }

    #[test]
    fn test_workbook_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");

        let dates = Series::new("Purchase_Date".into(), [Some(19797i32), None])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![
            Column::new("City".into(), [Some("Pune"), None]),
            Column::new("Purchase_Amount".into(), [Some(120.5), Some(-4.0)]),
            Column::new("Email_Valid".into(), [true, false]),
            dates.into(),
        ])
        .unwrap();

        write_workbook(&df, &path).unwrap();
        let loaded = read_workbook(&path).unwrap();

        assert_eq!(loaded.shape(), (2, 4));
        assert_eq!(
            loaded.column("Purchase_Amount").unwrap().dtype(),
            &DataType::Float64
        );
        assert_eq!(
            loaded.column("Email_Valid").unwrap().dtype(),
            &DataType::Boolean
        );
        assert_eq!(loaded.column("City").unwrap().null_count(), 1);

        let dates = loaded.column("Purchase_Date").unwrap();
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.get(0).unwrap(), AnyValue::Date(19797));
    }
}
