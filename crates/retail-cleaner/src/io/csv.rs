//! CSV reading and writing.

use crate::error::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load a CSV file with a header row.
///
/// Column types are inferred from every row, so a stray value deep in a
/// numeric column turns it into text instead of failing the read.
pub(super) fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Write a DataFrame as CSV with a header row. Dates are written as ISO-8601.
pub(super) fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    let mut out = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_round_trip_keeps_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let df = df![
            "Customer_Name" => ["Asha", "Ravi, Jr."],
            "Purchase_Amount" => [120.5, 80.0],
        ]
        .unwrap();

        write_csv(&df, &path).unwrap();
        let loaded = read_csv(&path).unwrap();

        assert_eq!(loaded.shape(), (2, 2));
        let names = loaded.column("Customer_Name").unwrap().as_materialized_series();
        assert_eq!(names.str().unwrap().get(1), Some("Ravi, Jr."));
    }

    #[test]
    fn test_late_malformed_number_reads_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let mut content = String::from("Customer_Name,Purchase_Amount\n");
        for i in 0..150 {
            let amount = if i == 139 { "abc".to_string() } else { i.to_string() };
            content.push_str(&format!("Customer {},{}\n", i, amount));
        }
        std::fs::write(&path, content).unwrap();

        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded.height(), 150);
        let amounts = loaded.column("Purchase_Amount").unwrap();
        assert_eq!(amounts.dtype(), &DataType::String);
        assert_eq!(amounts.as_materialized_series().str().unwrap().get(139), Some("abc"));
    }

    #[test]
    fn test_dates_written_as_iso() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.csv");
        let dates = Series::new("Purchase_Date".into(), [Some(19797i32), None])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![dates.into()]).unwrap();

        write_csv(&df, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("2024-03-15"));
    }
}
