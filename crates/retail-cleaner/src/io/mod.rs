//! Reading and writing retail datasets.
//!
//! The file format is chosen from the extension, compared case-insensitively:
//! `.csv` is read and written with polars, `.xls`/`.xlsx` with the
//! spreadsheet backend. The cleaned file is always written next to the input
//! in the same format, with `_cleaned` inserted before the extension.

mod csv;
mod excel;

use crate::error::{CleaningError, Result, ResultExt};
use crate::pipeline::Pipeline;
use crate::types::CleaningResult;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::info;

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xls" | "xlsx" => Ok(Self::Excel),
            _ => Err(CleaningError::UnsupportedFormat(format!(".{}", extension))),
        }
    }
}

/// Sibling path with `_cleaned` inserted before the extension.
///
/// `data/sales.XLSX` becomes `data/sales_cleaned.XLSX`; the extension keeps
/// its original case.
pub fn cleaned_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{}_cleaned.{}", stem, ext.to_string_lossy()),
        None => format!("{}_cleaned", stem),
    };
    path.with_file_name(file_name)
}

/// Read a dataset, choosing the reader from the file extension.
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    let format = FileFormat::from_path(path)?;
    if !path.exists() {
        return Err(CleaningError::FileNotFound(path.display().to_string()));
    }

    info!("Loading dataset from: {}", path.display());
    let df = match format {
        FileFormat::Csv => csv::read_csv(path),
        FileFormat::Excel => excel::read_workbook(path),
    }
    .context(format!("Failed to read {}", path.display()))?;

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Write a dataset in the format implied by the path's extension.
pub fn write_dataset(df: &DataFrame, path: &Path) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::write_csv(df, path),
        FileFormat::Excel => excel::write_workbook(df, path),
    }
    .context(format!("Failed to write {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Read `path`, clean it and write the result next to it.
///
/// Nothing is written when reading or cleaning fails. Returns the output
/// path together with the cleaning result.
pub fn load_clean_save(path: &Path, pipeline: &Pipeline) -> Result<(PathBuf, CleaningResult)> {
    let df = read_dataset(path)?;
    let result = pipeline.process(&df)?;
    let output = cleaned_path(path);
    write_dataset(&result.data, &output)?;
    Ok((output, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            FileFormat::from_path(Path::new("sales.csv")).unwrap(),
            FileFormat::Csv
        );
        assert_eq!(
            FileFormat::from_path(Path::new("Sales.XLSX")).unwrap(),
            FileFormat::Excel
        );
        assert_eq!(
            FileFormat::from_path(Path::new("legacy.xls")).unwrap(),
            FileFormat::Excel
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = FileFormat::from_path(Path::new("sales.json")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains(".json"));

        assert!(FileFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_cleaned_path() {
        assert_eq!(
            cleaned_path(Path::new("data/sales.csv")),
            PathBuf::from("data/sales_cleaned.csv")
        );
        assert_eq!(
            cleaned_path(Path::new("Retail.XLSX")),
            PathBuf::from("Retail_cleaned.XLSX")
        );
        assert_eq!(
            cleaned_path(Path::new("/tmp/my.data.xls")),
            PathBuf::from("/tmp/my.data_cleaned.xls")
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_dataset(Path::new("definitely_missing_file.csv")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
