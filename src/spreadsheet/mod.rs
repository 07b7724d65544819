//! # Spreadsheet Input/Output
//!
//! Loads the first sheet of an `.xlsx`/`.xlsm` or `.ods` workbook as dense rows of
//! typed values, and saves a filtered table as a fresh `.xlsx` workbook with the
//! extracted `Code` and `Month_Year` columns appended.
pub(crate) mod cell;
pub(crate) mod ods;
pub mod output;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod writer;
pub(crate) mod xlsx;

use crate::error::ExcelFilterError;
use crate::error::ResultMessage;
use crate::reshape::Row;
use crate::reshape::UT_PREFIX;
use crate::spreadsheet::ods::OdsSpreadsheet;
use crate::spreadsheet::output::Header;
use crate::spreadsheet::output::OutputTable;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use tracing::info;

/// Spreadsheet structure errors. All of them surface as format errors from `load`.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot detect file format for '{0}'")]
    FileFormatError(String),

    #[error("Missing part '{0}' in spreadsheet package")]
    FileError(String),

    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Spreadsheet '{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),

    #[error("Invalid ODS MIME type")]
    MimeTypeError,

    /// file name, sheet name, cell reference, message
    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// Type alias for buffered file reader
pub(crate) type FileReader = BufReader<File>;

/// A workbook that can produce the rows of its first sheet.
pub(crate) trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Reads the first sheet as a rectangular set of rows anchored at A1
    fn read_first_sheet(&mut self) -> Result<Vec<Row>, ExcelFilterError>;
}

/// Opens a workbook, picking the reader from the file extension.
fn open(path: &Path, file: File) -> Result<Box<dyn Spreadsheet>, ExcelFilterError> {
    let file_name = path.display().to_string();
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    let reader: FileReader = BufReader::new(file);
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Ok(Box::new(XlsxSpreadsheet::open(&file_name, reader)?)),
        Some("ods") => Ok(Box::new(OdsSpreadsheet::open(&file_name, reader)?)),
        _ => Err(SpreadsheetError::FileFormatError(file_name))?,
    }
}

/// Reads the first sheet of the workbook at `path`. Every row is data; no header
/// row is interpreted.
///
/// # Errors
///
/// * `FileAccessError` if the file is missing or unreadable
/// * `FormatError` if it is not a readable `.xlsx`, `.xlsm` or `.ods` workbook
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Row>, ExcelFilterError> {
    let path = path.as_ref();
    let access = |error| ExcelFilterError::file_access(path, error);
    let file = File::open(path).map_err(access)?;
    if !file.metadata().map_err(access)?.is_file() {
        Err(access(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file")))?;
    }
    let rows = open(path, file)
        .and_then(|mut spreadsheet| {
            debug!(spreadsheet = %spreadsheet.name(), "reading first sheet");
            spreadsheet.read_first_sheet()
        })
        .as_format_error(path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded spreadsheet");
    Ok(rows)
}

/// Writes the filtered rows with `Code` and `Month_Year` columns appended.
///
/// Before writing, the first column whose stringified values contain the UT
/// marker is removed. The workbook is staged in a temporary file next to `path`
/// and renamed into place, so a failed save leaves no file behind.
///
/// Returns the header of the removed column, if any.
///
/// # Errors
///
/// * `FileAccessError` if the destination cannot be written
pub fn save<P: AsRef<Path>>(
    rows: &[Row],
    codes: &[Option<String>],
    month_years: &[Option<String>],
    path: P,
) -> Result<Option<Header>, ExcelFilterError> {
    let path = path.as_ref();
    let mut table = OutputTable::new(rows, codes, month_years);
    let removed = table.remove_first_column_containing(UT_PREFIX);
    if let Some(header) = &removed {
        debug!(column = %header, "removed marker column");
    }

    let bytes = writer::write_workbook(&table).with_prefix("Build workbook failed")?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let access = |error| ExcelFilterError::file_access(path, error);
    let mut file = NamedTempFile::new_in(directory).map_err(access)?;
    file.write_all(&bytes).map_err(access)?;
    file.as_file().sync_all().map_err(access)?;
    file.persist(path).map_err(|error| access(error.error))?;

    info!(path = %path.display(), rows = table.rows.len(), columns = table.headers.len(), "saved spreadsheet");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reshape::Value;

    #[test]
    fn test_load_missing_file() {
        let error = load("definitely/not/here.xlsx").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn test_load_directory() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("d.xlsx");
        std::fs::create_dir(&path).unwrap();

        let error = load(&path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileAccess);
        assert!(error.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_load_unknown_extension() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let error = load(&path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(error.to_string().contains("Cannot detect file format"));
    }

    #[test]
    fn test_load_not_a_zip() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("data.xlsx");
        std::fs::write(&path, "this is not a workbook").unwrap();

        let error = load(&path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_save_then_load() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.xlsx");
        let rows = vec![
            vec![Value::Text("r".to_owned()), Value::Text("abc".to_owned()), Value::Text("УТ-1".to_owned())],
            vec![Value::Text("r".to_owned()), Value::Text("def".to_owned()), Value::Number(3.0)],
        ];
        let codes = vec![Some("1.234-567".to_owned()), None];
        let month_years = vec![None, Some("07.2024".to_owned())];

        let removed = save(&rows, &codes, &month_years, &path).unwrap();
        assert_eq!(removed, Some(Header::Position(2)));

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, vec![
            vec![Value::Number(0.0), Value::Number(1.0), Value::Text("Code".to_owned()), Value::Text("Month_Year".to_owned())],
            vec![Value::Text("r".to_owned()), Value::Text("abc".to_owned()), Value::Text("1.234-567".to_owned()), Value::Empty],
            vec![Value::Text("r".to_owned()), Value::Text("def".to_owned()), Value::Empty, Value::Text("07.2024".to_owned())],
        ]);
    }

    #[test]
    fn test_save_to_missing_directory() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing").join("out.xlsx");

        let error = save(&[], &[], &[], &path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileAccess);
        assert!(!path.exists());
    }
}
