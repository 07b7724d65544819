use std::io;
use std::path::Path;
use thiserror::Error;
use zip::result::ZipError;

/// Main error type for the Excel filter.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum ExcelFilterError {
    #[error("{0}")]
    WithContextError(String),

    /// Input missing or unreadable, or output not writable.
    #[error("Cannot access file '{path}': {source}")]
    FileAccessError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a spreadsheet this crate can parse.
    #[error("Invalid spreadsheet '{path}': {message}")]
    FormatError { path: String, message: String },

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    XmlEscapeError(#[from] quick_xml::escape::EscapeError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

/// Coarse classification of a failure, as reported to the operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    FileAccess,
    Format,
    Other,
}

impl ExcelFilterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileAccessError { .. } => ErrorKind::FileAccess,
            Self::FormatError { .. } => ErrorKind::Format,
            _ => ErrorKind::Other,
        }
    }

    pub(crate) fn file_access(path: &Path, source: std::io::Error) -> Self {
        Self::FileAccessError {
            path: path.display().to_string(),
            source,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;

    /// Folds every failure of reading `path` into a `FormatError`, except I/O
    /// failures other than a truncated package, which stay file access errors.
    fn as_format_error(self, path: &Path) -> Self;
}

impl<T> ResultMessage for Result<T, ExcelFilterError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ExcelFilterError::WithContextError(format!("{}: {}", message, e)))
    }

    fn as_format_error(self, path: &Path) -> Self {
        self.map_err(|e| match e {
            ExcelFilterError::FileAccessError { .. } | ExcelFilterError::FormatError { .. } => e,
            ExcelFilterError::IoError(source) | ExcelFilterError::ZipError(ZipError::Io(source))
                if source.kind() != io::ErrorKind::UnexpectedEof =>
            {
                ExcelFilterError::file_access(path, source)
            }
            other => ExcelFilterError::FormatError {
                path: path.display().to_string(),
                message: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let error = ExcelFilterError::file_access(Path::new("a.xlsx"), io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(error.kind(), ErrorKind::FileAccess);
        assert!(error.to_string().starts_with("Cannot access file 'a.xlsx'"));

        let error = ExcelFilterError::WithContextError("oops".to_owned());
        assert_eq!(error.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_as_format_error() {
        let result: Result<(), ExcelFilterError> = Err(ExcelFilterError::XmlHelperError(
            crate::helpers::xml::XmlError::ParseEntityError("foo".to_owned()),
        ));
        let error = result.as_format_error(Path::new("a.xlsx")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
        assert_eq!(error.to_string(), "Invalid spreadsheet 'a.xlsx': Parse entity 'foo' failed");

        let result: Result<(), ExcelFilterError> = Err(ExcelFilterError::file_access(
            Path::new("b.xlsx"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        ));
        let error = result.as_format_error(Path::new("b.xlsx")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn test_as_format_error_keeps_io_failures() {
        let result: Result<(), ExcelFilterError> = Err(ExcelFilterError::ZipError(ZipError::Io(
            io::Error::from(io::ErrorKind::PermissionDenied),
        )));
        let error = result.as_format_error(Path::new("c.xlsx")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileAccess);

        let result: Result<(), ExcelFilterError> = Err(ExcelFilterError::IoError(io::Error::other("is a directory")));
        let error = result.as_format_error(Path::new("d.xlsx")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileAccess);

        let result: Result<(), ExcelFilterError> = Err(ExcelFilterError::ZipError(ZipError::Io(
            io::Error::from(io::ErrorKind::UnexpectedEof),
        )));
        let error = result.as_format_error(Path::new("e.xlsx")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_with_prefix() {
        let result: Result<(), ExcelFilterError> = Err(ExcelFilterError::WithContextError("inner".to_owned()));
        let error = result.with_prefix("outer").unwrap_err();
        assert_eq!(error.to_string(), "outer: inner");
    }
}
