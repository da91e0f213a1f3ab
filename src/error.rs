use crate::table::TableError;
use thiserror::Error;

/// Errors reported to callers of the data pipeline.
///
/// Each variant is scoped to the single action that raised it: a failed load
/// only affects its own file, a failed clean, projection or export leaves the
/// table untouched.
#[derive(Error, Debug)]
pub enum SweeperError {
    /// The file extension is neither CSV-like nor spreadsheet-like
    #[error("Unsupported file format '{0}'")]
    UnsupportedFormatError(String),

    /// The file content is malformed
    #[error("Parse '{file}' failed: {message}")]
    ParseError { file: String, message: String },

    /// A projection referenced a column the table does not have
    #[error("Unknown column '{0}'")]
    UnknownColumnError(String),

    /// The table could not be encoded into the target format
    #[error("Serialize '{file}' failed: {message}")]
    SerializationError { file: String, message: String },

    /// A hand-built table broke the table invariants
    #[error("{0}")]
    InvalidTableError(#[from] TableError),
}

/// Aggregates the failures of the format codecs.
/// Codec code propagates everything with `?` and the pipeline decides whether
/// a failure is a parse or a serialization error.
#[derive(Error, Debug)]
pub(crate) enum CodecError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, CodecError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| CodecError::WithContextError(format!("{}: {}", message, e)))
    }
}

/// Lifts codec failures into the pipeline error for the file being handled.
pub(crate) trait CodecResult<T> {
    fn or_parse_error(self, file: &str) -> Result<T, SweeperError>;

    fn or_serialization_error(self, file: &str) -> Result<T, SweeperError>;
}

impl<T> CodecResult<T> for Result<T, CodecError> {
    fn or_parse_error(self, file: &str) -> Result<T, SweeperError> {
        self.map_err(|error| SweeperError::ParseError {
            file: file.to_owned(),
            message: error.to_string(),
        })
    }

    fn or_serialization_error(self, file: &str) -> Result<T, SweeperError> {
        self.map_err(|error| SweeperError::SerializationError {
            file: file.to_owned(),
            message: error.to_string(),
        })
    }
}
