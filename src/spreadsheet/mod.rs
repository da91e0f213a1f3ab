//! # Spreadsheet Codecs
//!
//! Reading and writing of the supported file formats. Readers turn raw bytes
//! into a sparse [`Sheet`](sheet::Sheet) of typed cells, which is then shaped
//! into a table; writers serialize a table back to bytes.
use crate::error::CodecError;
use crate::options::LoadOptions;
use crate::spreadsheet::sheet::Sheet;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod delimited;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod writer;
pub(crate) mod xlsx;

/// Errors raised by the format codecs
#[derive(Error, Debug)]
pub(crate) enum SpreadsheetError {
    #[error("Missing part '{0}' in spreadsheet package")]
    FileError(String),

    #[error("Spreadsheet '{0}' is password protected or a legacy binary workbook")]
    SpreadsheetPasswordProtectedError(String),

    #[error("Spreadsheet '{0}' has no worksheet")]
    SpreadsheetEmptyError(String),

    #[error("Invalid cell value at {0}: '{1}'")]
    CellValueError(String, String),

    #[error("Cell reference '{0}' is outside the worksheet grid")]
    CellReferenceError(String),

    #[error("Expected {0} fields in line {1}, saw {2}")]
    FieldCountError(usize, u64, usize),

    #[error("Unterminated quoted field")]
    UnterminatedQuoteError,

    #[error("Invalid {0} byte sequence")]
    TextDecodingError(String),

    #[error("Cannot encode '{1}' as {0}")]
    TextEncodingError(String, String),

    #[error("Invalid sheet name '{0}'")]
    SheetNameError(String),

    #[error("Text at {0} exceeds 32767 characters")]
    CellTooLongError(String),

    #[error("Number at {0} is not finite")]
    NonFiniteNumberError(String),
}

/// File formats accepted on upload, keyed by file extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma separated text (`.csv`)
    Csv,
    /// Office Open XML workbook (`.xlsx`, `.xlsm`)
    Xlsx,
}

impl SourceFormat {
    /// Detects the format from the extension of a file name, case-insensitively.
    pub fn detect(file_name: &str) -> Option<SourceFormat> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" | "xlsm" => Some(SourceFormat::Xlsx),
            _ => None,
        }
    }
}

/// A parsed source file able to produce its first sheet.
pub(crate) trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Reads the first sheet as a grid of typed cells
    fn read_sheet(&mut self, options: &LoadOptions) -> Result<Sheet, CodecError>;
}
