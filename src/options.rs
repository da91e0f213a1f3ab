//! Options for loading and exporting tables.

use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use std::collections::HashSet;

/// Number of rows shown in a preview
pub const PREVIEW_ROWS: usize = 5;

/// Text values read as missing unless configured otherwise.
pub const DEFAULT_NULLS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How uploaded bytes are turned into a table.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Text values treated as missing
    pub nulls: HashSet<String>,

    /// Field delimiter of delimited text
    pub delimiter: u8,

    /// Encoding of delimited text without a byte order mark
    pub encoding: &'static Encoding,

    /// Read spreadsheet error cells (`#DIV/0!`, ...) as missing instead of text
    pub error_as_null: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
            delimiter: b',',
            encoding: UTF_8,
            error_as_null: false,
        }
    }
}

/// How tables are serialized on export.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Encoding of CSV output
    pub encoding: &'static Encoding,

    /// Name of the single worksheet in spreadsheet output
    pub sheet_name: String,
}

impl ExportOptions {
    /// Uses the encoding registered under `label` (e.g. `latin1`, `windows-1252`) for CSV output.
    pub fn with_encoding_label(mut self, label: &str) -> Option<Self> {
        self.encoding = Encoding::for_label(label.as_bytes())?;
        Some(self)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            encoding: UTF_8,
            sheet_name: "Sheet1".to_owned(),
        }
    }
}
