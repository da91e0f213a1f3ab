use crate::error::CodecResult;
use crate::error::SweeperError;
use crate::options::ExportOptions;
use crate::spreadsheet::delimited::write_csv;
use crate::spreadsheet::writer::write_xlsx;
use crate::table::Table;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Target formats offered for conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Office Open XML workbook, labelled `Excel` in the shell
    Spreadsheet,
}

impl ExportFormat {
    /// Canonical file extension, without the dot
    pub const fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }

    pub const fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Spreadsheet => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SweeperError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            _ => Err(SweeperError::UnsupportedFormatError(label.to_owned())),
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Spreadsheet => write!(f, "Excel"),
        }
    }
}

/// Exported bytes with what the browser needs to offer them as a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub data: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Serializes a table without any index column.
///
/// The artifact is named after `source_name` with its extension replaced by
/// the one of `format`.
///
/// # Errors
/// `SerializationError` when the table cannot be represented in the target
/// format or encoding.
pub fn export(
    table: &Table,
    source_name: &str,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportArtifact, SweeperError> {
    let file_name = Path::new(source_name)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned();
    let data = match format {
        ExportFormat::Csv => write_csv(table, b',', options.encoding),
        ExportFormat::Spreadsheet => write_xlsx(table, &options.sheet_name),
    }
    .or_serialization_error(&file_name)?;

    info!(
        "Exported {} rows, {} columns as '{}' ({} bytes)",
        table.row_count(),
        table.column_count(),
        file_name,
        data.len()
    );
    Ok(ExportArtifact {
        data,
        file_name,
        mime_type: format.mime_type(),
    })
}
