use crate::error::CodecResult;
use crate::error::SweeperError;
use crate::options::LoadOptions;
use crate::spreadsheet::delimited::CsvSpreadsheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use crate::spreadsheet::SourceFormat;
use crate::spreadsheet::Spreadsheet;
use crate::table::Table;
use std::path::Path;
use tracing::debug;
use tracing::info;

/// A file handed over by the upload widget. Immutable once received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        UploadedFile {
            name: name.into(),
            content: content.into(),
        }
    }

    /// File name including its extension
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Size in KiB, as shown next to the file name
    pub fn size_kib(&self) -> f64 {
        self.content.len() as f64 / 1024f64
    }

    /// Extension without the dot, empty when the name has none
    pub fn extension(&self) -> &str {
        Path::new(&self.name)
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default()
    }

    pub fn format(&self) -> Option<SourceFormat> {
        SourceFormat::detect(&self.name)
    }
}

/// Parses an uploaded file into a table.
///
/// CSV files are read as delimited text, spreadsheets through their first
/// worksheet; in both cases the first row holds the column names.
///
/// # Errors
/// `UnsupportedFormatError` for any other extension, `ParseError` for
/// malformed content.
pub fn load(file: &UploadedFile, options: &LoadOptions) -> Result<Table, SweeperError> {
    let format = file
        .format()
        .ok_or_else(|| SweeperError::UnsupportedFormatError(file.extension().to_owned()))?;

    let mut spreadsheet: Box<dyn Spreadsheet + '_> = match format {
        SourceFormat::Csv => Box::new(CsvSpreadsheet::new(file.name(), file.content())),
        SourceFormat::Xlsx => Box::new(XlsxSpreadsheet::open(file.name(), file.content()).or_parse_error(file.name())?),
    };
    let sheet = spreadsheet.read_sheet(options).or_parse_error(&spreadsheet.name())?;
    if sheet.is_empty() {
        debug!("Sheet '{}' of '{}' is empty", sheet.name, sheet.file_name);
    }
    let table = sheet.to_table(&options.nulls).or_parse_error(file.name())?;

    info!(
        "Loaded '{}' ({} bytes): {} rows, {} columns",
        file.name(),
        file.size(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::writer::write_xlsx;
    use crate::table::Column;
    use crate::table::ColumnType;
    use crate::table::Value;

    #[test]
    fn uploaded_file_metadata() {
        let file = UploadedFile::new("Report.Final.CSV", vec![0u8; 2048]);
        assert_eq!(file.size(), 2048);
        assert_eq!(file.size_kib(), 2.0);
        assert_eq!(file.extension(), "CSV");
        assert_eq!(file.format(), Some(SourceFormat::Csv));
        assert_eq!(UploadedFile::new("README", "").extension(), "");
    }

    #[test]
    fn load_csv() -> anyhow::Result<()> {
        let file = UploadedFile::new("people.csv", "id,name,age\n1,Ann,30\n2,Bob,\n");
        let table = load(&file, &LoadOptions::default())?;
        assert_eq!(table.column_names(), vec!["id", "name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("age").map(Column::kind), Some(ColumnType::Number));
        assert_eq!(table.column("age").unwrap().values(), &[Value::Number(30.0), Value::Null]);
        Ok(())
    }

    #[test]
    fn load_spreadsheet() -> anyhow::Result<()> {
        let source = Table::try_new(vec![
            Column::new("id", vec![Value::Number(1.0), Value::Number(2.0)]),
            Column::new("name", vec!["Ann".into(), "Bob".into()]),
        ])?;
        let file = UploadedFile::new("people.xlsx", write_xlsx(&source, "People")?);
        assert_eq!(load(&file, &LoadOptions::default())?, source);
        Ok(())
    }

    #[test]
    fn load_empty_csv() -> anyhow::Result<()> {
        let table = load(&UploadedFile::new("empty.csv", ""), &LoadOptions::default())?;
        assert_eq!(table, Table::default());
        Ok(())
    }

    #[test]
    fn reject_unsupported_extension() {
        let result = load(&UploadedFile::new("notes.txt", "a,b"), &LoadOptions::default());
        assert!(matches!(result, Err(SweeperError::UnsupportedFormatError(extension)) if extension == "txt"));
    }

    #[test]
    fn reject_malformed_content() {
        let options = LoadOptions::default();
        let result = load(&UploadedFile::new("bad.csv", "a,b\n1,\"open\n"), &options);
        assert!(matches!(result, Err(SweeperError::ParseError { file, .. }) if file == "bad.csv"));

        let result = load(&UploadedFile::new("bad.xlsx", "not a zip"), &options);
        assert!(matches!(result, Err(SweeperError::ParseError { file, .. }) if file == "bad.xlsx"));
    }
}
