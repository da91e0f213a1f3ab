//! Delimited text (CSV) reading and writing.

use crate::error::CodecError;
use crate::options::LoadOptions;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Table;
use csv::ReaderBuilder;
use csv::WriterBuilder;
use encoding_rs::Encoding;
use encoding_rs::UTF_16BE;
use encoding_rs::UTF_16LE;
use encoding_rs::UTF_8;
use std::borrow::Cow;

const QUOTE: u8 = b'"';

/// Delimited text held in memory
pub(crate) struct CsvSpreadsheet<'a> {
    name: String,
    content: &'a [u8],
}

impl<'a> CsvSpreadsheet<'a> {
    pub(crate) fn new(name: &str, content: &'a [u8]) -> Self {
        CsvSpreadsheet {
            name: name.to_owned(),
            content,
        }
    }
}

impl Spreadsheet for CsvSpreadsheet<'_> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads every record as a row of text cells; the first record is the header.
    /// Records wider than the header are rejected, narrower ones are padded later
    /// with missing values.
    fn read_sheet(&mut self, options: &LoadOptions) -> Result<Sheet, CodecError> {
        let text = decode(self.content, options.encoding)?;
        if ends_inside_quotes(text.as_bytes(), options.delimiter) {
            Err(SpreadsheetError::UnterminatedQuoteError)?;
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(text.as_bytes());
        let mut sheet = Sheet::new(&self.name, &self.name);
        let mut width = None::<usize>;
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let expected = *width.get_or_insert(record.len());
            if record.len() > expected {
                let line = record.position().map(|position| position.line()).unwrap_or(row as u64 + 1);
                Err(SpreadsheetError::FieldCountError(expected, line, record.len()))?;
            }
            for (col, field) in record.iter().enumerate() {
                sheet.push(Cell {
                    row,
                    col,
                    kind: CellType::Text,
                    value: field.to_owned(),
                });
            }
        }
        Ok(sheet)
    }
}

/// Decodes text, honouring a byte order mark before the configured encoding.
/// Malformed byte sequences are an error rather than being replaced.
fn decode<'a>(content: &'a [u8], fallback: &'static Encoding) -> Result<Cow<'a, str>, CodecError> {
    let (encoding, bom_length) = Encoding::for_bom(content).unwrap_or((fallback, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&content[bom_length..])
        .ok_or_else(|| SpreadsheetError::TextDecodingError(encoding.name().to_owned()).into())
}

/// Returns true when the input ends inside a quoted field.
/// A quote only opens a field at its start; `""` inside a quoted field is an
/// escaped quote.
fn ends_inside_quotes(bytes: &[u8], delimiter: u8) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut index = 0usize;
    while index < bytes.len() {
        let byte = bytes[index];
        if in_quotes {
            if byte == QUOTE {
                if bytes.get(index + 1) == Some(&QUOTE) {
                    index += 1;
                } else {
                    in_quotes = false;
                }
            }
        } else if byte == QUOTE && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else {
            at_field_start = byte == delimiter || byte == b'\n' || byte == b'\r';
        }
        index += 1;
    }
    in_quotes
}

/// Writes the header and every row; missing values become empty fields.
/// A table without columns produces no output at all.
pub(crate) fn write_csv(table: &Table, delimiter: u8, encoding: &'static Encoding) -> Result<Vec<u8>, CodecError> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    let bytes = writer.into_inner().map_err(|error| error.into_error())?;
    encode(bytes, encoding)
}

/// Re-encodes UTF-8 output, failing on characters the target encoding lacks.
fn encode(bytes: Vec<u8>, encoding: &'static Encoding) -> Result<Vec<u8>, CodecError> {
    if encoding == UTF_8 {
        return Ok(bytes);
    }
    let text = std::str::from_utf8(&bytes)?;
    if encoding == UTF_16LE || encoding == UTF_16BE {
        // encoding_rs only decodes UTF-16, so the code units are written here
        let mut output = Vec::with_capacity(text.len() * 2 + 2);
        for unit in std::iter::once(0xFEFFu16).chain(text.encode_utf16()) {
            if encoding == UTF_16LE {
                output.extend_from_slice(&unit.to_le_bytes());
            } else {
                output.extend_from_slice(&unit.to_be_bytes());
            }
        }
        return Ok(output);
    }
    let (encoded, _, had_errors) = encoding.encode(text);
    if had_errors {
        let character = text
            .chars()
            .find(|character| encoding.encode(character.encode_utf8(&mut [0u8; 4])).2)
            .map(String::from)
            .unwrap_or_default();
        Err(SpreadsheetError::TextEncodingError(encoding.name().to_owned(), character))?;
    }
    Ok(encoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use crate::table::ColumnType;
    use crate::table::Value;
    use encoding_rs::WINDOWS_1252;

    fn read(content: &str) -> Result<Table, CodecError> {
        let options = LoadOptions::default();
        let mut spreadsheet = CsvSpreadsheet::new("data.csv", content.as_bytes());
        spreadsheet.read_sheet(&options)?.to_table(&options.nulls)
    }

    fn sample() -> Table {
        Table::try_new(vec![
            Column::new("id", vec![Value::Number(1.0), Value::Number(2.5), Value::Null]),
            Column::new("name", vec!["a,b".into(), "say \"hi\"".into(), "c".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn read_header_and_types() {
        let table = read("id,name\n1,a\n1,a\n2,b\n").unwrap();
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("id").unwrap().kind(), ColumnType::Number);
        assert_eq!(table.column("name").unwrap().kind(), ColumnType::Text);
    }

    #[test]
    fn read_missing_and_short_rows() {
        let table = read("a,b,c\n1,,x\n2\nNA,3,\n").unwrap();
        assert_eq!(table.column("a").unwrap().values(), &[Value::Number(1.0), Value::Number(2.0), Value::Null]);
        assert_eq!(table.column("b").unwrap().values(), &[Value::Null, Value::Null, Value::Number(3.0)]);
        assert_eq!(table.column("c").unwrap().values(), &[Value::Text("x".to_owned()), Value::Null, Value::Null]);
    }

    #[test]
    fn read_rejects_wide_rows() {
        let error = read("a,b\n1,2,3\n").unwrap_err();
        assert_eq!(error.to_string(), "Expected 2 fields in line 2, saw 3");
    }

    #[test]
    fn read_rejects_unterminated_quote() {
        assert!(matches!(
            read("a,b\n1,\"open\n2,3\n"),
            Err(CodecError::SpreadsheetError(SpreadsheetError::UnterminatedQuoteError))
        ));
    }

    #[test]
    fn read_quoted_fields() {
        let table = read("a,b\n\"x,\"\"y\"\"\",5\"\n").unwrap();
        assert_eq!(table.column("a").unwrap().values(), &[Value::Text("x,\"y\"".to_owned())]);
        assert_eq!(table.column("b").unwrap().values(), &[Value::Text("5\"".to_owned())]);
    }

    #[test]
    fn read_with_bom_and_fallback_encoding() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice("name\nJosé\n".as_bytes());
        let options = LoadOptions::default();
        let table = CsvSpreadsheet::new("bom.csv", &content).read_sheet(&options).unwrap().to_table(&options.nulls).unwrap();
        assert_eq!(table.column_names(), vec!["name"]);
        assert_eq!(table.column("name").unwrap().values(), &[Value::Text("José".to_owned())]);

        let latin = b"name\nJos\xE9\n";
        assert!(CsvSpreadsheet::new("latin.csv", latin).read_sheet(&options).is_err());
        let options = LoadOptions { encoding: WINDOWS_1252, ..LoadOptions::default() };
        let sheet = CsvSpreadsheet::new("latin.csv", latin).read_sheet(&options).unwrap();
        assert_eq!(sheet.to_table(&options.nulls).unwrap().column("name").unwrap().values(), &[Value::Text("José".to_owned())]);
    }

    #[test]
    fn read_empty_input() {
        assert_eq!(read("").unwrap(), Table::default());
    }

    #[test]
    fn quote_scanner() {
        assert!(!ends_inside_quotes(b"a,\"b\"\"c\"\n", b','));
        assert!(!ends_inside_quotes(b"5\",x", b','));
        assert!(ends_inside_quotes(b"a,\"b", b','));
        assert!(ends_inside_quotes(b"\"a\"\"", b','));
    }

    #[test]
    fn write_quotes_and_missing_values() {
        let bytes = write_csv(&sample(), b',', UTF_8).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "id,name\n1,\"a,b\"\n2.5,\"say \"\"hi\"\"\"\n,c\n");
    }

    #[test]
    fn write_header_only() {
        let bytes = write_csv(&sample().head(0), b',', UTF_8).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "id,name\n");
        assert!(write_csv(&Table::default(), b',', UTF_8).unwrap().is_empty());
    }

    #[test]
    fn write_round_trip() {
        let bytes = write_csv(&sample(), b',', UTF_8).unwrap();
        let options = LoadOptions::default();
        let table = CsvSpreadsheet::new("data.csv", &bytes).read_sheet(&options).unwrap().to_table(&options.nulls).unwrap();
        assert_eq!(table, sample());
    }

    #[test]
    fn write_other_encodings() {
        let table = Table::try_new(vec![Column::new("name", vec!["José".into()])]).unwrap();
        assert_eq!(write_csv(&table, b',', WINDOWS_1252).unwrap(), b"name\nJos\xE9\n".to_vec());
        let utf16 = write_csv(&table, b',', UTF_16LE).unwrap();
        assert_eq!(&utf16[..4], &[0xFF, 0xFE, b'n', 0]);

        let table = Table::try_new(vec![Column::new("name", vec!["日本".into()])]).unwrap();
        let error = write_csv(&table, b',', WINDOWS_1252).unwrap_err();
        assert_eq!(error.to_string(), "Cannot encode '日' as windows-1252");
    }
}
