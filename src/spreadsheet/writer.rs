//! Minimal Office Open XML writer.
//!
//! Produces a single-sheet workbook: the header row followed by one row per
//! table row. Text is written as inline strings, numbers as plain values and
//! missing values are left out.

use crate::error::CodecError;
use crate::helpers::xml::XmlWriter;
use crate::helpers::zip::ZipWriterHelper;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Table;
use crate::table::Value;
use regex::Regex;
use std::io::Cursor;
use std::sync::LazyLock;
use zip::ZipWriter;

/// Longest text a cell can hold
const MAX_CELL_CHARS: usize = 32_767;

/// Longest worksheet name
const MAX_SHEET_NAME_CHARS: usize = 31;

static SHEET_NAME_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]:*?/\\]").expect("Hardcode regex pattern"));

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const PACKAGE_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Serializes a table as an XLSX package with one worksheet.
///
/// # Arguments
/// * `table` - Table to write
/// * `sheet_name` - Name of the worksheet
///
/// # Returns
/// The package bytes, or an error when the sheet name or a cell cannot be stored
pub(crate) fn write_xlsx(table: &Table, sheet_name: &str) -> Result<Vec<u8>, CodecError> {
    check_sheet_name(sheet_name)?;
    let workbook = workbook_xml(sheet_name)?;
    let worksheet = worksheet_xml(table)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.write_part("[Content_Types].xml", CONTENT_TYPES.as_bytes())?;
    zip.write_part("_rels/.rels", PACKAGE_RELATIONSHIPS.as_bytes())?;
    zip.write_part("xl/workbook.xml", &workbook)?;
    zip.write_part("xl/_rels/workbook.xml.rels", WORKBOOK_RELATIONSHIPS.as_bytes())?;
    zip.write_part("xl/styles.xml", STYLES.as_bytes())?;
    zip.write_part("xl/worksheets/sheet1.xml", &worksheet)?;
    Ok(zip.finish()?.into_inner())
}

/// Checks the naming rules a spreadsheet application enforces on worksheets.
fn check_sheet_name(name: &str) -> Result<(), SpreadsheetError> {
    let length = name.chars().count();
    if length == 0
        || length > MAX_SHEET_NAME_CHARS
        || SHEET_NAME_FORBIDDEN.is_match(name)
        || name.starts_with('\'')
        || name.ends_with('\'')
    {
        Err(SpreadsheetError::SheetNameError(name.to_owned()))
    } else {
        Ok(())
    }
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>, CodecError> {
    let mut xml = XmlWriter::new()?;
    xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    xml.start("sheets", &[])?;
    xml.empty("sheet", &[("name", sheet_name), ("sheetId", "1"), ("r:id", "rId1")])?;
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.into_bytes())
}

fn worksheet_xml(table: &Table) -> Result<Vec<u8>, CodecError> {
    let mut xml = XmlWriter::new()?;
    xml.start("worksheet", &[("xmlns", NS_MAIN)])?;
    let dimension = dimension(table);
    xml.empty("dimension", &[("ref", dimension.as_str())])?;
    xml.start("sheetData", &[])?;

    if table.column_count() > 0 {
        let header = table.column_names();
        start_row(&mut xml, 0)?;
        for (col, name) in header.iter().enumerate() {
            write_text(&mut xml, 0, col, name)?;
        }
        xml.end("row")?;

        for (offset, row) in table.rows().enumerate() {
            let row_index = offset + 1;
            start_row(&mut xml, row_index)?;
            for (col, value) in row.iter().enumerate() {
                match value {
                    Value::Null => (),
                    Value::Number(number) => write_number(&mut xml, row_index, col, *number)?,
                    Value::Text(text) => write_text(&mut xml, row_index, col, text)?,
                }
            }
            xml.end("row")?;
        }
    }

    xml.end("sheetData")?;
    xml.end("worksheet")?;
    Ok(xml.into_bytes())
}

/// Used range covering the header and every row, `A1` for an empty table.
fn dimension(table: &Table) -> String {
    if table.column_count() == 0 {
        return "A1".to_owned();
    }
    let last = index_to_reference(table.row_count(), table.column_count() - 1);
    if last == "A1" {
        last
    } else {
        format!("A1:{last}")
    }
}

fn start_row(xml: &mut XmlWriter, row: usize) -> Result<(), CodecError> {
    let reference = (row + 1).to_string();
    xml.start("row", &[("r", reference.as_str())])
}

fn write_number(xml: &mut XmlWriter, row: usize, col: usize, number: f64) -> Result<(), CodecError> {
    let reference = index_to_reference(row, col);
    if !number.is_finite() {
        return Err(SpreadsheetError::NonFiniteNumberError(reference).into());
    }
    xml.start("c", &[("r", reference.as_str())])?;
    xml.start("v", &[])?;
    xml.text(&number.to_string())?;
    xml.end("v")?;
    xml.end("c")
}

fn write_text(xml: &mut XmlWriter, row: usize, col: usize, text: &str) -> Result<(), CodecError> {
    let reference = index_to_reference(row, col);
    if text.chars().count() > MAX_CELL_CHARS {
        Err(SpreadsheetError::CellTooLongError(reference.to_owned()))?;
    }
    xml.start("c", &[("r", reference.as_str()), ("t", "inlineStr")])?;
    xml.start("is", &[])?;
    if text.trim() != text {
        xml.start("t", &[("xml:space", "preserve")])?;
    } else {
        xml.start("t", &[])?;
    }
    xml.text(text)?;
    xml.end("t")?;
    xml.end("is")?;
    xml.end("c")
}
