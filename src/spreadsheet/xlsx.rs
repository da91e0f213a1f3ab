use crate::error::CodecError;
use crate::error::ResultMessage;
use crate::helpers::xml::attribute_value;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::options::LoadOptions;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::DateSystem;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::reference::MAX_COLS;
use crate::spreadsheet::reference::MAX_ROWS;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_RELATIONSHIP: &[u8] = b"Relationship";        // Package relationship
const TAG_CUSTOM_FORMATS: &[u8] = b"numFmts";           // Custom number formats container
const TAG_CUSTOM_FORMAT: &[u8] = b"numFmt";             // Individual custom number format
const TAG_FORMAT_INDEXES: &[u8] = b"cellXfs";           // Cell format indexes container
const TAG_FORMAT_INDEX: &[u8] = b"xf";                  // Individual cell format index
const TAG_SHARED_STRING_ITEM: &[u8] = b"si";            // Shared string table item
const TAG_PHONETIC_TEXT: &[u8] = b"rPh";                // Phonetic text for Asian languages
const TAG_TEXT: &[u8] = b"t";                           // Text content within strings
const TAG_WORKBOOK_PROPERTIES: &[u8] = b"workbookPr";   // Workbook properties
const TAG_SHEET: &[u8] = b"sheet";                      // Worksheet definition
const TAG_ROW: &[u8] = b"row";                          // Row in worksheet
const TAG_CELL: &[u8] = b"c";                           // Cell in worksheet
const TAG_INLINE_STRING: &[u8] = b"is";                 // Inline string value
const TAG_VALUE: &[u8] = b"v";                          // Cell value content

/// Signature of OLE compound files, used by encrypted packages and legacy workbooks
const CFB_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// An Excel XLSX workbook held in memory
pub(crate) struct XlsxSpreadsheet<'a> {
    /// File name of the spreadsheet
    name: String,
    /// ZIP archive containing the XLSX file contents
    zip: ZipArchive<Cursor<&'a [u8]>>,
    /// Parsed number formats for cell type detection, indexed by style id
    number_formats: Vec<CellType>,
    /// Worksheets in workbook order as (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl<'a> XlsxSpreadsheet<'a> {
    /// Opens an XLSX package and parses its workbook structure
    ///
    /// # Arguments
    /// * `name` - File name used in messages
    /// * `content` - Raw bytes of the package
    ///
    /// # Returns
    /// The opened spreadsheet, or an error for encrypted, corrupt or sheetless packages
    pub(crate) fn open(name: &str, content: &'a [u8]) -> Result<XlsxSpreadsheet<'a>, CodecError> {
        if content.starts_with(CFB_SIGNATURE) {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(name.to_owned()))?;
        }

        let mut zip = ZipArchive::new(Cursor::new(content))?;
        let (sheets, system) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?;
        }

        let number_formats = load_number_formats(&mut zip, system)?;
        Ok(XlsxSpreadsheet {
            name: name.to_owned(),
            zip,
            number_formats,
            sheets,
        })
    }

    /// Loads the shared string table; a package without one has no shared strings
    fn load_shared_strings(&mut self) -> Result<Vec<String>, CodecError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }
}

impl Spreadsheet for XlsxSpreadsheet<'_> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads the first worksheet in workbook order
    ///
    /// Cells are typed from their `t` attribute and, for plain numbers, from the
    /// number format of their style; shared strings are resolved on the way.
    fn read_sheet(&mut self, options: &LoadOptions) -> Result<Sheet, CodecError> {
        let shared_strings = self.load_shared_strings().with_prefix("xl/sharedStrings.xml")?;
        let (sheet_name, zip_path) = self.sheets[0].clone();
        let number_formats = &self.number_formats;
        let mut sheet = Sheet::new(&self.name, &sheet_name);
        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;

        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_ROW => {
                if let Some(index) = event.get_attribute_value("r")? {
                    row_count = index
                        .parse::<usize>()
                        .ok()
                        .filter(|index| (1..=MAX_ROWS).contains(index))
                        .map(|index| index - 1)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(index.to_string()))?;
                }
                col_count = 0;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_ROW => {
                row_count += 1;
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_CELL => {
                (row, col) = match event.get_attribute_value("r")? {
                    Some(reference) => reference_to_index(&reference)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(reference.to_string()))?,
                    None if row_count < MAX_ROWS && col_count < MAX_COLS => (row_count, col_count),
                    None => Err(SpreadsheetError::CellReferenceError(index_to_reference(row_count, col_count)))?,
                };
                col_count = col + 1;
                value.clear();
                kind = match event.get_attribute_value("t")?.as_deref() {
                    Some("inlineStr") | Some("str") => CellType::Text,
                    Some("s") => CellType::SharedString,
                    Some("d") => CellType::IsoDateTime,
                    Some("b") => CellType::Boolean,
                    Some("e") if options.error_as_null => CellType::Empty,
                    Some("e") => CellType::Error,
                    _ => CellType::Number,
                };
                if let Some(format_id) = event.get_attribute_value("s")? {
                    if kind == CellType::Number && !format_id.is_empty() {
                        let index = format_id.parse::<usize>()?;
                        kind = number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.local_name().as_ref() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.local_name().as_ref() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    if kind == CellType::SharedString {
                        let index = value.trim().parse::<usize>()?;
                        value = shared_strings
                            .get(index)
                            .cloned()
                            .ok_or_else(|| SpreadsheetError::CellValueError(
                                index_to_reference(row, col),
                                value.to_owned(),
                            ))?;
                        kind = CellType::Text;
                    }
                    if !value.is_empty() {
                        sheet.push(Cell {
                            row,
                            col,
                            kind,
                            value: std::mem::take(&mut value),
                        });
                    }
                }
                kind = CellType::Empty;
            }
        });
        Ok(sheet)
    }
}

/// Loads worksheet relationships of the workbook
///
/// # Returns
/// Mapping of relationship ids to worksheet paths inside the archive
fn load_relationships<RS: Read + Seek>(zip: &mut ZipArchive<RS>, path: &str) -> Result<HashMap<String, String>, CodecError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only process worksheet relationships
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads worksheet names and paths in workbook order, and the date system in use
fn load_workbook<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<(Vec<(String, String)>, DateSystem), CodecError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut system = DateSystem::Excel1900;
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute_value(&attribute)?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute_value(&attribute)?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_WORKBOOK_PROPERTIES => {
            let is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
            if is_1904 {
                system = DateSystem::Excel1904;
            }
        }
    });
    Ok((sheets, system))
}

/// Loads the cell type implied by each cell style
///
/// Custom number formats come from `numFmts`; each `xf` of `cellXfs` points at a
/// custom or built-in format id.
fn load_number_formats<RS: Read + Seek>(zip: &mut ZipArchive<RS>, system: DateSystem) -> Result<Vec<CellType>, CodecError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.local_name().as_ref() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.local_name().as_ref() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, system));
            }
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.local_name().as_ref() == TAG_FORMAT_INDEXES => format_indexes_context = false,
        Event::Start(event) if format_indexes_context && event.local_name().as_ref() == TAG_FORMAT_INDEX => {
            format_indexes.push(event.get_attribute_value("numFmtId")?.unwrap_or(Cow::Borrowed("0")).to_string());
        }
    });

    Ok(format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, system))
                .unwrap_or(CellType::Number)
        })
        .collect())
}

/// Normalizes a relationship target to a path inside the archive
fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(path) = path.strip_prefix('/') {
        path.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Reads the text of a string element, skipping phonetic runs
///
/// # Arguments
/// * `reader` - XML reader positioned just after the opening tag
/// * `end_tag` - Local name of the tag that closes the string content
/// * `is_text_content` - Whether text directly under the element counts (for `<v>`)
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: &[u8],
    is_text_content: bool,
) -> Result<String, CodecError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.local_name().as_ref() == end_tag => break,
        Event::Start(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.local_name().as_ref() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.local_name().as_ref() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::zip::ZipWriterHelper;
    use crate::table::ColumnType;
    use crate::table::Value;
    use zip::ZipWriter;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr date1904="false"/>
<sheets><sheet name="Data" sheetId="2" r:id="rId2"/><sheet name="Other" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd"/></numFmts>
<cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="164"/><xf numFmtId="22"/></cellXfs>
</styleSheet>"#;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<si><t>id</t></si>
<si><r><t>na</t></r><r><t>me</t></r><rPh><t>ナメ</t></rPh></si>
<si><t>when</t></si>
<si><t>Tom &amp; Jerry</t></si>
</sst>"#;

    const DATA_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="2"><c r="B2" t="s"><v>0</v></c><c r="C2" t="s"><v>1</v></c><c r="D2" t="s"><v>2</v></c><c r="E2" t="inlineStr"><is><t>ok</t></is></c></row>
<row r="3"><c r="B3"><v>1</v></c><c r="C3" t="s"><v>3</v></c><c r="D3" s="1"><v>45292</v></c><c r="E3" t="b"><v>1</v></c></row>
<row r="5"><c r="B5"><f>1+1</f><v>2</v></c><c r="C5" t="str"><v>formula</v></c><c r="D5" s="2"><v>45292.5</v></c><c r="E5" t="e"><v>#DIV/0!</v></c></row>
</sheetData>
</worksheet>"#;

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.write_part(name, content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn workbook() -> Vec<u8> {
        workbook_with(DATA_SHEET)
    }

    fn workbook_with(data_sheet: &str) -> Vec<u8> {
        package(&[
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/styles.xml", STYLES),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/sheet1.xml", "<worksheet><sheetData/></worksheet>"),
            ("xl/worksheets/sheet2.xml", data_sheet),
        ])
    }

    #[test]
    fn open_workbook_structure() -> Result<(), CodecError> {
        let content = workbook();
        let spreadsheet = XlsxSpreadsheet::open("book.xlsx", &content)?;
        assert_eq!(spreadsheet.name(), "book.xlsx");
        assert_eq!(spreadsheet.sheets, vec![
            ("Data".to_owned(), "xl/worksheets/sheet2.xml".to_owned()),
            ("Other".to_owned(), "xl/worksheets/sheet1.xml".to_owned()),
        ]);
        assert_eq!(spreadsheet.number_formats, vec![
            CellType::Number,
            CellType::Date(DateSystem::Excel1900),
            CellType::DateTime(DateSystem::Excel1900),
        ]);
        Ok(())
    }

    #[test]
    fn read_first_sheet() -> Result<(), CodecError> {
        let content = workbook();
        let options = LoadOptions::default();
        let sheet = XlsxSpreadsheet::open("book.xlsx", &content)?.read_sheet(&options)?;
        assert_eq!(sheet.name, "Data");
        assert_eq!(sheet.row_lower_bound, Some(1));
        assert_eq!(sheet.col_lower_bound, Some(1));

        let table = sheet.to_table(&options.nulls)?;
        assert_eq!(table.column_names(), vec!["id", "name", "when", "ok"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("id").unwrap().kind(), ColumnType::Number);
        assert_eq!(table.column("id").unwrap().values(), &[Value::Number(1.0), Value::Null, Value::Number(2.0)]);
        assert_eq!(table.column("name").unwrap().values(), &[
            Value::Text("Tom & Jerry".to_owned()),
            Value::Null,
            Value::Text("formula".to_owned()),
        ]);
        assert_eq!(table.column("when").unwrap().values(), &[
            Value::Text("2024-01-01".to_owned()),
            Value::Null,
            Value::Text("2024-01-01 12:00:00".to_owned()),
        ]);
        assert_eq!(table.column("ok").unwrap().values(), &[
            Value::Text("true".to_owned()),
            Value::Null,
            Value::Text("#DIV/0!".to_owned()),
        ]);
        Ok(())
    }

    #[test]
    fn read_error_cells_as_null() -> Result<(), CodecError> {
        let content = workbook();
        let options = LoadOptions { error_as_null: true, ..LoadOptions::default() };
        let table = XlsxSpreadsheet::open("book.xlsx", &content)?.read_sheet(&options)?.to_table(&options.nulls)?;
        assert_eq!(table.column("ok").unwrap().values()[2], Value::Null);
        Ok(())
    }

    #[test]
    fn reject_corrupt_packages() {
        assert!(XlsxSpreadsheet::open("junk.xlsx", b"not a zip").is_err());
        let mut encrypted = CFB_SIGNATURE.to_vec();
        encrypted.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            XlsxSpreadsheet::open("secret.xlsx", &encrypted),
            Err(CodecError::SpreadsheetError(SpreadsheetError::SpreadsheetPasswordProtectedError(_)))
        ));
        let content = package(&[("xl/workbook.xml", WORKBOOK)]);
        assert!(matches!(
            XlsxSpreadsheet::open("norels.xlsx", &content),
            Err(CodecError::SpreadsheetError(SpreadsheetError::FileError(_)))
        ));
    }

    #[test]
    fn reject_sheetless_workbook() {
        let content = package(&[
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/workbook.xml", "<workbook><sheets/></workbook>"),
        ]);
        assert!(matches!(
            XlsxSpreadsheet::open("empty.xlsx", &content),
            Err(CodecError::SpreadsheetError(SpreadsheetError::SpreadsheetEmptyError(_)))
        ));
    }

    #[test]
    fn read_prefixed_namespace() -> Result<(), CodecError> {
        let content = package(&[
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/workbook.xml", r#"<x:workbook xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><x:sheets><x:sheet name="Prefixed" sheetId="1" r:id="rId1"/></x:sheets></x:workbook>"#),
            ("xl/styles.xml", r#"<x:styleSheet xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:cellXfs count="1"><x:xf numFmtId="14"/></x:cellXfs></x:styleSheet>"#),
            ("xl/sharedStrings.xml", r#"<x:sst xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:si><x:t>count</x:t></x:si></x:sst>"#),
            ("xl/worksheets/sheet1.xml", r#"<x:worksheet xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:sheetData>
<x:row r="1"><x:c r="A1" t="s"><x:v>0</x:v></x:c><x:c r="B1" t="inlineStr"><x:is><x:t>when</x:t></x:is></x:c></x:row>
<x:row r="2"><x:c r="A2"><x:v>7</x:v></x:c><x:c r="B2" s="0"><x:v>45292</x:v></x:c></x:row>
</x:sheetData></x:worksheet>"#),
        ]);
        let options = LoadOptions::default();
        let sheet = XlsxSpreadsheet::open("prefixed.xlsx", &content)?.read_sheet(&options)?;
        assert_eq!(sheet.name, "Prefixed");

        let table = sheet.to_table(&options.nulls)?;
        assert_eq!(table.column_names(), vec!["count", "when"]);
        assert_eq!(table.column("count").unwrap().values(), &[Value::Number(7.0)]);
        assert_eq!(table.column("when").unwrap().values(), &[Value::Text("2024-01-01".to_owned())]);
        Ok(())
    }

    #[test]
    fn reject_references_outside_grid() {
        let options = LoadOptions::default();
        for cells in [
            r#"<row><c r="A1" t="inlineStr"><is><t>a</t></is></c><c r="A1000000000000000000"><v>1</v></c></row>"#,
            r#"<row><c r="A1" t="inlineStr"><is><t>a</t></is></c><c r="XFE1"><v>1</v></c></row>"#,
            r#"<row r="1048577"><c><v>1</v></c></row>"#,
            r#"<row r="99999999999999999999999"><c><v>1</v></c></row>"#,
        ] {
            let content = workbook_with(&format!("<worksheet><sheetData>{cells}</sheetData></worksheet>"));
            let result = XlsxSpreadsheet::open("huge.xlsx", &content).and_then(|mut spreadsheet| spreadsheet.read_sheet(&options));
            assert!(
                matches!(result, Err(CodecError::SpreadsheetError(SpreadsheetError::CellReferenceError(_)))),
                "accepted {cells}"
            );
        }
    }

    #[test]
    fn read_last_grid_cell() -> Result<(), CodecError> {
        let content = workbook_with(r#"<worksheet><sheetData><row r="1048576"><c r="XFD1048576"><v>1</v></c></row></sheetData></worksheet>"#);
        let sheet = XlsxSpreadsheet::open("edge.xlsx", &content)?.read_sheet(&LoadOptions::default())?;
        assert_eq!(sheet.row_upper_bound, Some(MAX_ROWS - 1));
        assert_eq!(sheet.col_upper_bound, Some(MAX_COLS - 1));
        Ok(())
    }

    #[test]
    fn zip_paths() {
        assert_eq!(to_zip_path(Cow::Borrowed("worksheets/sheet1.xml")), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path(Cow::Borrowed("/xl/worksheets/sheet1.xml")), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path(Cow::Borrowed("xl/worksheets/sheet1.xml")), "xl/worksheets/sheet1.xml");
    }
}
