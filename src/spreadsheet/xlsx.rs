use crate::error::ExcelFilterError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::reshape::Row;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");   // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr");
const TAG_SHEET: QName = QName(b"sheet");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_INLINE_STRING: QName = QName(b"is");
const TAG_VALUE: QName = QName(b"v");
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Represents an Excel XLSX spreadsheet file
pub(crate) struct XlsxSpreadsheet<RS: Read + Seek> {
    /// File name of the spreadsheet
    pub(crate) name: String,
    /// ZIP archive containing the XLSX file contents
    zip: ZipArchive<RS>,
    /// Parsed number formats for date detection, indexed by style id
    number_formats: Vec<CellType>,
    /// Worksheets in workbook order as (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl<RS: Read + Seek> XlsxSpreadsheet<RS> {
    /// Opens an XLSX package and parses its workbook structure and styles
    pub(crate) fn open(file_name: &str, reader: RS) -> Result<XlsxSpreadsheet<RS>, ExcelFilterError> {
        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(file_name.to_owned()))?
        }
        let number_formats = load_number_formats(&mut zip, is_1904)?;
        Ok(XlsxSpreadsheet {
            name: file_name.to_owned(),
            zip,
            number_formats,
            sheets,
        })
    }

    /// Loads the whole shared string table; a package without one has no shared strings
    fn load_shared_strings(&mut self) -> Result<Vec<String>, ExcelFilterError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }
}

impl<RS: Read + Seek> Spreadsheet for XlsxSpreadsheet<RS> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads the first worksheet in workbook order.
    ///
    /// Error cells are read as empty; a cell without an `r` attribute takes
    /// the next position in its row.
    fn read_first_sheet(&mut self) -> Result<Vec<Row>, ExcelFilterError> {
        let (sheet_name, zip_path) = self.sheets[0].to_owned();
        let shared_strings = self.load_shared_strings()?;

        let mut sheet = Sheet::new(&self.name, &sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self.zip
            .xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(number) = event.parse_attribute_value::<usize>("r")? {
                    row_count = number.saturating_sub(1);
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                value.clear();
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "d" => CellType::IsoDateTime,
                        "b" => CellType::Boolean,
                        "e" => CellType::Error,
                        _ => CellType::Number,
                    }
                }).unwrap_or(CellType::Number);
                if let Some(format_id) = event.get_attribute_value("s")? {
                    if kind == CellType::Number && !format_id.is_empty() {
                        let index = format_id.parse::<usize>()?;
                        kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if kind != CellType::Error && !value.is_empty() {
                    sheet.push(Cell {
                        row,
                        col,
                        kind,
                        value: value.to_owned(),
                    });
                }
                value.clear();
            },
        });

        Ok(sheet.into_rows(&shared_strings)?)
    }
}

/// Loads worksheet names and part paths from `xl/workbook.xml`, plus the date system
fn load_workbook<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<(Vec<(String, String)>, bool), ExcelFilterError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Maps worksheet relationship ids to part paths inside the package
fn load_relationships<RS: Read + Seek>(zip: &mut ZipArchive<RS>, path: &str) -> Result<HashMap<String, String>, ExcelFilterError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads the style table from `xl/styles.xml` as one `CellType` per cell format index
fn load_number_formats<RS: Read + Seek>(zip: &mut ZipArchive<RS>, is_1904: bool) -> Result<Vec<CellType>, ExcelFilterError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }
        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => break,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let id = event.get_attribute_value("numFmtId")?.unwrap_or(Cow::Borrowed("0"));
            format_indexes.push(id.to_string());
        }
    });

    Ok(format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect())
}

/// Normalizes a relationship target to a path inside the package
pub(crate) fn to_zip_path(path: &str) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Reads string content up to `end_tag`, skipping phonetic runs.
/// `is_text_content` treats bare text as content (`<v>`); otherwise only `<t>` runs count.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, ExcelFilterError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::zip::ZipWriterHelper;
    use crate::reshape::Value;
    use std::io::Cursor;
    use zip::ZipWriter;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr date1904="false"/>
<sheets><sheet name="Данные" sheetId="1" r:id="rId3"/><sheet name="Other" sheetId="2" r:id="rId4"/></sheets>
</workbook>"#;

    const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
</Relationships>"#;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="dd\.mm\.yyyy"/></numFmts>
<cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs>
<cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="164"/><xf numFmtId="4"/></cellXfs>
</styleSheet>"#;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
<si><t>УТ-00012</t></si>
<si><r><t>Поступление </t></r><r><t>15.07.2024</t></r><rPh><t>ignored</t></rPh></si>
<si><t xml:space="preserve"> Tom &amp; Jerry </t></si>
</sst>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="D1"><v>5</v></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>inline</t></is></c><c r="B3" s="1"><v>45488</v></c><c r="C3" t="b"><v>1</v></c><c r="D3" t="e"><v>#N/A</v></c></row>
<row r="4"><c t="s"><v>2</v></c><c s="2"><v>2.5</v></c></row>
</sheetData></worksheet>"#;

    fn package(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.write_part(name, content.as_bytes()).unwrap();
        }
        Cursor::new(writer.finish().unwrap().into_inner())
    }

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    #[test]
    fn test_to_zip_path() {
        assert_eq!(to_zip_path("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path("/xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path("xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn test_open_reads_workbook_structure() {
        let reader = package(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
            ("xl/styles.xml", STYLES),
        ]);
        let spreadsheet = XlsxSpreadsheet::open("book.xlsx", reader).unwrap();
        assert_eq!(spreadsheet.name(), "book.xlsx");
        assert_eq!(spreadsheet.sheets, vec![
            ("Данные".to_owned(), "xl/worksheets/sheet1.xml".to_owned()),
            ("Other".to_owned(), "xl/worksheets/sheet2.xml".to_owned()),
        ]);
        assert_eq!(spreadsheet.number_formats, vec![
            CellType::Number,
            CellType::NumberDateTime1900,
            CellType::Number,
        ]);
    }

    #[test]
    fn test_read_first_sheet() {
        let reader = package(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
            ("xl/styles.xml", STYLES),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let mut spreadsheet = XlsxSpreadsheet::open("book.xlsx", reader).unwrap();
        let rows = spreadsheet.read_first_sheet().unwrap();

        let date = chrono::NaiveDate::from_ymd_opt(2024, 7, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(rows, vec![
            vec![text("УТ-00012"), text("Поступление 15.07.2024"), Value::Empty, Value::Number(5.0)],
            vec![Value::Empty, Value::Empty, Value::Empty, Value::Empty],
            vec![text("inline"), Value::DateTime(date), Value::Boolean(true), Value::Empty],
            vec![text(" Tom & Jerry "), Value::Number(2.5), Value::Empty, Value::Empty],
        ]);
    }

    #[test]
    fn test_open_without_workbook_fails() {
        let reader = package(&[("xl/_rels/workbook.xml.rels", RELATIONSHIPS)]);
        let error = XlsxSpreadsheet::open("book.xlsx", reader).err().unwrap();
        assert_eq!(error.to_string(), "Missing part 'xl/workbook.xml' in spreadsheet package");
    }

    #[test]
    fn test_open_without_sheets_fails() {
        let workbook = r#"<workbook><sheets/></workbook>"#;
        let reader = package(&[
            ("xl/workbook.xml", workbook),
            ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
        ]);
        let error = XlsxSpreadsheet::open("book.xlsx", reader).err().unwrap();
        assert_eq!(error.to_string(), "Spreadsheet 'book.xlsx' contains no sheets");
    }
}
