use crate::error::ExcelFilterError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::reshape::Row;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

/// ODS file MIME type identifier
const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
/// XML element name for table (sheet)
const TABLE: QName = QName(b"table:table");
/// XML element name for table row
const TABLE_ROW: QName = QName(b"table:table-row");
/// XML element name for table cell
const TABLE_CELL: QName = QName(b"table:table-cell");
/// XML element name for covered table cell (merged cells)
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// XML element name for annotations (comments)
const ANNOTATION: QName = QName(b"office:annotation");
/// XML element name for paragraph text
const PARAGRAPH: QName = QName(b"text:p");
/// XML element name for string (space) text
const STRING: QName = QName(b"text:s");

/// ODS spreadsheet handler for reading OpenDocument Spreadsheet files
pub(crate) struct OdsSpreadsheet<RS: Read + Seek> {
    pub(crate) name: String,
    zip: ZipArchive<RS>,
}

impl<RS: Read + Seek> OdsSpreadsheet<RS> {
    /// Opens an ODS package and validates its MIME type and encryption state
    pub(crate) fn open(file_name: &str, reader: RS) -> Result<Self, ExcelFilterError> {
        let mut zip = ZipArchive::new(reader)?;
        check_mime(&mut zip)?;
        if is_password_protected(&mut zip)? {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(file_name.to_owned()))?;
        }
        Ok(OdsSpreadsheet {
            name: file_name.to_owned(),
            zip,
        })
    }
}

impl<RS: Read + Seek> Spreadsheet for OdsSpreadsheet<RS> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads the first `table:table` of `content.xml`.
    ///
    /// Repeated rows and columns are expanded only for cells that carry a value.
    fn read_first_sheet(&mut self) -> Result<Vec<Row>, ExcelFilterError> {
        let mut reader = self.zip
            .xml_reader("content.xml")?
            .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;

        let mut sheet_name = None::<String>;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TABLE => {
                let table_name = event.get_attribute_value("table:name")?.unwrap_or_default();
                sheet_name = Some(table_name.to_string());
                break;
            }
        });
        let sheet_name = sheet_name.ok_or_else(|| SpreadsheetError::SpreadsheetEmptyError(self.name.to_owned()))?;
        let mut sheet = Sheet::new(&self.name, &sheet_name);

        let mut row = 0usize;
        let mut col = 0usize;
        let mut row_count = 1usize;
        let mut col_count = 1usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut element_context = false; // reading paragraphs of a string cell
        let mut comment_context = false; // inside an annotation
        match_xml_events!(reader => {
            Event::End(event) if event.name() == TABLE => break,
            Event::Start(event) if event.name() == TABLE_ROW => {
                row_count = event.parse_attribute_value("table:number-rows-repeated")?.unwrap_or(1);
                col = 0;
            }
            Event::End(event) if event.name() == TABLE_ROW => {
                row += row_count;
            }
            Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                value.clear();
                col_count = event.parse_attribute_value::<usize>("table:number-columns-repeated")?.unwrap_or(1);
                let is_error = event.get_attribute_value("calcext:value-type")?
                    .map(|cow| cow == "error")
                    .unwrap_or(false);
                kind = match event.get_attribute_value("office:value-type")? {
                    Some(_) if is_error => CellType::Error,
                    Some(value_type) => match value_type.as_ref() {
                        "boolean" => CellType::Boolean,
                        "date" => CellType::IsoDateTime,
                        "time" => CellType::IsoDuration,
                        "string" => CellType::InlineString,
                        _ => CellType::Number,
                    },
                    None => CellType::Empty,
                };
                match kind {
                    CellType::InlineString => element_context = true,
                    CellType::Boolean => {
                        let flag = event.get_attribute_value("office:boolean-value")?
                            .map(|cow| cow != "false" && cow != "0")
                            .unwrap_or(false);
                        value.push_str(if flag { "1" } else { "0" });
                    }
                    CellType::IsoDateTime => if let Some(data) = event.get_attribute_value("office:date-value")? {
                        value.push_str(&data);
                    },
                    CellType::IsoDuration => if let Some(data) = event.get_attribute_value("office:time-value")? {
                        value.push_str(&data);
                    },
                    CellType::Number => if let Some(data) = event.get_attribute_value("office:value")? {
                        value.push_str(&data);
                    },
                    _ => (),
                }
            }
            Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                if kind != CellType::Empty && kind != CellType::Error && !value.is_empty() {
                    for row_offset in 0..row_count {
                        for col_offset in 0..col_count {
                            sheet.push(Cell {
                                row: row + row_offset,
                                col: col + col_offset,
                                kind,
                                value: value.to_owned(),
                            });
                        }
                    }
                }
                col += col_count;
                kind = CellType::Empty;
                element_context = false;
                comment_context = false;
            }
            Event::Start(event) if element_context && event.name() == ANNOTATION => comment_context = true,
            Event::End(event) if element_context && comment_context && event.name() == ANNOTATION => comment_context = false,
            Event::Start(event) if element_context && !comment_context && event.name() == PARAGRAPH => {
                if !value.is_empty() {
                    value.push('\n');
                }
            }
            Event::Start(event) if element_context && !comment_context && event.name() == STRING => {
                let count = event.parse_attribute_value("text:c")?.unwrap_or(1);
                for _ in 0..count {
                    value.push(' ');
                }
            }
            Event::Text(event) if element_context && !comment_context => value.push_bytes_text(&event)?,
            Event::GeneralRef(event) if element_context && !comment_context => value.push_bytes_ref(&event)?,
        });

        Ok(sheet.into_rows(&[])?)
    }
}

/// Validates the `mimetype` entry when the package carries one
fn check_mime<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<(), ExcelFilterError> {
    if let Some(file) = &mut zip.file("mimetype")? {
        let mut buffer = Vec::with_capacity(MIME_TYPE.len());
        file.read_to_end(&mut buffer)?;
        if buffer.as_slice() != MIME_TYPE {
            Err(SpreadsheetError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// Checks the manifest for encryption data on any entry
fn is_password_protected<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<bool, ExcelFilterError> {
    let mut reader = match zip.xml_reader("META-INF/manifest.xml")? {
        Some(reader) => reader,
        None => return Ok(false),
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == QName(b"manifest:file-entry") => in_file_entry = true,
        Event::Start(event) if in_file_entry && event.name() == QName(b"manifest:encryption-data") => {
            return Ok(true);
        }
    });
    Ok(false)
}
