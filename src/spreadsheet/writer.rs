//! Minimal Office Open XML writer: one worksheet, inline strings, a bold header row.

use crate::error::ExcelFilterError;
use crate::helpers::xml::XmlWriter;
use crate::helpers::zip::ZipWriterHelper;
use crate::reshape::Value;
use crate::spreadsheet::cell::datetime_to_serial;
use crate::spreadsheet::output::Header;
use crate::spreadsheet::output::OutputTable;
use crate::spreadsheet::reference::index_to_reference;
use chrono::SecondsFormat;
use chrono::Utc;
use std::io::Cursor;
use zip::ZipWriter;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const SHEET_NAME: &str = "Sheet1";
const CREATOR: &str = "excel_filter";

/// Cell format indexes into `cellXfs` of the generated styles part
const STYLE_DEFAULT: &str = "0";
const STYLE_HEADER: &str = "1";
const STYLE_DATE_TIME: &str = "2";
const DATE_TIME_FORMAT_ID: &str = "164";
const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Serializes the table into the bytes of an `.xlsx` package.
pub(crate) fn write_workbook(table: &OutputTable) -> Result<Vec<u8>, ExcelFilterError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.write_part("[Content_Types].xml", &content_types()?)?;
    zip.write_part("_rels/.rels", &package_relationships()?)?;
    zip.write_part("docProps/core.xml", &core_properties()?)?;
    zip.write_part("xl/workbook.xml", &workbook()?)?;
    zip.write_part("xl/_rels/workbook.xml.rels", &workbook_relationships()?)?;
    zip.write_part("xl/styles.xml", &styles()?)?;
    zip.write_part("xl/worksheets/sheet1.xml", &worksheet(table)?)?;
    Ok(zip.finish()?.into_inner())
}

fn content_types() -> Result<Vec<u8>, ExcelFilterError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty("Default", &[
        ("Extension", "rels"),
        ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
    ])?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    for (part, content_type) in [
        ("/xl/workbook.xml", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"),
        ("/xl/worksheets/sheet1.xml", "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"),
        ("/xl/styles.xml", "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
    ] {
        xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }
    xml.end("Types")?;
    Ok(xml.into_inner())
}

fn package_relationships() -> Result<Vec<u8>, ExcelFilterError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    xml.empty("Relationship", &[
        ("Id", "rId1"),
        ("Type", "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument"),
        ("Target", "xl/workbook.xml"),
    ])?;
    xml.empty("Relationship", &[
        ("Id", "rId2"),
        ("Type", "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"),
        ("Target", "docProps/core.xml"),
    ])?;
    xml.end("Relationships")?;
    Ok(xml.into_inner())
}

fn core_properties() -> Result<Vec<u8>, ExcelFilterError> {
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = XmlWriter::new()?;
    xml.start("cp:coreProperties", &[
        ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ("xmlns:dcterms", "http://purl.org/dc/terms/"),
        ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ])?;
    xml.text("dc:creator", &[], CREATOR)?;
    xml.text("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.into_inner())
}

fn workbook() -> Result<Vec<u8>, ExcelFilterError> {
    let mut xml = XmlWriter::new()?;
    xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    xml.start("sheets", &[])?;
    xml.empty("sheet", &[("name", SHEET_NAME), ("sheetId", "1"), ("r:id", "rId1")])?;
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.into_inner())
}

fn workbook_relationships() -> Result<Vec<u8>, ExcelFilterError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    xml.empty("Relationship", &[
        ("Id", "rId1"),
        ("Type", "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet"),
        ("Target", "worksheets/sheet1.xml"),
    ])?;
    xml.empty("Relationship", &[
        ("Id", "rId2"),
        ("Type", "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"),
        ("Target", "styles.xml"),
    ])?;
    xml.end("Relationships")?;
    Ok(xml.into_inner())
}

/// Styles: default, header (bold, thin border, centred), date-time.
fn styles() -> Result<Vec<u8>, ExcelFilterError> {
    let mut xml = XmlWriter::new()?;
    xml.start("styleSheet", &[("xmlns", NS_MAIN)])?;

    xml.start("numFmts", &[("count", "1")])?;
    xml.empty("numFmt", &[("numFmtId", DATE_TIME_FORMAT_ID), ("formatCode", DATE_TIME_FORMAT)])?;
    xml.end("numFmts")?;

    xml.start("fonts", &[("count", "2")])?;
    for bold in [false, true] {
        xml.start("font", &[])?;
        if bold {
            xml.empty("b", &[])?;
        }
        xml.empty("sz", &[("val", "11")])?;
        xml.empty("name", &[("val", "Calibri")])?;
        xml.end("font")?;
    }
    xml.end("fonts")?;

    xml.start("fills", &[("count", "2")])?;
    for pattern in ["none", "gray125"] {
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", pattern)])?;
        xml.end("fill")?;
    }
    xml.end("fills")?;

    xml.start("borders", &[("count", "2")])?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom", "diagonal"] {
        xml.empty(side, &[])?;
    }
    xml.end("border")?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom"] {
        xml.start(side, &[("style", "thin")])?;
        xml.empty("color", &[("auto", "1")])?;
        xml.end(side)?;
    }
    xml.empty("diagonal", &[])?;
    xml.end("border")?;
    xml.end("borders")?;

    xml.start("cellStyleXfs", &[("count", "1")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
    xml.end("cellStyleXfs")?;

    xml.start("cellXfs", &[("count", "3")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0"), ("xfId", "0")])?;
    xml.start("xf", &[
        ("numFmtId", "0"),
        ("fontId", "1"),
        ("fillId", "0"),
        ("borderId", "1"),
        ("xfId", "0"),
        ("applyFont", "1"),
        ("applyBorder", "1"),
        ("applyAlignment", "1"),
    ])?;
    xml.empty("alignment", &[("horizontal", "center"), ("vertical", "top")])?;
    xml.end("xf")?;
    xml.empty("xf", &[
        ("numFmtId", DATE_TIME_FORMAT_ID),
        ("fontId", "0"),
        ("fillId", "0"),
        ("borderId", "0"),
        ("xfId", "0"),
        ("applyNumberFormat", "1"),
    ])?;
    xml.end("cellXfs")?;

    xml.start("cellStyles", &[("count", "1")])?;
    xml.empty("cellStyle", &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")])?;
    xml.end("cellStyles")?;

    xml.end("styleSheet")?;
    Ok(xml.into_inner())
}

/// Header row first, then one row per table row. Empty cells are omitted.
fn worksheet(table: &OutputTable) -> Result<Vec<u8>, ExcelFilterError> {
    let mut xml = XmlWriter::new()?;
    xml.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    xml.start("sheetData", &[])?;

    xml.start("row", &[("r", "1")])?;
    for (col, header) in table.headers.iter().enumerate() {
        let reference = index_to_reference(0, col);
        match header {
            Header::Position(position) => write_number(&mut xml, &reference, STYLE_HEADER, *position as f64)?,
            Header::Name(name) => write_text(&mut xml, &reference, STYLE_HEADER, name)?,
        }
    }
    xml.end("row")?;

    for (index, record) in table.rows.iter().enumerate() {
        let row = index + 1;
        xml.start("row", &[("r", &(row + 1).to_string())])?;
        for (col, value) in record.iter().enumerate() {
            let reference = index_to_reference(row, col);
            match value {
                Value::Empty => (),
                Value::Text(text) => write_text(&mut xml, &reference, STYLE_DEFAULT, text)?,
                Value::Number(number) if number.is_finite() => write_number(&mut xml, &reference, STYLE_DEFAULT, *number)?,
                Value::Number(_) => (),
                Value::Boolean(flag) => {
                    xml.start("c", &[("r", &reference), ("t", "b")])?;
                    xml.text("v", &[], if *flag { "1" } else { "0" })?;
                    xml.end("c")?;
                }
                Value::DateTime(datetime) => {
                    write_number(&mut xml, &reference, STYLE_DATE_TIME, datetime_to_serial(datetime))?
                }
            }
        }
        xml.end("row")?;
    }

    xml.end("sheetData")?;
    xml.end("worksheet")?;
    Ok(xml.into_inner())
}

fn write_text(xml: &mut XmlWriter, reference: &str, style: &str, text: &str) -> Result<(), ExcelFilterError> {
    xml.start("c", &[("r", reference), ("s", style), ("t", "inlineStr")])?;
    xml.start("is", &[])?;
    xml.text("t", &[("xml:space", "preserve")], text)?;
    xml.end("is")?;
    xml.end("c")
}

fn write_number(xml: &mut XmlWriter, reference: &str, style: &str, number: f64) -> Result<(), ExcelFilterError> {
    xml.start("c", &[("r", reference), ("s", style)])?;
    xml.text("v", &[], &number.to_string())?;
    xml.end("c")
}
