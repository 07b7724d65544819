use excel_filter::config::Config;
use excel_filter::error::ErrorKind;
use excel_filter::reshape::Value;
use excel_filter::run;
use excel_filter::spreadsheet::load;
use excel_filter::spreadsheet::output::Header;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

/// Writes a one-sheet workbook with the given text cells, no header row.
fn write_input(path: &Path, rows: &[&[&str]]) {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row, cells) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, row + 1));
        for (col, text) in cells.iter().enumerate() {
            let column = (b'A' + col as u8) as char;
            sheet.push_str(&format!(r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#, column, row + 1, text));
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELATIONSHIPS),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ] {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn text(value: &str) -> Value {
    Value::from(value)
}

#[test]
fn test_run_three_rows() {
    let directory = tempfile::tempdir().unwrap();
    let config = Config::new(directory.path().join("data_2.xlsx"), directory.path().join("converted.xlsx"));
    write_input(&config.input_path, &[
        &["УТ-1", "Поступление 01.01.2023", "text"],
        &["2.123-456", "foo"],
        &["bar", "baz"],
    ]);

    let summary = run(&config).unwrap();
    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_retained, 2);
    assert_eq!(summary.removed_column, None);

    let receipt = text("Поступление 01.01.2023");
    let output = load(&config.output_path).unwrap();
    assert_eq!(output, vec![
        vec![
            Value::Number(0.0),
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
            Value::Number(4.0),
            text("Code"),
            text("Month_Year"),
        ],
        vec![receipt.clone(), text("text"), Value::Empty, Value::Empty, Value::Empty, Value::Empty, text("01.2023")],
        vec![receipt, text("bar"), text("baz"), Value::Empty, Value::Empty, Value::Empty, Value::Empty],
    ]);
}

#[test]
fn test_run_removes_marker_column() {
    let directory = tempfile::tempdir().unwrap();
    let config = Config::new(directory.path().join("in.xlsx"), directory.path().join("out.xlsx"));
    write_input(&config.input_path, &[
        &["Поступление 15.07.2024", "Товар А 1.111-222", "УТ-5"],
        &["Товар Б"],
    ]);

    let summary = run(&config).unwrap();
    assert_eq!(summary.rows_retained, 2);
    assert_eq!(summary.removed_column, Some(Header::Position(4)));

    let receipt = text("Поступление 15.07.2024");
    let output = load(&config.output_path).unwrap();
    assert_eq!(output, vec![
        vec![Value::Number(0.0), Value::Number(1.0), Value::Number(2.0), Value::Number(3.0), text("Code"), text("Month_Year")],
        vec![receipt.clone(), text("Товар А 1.111-222"), Value::Empty, Value::Empty, text("1.111-222"), text("07.2024")],
        vec![receipt, text("Товар Б"), Value::Empty, Value::Empty, Value::Empty, Value::Empty],
    ]);
    assert!(output.iter().flatten().all(|cell| !cell.to_string().contains("УТ")));
}

#[test]
fn test_run_missing_input() {
    let directory = tempfile::tempdir().unwrap();
    let config = Config::new(directory.path().join("absent.xlsx"), directory.path().join("out.xlsx"));

    let error = run(&config).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::FileAccess);
    assert!(!config.output_path.exists());
}

#[test]
fn test_run_invalid_input() {
    let directory = tempfile::tempdir().unwrap();
    let config = Config::new(directory.path().join("broken.xlsx"), directory.path().join("out.xlsx"));
    std::fs::write(&config.input_path, "not a workbook\n".repeat(8)).unwrap();

    let error = run(&config).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Format);
    assert!(!config.output_path.exists());
}

#[test]
fn test_run_unwritable_output() {
    let directory = tempfile::tempdir().unwrap();
    let config = Config::new(directory.path().join("in.xlsx"), directory.path().join("no").join("out.xlsx"));
    write_input(&config.input_path, &[&["Товар"]]);

    let error = run(&config).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::FileAccess);
}
