//! ZIP archive helpers shared by the xlsx and ods readers and the xlsx writer

use crate::error::ExcelFilterError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;

/// Helper trait for reading parts out of a package
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a file from the ZIP archive by name (case-insensitive, path separator agnostic)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, ExcelFilterError>;

    /// Creates an XML reader for a file within the ZIP archive
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, ExcelFilterError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, ExcelFilterError> {
        let pattern = name.replace('\\', "/");
        let path = self.file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(file_name))
            .map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(Some(file)) => Ok(Some(file)),
            Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, ExcelFilterError> {
        let reader = self
            .file(name)?
            .map(|file| XmlReader::new(BufReader::new(file)));
        Ok(reader)
    }
}

/// Helper trait for adding parts to a package
pub(crate) trait ZipWriterHelper {
    /// Adds a deflated entry holding `content`
    fn write_part(&mut self, name: &str, content: &[u8]) -> Result<(), ExcelFilterError>;
}

impl<W: Write + Seek> ZipWriterHelper for ZipWriter<W> {
    fn write_part(&mut self, name: &str, content: &[u8]) -> Result<(), ExcelFilterError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.start_file(name, options)?;
        self.write_all(content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_part_lookup_is_case_insensitive() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.write_part("xl/Workbook.xml", b"<workbook/>").unwrap();
        let cursor = writer.finish().unwrap();

        let mut zip = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let mut content = String::new();
        zip.file("XL\\workbook.xml").unwrap().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "<workbook/>");
        assert!(zip.file("xl/styles.xml").unwrap().is_none());
        assert!(zip.xml_reader("xl/styles.xml").unwrap().is_none());
    }
}
