//! XML reading and writing utilities for the spreadsheet packages.
//! Wraps quick-xml with the configuration the xlsx and ods parts need.

use crate::error::ExcelFilterError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute value '{0}' failed")]
    ParseAttributeValueError(String),
}

/// XML reader wrapper configured for spreadsheet parts
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Reads the next XML event, `None` at end of document
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, ExcelFilterError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(ExcelFilterError::XmlError(error)),
        }
    }
}

/// Helper trait for XML attributes providing convenient value extraction and parsing
pub(crate) trait XmlAttributeHelper<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, ExcelFilterError>;

    fn parse_value<T: FromStr>(&self) -> Result<T, ExcelFilterError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, ExcelFilterError> {
        Ok(self.unescape_value()?)
    }

    fn parse_value<T: FromStr>(&self) -> Result<T, ExcelFilterError> {
        let value = self.get_value()?;
        value
            .parse()
            .map_err(|_| XmlError::ParseAttributeValueError(value.to_string()).into())
    }
}

/// Helper trait for XML start tags providing attribute access by name
pub(crate) trait XmlNodeHelper<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ExcelFilterError>;

    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, ExcelFilterError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ExcelFilterError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.get_value())
            .transpose()
    }

    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, ExcelFilterError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.parse_value())
            .transpose()
    }
}

/// Helper trait for building text content from XML events
pub(crate) trait XmlTextContextHelper {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), ExcelFilterError>;

    /// Appends an entity or character reference (`&amp;`, `&#x41;`)
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ExcelFilterError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), ExcelFilterError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ExcelFilterError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = if let Some(hex) = number.strip_prefix('x') {
                u32::from_str_radix(hex, 16)?
            } else {
                number.parse::<u32>()?
            };
            if let Some(character) = std::char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }

        Ok(())
    }
}

/// Thin builder over quick-xml's writer for the parts of an xlsx package
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Starts a document with the standalone UTF-8 declaration Excel expects
    pub(crate) fn new() -> Result<XmlWriter, ExcelFilterError> {
        let mut writer = Writer::new(Vec::with_capacity(4096));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(XmlWriter { writer })
    }

    pub(crate) fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), ExcelFilterError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    pub(crate) fn end(&mut self, tag: &str) -> Result<(), ExcelFilterError> {
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), ExcelFilterError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Writes `<tag ...>text</tag>` with the text escaped
    pub(crate) fn text(&mut self, tag: &str, attributes: &[(&str, &str)], text: &str) -> Result<(), ExcelFilterError> {
        self.start(tag, attributes)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}
