use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::{
    csv_parser::CsvParser,
    error::Result,
    format::Format,
    json_parser::JsonParser,
    record::{ParseResult, RecordSet},
    xml_parser::XmlParser,
};

/// A format-specific reader turning one file into a [`RecordSet`].
pub trait RecordParser {
    fn format(&self) -> Format;

    /// Parses `path` and keeps the format/source metadata alongside the records.
    fn parse_document(&self, path: &Path) -> Result<ParseResult>;

    fn parse(&self, path: &Path) -> Result<RecordSet> {
        self.parse_document(path).map(|result| result.records)
    }
}

/// Knobs that only some parsers consume; the rest ignore them.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn parser_for(format: Format, options: &ParserOptions) -> Box<dyn RecordParser> {
    match format {
        Format::Csv => Box::new(CsvParser::new(options.delimiter, options.encoding)),
        Format::Json => Box::new(JsonParser),
        Format::Xml => Box::new(XmlParser),
    }
}
