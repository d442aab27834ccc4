//! Markup parser: each child of the document root is a record, and each child of a record
//! element is a field named by its tag and valued by its text.
//!
//! Only that one level is unwrapped. A field's value is the text that precedes its first
//! child element (`null` when there is none); deeper elements, attributes and tail text are
//! dropped. A tag repeated inside one record overwrites the earlier value.
//!
//! Field names are the tag names as written, namespace prefix included (`x:a`); prefixes are
//! not resolved to their namespace URI.
//!
//! Entities: the predefined XML entities and character references are expanded, as are
//! general entities declared with a literal value in the DOCTYPE internal subset (their
//! replacement text is inserted verbatim). External and parameter entities are not loaded,
//! so a reference to one is a malformed-XML error.

use std::{collections::HashMap, fmt, path::Path};

use log::{error, info};
use quick_xml::{Reader, escape::resolve_predefined_entity, events::Event};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::Format,
    io_utils,
    parser::RecordParser,
    record::{ParseResult, Record, RecordSet},
};

const ROOT_DEPTH: usize = 0;
const RECORD_DEPTH: usize = 1;
const FIELD_DEPTH: usize = 2;
const FIELD_CONTENT_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl RecordParser for XmlParser {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn parse_document(&self, path: &Path) -> Result<ParseResult> {
        io_utils::ensure_exists(path, Format::Xml)?;
        info!("Parsing XML: {}", path.display());

        match read_records(path) {
            Ok(records) => {
                info!("{} element(s) parsed from XML", records.len());
                Ok(ParseResult::new(Format::Xml, path, records))
            }
            Err(err) => {
                error!("Invalid XML: {err}");
                Err(err)
            }
        }
    }
}

/// Field being collected from the current record element.
struct OpenField {
    name: String,
    text: Option<String>,
    has_child: bool,
}

impl OpenField {
    fn push_text(&mut self, text: &str) {
        if !self.has_child {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn into_entry(self) -> (String, Value) {
        (self.name, self.text.map(Value::String).unwrap_or(Value::Null))
    }
}

fn read_records(path: &Path) -> Result<RecordSet> {
    let mut reader = Reader::from_reader(io_utils::open_buffered(path)?);
    let mut buf = Vec::new();
    let mut records = RecordSet::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut record: Option<Record> = None;
    let mut field: Option<OpenField> = None;
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| malformed(path, reader.buffer_position(), err))?;
        let position = reader.buffer_position();

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match depth {
                    ROOT_DEPTH => {
                        if seen_root {
                            return Err(malformed(path, position, "junk after document element"));
                        }
                        seen_root = true;
                    }
                    RECORD_DEPTH => record = Some(Record::new()),
                    FIELD_DEPTH => {
                        let name = reader
                            .decoder()
                            .decode(e.name().as_ref())
                            .map_err(|err| malformed(path, position, err))?
                            .into_owned();
                        field = Some(OpenField {
                            name,
                            text: None,
                            has_child: false,
                        });
                    }
                    FIELD_CONTENT_DEPTH => {
                        if let Some(open) = field.as_mut() {
                            open.has_child = true;
                        }
                    }
                    _ => {}
                }
                if is_empty {
                    close_element(depth, &mut records, &mut record, &mut field);
                } else {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed(path, position, "unmatched closing tag"))?;
                close_element(depth, &mut records, &mut record, &mut field);
            }
            Event::Text(e) => {
                if depth == FIELD_CONTENT_DEPTH {
                    if let Some(open) = field.as_mut() {
                        let text = e
                            .unescape_with(|name| {
                                entities
                                    .get(name)
                                    .map(String::as_str)
                                    .or_else(|| resolve_predefined_entity(name))
                            })
                            .map_err(|err| malformed(path, position, err))?;
                        open.push_text(&text);
                    }
                } else if depth == ROOT_DEPTH && !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(malformed(path, position, "text outside the document element"));
                }
            }
            Event::CData(e) => {
                if depth == FIELD_CONTENT_DEPTH {
                    if let Some(open) = field.as_mut() {
                        let text = reader
                            .decoder()
                            .decode(&e)
                            .map_err(|err| malformed(path, position, err))?;
                        open.push_text(&text);
                    }
                }
            }
            Event::DocType(e) => {
                let doctype = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| malformed(path, position, err))?;
                entities = internal_entities(&doctype);
            }
            Event::Eof => {
                if !seen_root {
                    return Err(malformed(path, position, "no element found"));
                }
                if depth > 0 {
                    return Err(malformed(
                        path,
                        position,
                        format!("unexpected end of document, {depth} element(s) left open"),
                    ));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(records)
}

/// Finishes the element that started at `depth` (the depth of its parent's content).
fn close_element(
    depth: usize,
    records: &mut RecordSet,
    record: &mut Option<Record>,
    field: &mut Option<OpenField>,
) {
    match depth {
        RECORD_DEPTH => {
            if let Some(done) = record.take() {
                records.push(done);
            }
        }
        FIELD_DEPTH => {
            if let (Some(open), Some(current)) = (field.take(), record.as_mut()) {
                let (name, value) = open.into_entry();
                current.insert(name, value);
            }
        }
        _ => {}
    }
}

/// General entities with a literal value from a DOCTYPE internal subset. The first
/// declaration of a name is binding.
fn internal_entities(doctype: &str) -> HashMap<String, String> {
    const DECL: &str = "<!ENTITY";
    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(start) = rest.find(DECL) {
        rest = rest[start + DECL.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let Some(name_end) = rest.find(char::is_whitespace) else {
            break;
        };
        let name = &rest[..name_end];
        let value = rest[name_end..].trim_start();
        let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(close) = value[1..].find(quote) else {
            break;
        };
        entities
            .entry(name.to_string())
            .or_insert_with(|| value[1..1 + close].to_string());
        rest = &value[1 + close..];
    }
    entities
}

fn malformed(path: &Path, position: u64, message: impl fmt::Display) -> Error {
    Error::Xml {
        path: path.to_path_buf(),
        position,
        message: message.to_string(),
    }
}
