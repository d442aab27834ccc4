use std::path::Path;

use log::{error, info, warn};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::Format,
    io_utils,
    parser::RecordParser,
    record::{ParseResult, RecordSet, value_kind},
};

/// Reads one JSON document. An object root becomes a single record, an array root is passed
/// through element by element, any other root yields no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl RecordParser for JsonParser {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse_document(&self, path: &Path) -> Result<ParseResult> {
        io_utils::ensure_exists(path, Format::Json)?;
        info!("Parsing JSON: {}", path.display());

        let reader = io_utils::open_buffered(path).inspect_err(|err| error!("{err}"))?;
        let document: Value = serde_json::from_reader(reader).map_err(|source| {
            let err = Error::Json {
                path: path.to_path_buf(),
                source,
            };
            error!("Invalid JSON: {err}");
            err
        })?;

        let records = records_from_root(document);
        info!("{} record(s) parsed from JSON", records.len());
        Ok(ParseResult::new(Format::Json, path, records))
    }
}

fn records_from_root(document: Value) -> RecordSet {
    match document {
        Value::Object(record) => RecordSet::from(vec![record]),
        Value::Array(items) => RecordSet::from_values(items),
        other => {
            warn!(
                "Unexpected JSON root ({}), no records extracted",
                value_kind(&other)
            );
            RecordSet::new()
        }
    }
}
