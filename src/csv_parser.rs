//! Delimited-text parser: the header row names the fields, every following row is a record.
//!
//! Row length policy:
//! - short rows keep every header key, with `null` for the missing trailing cells;
//! - long rows collect the surplus cells, in order, as an array under [`OVERFLOW_KEY`];
//!   when a header column already carries that name, a long row fails the file with
//!   [`Error::OverflowCollision`] rather than overwrite the column's value;
//! - a header name repeated in the header row keeps the value of its last column.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{error, info};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::Format,
    io_utils,
    parser::RecordParser,
    record::{ParseResult, Record, RecordSet},
};

pub const OVERFLOW_KEY: &str = "_overflow";

#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    delimiter: Option<u8>,
    encoding: &'static Encoding,
}

impl CsvParser {
    pub fn new(delimiter: Option<u8>, encoding: &'static Encoding) -> Self {
        Self {
            delimiter,
            encoding,
        }
    }

    fn read_records(&self, path: &Path) -> Result<RecordSet> {
        let delimiter = io_utils::resolve_input_delimiter(path, self.delimiter);
        let mut reader = io_utils::open_csv_reader(io_utils::open_buffered(path)?, delimiter);
        let csv_error = |source| Error::Csv {
            path: path.to_path_buf(),
            source,
        };
        let decode_error = |line| Error::Decode {
            path: path.to_path_buf(),
            line,
            encoding: self.encoding.name(),
        };

        let header_record = reader.byte_headers().map_err(csv_error)?.clone();
        let mut headers =
            io_utils::decode_record(&header_record, self.encoding).ok_or_else(|| decode_error(1))?;
        if let Some(first) = headers.first_mut() {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }

        let overflow_taken = headers.iter().any(|header| header == OVERFLOW_KEY);
        let mut records = RecordSet::new();
        for row in reader.byte_records() {
            let row = row.map_err(csv_error)?;
            let line = row.position().map(|pos| pos.line()).unwrap_or_default();
            let cells = io_utils::decode_record(&row, self.encoding)
                .ok_or_else(|| decode_error(line))?;
            if overflow_taken && cells.len() > headers.len() {
                return Err(Error::OverflowCollision {
                    path: path.to_path_buf(),
                    line,
                    key: OVERFLOW_KEY,
                });
            }
            records.push(build_record(&headers, cells));
        }
        Ok(records)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(None, UTF_8)
    }
}

impl RecordParser for CsvParser {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn parse_document(&self, path: &Path) -> Result<ParseResult> {
        io_utils::ensure_exists(path, Format::Csv)?;
        info!("Parsing CSV: {}", path.display());

        match self.read_records(path) {
            Ok(records) => {
                info!("{} row(s) parsed from CSV", records.len());
                Ok(ParseResult::new(Format::Csv, path, records))
            }
            Err(err) => {
                error!("CSV parsing failed: {err}");
                Err(err)
            }
        }
    }
}

fn build_record(headers: &[String], cells: Vec<String>) -> Record {
    let mut record = Record::new();
    let mut cells = cells.into_iter();
    for header in headers {
        let value = cells.next().map(Value::String).unwrap_or(Value::Null);
        record.insert(header.clone(), value);
    }
    let overflow: Vec<Value> = cells.map(Value::String).collect();
    if !overflow.is_empty() {
        record.insert(OVERFLOW_KEY.to_string(), Value::Array(overflow));
    }
    record
}
