//! Uniform in-memory representation produced by every parser.
//!
//! A [`Record`] is one flat mapping of field name to value. CSV and XML sources only ever
//! produce string (or `null`) values; JSON sources keep whatever types the document used.
//! A [`RecordSet`] keeps records in source order and tolerates heterogeneous key sets.

use std::{path::PathBuf, slice};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    format::Format,
};

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet(Vec<Value>);

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already-decoded values without checking that each one is an object.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn push(&mut self, record: Record) {
        self.0.push(Value::Object(record));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Strict view: fails on the first element that is not an object.
    pub fn into_records(self) -> Result<Vec<Record>> {
        self.0
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(record) => Ok(record),
                other => Err(Error::Shape {
                    index,
                    kind: value_kind(&other),
                }),
            })
            .collect()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self(records.into_iter().map(Value::Object).collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Record set plus the informational metadata of where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub format: Format,
    pub source: PathBuf,
    pub records: RecordSet,
}

impl ParseResult {
    pub fn new(format: Format, source: impl Into<PathBuf>, records: RecordSet) -> Self {
        Self {
            format,
            source: source.into(),
            records,
        }
    }
}

/// Serializes to compact single-line JSON, or 2-space indented JSON when `pretty` is set.
/// Non-ASCII characters are written as-is in both modes.
pub fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
