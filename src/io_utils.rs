//! File access helpers shared by the parsers.
//!
//! - **Existence checks** happen before any open so a missing path is reported as
//!   [`Error::NotFound`] without touching the filesystem further.
//! - **Reader construction**: buffered file readers and the CSV reader configuration.
//! - **Delimiter and encoding resolution** for delimited text, defaulting to comma and UTF-8.
//!
//! File handles are owned by the returned readers and closed when they drop, on both the
//! success and the error path.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::anyhow;
use encoding_rs::{Encoding, UTF_8};
use log::error;

use crate::{
    error::{Error, Result},
    format::Format,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn ensure_exists(path: &Path, format: Format) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        error!(
            "{} file not found: {}",
            format.as_str().to_uppercase(),
            path.display()
        );
        Err(Error::NotFound(path.to_path_buf()))
    }
}

pub fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub fn resolve_encoding(label: Option<&str>) -> anyhow::Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Rows may differ in length from the header; the CSV parser applies its own
/// short-row and overflow policy.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Strict decode: any malformed sequence yields `None` instead of replacement characters.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}
