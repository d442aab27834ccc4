//! Error taxonomy shared by the format parsers and the format detector.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to decode line {line} of {} as {encoding}", path.display())]
    Decode {
        path: PathBuf,
        line: u64,
        encoding: &'static str,
    },

    #[error(
        "Line {line} of {} has more cells than headers, but a header is already named `{key}`",
        path.display()
    )]
    OverflowCollision {
        path: PathBuf,
        line: u64,
        key: &'static str,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed XML in {} at byte {position}: {message}", path.display())]
    Xml {
        path: PathBuf,
        position: u64,
        message: String,
    },

    #[error("Record {index} is a {kind}, expected an object")]
    Shape { index: usize, kind: &'static str },
}

impl Error {
    /// True for failures caused by the content of the file rather than its location.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Io { .. }
                | Error::Csv { .. }
                | Error::Decode { .. }
                | Error::OverflowCollision { .. }
                | Error::Json { .. }
                | Error::Xml { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
