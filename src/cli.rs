use std::path::PathBuf;

use clap::Parser;

use crate::{format::Format, logging::LogLevel};

#[derive(Debug, Parser)]
#[command(
    name = "project-parser",
    version,
    about = "Multi-format parser (CSV/JSON/XML) printing records as JSON",
    long_about = None
)]
pub struct Cli {
    /// Path to the input file (csv/json/xml)
    #[arg(long = "input")]
    pub input: PathBuf,
    /// Force the input format instead of inferring it from the file extension
    #[arg(long = "format", value_enum)]
    pub format: Option<Format>,
    /// Logging verbosity
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
    /// Pretty-print output as indented JSON
    #[arg(long)]
    pub pretty: bool,
    /// Print `{format, source, records}` instead of the bare record list
    #[arg(long = "with-metadata")]
    pub with_metadata: bool,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8, ignored for JSON/XML)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
