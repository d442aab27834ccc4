pub mod cli;
pub mod csv_parser;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod io_utils;
pub mod json_parser;
pub mod logging;
pub mod parser;
pub mod record;
pub mod xml_parser;

use anyhow::Result;
use clap::Parser;
use log::debug;

use crate::cli::Cli;

pub use crate::{
    error::Error,
    format::Format,
    parser::{ParserOptions, RecordParser, parser_for},
    record::{ParseResult, Record, RecordSet},
};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);
    debug!("Arguments: {cli:?}");
    dispatch::execute(&cli)
}
