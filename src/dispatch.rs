//! One CLI invocation: validate the input path, resolve the format, parse, render.
//!
//! Nothing is written to stdout until the whole file has parsed and rendered, so a failure at
//! any stage leaves stdout empty.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    cli::Cli,
    format::Format,
    io_utils,
    parser::{ParserOptions, parser_for},
    record::render,
};

pub fn execute(args: &Cli) -> Result<()> {
    let input = args.input.as_path();
    if !input.exists() {
        bail!("File not found: {}", input.display());
    }
    if !input.is_file() {
        bail!("Input is not a file: {}", input.display());
    }

    let format = match args.format {
        Some(format) => format,
        None => Format::detect(input)?,
    };
    info!("Input: {}", input.display());
    info!("Format: {format}");

    let mut options = ParserOptions {
        delimiter: args.delimiter,
        ..ParserOptions::default()
    };
    if format == Format::Csv {
        options.encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    }
    let parser = parser_for(format, &options);
    let document = parser
        .parse_document(input)
        .with_context(|| format!("Parsing failed for {}", input.display()))?;
    info!("Parsed rows: {}", document.records.len());

    let rendered = if args.with_metadata {
        render(&document, args.pretty)
    } else {
        render(&document.records, args.pretty)
    }
    .context("Rendering records as JSON")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("Writing records to stdout")?;
    stdout.flush().context("Flushing stdout")?;
    Ok(())
}
