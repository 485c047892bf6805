// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line driver: parse arguments, run the pipeline, write the result.

pub mod cli;


use std::io;
use std::path::Path;

use clap::Parser;
use log::info;

use crate::core::error::{ExpandError, ExpandErrorKind};
use crate::core::pipeline::Expander;
use crate::core::sink::{FileSink, LineSink, StreamSink};
use crate::logging;

pub use cli::{validate_cli, Cli, CliConfig, VERSION};

/// Run the expander with arguments from the process command line.
pub fn run() -> Result<(), ExpandError> {
    let cli = Cli::parse();
    run_with(&cli)
}

/// Run the expander for already-parsed arguments.
///
/// Output is only opened once the whole pipeline has succeeded.
pub fn run_with(cli: &Cli) -> Result<(), ExpandError> {
    let config = validate_cli(cli)?;
    logging::init(config.verbose);

    let expander = Expander::new(config.options);
    let lines = expander.expand_file(&config.input)?;

    match config.output.as_deref() {
        Some(path) => {
            info!("Writing {} lines to {}", lines.len(), path.display());
            let mut sink = FileSink::create(path).map_err(|err| output_error(path, err))?;
            emit(&mut sink, &lines).map_err(|err| output_error(path, err))
        }
        None => {
            let stdout = io::stdout();
            let mut sink = StreamSink::new(stdout.lock());
            emit(&mut sink, &lines).map_err(|err| output_error(Path::new("<stdout>"), err))
        }
    }
}

fn emit(sink: &mut dyn LineSink, lines: &[String]) -> io::Result<()> {
    sink.write_lines(lines)?;
    sink.finish()
}

fn output_error(path: &Path, err: io::Error) -> ExpandError {
    ExpandError::new(ExpandErrorKind::Io, "Error writing output", Some(err.to_string().as_str()))
        .with_file(Some(path.display().to_string().as_str()))
}
