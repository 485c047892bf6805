// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::core::error::{ExpandError, ExpandErrorKind};
use crate::core::pipeline::ExpandOptions;

pub const VERSION: &str = "0.1";

const LONG_ABOUT: &str = "Recursively expand assembler includes and macros.

Inlines #include \"file\" and #include <file> lines, expands .macro/.endm
definitions (including macros that invoke other macros), removes the
definitions, and folds .if 0 / .if 1 blocks into the selected branch.
Includes are looked up as given, next to the input file, then in each
-I/--include-dir directory.
The result is written to -o/--outfile, or to stdout when omitted.";

#[derive(Parser, Debug)]
#[command(
    name = "asmexpand",
    version = VERSION,
    about = "Recursively expand assembler includes and macros",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(value_name = "FILE", help = "Path to the assembly file")]
    pub input: PathBuf,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "FILE",
        long_help = "Write the expanded source to FILE. Defaults to stdout. Nothing is written when expansion fails."
    )]
    pub outfile: Option<PathBuf>,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::SetTrue,
        long_help = "Trace include lookups and macro expansion on stdout."
    )]
    pub verbose: bool,
    #[arg(
        short = 'I',
        long = "include-dir",
        value_name = "DIR",
        action = ArgAction::Append,
        long_help = "Additional include search directory (repeatable). Searched after the literal path and the input file's directory."
    )]
    pub include_dirs: Vec<PathBuf>,
    #[arg(
        long = "max-include-passes",
        value_name = "N",
        long_help = "Fail when includes are still being inlined after N passes. Unlimited by default, so a self-including file never terminates."
    )]
    pub max_include_passes: Option<usize>,
}

/// Validated CLI configuration.
#[derive(Debug)]
pub struct CliConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub options: ExpandOptions,
}

fn cli_error(msg: &str, param: Option<&str>) -> ExpandError {
    ExpandError::new(ExpandErrorKind::Cli, msg, param)
}

/// Validate CLI arguments and return parsed configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, ExpandError> {
    let input = cli.input.to_string_lossy();
    if !cli.input.exists() {
        return Err(cli_error("Input file not found", Some(input.as_ref())));
    }
    if !cli.input.is_file() {
        return Err(cli_error("Input must be a file", Some(input.as_ref())));
    }

    if let Some(out) = cli.outfile.as_ref() {
        if out.is_dir() {
            return Err(cli_error(
                "-o/--outfile must not be a directory",
                Some(out.to_string_lossy().as_ref()),
            ));
        }
    }

    for dir in &cli.include_dirs {
        if !dir.is_dir() {
            return Err(cli_error(
                "-I/--include-dir must be an existing directory",
                Some(dir.to_string_lossy().as_ref()),
            ));
        }
    }

    if cli.max_include_passes == Some(0) {
        return Err(cli_error("--max-include-passes must be at least 1", None));
    }

    Ok(CliConfig {
        input: cli.input.clone(),
        output: cli.outfile.clone(),
        verbose: cli.verbose,
        options: ExpandOptions {
            include_dirs: cli.include_dirs.clone(),
            max_include_passes: cli.max_include_passes,
        },
    })
}
