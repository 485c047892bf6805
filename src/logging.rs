// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Logging setup for the command-line tool.
//!
//! Library code reports progress through the `log` macros. The binary routes
//! them through `env_logger`: with `-v` every message down to `debug` is
//! written to stdout as a bare line; otherwise only warnings are shown, on
//! stderr, so they never mix with expanded output.

use std::io::{self, Write};

use env_logger::{Builder, Target};
use log::{Level, LevelFilter, Record};

/// Install the logger. Later calls are no-ops.
pub fn init(verbose: bool) {
    let (level, target) = settings(verbose);
    let _ = Builder::new()
        .filter_level(level)
        .target(target)
        .format(|buf, record| write_record(buf, record))
        .try_init();
}

fn settings(verbose: bool) -> (LevelFilter, Target) {
    if verbose {
        (LevelFilter::Debug, Target::Stdout)
    } else {
        (LevelFilter::Warn, Target::Stderr)
    }
}

/// Trace lines are bare; warnings and errors carry their level.
fn write_record<W: Write + ?Sized>(buf: &mut W, record: &Record) -> io::Result<()> {
    match record.level() {
        Level::Warn | Level::Error => writeln!(buf, "{}: {}", record.level(), record.args()),
        _ => writeln!(buf, "{}", record.args()),
    }
}
