// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for asmexpand.

fn main() {
    if let Err(err) = asmexpand::expander::run() {
        eprintln!("{}", err.format_with_context());
        std::process::exit(1);
    }
}
