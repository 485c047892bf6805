// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Source file access for the include expander.

use std::fs;
use std::io;
use std::path::Path;

/// Read access to source files.
pub trait SourceReader {
    /// Whether `path` names an existing file.
    fn exists(&self, path: &Path) -> bool;

    /// Read `path` as lines with terminators and trailing whitespace removed.
    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// Reads sources from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        Ok(split_lines(&text))
    }
}

/// Split text into lines, dropping `\n`/`\r\n` and trailing whitespace.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::split_lines;

    #[test]
    fn split_lines_strips_terminators_and_trailing_space() {
        let lines = split_lines("a  \r\n\tb\n\nc\t");
        assert_eq!(lines, vec!["a", "\tb", "", "c"]);
    }

    #[test]
    fn split_lines_of_empty_text_is_empty() {
        assert!(split_lines("").is_empty());
    }
}
