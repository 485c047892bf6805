// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! The expansion pipeline: includes, macros, stripping, conditionals.

use std::path::{Path, PathBuf};

use log::info;

use crate::core::conditional::eval_conditionals;
use crate::core::error::{ExpandError, ExpandErrorKind};
use crate::core::include::expand_includes;
use crate::core::macro_processor::MacroProcessor;
use crate::core::macros::strip_macros;
use crate::core::source::{FsReader, SourceReader};

/// Options for one expansion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Searched after the literal path and the including file's directory.
    pub include_dirs: Vec<PathBuf>,
    /// Fail once includes are still being inlined after this many passes.
    pub max_include_passes: Option<usize>,
}

/// Runs the full pipeline over one source file.
pub struct Expander<R: SourceReader = FsReader> {
    options: ExpandOptions,
    reader: R,
}

impl Expander<FsReader> {
    pub fn new(options: ExpandOptions) -> Self {
        Self::with_reader(options, FsReader)
    }
}

impl<R: SourceReader> Expander<R> {
    pub fn with_reader(options: ExpandOptions, reader: R) -> Self {
        Self { options, reader }
    }

    pub fn expand_file(&self, path: &Path) -> Result<Vec<String>, ExpandError> {
        let display = path.display().to_string();
        let lines = self.reader.read_lines(path).map_err(|err| {
            ExpandError::new(ExpandErrorKind::Io, "Error reading file", Some(err.to_string().as_str()))
                .with_file(Some(display.as_str()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.expand_lines(&lines, base_dir)
    }

    /// Expand already-read lines; `base_dir` resolves relative includes.
    pub fn expand_lines(
        &self,
        lines: &[String],
        base_dir: &Path,
    ) -> Result<Vec<String>, ExpandError> {
        let included = expand_includes(lines, base_dir, &self.reader, &self.options)?;

        let mut processor = MacroProcessor::from_lines(&included)?;
        info!("Found {} macro definitions", processor.registry().len());
        let expanded = processor.expand(&included)?;

        let stripped = strip_macros(&expanded);
        eval_conditionals(&stripped)
    }
}
