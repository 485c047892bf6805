// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types and diagnostic formatting for the expander.

use std::fmt;

/// Categories of expansion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandErrorKind {
    Cli,
    Io,
    IncludeNotFound,
    MalformedInclude,
    IncludeLimit,
    MalformedMacro,
    ArgumentArity,
    MalformedConditional,
}

/// An expansion error with optional location context.
#[derive(Debug, Clone)]
pub struct ExpandError {
    kind: ExpandErrorKind,
    message: String,
    line: Option<u32>,
    source: Option<String>,
    file: Option<String>,
}

impl ExpandError {
    pub fn new(kind: ExpandErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
            line: None,
            source: None,
            file: None,
        }
    }

    pub fn kind(&self) -> ExpandErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn source_line(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Attach the buffer line number and text the error was raised on.
    ///
    /// The first context attached wins.
    pub fn with_context(mut self, line: u32, source: &str) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
            self.source = Some(source.to_string());
        }
        self
    }

    pub fn with_file(mut self, file: Option<&str>) -> Self {
        if self.file.is_none() {
            self.file = file.map(|f| f.to_string());
        }
        self
    }

    /// Render the error as a multi-line diagnostic block.
    pub fn format_with_context(&self) -> String {
        let header = match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{file}:{line}: ERROR"),
            (Some(file), None) => format!("{file}: ERROR"),
            (None, Some(line)) => format!("{line}: ERROR"),
            (None, None) => "ERROR".to_string(),
        };

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        if let (Some(line), Some(source)) = (self.line, self.source.as_deref()) {
            out.push_str(&format!("{:>5} | {}", line, source));
            out.push('\n');
        }
        out.push_str(&format!("ERROR: {}", self.message));
        out
    }
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExpandError {}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}
