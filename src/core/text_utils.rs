// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Shared text utilities for directive and invocation scanning.

/// Check if a byte is a word character (letter, digit or underscore).
#[inline]
pub fn is_word_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Check if a byte is whitespace (space or tab).
#[inline]
pub fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Split a line into code and comment parts at the first unquoted `#`.
pub fn split_comment(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut escape = false;
    let mut idx = 0usize;
    while idx < bytes.len() {
        let c = bytes[idx];
        match c {
            _ if escape => {
                escape = false;
            }
            b'\\' if in_single || in_double => {
                escape = true;
            }
            b'\'' if !in_double => {
                in_single = !in_single;
            }
            b'"' if !in_single => {
                in_double = !in_double;
            }
            b'#' if !in_single && !in_double => {
                return (&line[..idx], &line[idx..]);
            }
            _ => {}
        }
        idx += 1;
    }
    (line, "")
}

/// Split off the first whitespace-delimited token after leading whitespace.
///
/// Returns the token and the untrimmed remainder of the line.
pub fn first_token(line: &str) -> (&str, &str) {
    let trimmed = line.trim_start();
    let end = trimmed
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(trimmed.len());
    (&trimmed[..end], &trimmed[end..])
}

/// A dot directive such as `.macro` together with its operand text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub name: &'a str,
    pub rest: &'a str,
}

/// Recognize a line whose first non-blank text is a dot directive.
///
/// The directive name keeps its leading dot and is matched case-sensitively,
/// the way GNU as spells them.
pub fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let mut cursor = Cursor::new(line);
    cursor.skip_ws();
    let start = cursor.pos();
    if cursor.peek() != Some(b'.') {
        return None;
    }
    cursor.next();
    cursor.take_word()?;
    let name = &line[start..cursor.pos()];
    match cursor.peek() {
        None => Some(Directive { name, rest: "" }),
        Some(c) if c.is_ascii_whitespace() => Some(Directive {
            name,
            rest: &line[cursor.pos()..],
        }),
        _ => None,
    }
}

/// A simple cursor for scanning text byte-by-byte.
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the input.
    pub fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    /// Get the current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Skip whitespace characters.
    pub fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Peek at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consume and return the current byte.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Try to consume a run of word characters, returning it if non-empty.
    pub fn take_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.pos]).ok()
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or("")
    }
}
