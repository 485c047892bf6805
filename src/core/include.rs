// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Include expander for cpp-style #include "file" / #include <file> lines.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::core::error::{ExpandError, ExpandErrorKind};
use crate::core::pipeline::ExpandOptions;
use crate::core::source::SourceReader;
use crate::core::text_utils::is_word_char;

pub struct IncludeExpander<'a, R: SourceReader + ?Sized> {
    reader: &'a R,
    base_dir: &'a Path,
    search_dirs: &'a [PathBuf],
    max_passes: Option<usize>,
}

impl<'a, R: SourceReader + ?Sized> IncludeExpander<'a, R> {
    /// `base_dir` is the directory of the file the lines were read from.
    pub fn new(reader: &'a R, base_dir: &'a Path) -> Self {
        Self {
            reader,
            base_dir,
            search_dirs: &[],
            max_passes: None,
        }
    }

    pub fn with_search_dirs(mut self, dirs: &'a [PathBuf]) -> Self {
        self.search_dirs = dirs;
        self
    }

    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Inline includes pass after pass until a pass inlines nothing.
    ///
    /// Without a pass limit a self-including file never terminates.
    pub fn expand(&self, lines: &[String]) -> Result<Vec<String>, ExpandError> {
        let (mut current, inlined) = self.expand_pass(lines)?;
        if inlined == 0 {
            return Ok(current);
        }
        let mut passes = 1usize;
        loop {
            let (next, inlined) = self.expand_pass(&current)?;
            if inlined == 0 {
                return Ok(next);
            }
            if let Some(limit) = self.max_passes {
                if passes >= limit {
                    return Err(ExpandError::new(
                        ExpandErrorKind::IncludeLimit,
                        "Include expansion exceeded maximum passes",
                        Some(limit.to_string().as_str()),
                    ));
                }
            }
            passes += 1;
            current = next;
        }
    }

    fn expand_pass(&self, lines: &[String]) -> Result<(Vec<String>, usize), ExpandError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut inlined = 0usize;
        for (idx, line) in lines.iter().enumerate() {
            let target = match parse_include(line) {
                None => {
                    out.push(line.clone());
                    continue;
                }
                Some(target) => target,
            };
            let line_num = idx as u32 + 1;
            let name = target.map_err(|err| err.with_context(line_num, line))?;
            info!("Expanding {name}");
            let path = self
                .resolve(name)
                .map_err(|err| err.with_context(line_num, line))?;
            let contents = self.reader.read_lines(&path).map_err(|err| {
                ExpandError::new(
                    ExpandErrorKind::Io,
                    &format!("Error reading {}", path.display()),
                    Some(err.to_string().as_str()),
                )
                .with_context(line_num, line)
            })?;
            out.extend(contents);
            inlined += 1;
        }
        Ok((out, inlined))
    }

    /// Resolve an include name: as given, next to the including file, then
    /// in each search directory.
    fn resolve(&self, name: &str) -> Result<PathBuf, ExpandError> {
        let candidates = std::iter::once(PathBuf::from(name))
            .chain(std::iter::once(self.base_dir.join(name)))
            .chain(self.search_dirs.iter().map(|dir| dir.join(name)));
        for candidate in candidates {
            if self.reader.exists(&candidate) {
                debug!("Trying {}... ok", candidate.display());
                return Ok(candidate);
            }
            debug!("Trying {}... not found", candidate.display());
        }
        Err(ExpandError::new(
            ExpandErrorKind::IncludeNotFound,
            "Could not find",
            Some(name),
        ))
    }
}

/// Inline every include in `lines` using the search settings in `options`.
pub fn expand_includes<R: SourceReader + ?Sized>(
    lines: &[String],
    base_dir: &Path,
    reader: &R,
    options: &ExpandOptions,
) -> Result<Vec<String>, ExpandError> {
    IncludeExpander::new(reader, base_dir)
        .with_search_dirs(&options.include_dirs)
        .with_max_passes(options.max_include_passes)
        .expand(lines)
}

/// Recognize an `#include` line and extract the file name.
///
/// Returns `None` for lines that are not include directives.
fn parse_include(line: &str) -> Option<Result<&str, ExpandError>> {
    let rest = line.trim_start().strip_prefix("#include")?;
    if rest.as_bytes().first().is_some_and(|&c| is_word_char(c)) {
        return None;
    }
    let rest = rest.trim_start();
    let close = match rest.as_bytes().first() {
        Some(b'"') => '"',
        Some(b'<') => '>',
        _ => return Some(Err(malformed_include())),
    };
    let inner = &rest[1..];
    match inner.find(close) {
        Some(end) if end > 0 => Some(Ok(&inner[..end])),
        _ => Some(Err(malformed_include())),
    }
}

fn malformed_include() -> ExpandError {
    ExpandError::new(
        ExpandErrorKind::MalformedInclude,
        "Expected #include \"file\" or #include <file>",
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::{parse_include, IncludeExpander};
    use crate::core::error::ExpandErrorKind;
    use crate::core::source::{split_lines, SourceReader};
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct MemoryReader {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryReader {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.files.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl SourceReader for MemoryReader {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
            self.files
                .get(path)
                .map(|text| split_lines(text))
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_both_delimiter_forms() {
        assert_eq!(parse_include("#include \"a.inc\"").unwrap().unwrap(), "a.inc");
        assert_eq!(parse_include("#include<sys/b.h>").unwrap().unwrap(), "sys/b.h");
        assert_eq!(parse_include("  #include \"c.S\" # trailing").unwrap().unwrap(), "c.S");
        assert!(parse_include("movl %eax, %ebx").is_none());
        assert!(parse_include("#included").is_none());
    }

    #[test]
    fn rejects_include_without_delimiters() {
        let err = parse_include("#include a.inc").unwrap().unwrap_err();
        assert_eq!(err.kind(), ExpandErrorKind::MalformedInclude);
        let err = parse_include("#include \"\"").unwrap().unwrap_err();
        assert_eq!(err.kind(), ExpandErrorKind::MalformedInclude);
    }

    #[test]
    fn resolves_relative_to_including_file() {
        let reader = MemoryReader::default().with("src/defs.inc", "X = 1\nY = 2\n");
        let base = PathBuf::from("src");
        let expander = IncludeExpander::new(&reader, &base);
        let out = expander
            .expand(&lines(&["start:", "#include \"defs.inc\"", "ret"]))
            .unwrap();
        assert_eq!(out, lines(&["start:", "X = 1", "Y = 2", "ret"]));
    }

    #[test]
    fn literal_path_is_tried_first() {
        let reader = MemoryReader::default()
            .with("defs.inc", "literal")
            .with("src/defs.inc", "relative");
        let base = PathBuf::from("src");
        let out = IncludeExpander::new(&reader, &base)
            .expand(&lines(&["#include <defs.inc>"]))
            .unwrap();
        assert_eq!(out, lines(&["literal"]));
    }

    #[test]
    fn falls_back_to_search_dirs() {
        let reader = MemoryReader::default().with("lib/util.inc", "nop");
        let base = PathBuf::from("src");
        let dirs = vec![PathBuf::from("lib")];
        let out = IncludeExpander::new(&reader, &base)
            .with_search_dirs(&dirs)
            .expand(&lines(&["#include \"util.inc\""]))
            .unwrap();
        assert_eq!(out, lines(&["nop"]));
    }

    #[test]
    fn expands_nested_includes_to_fixed_point() {
        let reader = MemoryReader::default()
            .with("a.inc", "a1\n#include \"b.inc\"\na2")
            .with("b.inc", "b1\n#include \"c.inc\"")
            .with("c.inc", "c1");
        let base = PathBuf::new();
        let out = IncludeExpander::new(&reader, &base)
            .expand(&lines(&["top", "#include \"a.inc\"", "bottom"]))
            .unwrap();
        assert_eq!(out, lines(&["top", "a1", "b1", "c1", "a2", "bottom"]));
    }

    #[test]
    fn missing_include_reports_name_and_line() {
        let reader = MemoryReader::default();
        let base = PathBuf::from("src");
        let err = IncludeExpander::new(&reader, &base)
            .expand(&lines(&["nop", "#include \"nope.inc\""]))
            .unwrap_err();
        assert_eq!(err.kind(), ExpandErrorKind::IncludeNotFound);
        assert_eq!(err.message(), "Could not find: nope.inc");
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn pass_limit_stops_self_inclusion() {
        let reader = MemoryReader::default().with("loop.inc", "#include \"loop.inc\"");
        let base = PathBuf::new();
        let err = IncludeExpander::new(&reader, &base)
            .with_max_passes(Some(4))
            .expand(&lines(&["#include \"loop.inc\""]))
            .unwrap_err();
        assert_eq!(err.kind(), ExpandErrorKind::IncludeLimit);
    }

    #[test]
    fn pass_limit_allows_exact_depth() {
        let reader = MemoryReader::default()
            .with("a.inc", "#include \"b.inc\"")
            .with("b.inc", "leaf");
        let base = PathBuf::new();
        let out = IncludeExpander::new(&reader, &base)
            .with_max_passes(Some(2))
            .expand(&lines(&["#include \"a.inc\""]))
            .unwrap();
        assert_eq!(out, lines(&["leaf"]));
    }
}
