// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! GNU as style `.macro`/`.endm` definitions.
//!
//! This module owns the macro model and the two line scans that look at
//! definitions: [`parse_macros`] collects them into [`MacroDecl`] records and
//! [`strip_macros`] removes them from the final text. Expansion of invocations
//! lives in [`crate::core::macro_processor`].

use log::{info, warn};

use crate::core::error::{ExpandError, ExpandErrorKind};
use crate::core::text_utils::{is_space, is_word_char, parse_directive, Cursor};

const MACRO_DIRECTIVE: &str = ".macro";
const ENDM_DIRECTIVE: &str = ".endm";

/// A named, parameterized template of source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    name: String,
    params: Vec<String>,
    body: Vec<String>,
}

impl Macro {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Body lines exactly as declared, before any substitution.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Instantiate the body for one invocation.
    pub fn expand(&self, args: &[String]) -> Result<Vec<String>, ExpandError> {
        if args.len() != self.params.len() {
            return Err(ExpandError::new(
                ExpandErrorKind::ArgumentArity,
                &format!(
                    "Macro expected {} arguments, got {}",
                    self.params.len(),
                    args.len()
                ),
                Some(self.name.as_str()),
            ));
        }
        Ok(self
            .body
            .iter()
            .map(|line| substitute_line(line, &self.params, args))
            .collect())
    }

    /// Parse the operand text of a `.macro` line: `NAME [p1[, p2, ...]]`.
    fn from_header(rest: &str) -> Result<Self, ExpandError> {
        let mut cursor = Cursor::new(rest);
        cursor.skip_ws();
        let name = cursor.take_word().ok_or_else(|| {
            ExpandError::new(ExpandErrorKind::MalformedMacro, "Missing macro name", None)
        })?;
        let tail = cursor.rest();
        let tail = match tail.as_bytes().first() {
            None => "",
            Some(b',') => &tail[1..],
            Some(&c) if is_space(c) => tail,
            Some(_) => {
                return Err(ExpandError::new(
                    ExpandErrorKind::MalformedMacro,
                    "Invalid macro name",
                    Some(rest.trim()),
                ))
            }
        };
        let params = tail
            .split(|c: char| c == ',' || c.is_ascii_whitespace())
            .filter_map(param_name)
            .collect();
        Ok(Self::new(name, params, Vec::new()))
    }
}

/// Leading name of one header entry; `=default` and `:qualifier` suffixes
/// are ignored.
fn param_name(entry: &str) -> Option<String> {
    let end = entry
        .bytes()
        .position(|c| !is_word_char(c))
        .unwrap_or(entry.len());
    (end > 0).then(|| entry[..end].to_string())
}

/// A parsed macro and the line its `.macro` directive was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDecl {
    pub line: u32,
    pub def: Macro,
}

/// Replace `\param` references with argument text.
///
/// Only whole parameter names match: `\r` is left alone in `\r0` unless `r0`
/// is itself a parameter. Lines that never mention a parameter are copied.
fn substitute_line(line: &str, params: &[String], args: &[String]) -> String {
    if !params.iter().any(|param| line.contains(param.as_str())) {
        return line.to_string();
    }
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && is_word_char(bytes[j]) {
            j += 1;
        }
        let word = &line[i + 1..j];
        match params.iter().position(|param| param == word) {
            Some(idx) if !word.is_empty() => {
                out.push_str(&line[start..i]);
                out.push_str(&args[idx]);
                start = j;
                i = j;
            }
            _ => i += 1,
        }
    }
    out.push_str(&line[start..]);
    out
}

fn directive_name(line: &str) -> Option<&str> {
    parse_directive(line).map(|dir| dir.name)
}

/// Collect every top-level macro definition in declaration order.
///
/// A `.macro` inside a body nests: its lines, including the inner `.endm`,
/// belong to the enclosing body.
pub fn parse_macros(lines: &[String]) -> Result<Vec<MacroDecl>, ExpandError> {
    let mut decls = Vec::new();
    let mut open: Option<MacroDecl> = None;
    let mut depth = 0usize;

    for (idx, line) in lines.iter().enumerate() {
        let line_num = idx as u32 + 1;
        let directive = parse_directive(line);
        let name = directive.map(|dir| dir.name);

        let Some(current) = open.as_mut() else {
            match (name, directive) {
                (Some(MACRO_DIRECTIVE), Some(dir)) => {
                    let def = Macro::from_header(dir.rest)
                        .map_err(|err| err.with_context(line_num, line))?;
                    open = Some(MacroDecl {
                        line: line_num,
                        def,
                    });
                    depth = 1;
                }
                (Some(ENDM_DIRECTIVE), _) => {
                    return Err(ExpandError::new(
                        ExpandErrorKind::MalformedMacro,
                        ".endm found without matching .macro",
                        None,
                    )
                    .with_context(line_num, line));
                }
                _ => {}
            }
            continue;
        };

        match name {
            Some(MACRO_DIRECTIVE) => depth += 1,
            Some(ENDM_DIRECTIVE) => {
                depth -= 1;
                if depth == 0 {
                    if let Some(decl) = open.take() {
                        info!("Parsed macro {} on line {}", decl.def.name, decl.line);
                        decls.push(decl);
                    }
                    continue;
                }
            }
            _ => {}
        }
        current.def.body.push(line.clone());
    }

    if let Some(decl) = open {
        let source = lines
            .get(decl.line as usize - 1)
            .map(String::as_str)
            .unwrap_or("");
        return Err(ExpandError::new(
            ExpandErrorKind::MalformedMacro,
            "Missing .endm for macro",
            Some(decl.def.name.as_str()),
        )
        .with_context(decl.line, source));
    }

    Ok(decls)
}

/// Drop every `.macro` ... `.endm` block, nested blocks included.
pub fn strip_macros(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut depth = 0usize;
    for line in lines {
        match directive_name(line) {
            Some(MACRO_DIRECTIVE) => {
                if depth == 0 {
                    let name = parse_directive(line)
                        .and_then(|dir| Cursor::new(dir.rest.trim_start()).take_word())
                        .unwrap_or("");
                    info!("Stripping macro {name}");
                }
                depth += 1;
            }
            Some(ENDM_DIRECTIVE) => {
                if depth == 0 {
                    warn!("Dropping .endm without matching .macro");
                } else {
                    depth -= 1;
                }
            }
            _ if depth == 0 => out.push(line.clone()),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn args(text: &[&str]) -> Vec<String> {
        lines(text)
    }

    #[test]
    fn parses_header_with_params() {
        let decls = parse_macros(&lines(&[
            "nop",
            ".macro do_andnl r0, r1",
            "   andnl \\r0, \\r1",
            ".endm",
        ]))
        .unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].line, 2);
        assert_eq!(decls[0].def.name(), "do_andnl");
        assert_eq!(decls[0].def.params(), ["r0", "r1"]);
        assert_eq!(decls[0].def.body(), ["   andnl \\r0, \\r1"]);
    }

    #[test]
    fn parses_macro_without_params() {
        let decls = parse_macros(&lines(&[".macro save", "push %rax", ".endm"])).unwrap();
        assert!(decls[0].def.params().is_empty());
        let decls = parse_macros(&lines(&[".macro save, a", ".endm"])).unwrap();
        assert_eq!(decls[0].def.params(), ["a"]);
    }

    #[test]
    fn accepts_space_separated_params() {
        let decls = parse_macros(&lines(&[".macro foo a b", "  nop", ".endm"])).unwrap();
        assert_eq!(decls[0].def.params(), ["a", "b"]);
        let decls = parse_macros(&lines(&[".macro bar x, y z", ".endm"])).unwrap();
        assert_eq!(decls[0].def.params(), ["x", "y", "z"]);
    }

    #[test]
    fn ignores_param_defaults_and_qualifiers() {
        let decls = parse_macros(&lines(&[
            ".macro foo a=1, b:req",
            "  mov \\a, \\b",
            ".endm",
        ]))
        .unwrap();
        assert_eq!(decls[0].def.params(), ["a", "b"]);
        let out = decls[0].def.expand(&args(&["%eax", "%ebx"])).unwrap();
        assert_eq!(out, lines(&["  mov %eax, %ebx"]));
    }

    #[test]
    fn keeps_declaration_order_and_duplicates() {
        let decls = parse_macros(&lines(&[
            ".macro b", "one", ".endm", ".macro a", ".endm", ".macro b", "two", ".endm",
        ]))
        .unwrap();
        let names: Vec<&str> = decls.iter().map(|d| d.def.name()).collect();
        assert_eq!(names, ["b", "a", "b"]);
        assert_eq!(decls[2].def.body(), ["two"]);
    }

    #[test]
    fn nested_definition_stays_in_body() {
        let decls = parse_macros(&lines(&[
            ".macro outer",
            ".macro inner",
            "nop",
            ".endm",
            ".endm",
        ]))
        .unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].def.body(), [".macro inner", "nop", ".endm"]);
    }

    #[test]
    fn rejects_malformed_definitions() {
        let err = parse_macros(&lines(&[".macro"])).unwrap_err();
        assert_eq!(err.message(), "Missing macro name");
        let err = parse_macros(&lines(&["nop", ".endm"])).unwrap_err();
        assert_eq!(err.kind(), ExpandErrorKind::MalformedMacro);
        assert_eq!(err.line(), Some(2));
        let err = parse_macros(&lines(&[".macro foo a", "nop"])).unwrap_err();
        assert_eq!(err.message(), "Missing .endm for macro: foo");
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn expand_substitutes_whole_parameter_names() {
        let mac = Macro::new(
            "m",
            args(&["r", "r0"]),
            lines(&["  mov \\r0, \\r", "  # untouched", "  add \\rx, \\r"]),
        );
        let out = mac.expand(&args(&["%eax", "%ebx"])).unwrap();
        assert_eq!(out, lines(&["  mov %ebx, %eax", "  # untouched", "  add \\rx, %eax"]));
    }

    #[test]
    fn expand_does_not_resubstitute_arguments() {
        let mac = Macro::new("m", args(&["a", "b"]), lines(&["op \\a, \\b"]));
        let out = mac.expand(&args(&["\\b", "x"])).unwrap();
        assert_eq!(out, lines(&["op \\b, x"]));
    }

    #[test]
    fn expand_rejects_wrong_argument_count() {
        let mac = Macro::new("pair", args(&["a", "b"]), Vec::new());
        for bad in [args(&[]), args(&["1"]), args(&["1", "2", "3"])] {
            let err = mac.expand(&bad).unwrap_err();
            assert_eq!(err.kind(), ExpandErrorKind::ArgumentArity);
            assert!(err.message().contains("pair"));
        }
    }

    #[test]
    fn strip_removes_definitions_only() {
        let out = strip_macros(&lines(&[
            "a",
            ".macro m x",
            "  \\x",
            ".endm",
            "b",
            "  .macro outer",
            ".macro inner",
            ".endm",
            "  .endm",
            "c",
        ]));
        assert_eq!(out, lines(&["a", "b", "c"]));
    }

    #[test]
    fn strip_drops_stray_endm() {
        assert_eq!(strip_macros(&lines(&["a", ".endm", "b"])), lines(&["a", "b"]));
    }
}
