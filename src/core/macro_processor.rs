// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Macro processor: pass-per-macro expansion of GNU as style invocations.

use log::{debug, info};

use crate::core::error::ExpandError;
use crate::core::macros::{parse_macros, Macro};
use crate::core::registry::MacroRegistry;
use crate::core::text_utils::{first_token, split_comment};

/// Expands every registered macro over a line buffer.
///
/// Each macro gets one pass over the whole buffer, in registry order. The
/// pass also rewrites the bodies of other definitions still present in the
/// buffer, so after every pass the buffer is parsed again and the registry
/// picks up those rewritten bodies. A macro that first appears in an
/// expansion is appended and gets a pass of its own later.
pub struct MacroProcessor {
    registry: MacroRegistry,
}

impl MacroProcessor {
    pub fn new(registry: MacroRegistry) -> Self {
        Self { registry }
    }

    /// Parse the definitions in `lines` into a fresh processor.
    pub fn from_lines(lines: &[String]) -> Result<Self, ExpandError> {
        let decls = parse_macros(lines)?;
        Ok(Self::new(MacroRegistry::from_decls(decls)))
    }

    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    pub fn expand(&mut self, lines: &[String]) -> Result<Vec<String>, ExpandError> {
        let mut current = lines.to_vec();
        let mut idx = 0usize;
        while let Some(mac) = self.registry.get_index(idx).cloned() {
            info!("Expanding {}", mac.name());
            let next = expand_pass(&mac, &current)?;
            for decl in parse_macros(&next)? {
                self.registry.insert(decl.def);
            }
            current = next;
            idx += 1;
        }
        Ok(current)
    }
}

/// Replace every invocation of `mac` in `lines` with its instantiated body.
fn expand_pass(mac: &Macro, lines: &[String]) -> Result<Vec<String>, ExpandError> {
    let mut out = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let Some(args) = parse_invocation(line, mac.name()) else {
            out.push(line.clone());
            continue;
        };
        let line_num = idx as u32 + 1;
        debug!("Expanding {} on line {line_num}", mac.name());
        let body = mac
            .expand(&args)
            .map_err(|err| err.with_context(line_num, line))?;
        out.extend(body);
    }
    Ok(out)
}

/// Return the argument list when `line` invokes the macro `name`.
///
/// The leading whitespace-delimited token must be the name itself, or
/// `name()` with nothing after it. A trailing `#` comment is ignored and
/// empty arguments are dropped.
fn parse_invocation(line: &str, name: &str) -> Option<Vec<String>> {
    let (code, _comment) = split_comment(line);
    let (token, rest) = first_token(code);
    if token != name {
        let empty_call = token.strip_suffix("()") == Some(name) && rest.trim().is_empty();
        return empty_call.then(Vec::new);
    }
    Some(
        rest.split(',')
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
