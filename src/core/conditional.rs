// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Folding of constant `.if`/`.else`/`.endif` blocks.
//!
//! Blocks are matched with a stack, so nested conditionals resolve
//! independently. Only `.if 0` and `.if 1` fold; any other `.if*` block
//! (`.ifdef`, `.if X > 2`, a block containing `.elseif`) is left in the
//! output for the assembler, together with its `.else` and `.endif`.
//!
//! Folding is planned as a list of [`Deletion`] ranges over the input and
//! applied by filtering, so the input buffer is never edited in place.

use std::cmp::Reverse;

use log::debug;

use crate::core::error::{ExpandError, ExpandErrorKind};
use crate::core::text_utils::{parse_directive, split_comment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Literal(bool),
    Opaque,
}

#[derive(Debug)]
struct OpenBlock {
    if_line: usize,
    else_line: Option<usize>,
    guard: Guard,
}

/// A closed `.if 0`/`.if 1` block, by zero-based line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalBlock {
    pub if_line: usize,
    pub else_line: Option<usize>,
    pub endif_line: usize,
    pub taken: bool,
}

impl ConditionalBlock {
    /// Line ranges to drop so only the selected branch remains.
    pub fn deletions(&self) -> Vec<Deletion> {
        let else_or_endif = self.else_line.unwrap_or(self.endif_line);
        if self.taken {
            vec![
                Deletion::new(else_or_endif, self.endif_line),
                Deletion::new(self.if_line, self.if_line),
            ]
        } else {
            vec![
                Deletion::new(self.endif_line, self.endif_line),
                Deletion::new(self.if_line, else_or_endif),
            ]
        }
    }
}

/// An inclusive range of line indices to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    pub start: usize,
    pub end: usize,
}

impl Deletion {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    fn contains(&self, idx: usize) -> bool {
        (self.start..=self.end).contains(&idx)
    }
}

/// Find every foldable block, in the order their `.endif` lines appear.
pub fn scan_conditionals(lines: &[String]) -> Result<Vec<ConditionalBlock>, ExpandError> {
    let mut stack: Vec<OpenBlock> = Vec::new();
    let mut blocks = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(directive) = parse_directive(line) else {
            continue;
        };
        let context = |err: ExpandError| err.with_context(idx as u32 + 1, line);
        match directive.name {
            ".else" => {
                let top = stack
                    .last_mut()
                    .ok_or_else(|| context(cond_error(".else found without matching .if")))?;
                if top.else_line.is_some() {
                    return Err(context(cond_error(".else found after .else")));
                }
                top.else_line = Some(idx);
            }
            ".elseif" => {
                let top = stack
                    .last_mut()
                    .ok_or_else(|| context(cond_error(".elseif found without matching .if")))?;
                top.guard = Guard::Opaque;
            }
            ".endif" => {
                let open = stack
                    .pop()
                    .ok_or_else(|| context(cond_error(".endif found without matching .if")))?;
                if let Guard::Literal(taken) = open.guard {
                    blocks.push(ConditionalBlock {
                        if_line: open.if_line,
                        else_line: open.else_line,
                        endif_line: idx,
                        taken,
                    });
                }
            }
            name if name.starts_with(".if") => {
                let guard = match name {
                    ".if" => parse_guard(directive.rest),
                    _ => Guard::Opaque,
                };
                stack.push(OpenBlock {
                    if_line: idx,
                    else_line: None,
                    guard,
                });
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(cond_error("Missing .endif for .if")
            .with_context(open.if_line as u32 + 1, &lines[open.if_line]));
    }
    Ok(blocks)
}

/// Plan the deletions for `lines`, latest-closed block first.
pub fn plan_deletions(lines: &[String]) -> Result<Vec<Deletion>, ExpandError> {
    let mut blocks = scan_conditionals(lines)?;
    blocks.sort_by_key(|block| Reverse(block.endif_line));
    Ok(blocks
        .iter()
        .inspect(|block| {
            debug!(
                "Folding .if {} on line {}",
                u8::from(block.taken),
                block.if_line + 1
            )
        })
        .flat_map(ConditionalBlock::deletions)
        .collect())
}

/// Copy `lines` without any line covered by `deletions`.
pub fn apply_deletions(lines: &[String], deletions: &[Deletion]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| !deletions.iter().any(|del| del.contains(*idx)))
        .map(|(_, line)| line.clone())
        .collect()
}

/// Resolve every `.if 0`/`.if 1` block to its selected branch.
pub fn eval_conditionals(lines: &[String]) -> Result<Vec<String>, ExpandError> {
    let deletions = plan_deletions(lines)?;
    Ok(apply_deletions(lines, &deletions))
}

fn parse_guard(rest: &str) -> Guard {
    let (code, _comment) = split_comment(rest);
    match code.trim() {
        "1" => Guard::Literal(true),
        "0" => Guard::Literal(false),
        _ => Guard::Opaque,
    }
}

fn cond_error(msg: &str) -> ExpandError {
    ExpandError::new(ExpandErrorKind::MalformedConditional, msg, None)
}
