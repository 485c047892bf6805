// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Text-level expansion core.
//!
//! Every stage takes a borrowed line buffer and returns a new one; the
//! [`pipeline`] chains them in a fixed order.
//!
//! # Components
//!
//! - [`include`] - `#include` inlining to a fixed point
//! - [`macros`] - `.macro`/`.endm` model, definition parsing and stripping
//! - [`registry`] - Declaration-ordered macro registry
//! - [`macro_processor`] - Pass-per-macro invocation expansion
//! - [`conditional`] - Folding of `.if 0`/`.if 1` blocks
//! - [`source`] - File access used by the include expander
//! - [`sink`] - Line output sinks (file, stream)
//! - [`text_utils`] - Directive, token and comment scanning helpers

pub mod conditional;
pub mod error;
pub mod include;
pub mod macro_processor;
pub mod macros;
pub mod pipeline;
pub mod registry;
pub mod sink;
pub mod source;
pub mod text_utils;

// Re-exports for convenience
pub use error::{ExpandError, ExpandErrorKind};
pub use macros::{Macro, MacroDecl};
pub use pipeline::{ExpandOptions, Expander};
pub use registry::MacroRegistry;
pub use sink::{FileSink, LineSink, StreamSink};
pub use source::{FsReader, SourceReader};
