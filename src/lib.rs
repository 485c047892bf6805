// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Library entry exposing the expander modules.
pub mod core;
pub mod expander;
pub mod logging;
