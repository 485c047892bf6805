// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Macro registry keyed by name, kept in declaration order.

use std::collections::HashMap;

use crate::core::macros::{Macro, MacroDecl};

#[derive(Debug, Default, Clone)]
pub struct MacroRegistry {
    macros: Vec<Macro>,
    index: HashMap<String, usize>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from parsed declarations; a repeated name keeps the
    /// position of its first declaration and the body of its last.
    pub fn from_decls(decls: impl IntoIterator<Item = MacroDecl>) -> Self {
        let mut registry = Self::new();
        for decl in decls {
            registry.insert(decl.def);
        }
        registry
    }

    /// Insert or replace a macro. Returns `true` when an existing entry was
    /// replaced in place.
    pub fn insert(&mut self, def: Macro) -> bool {
        match self.index.get(def.name()) {
            Some(&idx) => {
                self.macros[idx] = def;
                true
            }
            None => {
                self.index.insert(def.name().to_string(), self.macros.len());
                self.macros.push(def);
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.index.get(name).map(|&idx| &self.macros[idx])
    }

    pub fn get_index(&self, idx: usize) -> Option<&Macro> {
        self.macros.get(idx)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::MacroRegistry;
    use crate::core::macros::{Macro, MacroDecl};

    fn decl(line: u32, name: &str, body: &str) -> MacroDecl {
        MacroDecl {
            line,
            def: Macro::new(name, Vec::new(), vec![body.to_string()]),
        }
    }

    #[test]
    fn later_declaration_overwrites_in_place() {
        let registry = MacroRegistry::from_decls(vec![
            decl(1, "b", "first"),
            decl(4, "a", "only"),
            decl(7, "b", "second"),
        ]);
        let names: Vec<&str> = registry.iter().map(Macro::name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(registry.get("b").unwrap().body(), ["second"]);
    }

    #[test]
    fn insert_reports_replacement() {
        let mut registry = MacroRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.insert(Macro::new("m", Vec::new(), Vec::new())));
        assert!(registry.insert(Macro::new("m", vec!["x".to_string()], Vec::new())));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_index(0).unwrap().params(), ["x"]);
        assert!(registry.get("missing").is_none());
    }
}
