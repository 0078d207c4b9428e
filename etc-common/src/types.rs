//! Common types used throughout the compiler
//!
//! Identifiers and the scoped symbol table shared by the semantic passes.
//! Per-symbol payloads (types, storage slots) live with the pass that
//! computes them, keyed by [`SymbolId`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Symbol identifier
pub type SymbolId = u32;

/// What a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Local variable or parameter
    Variable,
    /// Function defined in the module
    Function,
    /// Function provided by the runtime (`extern fun`)
    NativeFunction,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::NativeFunction => write!(f, "native function"),
        }
    }
}

/// Symbol table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub scope_level: u32,
}

impl Symbol {
    pub fn new(id: SymbolId, name: String, kind: SymbolKind) -> Self {
        Self {
            id,
            name,
            kind,
            scope_level: 0,
        }
    }

    pub fn with_scope(mut self, scope_level: u32) -> Self {
        self.scope_level = scope_level;
        self
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function | SymbolKind::NativeFunction)
    }
}

/// Lexically scoped symbol table.
///
/// Inner scopes shadow outer ones; popping a scope makes its names
/// unreachable again. Ids are never reused, so per-symbol data keyed by
/// [`SymbolId`] stays valid after its scope is gone.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    next_id: SymbolId,
    scopes: Vec<HashMap<String, Symbol>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            scopes: vec![HashMap::new()], // Global scope
        }
    }

    /// Depth of the innermost scope (0 = global)
    pub fn current_scope(&self) -> u32 {
        (self.scopes.len() - 1) as u32
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Leave the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Add a symbol to the current scope, shadowing any outer binding
    pub fn add_symbol(&mut self, name: String, kind: SymbolKind) -> SymbolId {
        let id = self.next_id;
        self.next_id += 1;

        let symbol = Symbol::new(id, name.clone(), kind).with_scope(self.current_scope());
        if let Some(current_scope_map) = self.scopes.last_mut() {
            current_scope_map.insert(name, symbol);
        }

        id
    }

    /// Look up a symbol by name, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look up a symbol in the global scope only, ignoring local shadows
    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.scopes.first().and_then(|scope| scope.get(name))
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|scope| scope.contains_key(name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::new(0, "print".to_string(), SymbolKind::NativeFunction).with_scope(1);

        assert_eq!(symbol.id, 0);
        assert_eq!(symbol.name, "print");
        assert!(symbol.is_function());
        assert_eq!(symbol.scope_level, 1);
    }

    #[test]
    fn test_symbol_table_scoping() {
        let mut table = SymbolTable::new();

        let global = table.add_symbol("x".to_string(), SymbolKind::Variable);
        assert_eq!(table.lookup("x").map(|s| s.id), Some(global));

        table.push_scope();
        assert_eq!(table.current_scope(), 1);
        assert!(!table.exists_in_current_scope("x"));

        let shadow = table.add_symbol("x".to_string(), SymbolKind::Variable);
        assert_eq!(table.lookup("x").map(|s| s.id), Some(shadow));
        assert_eq!(table.lookup("x").map(|s| s.scope_level), Some(1));

        table.pop_scope();
        assert_eq!(table.lookup("x").map(|s| s.id), Some(global));
    }

    #[test]
    fn test_global_lookup_skips_local_shadows() {
        let mut table = SymbolTable::new();
        let function = table.add_symbol("g".to_string(), SymbolKind::Function);
        table.push_scope();
        table.add_symbol("g".to_string(), SymbolKind::Variable);

        assert_eq!(table.lookup("g").map(|s| s.kind), Some(SymbolKind::Variable));
        assert_eq!(table.lookup_global("g").map(|s| s.id), Some(function));
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        let id = table.add_symbol("main".to_string(), SymbolKind::Function);
        table.pop_scope();
        table.pop_scope();
        assert_eq!(table.lookup("main").map(|s| s.id), Some(id));
        assert_eq!(table.current_scope(), 0);
    }
}
