//! Symbol resolution and management
//!
//! Wraps the scoped `SymbolTable` and keeps, per symbol, what the checker
//! needs to know: a variable's type and frame address, or a function's
//! signature.

use crate::ast::Address;
use crate::semantic::errors::SemanticError;
use crate::types::Type;
use etc_common::{internal_fault, SourceSpan, SymbolId, SymbolKind, SymbolTable};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub var_type: Type,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    /// Always a `Type::Function`
    signature: Type,
    /// Provided by the runtime through an `extern` declaration
    pub is_native: bool,
}

impl FunctionInfo {
    pub fn new(parameters: Vec<Type>, return_type: Type, is_native: bool) -> Self {
        Self {
            signature: Type::function(parameters, return_type),
            is_native,
        }
    }

    pub fn function_type(&self) -> &Type {
        &self.signature
    }

    pub fn parameters(&self) -> &[Type] {
        self.parts().0
    }

    pub fn return_type(&self) -> &Type {
        self.parts().1
    }

    fn parts(&self) -> (&[Type], &Type) {
        match self.signature.function_parts() {
            Some(parts) => parts,
            None => internal_fault(format!("function symbol typed {}", self.signature)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Scopes {
    table: SymbolTable,
    variables: HashMap<SymbolId, VariableInfo>,
    functions: HashMap<SymbolId, FunctionInfo>,
    /// Names whose declaration failed; uses are not reported again
    poisoned: HashSet<SymbolId>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.table.push_scope();
    }

    pub fn pop_scope(&mut self) {
        self.table.pop_scope();
    }

    fn check_redefinition(&self, name: &str, span: &SourceSpan) -> Result<(), SemanticError> {
        if self.table.exists_in_current_scope(name) {
            return Err(SemanticError::Redefinition {
                name: name.to_string(),
                span: span.clone(),
            });
        }
        Ok(())
    }

    /// Declare a function or extern in the current (global) scope
    pub fn declare_function(
        &mut self,
        name: &str,
        info: FunctionInfo,
        span: &SourceSpan,
    ) -> Result<SymbolId, SemanticError> {
        self.check_redefinition(name, span)?;

        let kind = if info.is_native {
            SymbolKind::NativeFunction
        } else {
            SymbolKind::Function
        };
        let id = self.table.add_symbol(name.to_string(), kind);
        self.functions.insert(id, info);
        Ok(id)
    }

    /// Declare a variable or parameter in the innermost scope.
    ///
    /// Shadowing an outer binding is fine; a second binding of the same name
    /// in one scope is not.
    pub fn declare_variable(
        &mut self,
        name: &str,
        info: VariableInfo,
        span: &SourceSpan,
    ) -> Result<SymbolId, SemanticError> {
        self.check_redefinition(name, span)?;

        let id = self.table.add_symbol(name.to_string(), SymbolKind::Variable);
        self.variables.insert(id, info);
        Ok(id)
    }

    /// Bind a variable whose type could not be determined.
    ///
    /// The name shadows like any other binding but has no type or storage.
    pub fn declare_poisoned(&mut self, name: &str, span: &SourceSpan) -> Result<SymbolId, SemanticError> {
        self.check_redefinition(name, span)?;

        let id = self.table.add_symbol(name.to_string(), SymbolKind::Variable);
        self.poisoned.insert(id);
        Ok(id)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&VariableInfo> {
        let symbol = self.table.lookup(name)?;
        self.variables.get(&symbol.id)
    }

    /// Does `name` currently resolve to a poisoned binding?
    pub fn is_poisoned(&self, name: &str) -> bool {
        self.table
            .lookup(name)
            .is_some_and(|symbol| self.poisoned.contains(&symbol.id))
    }

    /// Functions live in the global scope; locals never shadow them
    pub fn lookup_function(&self, name: &str) -> Option<&FunctionInfo> {
        let symbol = self.table.lookup_global(name).filter(|s| s.is_function())?;
        self.functions.get(&symbol.id)
    }
}
