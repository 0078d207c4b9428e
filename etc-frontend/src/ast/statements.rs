//! Statement and declaration AST nodes

use super::expressions::Expression;
use super::lvalue::Address;
use super::slot::Slot;
use crate::ast::NodeId;
use crate::lexer::Token;
use crate::types::Type;
use etc_common::{HasSpan, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// AST Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub node_id: NodeId,
    pub kind: StatementKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Expression evaluated for its effect
    Expression(Expression),

    /// `var name [: type] = value;`
    VarDecl(VarDecl),

    /// `target = value;`
    Assignment {
        target: Expression,
        value: Expression,
    },

    /// `return [value];`
    Return(Option<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: Token,
    pub annotation: Option<TypeExpr>,
    pub value: Expression,
    /// Frame slot assigned by the checker
    pub address: Slot<Address>,
}

/// A type as written in the source, before name resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExprKind {
    /// `int`, `bool`, `unit` or a struct name
    Named(String),
    /// `*inner`
    Pointer(Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Named(name) => write!(f, "{name}"),
            TypeExprKind::Pointer(inner) => write!(f, "*{inner}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: Token,
    pub field_type: TypeExpr,
}

/// `struct Name { field: type, ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub node_id: NodeId,
    pub name: Token,
    pub fields: Vec<FieldDecl>,
    pub span: SourceSpan,
    pub resolved: Slot<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub node_id: NodeId,
    pub name: Token,
    pub param_type: TypeExpr,
    pub address: Slot<Address>,
}

/// Signature shared by definitions and `extern` declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: Token,
    pub parameters: Vec<Parameter>,
    /// `unit` when omitted
    pub return_type: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub node_id: NodeId,
    pub signature: Signature,
    /// Always a block expression
    pub body: Expression,
    pub span: SourceSpan,
    /// Bytes of frame storage used by parameters and locals
    pub frame_size: Slot<u64>,
}

/// `extern fun name(...) -> type;`, provided by the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternDecl {
    pub node_id: NodeId,
    pub signature: Signature,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Struct(StructDecl),
    Function(FunctionDecl),
    Extern(ExternDecl),
}

impl Item {
    pub fn name(&self) -> String {
        match self {
            Item::Struct(decl) => decl.name.lexeme(),
            Item::Function(decl) => decl.signature.name.lexeme(),
            Item::Extern(decl) => decl.signature.name.lexeme(),
        }
    }
}

/// Top-level compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|f| f.signature.name.identifier() == Some(name))
    }

    /// Prepend the items of another module, e.g. a prelude
    pub fn prepend(&mut self, other: Module) {
        let mut items = other.items;
        items.append(&mut self.items);
        self.items = items;
    }
}

impl HasSpan for Statement {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}
