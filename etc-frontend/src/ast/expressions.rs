//! Expression AST nodes
//!
//! Each variant is its own struct so that passes can borrow exactly the
//! payload they work on. Children are owned through `Box`/`Vec`; the tree
//! has no sharing and no cycles.

use super::lvalue::LvalueSlot;
use super::slot::Slot;
use super::statements::Statement;
use crate::ast::NodeId;
use crate::lexer::{Token, TokenType};
use crate::types::Type;
use etc_common::{HasSpan, SourceSpan};
use serde::{Deserialize, Serialize};

/// AST Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub node_id: NodeId,
    pub kind: ExpressionKind,
    pub span: SourceSpan,
    /// Filled by the type checker
    pub expr_type: Slot<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Comparison(ComparisonExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Deref(DerefExpr),
    AddressOf(AddressOfExpr),
    FnCall(FnCallExpr),
    StructConstruction(StructConstructionExpr),
    FieldAccess(FieldAccessExpr),
    Block(BlockExpr),
    If(IfExpr),
    Literal(LiteralExpr),
    VarAccess(VarAccessExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonExpr {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub operator: Token,
    pub operand: Box<Expression>,
}

/// `*operand`. An lvalue that is never direct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerefExpr {
    pub star: Token,
    /// The pointer expression
    pub operand: Box<Expression>,
}

/// `&operand`. The operand must be a direct lvalue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressOfExpr {
    pub ampersand: Token,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnCallExpr {
    pub name: Token,
    pub arguments: Vec<Expression>,
    /// Set by the checker when the callee is an `extern` function
    pub is_native: bool,
}

/// `Name:{v1, v2}`: one value per declared field, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructConstructionExpr {
    pub struct_name: Token,
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccessExpr {
    /// A variable, another field access or a dereference
    pub operand: Box<Expression>,
    pub field: Token,
    pub location: LvalueSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockExpr {
    pub statements: Vec<Statement>,
    /// The block's value; `unit` when absent
    pub tail: Option<Box<Expression>>,
}

/// Always has both branches; a missing `else` is an empty block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub condition: Box<Expression>,
    pub then_branch: Box<Expression>,
    pub else_branch: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarAccessExpr {
    pub name: Token,
    pub location: LvalueSlot,
}

/// Value of a literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue {
    /// Magnitude as written; may exceed `i64::MAX` by one under negation
    Int(u64),
    Bool(bool),
}

impl LiteralExpr {
    pub fn value(&self) -> Option<LiteralValue> {
        match self.token.token_type {
            TokenType::IntLiteral(n) => Some(LiteralValue::Int(n)),
            TokenType::True => Some(LiteralValue::Bool(true)),
            TokenType::False => Some(LiteralValue::Bool(false)),
            _ => None,
        }
    }
}

impl FnCallExpr {
    pub fn callee(&self) -> String {
        self.name.lexeme()
    }
}

impl BlockExpr {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.tail.is_none()
    }
}

impl Expression {
    pub fn new(node_id: NodeId, kind: ExpressionKind, span: SourceSpan) -> Self {
        Self {
            node_id,
            kind,
            span,
            expr_type: Slot::Unresolved,
        }
    }

    /// Resolved type of this expression.
    ///
    /// Faults if the type checker has not visited the node yet.
    #[track_caller]
    pub fn get_type(&self) -> &Type {
        self.expr_type.get()
    }

    /// Short variant name for logs and fault messages
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExpressionKind::Comparison(_) => "comparison",
            ExpressionKind::Binary(_) => "binary",
            ExpressionKind::Unary(_) => "unary",
            ExpressionKind::Deref(_) => "deref",
            ExpressionKind::AddressOf(_) => "address-of",
            ExpressionKind::FnCall(_) => "call",
            ExpressionKind::StructConstruction(_) => "struct construction",
            ExpressionKind::FieldAccess(_) => "field access",
            ExpressionKind::Block(_) => "block",
            ExpressionKind::If(_) => "if",
            ExpressionKind::Literal(_) => "literal",
            ExpressionKind::VarAccess(_) => "variable",
        }
    }
}

impl HasSpan for Expression {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_values() {
        let int = LiteralExpr { token: Token::synthetic(TokenType::IntLiteral(42)) };
        let yes = LiteralExpr { token: Token::synthetic(TokenType::True) };
        assert_eq!(int.value(), Some(LiteralValue::Int(42)));
        assert_eq!(yes.value(), Some(LiteralValue::Bool(true)));
    }

    #[test]
    fn test_new_expression_is_unannotated() {
        let expr = Expression::new(
            0,
            ExpressionKind::Literal(LiteralExpr { token: Token::synthetic(TokenType::False) }),
            SourceSpan::dummy(),
        );
        assert!(expr.expr_type.try_get().is_none());
        assert_eq!(expr.kind_name(), "literal");
    }
}
