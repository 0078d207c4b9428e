//! Pass dispatch over expression nodes
//!
//! A pass implements one method per expression variant. `accept` and
//! `accept_mut` hand the variant payload and the node span to that method;
//! the method decides for itself in which order to visit children.

use crate::ast::*;
use etc_common::SourceSpan;

/// Read-only pass over expressions, e.g. a printer
pub trait ExpressionVisitor {
    type Output;

    fn visit_comparison(&mut self, expr: &ComparisonExpr, span: &SourceSpan) -> Self::Output;
    fn visit_binary(&mut self, expr: &BinaryExpr, span: &SourceSpan) -> Self::Output;
    fn visit_unary(&mut self, expr: &UnaryExpr, span: &SourceSpan) -> Self::Output;
    fn visit_deref(&mut self, expr: &DerefExpr, span: &SourceSpan) -> Self::Output;
    fn visit_address_of(&mut self, expr: &AddressOfExpr, span: &SourceSpan) -> Self::Output;
    fn visit_fn_call(&mut self, expr: &FnCallExpr, span: &SourceSpan) -> Self::Output;
    fn visit_struct_construction(&mut self, expr: &StructConstructionExpr, span: &SourceSpan) -> Self::Output;
    fn visit_field_access(&mut self, expr: &FieldAccessExpr, span: &SourceSpan) -> Self::Output;
    fn visit_block(&mut self, expr: &BlockExpr, span: &SourceSpan) -> Self::Output;
    fn visit_if(&mut self, expr: &IfExpr, span: &SourceSpan) -> Self::Output;
    fn visit_literal(&mut self, expr: &LiteralExpr, span: &SourceSpan) -> Self::Output;
    fn visit_var_access(&mut self, expr: &VarAccessExpr, span: &SourceSpan) -> Self::Output;
}

/// Annotating pass over expressions, e.g. the type checker
pub trait ExpressionVisitorMut {
    type Output;

    fn visit_comparison(&mut self, expr: &mut ComparisonExpr, span: &SourceSpan) -> Self::Output;
    fn visit_binary(&mut self, expr: &mut BinaryExpr, span: &SourceSpan) -> Self::Output;
    fn visit_unary(&mut self, expr: &mut UnaryExpr, span: &SourceSpan) -> Self::Output;
    fn visit_deref(&mut self, expr: &mut DerefExpr, span: &SourceSpan) -> Self::Output;
    fn visit_address_of(&mut self, expr: &mut AddressOfExpr, span: &SourceSpan) -> Self::Output;
    fn visit_fn_call(&mut self, expr: &mut FnCallExpr, span: &SourceSpan) -> Self::Output;
    fn visit_struct_construction(&mut self, expr: &mut StructConstructionExpr, span: &SourceSpan) -> Self::Output;
    fn visit_field_access(&mut self, expr: &mut FieldAccessExpr, span: &SourceSpan) -> Self::Output;
    fn visit_block(&mut self, expr: &mut BlockExpr, span: &SourceSpan) -> Self::Output;
    fn visit_if(&mut self, expr: &mut IfExpr, span: &SourceSpan) -> Self::Output;
    fn visit_literal(&mut self, expr: &mut LiteralExpr, span: &SourceSpan) -> Self::Output;
    fn visit_var_access(&mut self, expr: &mut VarAccessExpr, span: &SourceSpan) -> Self::Output;
}

impl Expression {
    pub fn accept<V: ExpressionVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        let span = &self.span;
        match &self.kind {
            ExpressionKind::Comparison(expr) => visitor.visit_comparison(expr, span),
            ExpressionKind::Binary(expr) => visitor.visit_binary(expr, span),
            ExpressionKind::Unary(expr) => visitor.visit_unary(expr, span),
            ExpressionKind::Deref(expr) => visitor.visit_deref(expr, span),
            ExpressionKind::AddressOf(expr) => visitor.visit_address_of(expr, span),
            ExpressionKind::FnCall(expr) => visitor.visit_fn_call(expr, span),
            ExpressionKind::StructConstruction(expr) => visitor.visit_struct_construction(expr, span),
            ExpressionKind::FieldAccess(expr) => visitor.visit_field_access(expr, span),
            ExpressionKind::Block(expr) => visitor.visit_block(expr, span),
            ExpressionKind::If(expr) => visitor.visit_if(expr, span),
            ExpressionKind::Literal(expr) => visitor.visit_literal(expr, span),
            ExpressionKind::VarAccess(expr) => visitor.visit_var_access(expr, span),
        }
    }

    /// Only the variant payload is lent out mutably; the node's own type
    /// slot stays with the caller.
    pub fn accept_mut<V: ExpressionVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output {
        let span = &self.span;
        match &mut self.kind {
            ExpressionKind::Comparison(expr) => visitor.visit_comparison(expr, span),
            ExpressionKind::Binary(expr) => visitor.visit_binary(expr, span),
            ExpressionKind::Unary(expr) => visitor.visit_unary(expr, span),
            ExpressionKind::Deref(expr) => visitor.visit_deref(expr, span),
            ExpressionKind::AddressOf(expr) => visitor.visit_address_of(expr, span),
            ExpressionKind::FnCall(expr) => visitor.visit_fn_call(expr, span),
            ExpressionKind::StructConstruction(expr) => visitor.visit_struct_construction(expr, span),
            ExpressionKind::FieldAccess(expr) => visitor.visit_field_access(expr, span),
            ExpressionKind::Block(expr) => visitor.visit_block(expr, span),
            ExpressionKind::If(expr) => visitor.visit_if(expr, span),
            ExpressionKind::Literal(expr) => visitor.visit_literal(expr, span),
            ExpressionKind::VarAccess(expr) => visitor.visit_var_access(expr, span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Token, TokenType};

    /// Counts nodes by walking every child
    struct NodeCounter;

    impl ExpressionVisitor for NodeCounter {
        type Output = usize;

        fn visit_comparison(&mut self, expr: &ComparisonExpr, _: &SourceSpan) -> usize {
            1 + expr.left.accept(self) + expr.right.accept(self)
        }
        fn visit_binary(&mut self, expr: &BinaryExpr, _: &SourceSpan) -> usize {
            1 + expr.left.accept(self) + expr.right.accept(self)
        }
        fn visit_unary(&mut self, expr: &UnaryExpr, _: &SourceSpan) -> usize {
            1 + expr.operand.accept(self)
        }
        fn visit_deref(&mut self, expr: &DerefExpr, _: &SourceSpan) -> usize {
            1 + expr.operand.accept(self)
        }
        fn visit_address_of(&mut self, expr: &AddressOfExpr, _: &SourceSpan) -> usize {
            1 + expr.operand.accept(self)
        }
        fn visit_fn_call(&mut self, expr: &FnCallExpr, _: &SourceSpan) -> usize {
            1 + expr.arguments.iter().map(|arg| arg.accept(self)).sum::<usize>()
        }
        fn visit_struct_construction(&mut self, expr: &StructConstructionExpr, _: &SourceSpan) -> usize {
            1 + expr.values.iter().map(|value| value.accept(self)).sum::<usize>()
        }
        fn visit_field_access(&mut self, expr: &FieldAccessExpr, _: &SourceSpan) -> usize {
            1 + expr.operand.accept(self)
        }
        fn visit_block(&mut self, expr: &BlockExpr, _: &SourceSpan) -> usize {
            1 + expr.tail.as_ref().map_or(0, |tail| tail.accept(self))
        }
        fn visit_if(&mut self, expr: &IfExpr, _: &SourceSpan) -> usize {
            1 + expr.condition.accept(self) + expr.then_branch.accept(self) + expr.else_branch.accept(self)
        }
        fn visit_literal(&mut self, _: &LiteralExpr, _: &SourceSpan) -> usize {
            1
        }
        fn visit_var_access(&mut self, _: &VarAccessExpr, _: &SourceSpan) -> usize {
            1
        }
    }

    #[test]
    fn test_accept_reaches_every_variant_child() {
        let mut ast = AstBuilder::new();
        let one = ast.literal(Token::synthetic(TokenType::IntLiteral(1)));
        let x = ast.var_access(Token::synthetic(TokenType::Identifier("x".into())));
        let sum = ast.binary(one, Token::synthetic(TokenType::Plus), x);
        let negated = ast.unary(Token::synthetic(TokenType::Minus), sum);

        assert_eq!(negated.accept(&mut NodeCounter), 4);
    }

    #[test]
    fn test_if_counts_synthesised_else() {
        let mut ast = AstBuilder::new();
        let cond = ast.literal(Token::synthetic(TokenType::True));
        let then_branch = ast.block(Vec::new(), None, SourceSpan::dummy());
        let expr = ast.if_expr(cond, then_branch, None);

        // if + condition + then block + empty else block
        assert_eq!(expr.accept(&mut NodeCounter), 4);
    }
}
