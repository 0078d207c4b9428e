//! Node constructors
//!
//! The only way the parser creates nodes. Every constructor takes children
//! that are already complete, assigns a fresh `NodeId` and derives the node
//! span from its parts, so no pass ever sees a half-built node.

use super::expressions::*;
use super::lvalue::LvalueSlot;
use super::slot::Slot;
use super::statements::*;
use super::{NodeId, NodeIdGenerator};
use crate::lexer::Token;
use etc_common::SourceSpan;

#[derive(Debug, Default)]
pub struct AstBuilder {
    ids: NodeIdGenerator,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        self.ids.next()
    }

    fn expression(&mut self, kind: ExpressionKind, span: SourceSpan) -> Expression {
        Expression::new(self.ids.next(), kind, span)
    }

    pub fn comparison(&mut self, left: Expression, operator: Token, right: Expression) -> Expression {
        let span = left.span.extend(&right.span);
        self.expression(
            ExpressionKind::Comparison(ComparisonExpr {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }),
            span,
        )
    }

    pub fn binary(&mut self, left: Expression, operator: Token, right: Expression) -> Expression {
        let span = left.span.extend(&right.span);
        self.expression(
            ExpressionKind::Binary(BinaryExpr {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }),
            span,
        )
    }

    pub fn unary(&mut self, operator: Token, operand: Expression) -> Expression {
        let span = operator.span.extend(&operand.span);
        self.expression(
            ExpressionKind::Unary(UnaryExpr {
                operator,
                operand: Box::new(operand),
            }),
            span,
        )
    }

    pub fn deref(&mut self, star: Token, operand: Expression) -> Expression {
        let span = star.span.extend(&operand.span);
        self.expression(
            ExpressionKind::Deref(DerefExpr {
                star,
                operand: Box::new(operand),
            }),
            span,
        )
    }

    pub fn address_of(&mut self, ampersand: Token, operand: Expression) -> Expression {
        let span = ampersand.span.extend(&operand.span);
        self.expression(
            ExpressionKind::AddressOf(AddressOfExpr {
                ampersand,
                operand: Box::new(operand),
            }),
            span,
        )
    }

    /// `span` should cover the closing parenthesis
    pub fn fn_call(&mut self, name: Token, arguments: Vec<Expression>, span: SourceSpan) -> Expression {
        self.expression(
            ExpressionKind::FnCall(FnCallExpr {
                name,
                arguments,
                is_native: false,
            }),
            span,
        )
    }

    pub fn struct_construction(&mut self, struct_name: Token, values: Vec<Expression>, span: SourceSpan) -> Expression {
        self.expression(
            ExpressionKind::StructConstruction(StructConstructionExpr { struct_name, values }),
            span,
        )
    }

    pub fn field_access(&mut self, operand: Expression, field: Token) -> Expression {
        let span = operand.span.extend(&field.span);
        self.expression(
            ExpressionKind::FieldAccess(FieldAccessExpr {
                operand: Box::new(operand),
                field,
                location: LvalueSlot::Unresolved,
            }),
            span,
        )
    }

    /// `span` should cover both braces
    pub fn block(&mut self, statements: Vec<Statement>, tail: Option<Expression>, span: SourceSpan) -> Expression {
        self.expression(
            ExpressionKind::Block(BlockExpr {
                statements,
                tail: tail.map(Box::new),
            }),
            span,
        )
    }

    /// A missing `else` becomes an empty block right here, so no later pass
    /// has to deal with a one-armed `if`.
    pub fn if_expr(
        &mut self,
        condition: Expression,
        then_branch: Expression,
        else_branch: Option<Expression>,
    ) -> Expression {
        let else_branch = match else_branch {
            Some(branch) => branch,
            None => {
                let at_end = SourceSpan::from_location(then_branch.span.end.clone());
                self.block(Vec::new(), None, at_end)
            }
        };

        let span = condition.span.extend(&else_branch.span);
        self.expression(
            ExpressionKind::If(IfExpr {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }),
            span,
        )
    }

    pub fn literal(&mut self, token: Token) -> Expression {
        let span = token.span.clone();
        self.expression(ExpressionKind::Literal(LiteralExpr { token }), span)
    }

    pub fn var_access(&mut self, name: Token) -> Expression {
        let span = name.span.clone();
        self.expression(
            ExpressionKind::VarAccess(VarAccessExpr {
                name,
                location: LvalueSlot::Unresolved,
            }),
            span,
        )
    }

    fn statement(&mut self, kind: StatementKind, span: SourceSpan) -> Statement {
        Statement {
            node_id: self.ids.next(),
            kind,
            span,
        }
    }

    pub fn expression_statement(&mut self, expression: Expression) -> Statement {
        let span = expression.span.clone();
        self.statement(StatementKind::Expression(expression), span)
    }

    pub fn var_decl(
        &mut self,
        name: Token,
        annotation: Option<TypeExpr>,
        value: Expression,
        span: SourceSpan,
    ) -> Statement {
        self.statement(
            StatementKind::VarDecl(VarDecl {
                name,
                annotation,
                value,
                address: Slot::Unresolved,
            }),
            span,
        )
    }

    pub fn assignment(&mut self, target: Expression, value: Expression, span: SourceSpan) -> Statement {
        self.statement(StatementKind::Assignment { target, value }, span)
    }

    pub fn return_statement(&mut self, value: Option<Expression>, span: SourceSpan) -> Statement {
        self.statement(StatementKind::Return(value), span)
    }

    pub fn struct_decl(&mut self, name: Token, fields: Vec<FieldDecl>, span: SourceSpan) -> StructDecl {
        StructDecl {
            node_id: self.ids.next(),
            name,
            fields,
            span,
            resolved: Slot::Unresolved,
        }
    }

    pub fn parameter(&mut self, name: Token, param_type: TypeExpr) -> Parameter {
        Parameter {
            node_id: self.ids.next(),
            name,
            param_type,
            address: Slot::Unresolved,
        }
    }

    pub fn function_decl(&mut self, signature: Signature, body: Expression, span: SourceSpan) -> FunctionDecl {
        FunctionDecl {
            node_id: self.ids.next(),
            signature,
            body,
            span,
            frame_size: Slot::Unresolved,
        }
    }

    pub fn extern_decl(&mut self, signature: Signature, span: SourceSpan) -> ExternDecl {
        ExternDecl {
            node_id: self.ids.next(),
            signature,
            span,
        }
    }
}
