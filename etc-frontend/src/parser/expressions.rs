//! Expression parsing with operator precedence
//!
//! From loosest to tightest: `||`, `&&`, comparisons (non-associative),
//! `+ -`, `* / %`, prefix `- ! * &`, postfix `.field`, primary.

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use etc_common::{CompilerError, SourceSpan};

impl Parser {
    /// Parse an expression
    pub fn parse_expression(&mut self) -> Result<Expression, CompilerError> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> Result<Expression, CompilerError> {
        let mut left = self.parse_logical_and_expression()?;

        while self.check(&TokenType::PipePipe) {
            let operator = self.expect(TokenType::PipePipe, "logical or")?;
            let right = self.parse_logical_and_expression()?;
            left = self.ast.binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> Result<Expression, CompilerError> {
        let mut left = self.parse_comparison_expression()?;

        while self.check(&TokenType::AmpersandAmpersand) {
            let operator = self.expect(TokenType::AmpersandAmpersand, "logical and")?;
            let right = self.parse_comparison_expression()?;
            left = self.ast.binary(left, operator, right);
        }

        Ok(left)
    }

    fn at_comparison_operator(&self) -> bool {
        self.peek()
            .is_some_and(|t| ComparisonOp::from_token(&t.token_type).is_some())
    }

    /// `a < b` but never `a < b < c`
    fn parse_comparison_expression(&mut self) -> Result<Expression, CompilerError> {
        let left = self.parse_additive_expression()?;
        if !self.at_comparison_operator() {
            return Ok(left);
        }

        let operator = self.advance().ok_or_else(|| self.unexpected("comparison operator"))?;
        let right = self.parse_additive_expression()?;

        if self.at_comparison_operator() {
            return Err(ParseError::InvalidExpression {
                message: "Comparison operators cannot be chained".to_string(),
                location: self.current_location(),
            }
            .into());
        }

        Ok(self.ast.comparison(left, operator, right))
    }

    fn parse_additive_expression(&mut self) -> Result<Expression, CompilerError> {
        let mut left = self.parse_multiplicative_expression()?;

        while self.check(&TokenType::Plus) || self.check(&TokenType::Minus) {
            let operator = self.advance().ok_or_else(|| self.unexpected("'+' or '-'"))?;
            let right = self.parse_multiplicative_expression()?;
            left = self.ast.binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression, CompilerError> {
        let mut left = self.parse_unary_expression()?;

        while self.check(&TokenType::Star) || self.check(&TokenType::Slash) || self.check(&TokenType::Percent) {
            let operator = self.advance().ok_or_else(|| self.unexpected("'*', '/' or '%'"))?;
            let right = self.parse_unary_expression()?;
            left = self.ast.binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, CompilerError> {
        let Some(token_type) = self.peek().map(|t| t.token_type.clone()) else {
            return Err(self.unexpected("expression").into());
        };

        match token_type {
            TokenType::Minus | TokenType::Bang => {
                let operator = self.expect(token_type, "unary expression")?;
                let operand = self.parse_unary_expression()?;
                Ok(self.ast.unary(operator, operand))
            }
            TokenType::Star => {
                let star = self.expect(TokenType::Star, "dereference")?;
                let operand = self.parse_unary_expression()?;
                Ok(self.ast.deref(star, operand))
            }
            TokenType::Ampersand => {
                let ampersand = self.expect(TokenType::Ampersand, "address-of")?;
                let operand = self.parse_unary_expression()?;
                Ok(self.ast.address_of(ampersand, operand))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> Result<Expression, CompilerError> {
        let mut expr = self.parse_primary_expression()?;

        while self.match_token(&TokenType::Dot) {
            let field = self.expect_identifier("field access")?;
            expr = self.ast.field_access(expr, field);
        }

        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> Result<Expression, CompilerError> {
        let Some(token_type) = self.peek().map(|t| t.token_type.clone()) else {
            return Err(self.unexpected("expression").into());
        };

        match token_type {
            TokenType::IntLiteral(_) | TokenType::True | TokenType::False => {
                let token = self.expect(token_type, "literal")?;
                Ok(self.ast.literal(token))
            }
            TokenType::Identifier(_) => self.parse_identifier_expression(),
            TokenType::LeftParen => {
                self.expect(TokenType::LeftParen, "parenthesized expression")?;
                let expr = self.parse_expression()?;
                self.expect(TokenType::RightParen, "parenthesized expression")?;
                Ok(expr)
            }
            TokenType::LeftBrace => self.parse_block(),
            TokenType::If => self.parse_if_expression(),
            _ => Err(self.unexpected("expression").into()),
        }
    }

    /// Variable, call `f(a, b)` or struct construction `Name:{a, b}`
    fn parse_identifier_expression(&mut self) -> Result<Expression, CompilerError> {
        let name = self.expect_identifier("expression")?;

        if self.check(&TokenType::LeftParen) {
            self.expect(TokenType::LeftParen, "call")?;
            let arguments = self.parse_expression_list(TokenType::RightParen)?;
            let close = self.expect(TokenType::RightParen, "call")?;
            let span = SourceSpan::new(name.span.start.clone(), close.span.end);
            return Ok(self.ast.fn_call(name, arguments, span));
        }

        let opens_construction = self.check(&TokenType::Colon)
            && self.peek_nth(1).is_some_and(|t| t.token_type == TokenType::LeftBrace);
        if opens_construction {
            self.expect(TokenType::Colon, "struct construction")?;
            self.expect(TokenType::LeftBrace, "struct construction")?;
            let values = self.parse_expression_list(TokenType::RightBrace)?;
            let close = self.expect(TokenType::RightBrace, "struct construction")?;
            let span = SourceSpan::new(name.span.start.clone(), close.span.end);
            return Ok(self.ast.struct_construction(name, values, span));
        }

        Ok(self.ast.var_access(name))
    }

    /// Comma separated expressions up to (not including) `terminator`
    fn parse_expression_list(&mut self, terminator: TokenType) -> Result<Vec<Expression>, CompilerError> {
        let mut list = Vec::new();
        while !self.check(&terminator) {
            list.push(self.parse_expression()?);
            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }
        Ok(list)
    }

    /// `if cond { ... } [else { ... } | else if ...]`
    fn parse_if_expression(&mut self) -> Result<Expression, CompilerError> {
        self.expect(TokenType::If, "if expression")?;
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(&TokenType::Else) {
            if self.check(&TokenType::If) {
                Some(self.parse_if_expression()?)
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(self.ast.if_expr(condition, then_branch, else_branch))
    }
}
