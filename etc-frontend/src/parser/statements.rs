//! Block and statement parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use etc_common::{CompilerError, SourceSpan};

/// What a block element turned out to be
enum BlockElement {
    Statement(Statement),
    Tail(Expression),
}

impl Parser {
    /// Parse `{ statements... [tail] }` into a block expression
    pub fn parse_block(&mut self) -> Result<Expression, CompilerError> {
        let open = self.expect(TokenType::LeftBrace, "block")?;

        let mut statements = Vec::new();
        let mut tail = None;
        while !self.check(&TokenType::RightBrace) && !self.check(&TokenType::EndOfFile) {
            match self.parse_block_element()? {
                BlockElement::Statement(statement) => statements.push(statement),
                BlockElement::Tail(expr) => {
                    tail = Some(expr);
                    break;
                }
            }
        }

        let close = self.expect(TokenType::RightBrace, "block")?;
        let span = SourceSpan::new(open.span.start, close.span.end);
        Ok(self.ast.block(statements, tail, span))
    }

    /// Parse a single statement
    pub fn parse_statement(&mut self) -> Result<Statement, CompilerError> {
        match self.parse_block_element()? {
            BlockElement::Statement(statement) => Ok(statement),
            // A trailing expression outside a block is a plain statement
            BlockElement::Tail(expr) => Ok(self.ast.expression_statement(expr)),
        }
    }

    fn parse_block_element(&mut self) -> Result<BlockElement, CompilerError> {
        if self.check(&TokenType::Var) {
            return Ok(BlockElement::Statement(self.parse_var_decl()?));
        }
        if self.check(&TokenType::Return) {
            return Ok(BlockElement::Statement(self.parse_return()?));
        }

        let expr = self.parse_expression()?;

        if self.match_token(&TokenType::Equal) {
            let value = self.parse_expression()?;
            let semi = self.expect(TokenType::Semicolon, "assignment")?;
            let span = SourceSpan::new(expr.span.start.clone(), semi.span.end);
            return Ok(BlockElement::Statement(self.ast.assignment(expr, value, span)));
        }

        if self.match_token(&TokenType::Semicolon) {
            return Ok(BlockElement::Statement(self.ast.expression_statement(expr)));
        }

        if self.check(&TokenType::RightBrace) {
            return Ok(BlockElement::Tail(expr));
        }

        // Blocks and ifs end in a brace and need no semicolon
        if matches!(expr.kind, ExpressionKind::Block(_) | ExpressionKind::If(_)) {
            return Ok(BlockElement::Statement(self.ast.expression_statement(expr)));
        }

        Err(self.unexpected("';' after expression").into())
    }

    /// `var name [: type] = value;`
    fn parse_var_decl(&mut self) -> Result<Statement, CompilerError> {
        let keyword = self.expect(TokenType::Var, "variable declaration")?;
        let name = self.expect_identifier("variable declaration")?;

        let annotation = if self.match_token(&TokenType::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.expect(TokenType::Equal, "variable declaration")?;
        let value = self.parse_expression()?;
        let semi = self.expect(TokenType::Semicolon, "variable declaration")?;

        let span = SourceSpan::new(keyword.span.start, semi.span.end);
        Ok(self.ast.var_decl(name, annotation, value, span))
    }

    /// `return [value];`
    fn parse_return(&mut self) -> Result<Statement, CompilerError> {
        let keyword = self.expect(TokenType::Return, "return statement")?;

        let value = if self.check(&TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let semi = self.expect(TokenType::Semicolon, "return statement")?;
        let span = SourceSpan::new(keyword.span.start, semi.span.end);
        Ok(self.ast.return_statement(value, span))
    }
}
