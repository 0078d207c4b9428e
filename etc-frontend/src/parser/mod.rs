//! Recursive descent parser
//!
//! Consumes the token stream and builds the AST. Nodes are only ever created
//! through [`AstBuilder`], after all of their children have been parsed.

pub mod declarations;
pub mod errors;
pub mod expressions;
pub mod statements;
pub mod types;

use crate::ast::*;
use crate::lexer::{Token, TokenType};
use etc_common::{CompilerError, SourceLocation};
use log::debug;
use std::collections::VecDeque;

pub use errors::ParseError;

pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) ast: AstBuilder,
    /// Position reported once the stream is exhausted
    eof_location: SourceLocation,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_builder(tokens, AstBuilder::new())
    }

    /// Continue numbering nodes from an existing builder, so that several
    /// files parsed into one module never share a `NodeId`.
    pub fn with_builder(tokens: Vec<Token>, ast: AstBuilder) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.span.end.clone())
            .unwrap_or_else(SourceLocation::dummy);

        Self {
            tokens: tokens.into(),
            ast,
            eof_location,
        }
    }

    pub fn into_builder(self) -> AstBuilder {
        self.ast
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Peek `offset` tokens past the current one
    pub(crate) fn peek_nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(offset)
    }

    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        if let Some(token) = self.peek() {
            std::mem::discriminant(&token.token_type) == std::mem::discriminant(token_type)
        } else {
            matches!(token_type, TokenType::EndOfFile)
        }
    }

    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect and consume a specific token type
    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if std::mem::discriminant(&token.token_type) == std::mem::discriminant(&token_type) => {
                Ok(token)
            }
            Some(token) if token.token_type == TokenType::EndOfFile => Err(ParseError::UnexpectedEndOfFile {
                expected: format!("'{}' in {}", token_type, context),
                location: token.span.start,
            }),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: format!("'{}' in {}", token_type, context),
                found: token,
            }),
            None => Err(ParseError::UnexpectedEndOfFile {
                expected: format!("'{}' in {}", token_type, context),
                location: self.eof_location.clone(),
            }),
        }
    }

    /// Expect an identifier token
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<Token, ParseError> {
        self.expect(TokenType::Identifier(String::new()), context)
    }

    /// Error for the current token, which `expected` does not describe
    pub(crate) fn unexpected(&mut self, expected: &str) -> ParseError {
        match self.advance() {
            Some(token) if token.token_type != TokenType::EndOfFile => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token,
            },
            Some(token) => ParseError::UnexpectedEndOfFile {
                expected: expected.to_string(),
                location: token.span.start,
            },
            None => ParseError::UnexpectedEndOfFile {
                expected: expected.to_string(),
                location: self.eof_location.clone(),
            },
        }
    }

    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.peek() {
            Some(token) => token.span.start.clone(),
            None => self.eof_location.clone(),
        }
    }

    /// Parse a complete compilation unit
    pub fn parse_module(&mut self) -> Result<Module, CompilerError> {
        let mut items = Vec::new();

        while !self.check(&TokenType::EndOfFile) {
            items.push(self.parse_item()?);
        }

        debug!("parsed {} top-level items", items.len());
        Ok(Module { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_module_from_str(input: &str) -> Result<Module, CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse_module()
    }

    #[test]
    fn test_parse_empty_module() {
        let module = parse_module_from_str("// nothing here\n").unwrap();
        assert!(module.items.is_empty());
    }

    #[test]
    fn test_parse_items_in_order() {
        let module = parse_module_from_str(
            "struct P { x: int }\n\
             extern fun print(n: int);\n\
             fun main() { }",
        )
        .unwrap();

        let names: Vec<String> = module.items.iter().map(Item::name).collect();
        assert_eq!(names, vec!["P", "print", "main"]);
    }

    #[test]
    fn test_missing_semicolon_is_reported() {
        let err = parse_module_from_str("extern fun f()").unwrap_err();
        assert!(err.to_string().contains("end of file"), "{err}");
    }

    #[test]
    fn test_node_ids_continue_across_parsers() {
        let first = Parser::new(Lexer::new("fun a() { }").tokenize().unwrap());
        let mut first = first;
        first.parse_module().unwrap();
        let builder = first.into_builder();

        let mut second = Parser::with_builder(Lexer::new("fun b() { }").tokenize().unwrap(), builder);
        let module = second.parse_module().unwrap();
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected a function");
        };
        assert!(decl.node_id > 0);
    }
}
