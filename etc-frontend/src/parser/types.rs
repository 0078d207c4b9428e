//! Type annotation parsing

use crate::ast::{TypeExpr, TypeExprKind};
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use etc_common::SourceSpan;

impl Parser {
    /// Parse a written type: `name` or `*type`
    pub fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check(&TokenType::Star) {
            let star = self.expect(TokenType::Star, "pointer type")?;
            let inner = self.parse_type()?;
            let span = SourceSpan::new(star.span.start.clone(), inner.span.end.clone());
            return Ok(TypeExpr {
                kind: TypeExprKind::Pointer(Box::new(inner)),
                span,
            });
        }

        let name = self.expect_identifier("type")?;
        Ok(TypeExpr {
            kind: TypeExprKind::Named(name.lexeme()),
            span: name.span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_type_from_str(input: &str) -> Result<TypeExpr, ParseError> {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse_type()
    }

    #[test]
    fn test_parse_nested_pointer_type() {
        let ty = parse_type_from_str("**Point").unwrap();
        assert_eq!(ty.to_string(), "**Point");
    }

    #[test]
    fn test_type_needs_a_name() {
        assert!(matches!(parse_type_from_str("*;"), Err(ParseError::UnexpectedToken { .. })));
    }
}
