//! Top-level item parsing: structs, functions and extern declarations

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use etc_common::{CompilerError, SourceSpan};
use log::trace;

impl Parser {
    pub fn parse_item(&mut self) -> Result<Item, CompilerError> {
        if self.check(&TokenType::Struct) {
            Ok(Item::Struct(self.parse_struct_decl()?))
        } else if self.check(&TokenType::Fun) {
            Ok(Item::Function(self.parse_function_decl()?))
        } else if self.check(&TokenType::Extern) {
            Ok(Item::Extern(self.parse_extern_decl()?))
        } else {
            Err(self.unexpected("'struct', 'fun' or 'extern'").into())
        }
    }

    /// `struct Name { field: type, ... }`
    fn parse_struct_decl(&mut self) -> Result<StructDecl, CompilerError> {
        let keyword = self.expect(TokenType::Struct, "struct declaration")?;
        let name = self.expect_identifier("struct declaration")?;
        self.expect(TokenType::LeftBrace, "struct declaration")?;

        let mut fields = Vec::new();
        while !self.check(&TokenType::RightBrace) {
            let field_name = self.expect_identifier("struct field")?;
            self.expect(TokenType::Colon, "struct field")?;
            let field_type = self.parse_type()?;
            fields.push(FieldDecl {
                name: field_name,
                field_type,
            });

            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }

        let close = self.expect(TokenType::RightBrace, "struct declaration")?;
        trace!("parsed struct {} with {} fields", name.lexeme(), fields.len());

        let span = SourceSpan::new(keyword.span.start, close.span.end);
        Ok(self.ast.struct_decl(name, fields, span))
    }

    /// `fun name(params) [-> type]`, shared by definitions and externs
    fn parse_signature(&mut self) -> Result<Signature, CompilerError> {
        self.expect(TokenType::Fun, "function signature")?;
        let name = self.expect_identifier("function signature")?;
        self.expect(TokenType::LeftParen, "parameter list")?;

        let mut parameters = Vec::new();
        while !self.check(&TokenType::RightParen) {
            let param_name = self.expect_identifier("parameter")?;
            self.expect(TokenType::Colon, "parameter")?;
            let param_type = self.parse_type()?;
            parameters.push(self.ast.parameter(param_name, param_type));

            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RightParen, "parameter list")?;

        let return_type = if self.match_token(&TokenType::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };

        Ok(Signature {
            name,
            parameters,
            return_type,
        })
    }

    fn parse_function_decl(&mut self) -> Result<FunctionDecl, CompilerError> {
        let start = self.current_location();
        let signature = self.parse_signature()?;
        let body = self.parse_block()?;
        let span = SourceSpan::new(start, body.span.end.clone());

        trace!("parsed function {}", signature.name.lexeme());
        Ok(self.ast.function_decl(signature, body, span))
    }

    fn parse_extern_decl(&mut self) -> Result<ExternDecl, CompilerError> {
        let keyword = self.expect(TokenType::Extern, "extern declaration")?;
        let signature = self.parse_signature()?;
        let semi = self.expect(TokenType::Semicolon, "extern declaration")?;

        let span = SourceSpan::new(keyword.span.start, semi.span.end);
        Ok(self.ast.extern_decl(signature, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_item_from_str(input: &str) -> Result<Item, CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse_item()
    }

    #[test]
    fn test_parse_struct_decl() {
        let item = parse_item_from_str("struct Point { x: int, y: *bool, }").unwrap();
        let Item::Struct(decl) = item else {
            panic!("expected a struct");
        };
        assert_eq!(decl.name.lexeme(), "Point");
        assert_eq!(decl.fields.len(), 2);
        assert_eq!(decl.fields[1].field_type.to_string(), "*bool");
    }

    #[test]
    fn test_parse_function_signature() {
        let item = parse_item_from_str("fun add(a: int, b: int) -> int { a + b }").unwrap();
        let Item::Function(decl) = item else {
            panic!("expected a function");
        };
        assert_eq!(decl.signature.parameters.len(), 2);
        assert_eq!(decl.signature.return_type.map(|t| t.to_string()), Some("int".to_string()));
        assert!(matches!(decl.body.kind, ExpressionKind::Block(_)));
    }

    #[test]
    fn test_parse_extern_without_return_type() {
        let item = parse_item_from_str("extern fun print(n: int);").unwrap();
        let Item::Extern(decl) = item else {
            panic!("expected an extern");
        };
        assert!(decl.signature.return_type.is_none());
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let err = parse_item_from_str("var x = 1;").unwrap_err();
        assert!(matches!(err, CompilerError::ParseError { .. }));
    }
}
