//! etc compiler - Frontend
//!
//! This crate provides the frontend components for the etc compiler:
//! - Lexer: tokenizes etc source code
//! - Parser: builds the AST from tokens
//! - AST: node model, write-once annotation slots and lvalue semantics
//! - Visitor: per-variant pass dispatch
//! - Semantic analysis: name resolution, layout and type checking
//! - Printer: renders a tree back to source form

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod semantic;
pub mod types;
pub mod visitor;

pub use ast::{AstBuilder, Expression, ExpressionKind, Item, Module, NodeIdGenerator, Statement, StatementKind};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseError, Parser};
pub use printer::AstPrinter;
pub use semantic::{SemanticError, TypeChecker};
pub use types::{StructField, Type, TypeError};
pub use visitor::{ExpressionVisitor, ExpressionVisitorMut};

use etc_common::CompilerError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the prelude inside a stdlib directory
pub const PRELUDE_FILE: &str = "prelude.etc";

/// File name reported for in-memory sources
const INPUT_NAME: &str = "<input>";

/// Settings for one compilation
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Test builds may omit `main`
    pub test_build: bool,
    /// Directory holding `prelude.etc`
    pub stdlib_path: Option<PathBuf>,
}

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Tokenize source code (for debugging)
    pub fn tokenize_source(source: &str) -> Result<Vec<Token>, CompilerError> {
        Lexer::new(source).tokenize()
    }

    /// Parse etc source code into an AST
    pub fn parse_source(source: &str) -> Result<Module, CompilerError> {
        Self::parse_named(source, INPUT_NAME, AstBuilder::new()).map(|(module, _)| module)
    }

    fn parse_named(source: &str, filename: &str, ast: AstBuilder) -> Result<(Module, AstBuilder), CompilerError> {
        let tokens = Lexer::with_filename(source, filename).tokenize()?;
        let mut parser = Parser::with_builder(tokens, ast);
        let module = parser.parse_module()?;
        Ok((module, parser.into_builder()))
    }

    /// Parse and type check etc source code
    pub fn analyze_source(source: &str, options: &CompileOptions) -> Result<Module, CompilerError> {
        let mut module = Self::parse_source(source)?;
        semantic::check_module(&mut module, INPUT_NAME, !options.test_build)?;
        Ok(module)
    }

    /// Load the main module from disk, prepend the prelude if the stdlib
    /// has one, and type check the result.
    pub fn compile_file(main_path: &Path, options: &CompileOptions) -> Result<Module, CompilerError> {
        let mut ast = AstBuilder::new();
        let mut prelude = None;

        if let Some(stdlib) = &options.stdlib_path {
            let prelude_path = stdlib.join(PRELUDE_FILE);
            if prelude_path.is_file() {
                info!("loading prelude from {}", prelude_path.display());
                let source = fs::read_to_string(&prelude_path)?;
                let (module, builder) = Self::parse_named(&source, &prelude_path.display().to_string(), ast)?;
                prelude = Some(module);
                ast = builder;
            } else {
                debug!("no prelude in {}", stdlib.display());
            }
        }

        info!("compiling {}", main_path.display());
        let source = fs::read_to_string(main_path)?;
        let main_file = main_path.display().to_string();
        let (mut module, _) = Self::parse_named(&source, &main_file, ast)?;
        if let Some(prelude) = prelude {
            module.prepend(prelude);
        }

        semantic::check_module(&mut module, &main_file, !options.test_build)?;
        Ok(module)
    }

    /// Annotated tree as pretty-printed JSON
    pub fn module_to_json(module: &Module) -> Result<String, CompilerError> {
        serde_json::to_string_pretty(module).map_err(|e| CompilerError::InternalError {
            message: format!("failed to serialize module: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_tokenize() {
        let tokens = Frontend::tokenize_source("var x = 42;").unwrap();

        assert_eq!(tokens.len(), 6);
        assert!(matches!(tokens[0].token_type, TokenType::Var));
        assert!(matches!(tokens[1].token_type, TokenType::Identifier(_)));
        assert!(matches!(tokens[2].token_type, TokenType::Equal));
        assert!(matches!(tokens[3].token_type, TokenType::IntLiteral(42)));
        assert!(matches!(tokens[4].token_type, TokenType::Semicolon));
        assert!(matches!(tokens[5].token_type, TokenType::EndOfFile));
    }

    #[test]
    fn test_frontend_analyze_requires_main() {
        let release = CompileOptions::default();
        let test = CompileOptions {
            test_build: true,
            ..CompileOptions::default()
        };

        assert!(Frontend::analyze_source("fun f() { }", &release).is_err());
        assert!(Frontend::analyze_source("fun f() { }", &test).is_ok());
    }

    #[test]
    fn test_json_dump_carries_annotations() {
        let module = Frontend::analyze_source("fun main() -> int { 1 + 2 }", &CompileOptions::default()).unwrap();
        let json = Frontend::module_to_json(&module).unwrap();
        assert!(json.contains("\"Resolved\""));
        assert!(json.contains("\"main\""));
    }

    #[test]
    fn test_frontend_parse_error_surfaces() {
        let err = Frontend::parse_source("fun main( { }").unwrap_err();
        assert!(matches!(err, CompilerError::ParseError { .. }));
    }
}
