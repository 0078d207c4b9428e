//! Parse error types
//!
//! Everything the parser can reject. Converted into `CompilerError` at the
//! parser boundary.

use crate::lexer::Token;
use etc_common::{CompilerError, SourceLocation};

#[derive(Debug, Clone)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: Token,
    },
    UnexpectedEndOfFile {
        expected: String,
        location: SourceLocation,
    },
    InvalidExpression {
        message: String,
        location: SourceLocation,
    },
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnexpectedToken { expected, found } => CompilerError::parse_error(
                format!("Expected {}, found '{}'", expected, found.token_type),
                found.span.start,
            ),
            ParseError::UnexpectedEndOfFile { expected, location } => {
                CompilerError::parse_error(format!("Unexpected end of file, expected {}", expected), location)
            }
            ParseError::InvalidExpression { message, location } => CompilerError::parse_error(message, location),
        }
    }
}
