//! Token definitions for the etc lexer

use etc_common::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    // Literals
    /// Magnitude only; a leading `-` is a separate token
    IntLiteral(u64),

    // Identifiers
    Identifier(String),

    // Keywords
    Struct, Fun, Extern, Var, Return, If, Else, True, False,

    // Operators
    Plus,           // +
    Minus,          // -
    Star,           // *
    Slash,          // /
    Percent,        // %
    Ampersand,      // &
    Bang,           // !
    Equal,          // =
    Less,           // <
    Greater,        // >
    Colon,          // :

    // Compound operators
    LessEqual,          // <=
    GreaterEqual,       // >=
    EqualEqual,         // ==
    BangEqual,          // !=
    AmpersandAmpersand, // &&
    PipePipe,           // ||
    Arrow,              // ->

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBrace,      // {
    RightBrace,     // }
    Semicolon,      // ;
    Comma,          // ,
    Dot,            // .

    EndOfFile,
}

impl TokenType {
    /// Keyword for an identifier-shaped word, if it is one
    pub fn keyword(word: &str) -> Option<TokenType> {
        let token = match word {
            "struct" => TokenType::Struct,
            "fun" => TokenType::Fun,
            "extern" => TokenType::Extern,
            "var" => TokenType::Var,
            "return" => TokenType::Return,
            "if" => TokenType::If,
            "else" => TokenType::Else,
            "true" => TokenType::True,
            "false" => TokenType::False,
            _ => return None,
        };
        Some(token)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::IntLiteral(n) => write!(f, "{n}"),
            TokenType::Identifier(s) => write!(f, "{s}"),

            TokenType::Struct => write!(f, "struct"),
            TokenType::Fun => write!(f, "fun"),
            TokenType::Extern => write!(f, "extern"),
            TokenType::Var => write!(f, "var"),
            TokenType::Return => write!(f, "return"),
            TokenType::If => write!(f, "if"),
            TokenType::Else => write!(f, "else"),
            TokenType::True => write!(f, "true"),
            TokenType::False => write!(f, "false"),

            TokenType::Plus => write!(f, "+"),
            TokenType::Minus => write!(f, "-"),
            TokenType::Star => write!(f, "*"),
            TokenType::Slash => write!(f, "/"),
            TokenType::Percent => write!(f, "%"),
            TokenType::Ampersand => write!(f, "&"),
            TokenType::Bang => write!(f, "!"),
            TokenType::Equal => write!(f, "="),
            TokenType::Less => write!(f, "<"),
            TokenType::Greater => write!(f, ">"),
            TokenType::Colon => write!(f, ":"),

            TokenType::LessEqual => write!(f, "<="),
            TokenType::GreaterEqual => write!(f, ">="),
            TokenType::EqualEqual => write!(f, "=="),
            TokenType::BangEqual => write!(f, "!="),
            TokenType::AmpersandAmpersand => write!(f, "&&"),
            TokenType::PipePipe => write!(f, "||"),
            TokenType::Arrow => write!(f, "->"),

            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::LeftBrace => write!(f, "{{"),
            TokenType::RightBrace => write!(f, "}}"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Comma => write!(f, ","),
            TokenType::Dot => write!(f, "."),

            TokenType::EndOfFile => write!(f, "EOF"),
        }
    }
}

/// A token with location information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, span: SourceSpan) -> Self {
        Self { token_type, span }
    }

    /// Token with no source position, for nodes the compiler synthesises
    pub fn synthetic(token_type: TokenType) -> Self {
        Self::new(token_type, SourceSpan::dummy())
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenType::EndOfFile, SourceSpan::from_location(location))
    }

    /// Identifier text, if this is an identifier token
    pub fn identifier(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Identifier or keyword text as written in the source
    pub fn lexeme(&self) -> String {
        self.token_type.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token_type, self.span.start)
    }
}
