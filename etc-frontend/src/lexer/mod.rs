//! Lexer
//!
//! Turns etc source text into a flat token stream for the parser.
//! Whitespace and `//` line comments are dropped here.

pub mod token;

pub use token::{Token, TokenType};

use crate::types::INT_MIN_MAGNITUDE;
use etc_common::{CompilerError, SourceLocation, SourceTracker};
use log::trace;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    tracker: SourceTracker,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_filename(input, "<input>")
    }

    pub fn with_filename(input: &str, filename: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            tracker: SourceTracker::new(filename),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        self.tracker.advance(ch);
        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        self.tracker.location()
    }

    /// Consume `next` if it follows, yielding `double`, otherwise `single`
    fn one_or_two(&mut self, next: char, double: TokenType, single: TokenType) -> TokenType {
        if self.current_char() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.current_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_char(1) == Some('/') => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn tokenize_word(&mut self) -> TokenType {
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenType::keyword(&word).unwrap_or(TokenType::Identifier(word))
    }

    fn tokenize_integer(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        let mut digits = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // One past `i64::MAX` is still accepted: it is `i64::MIN` once negated
        match digits.parse::<u64>() {
            Ok(value) if value <= INT_MIN_MAGNITUDE => Ok(TokenType::IntLiteral(value)),
            _ => Err(CompilerError::lexer_error(format!("Integer literal out of range: {digits}"), start)),
        }
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_trivia();

        let start = self.current_location();

        let token_type = match self.current_char() {
            None => return Ok(Token::eof(start)),

            Some(ch) if ch.is_alphabetic() || ch == '_' => self.tokenize_word(),
            Some(ch) if ch.is_ascii_digit() => self.tokenize_integer()?,

            Some(ch) => {
                self.advance();
                match ch {
                    '+' => TokenType::Plus,
                    '-' => self.one_or_two('>', TokenType::Arrow, TokenType::Minus),
                    '*' => TokenType::Star,
                    '/' => TokenType::Slash,
                    '%' => TokenType::Percent,
                    '&' => self.one_or_two('&', TokenType::AmpersandAmpersand, TokenType::Ampersand),
                    '!' => self.one_or_two('=', TokenType::BangEqual, TokenType::Bang),
                    '=' => self.one_or_two('=', TokenType::EqualEqual, TokenType::Equal),
                    '<' => self.one_or_two('=', TokenType::LessEqual, TokenType::Less),
                    '>' => self.one_or_two('=', TokenType::GreaterEqual, TokenType::Greater),
                    '|' if self.current_char() == Some('|') => {
                        self.advance();
                        TokenType::PipePipe
                    }
                    ':' => TokenType::Colon,
                    '(' => TokenType::LeftParen,
                    ')' => TokenType::RightParen,
                    '{' => TokenType::LeftBrace,
                    '}' => TokenType::RightBrace,
                    ';' => TokenType::Semicolon,
                    ',' => TokenType::Comma,
                    '.' => TokenType::Dot,
                    other => {
                        return Err(CompilerError::lexer_error(
                            format!("Unexpected character '{other}'"),
                            start,
                        ));
                    }
                }
            }
        };

        Ok(Token::new(token_type, self.tracker.span_from(start)))
    }

    /// Tokenize the whole input. The result always ends with `EndOfFile`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token_type == TokenType::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }

        trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }
}
