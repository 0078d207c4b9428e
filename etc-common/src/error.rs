//! Error handling for the etc compiler
//!
//! Two classes of failure exist. User-facing problems in the source program
//! are [`CompilerError`]s, collected into [`Diagnostic`]s by an
//! [`ErrorReporter`]. Bugs in the compiler itself (a pass reading an
//! annotation before the checker wrote it, and so on) are internal faults:
//! they go through [`internal_fault`] and abort, and are never reported as
//! ordinary diagnostics.

use crate::source_loc::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lexical error at {location}: {message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("Semantic error at {span}: {message}")]
    SemanticError {
        span: SourceSpan,
        message: String,
    },

    /// Several independent errors found by one phase
    #[error("{} error(s) found", .errors.len())]
    Aggregate { errors: Vec<CompilerError> },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        CompilerError::LexError { location, message }
    }

    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError { location, message }
    }

    pub fn semantic_error(message: String, span: SourceSpan) -> Self {
        CompilerError::SemanticError { span, message }
    }

    /// Where the error points to, if anywhere
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            CompilerError::LexError { location, .. } | CompilerError::ParseError { location, .. } => {
                Some(SourceSpan::from_location(location.clone()))
            }
            CompilerError::SemanticError { span, .. } => Some(span.clone()),
            CompilerError::Aggregate { .. }
            | CompilerError::IoError { .. }
            | CompilerError::InternalError { .. } => None,
        }
    }

    /// Number of individual errors carried, flattening aggregates
    pub fn error_count(&self) -> usize {
        match self {
            CompilerError::Aggregate { errors } => errors.iter().map(CompilerError::error_count).sum(),
            _ => 1,
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Abort on a broken compiler invariant.
///
/// Used for conditions that correct phase ordering makes unreachable, such as
/// reading a type slot the checker has not written yet.
#[track_caller]
pub fn internal_fault(message: impl fmt::Display) -> ! {
    panic!("internal compiler error: {message}")
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: String, span: Option<SourceSpan>) -> Self {
        Self { severity, message, span }
    }

    pub fn error(message: String, span: Option<SourceSpan>) -> Self {
        Self::new(Severity::Error, message, span)
    }

    pub fn warning(message: String, span: Option<SourceSpan>) -> Self {
        Self::new(Severity::Warning, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}: {}: {}", span, self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Collects diagnostics across phases and prints them in one go
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compiler error, flattening aggregates into one diagnostic each
    pub fn report(&mut self, error: &CompilerError) {
        match error {
            CompilerError::Aggregate { errors } => {
                for inner in errors {
                    self.report(inner);
                }
            }
            CompilerError::LexError { message, .. }
            | CompilerError::ParseError { message, .. }
            | CompilerError::SemanticError { message, .. } => {
                self.push(Diagnostic::error(message.clone(), error.span()));
            }
            other => self.push(Diagnostic::error(other.to_string(), None)),
        }
    }

    pub fn warning(&mut self, message: String, span: Option<SourceSpan>) {
        self.push(Diagnostic::warning(message, span));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    pub fn summary(&self) -> String {
        fn plural(n: usize, word: &str) -> String {
            format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
        }

        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => plural(w, "warning"),
            (e, 0) => plural(e, "error"),
            (e, w) => format!("{} and {}", plural(e, "error"), plural(w, "warning")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> SourceSpan {
        SourceSpan::new(
            SourceLocation::new("main.etc", 1, 1),
            SourceLocation::new("main.etc", 1, 5),
        )
    }

    #[test]
    fn test_reporter_flattens_aggregates() {
        let mut reporter = ErrorReporter::new();
        let error = CompilerError::Aggregate {
            errors: vec![
                CompilerError::semantic_error("first".to_string(), span()),
                CompilerError::semantic_error("second".to_string(), span()),
            ],
        };

        assert_eq!(error.error_count(), 2);
        reporter.report(&error);

        assert_eq!(reporter.error_count(), 2);
        assert_eq!(reporter.diagnostics()[1].message, "second");
        assert_eq!(reporter.diagnostics()[0].span, Some(span()));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("unknown field `z`".to_string(), Some(span()));
        assert_eq!(diag.to_string(), "main.etc:1:1-5: error: unknown field `z`");

        let diag = Diagnostic::warning("no prelude".to_string(), None);
        assert_eq!(diag.to_string(), "warning: no prelude");
    }

    #[test]
    fn test_summary() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.summary(), "No errors or warnings");

        reporter.report(&CompilerError::semantic_error("e1".to_string(), span()));
        assert_eq!(reporter.summary(), "1 error");

        reporter.report(&CompilerError::semantic_error("e2".to_string(), span()));
        reporter.warning("w1".to_string(), None);
        assert_eq!(reporter.summary(), "2 errors and 1 warning");
    }

    #[test]
    fn test_aggregate_display() {
        let one = CompilerError::Aggregate {
            errors: vec![CompilerError::IoError { message: "gone".to_string() }],
        };
        assert_eq!(one.to_string(), "1 error(s) found");
    }

    #[test]
    #[should_panic(expected = "internal compiler error: slot read")]
    fn test_internal_fault_panics() {
        internal_fault("slot read");
    }
}
