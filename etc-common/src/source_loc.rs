//! Source location tracking for diagnostics
//!
//! Every token and AST node carries a span so that semantic errors can
//! point back at the exact piece of source that caused them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source file (line and column are 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            column,
        }
    }

    /// Location in an unnamed buffer, used by tests and REPL-style input
    pub fn new_simple(line: u32, column: u32) -> Self {
        Self::new("<input>", line, column)
    }

    /// Create a dummy location for synthesised nodes and tests
    pub fn dummy() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A span in a source file (from start to end location)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Create a span covering a single location
    pub fn from_location(location: SourceLocation) -> Self {
        Self {
            end: location.clone(),
            start: location,
        }
    }

    pub fn dummy() -> Self {
        Self::from_location(SourceLocation::dummy())
    }

    pub fn same_file(&self, other: &SourceSpan) -> bool {
        self.start.filename == other.start.filename
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Spans from different files cannot be merged; `self` is returned as is.
    pub fn extend(&self, other: &SourceSpan) -> SourceSpan {
        if !self.same_file(other) {
            return self.clone();
        }

        let start = if (self.start.line, self.start.column) <= (other.start.line, other.start.column) {
            self.start.clone()
        } else {
            other.start.clone()
        };

        let end = if (self.end.line, self.end.column) >= (other.end.line, other.end.column) {
            self.end.clone()
        } else {
            other.end.clone()
        };

        SourceSpan::new(start, end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.filename != self.end.filename {
            write!(f, "{} to {}", self.start, self.end)
        } else if self.start.line == self.end.line {
            if self.start.column == self.end.column {
                write!(f, "{}:{}:{}", self.start.filename, self.start.line, self.start.column)
            } else {
                write!(
                    f,
                    "{}:{}:{}-{}",
                    self.start.filename, self.start.line, self.start.column, self.end.column
                )
            }
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.start.filename, self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}

/// Trait for things that know where they came from
pub trait HasSpan {
    fn span(&self) -> &SourceSpan;
}

/// Line/column bookkeeping for the lexer
#[derive(Debug, Clone)]
pub struct SourceTracker {
    filename: String,
    line: u32,
    column: u32,
}

impl SourceTracker {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            line: 1,
            column: 1,
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(&self.filename, self.line, self.column)
    }

    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Span from `start` up to the current position
    pub fn span_from(&self, start: SourceLocation) -> SourceSpan {
        SourceSpan::new(start, self.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::new("main.etc", 42, 10);
        assert_eq!(format!("{}", loc), "main.etc:42:10");
    }

    #[test]
    fn test_source_span_same_line() {
        let span = SourceSpan::new(
            SourceLocation::new("main.etc", 1, 5),
            SourceLocation::new("main.etc", 1, 10),
        );
        assert_eq!(format!("{}", span), "main.etc:1:5-10");
    }

    #[test]
    fn test_source_span_different_lines() {
        let span = SourceSpan::new(
            SourceLocation::new("main.etc", 1, 5),
            SourceLocation::new("main.etc", 3, 10),
        );
        assert_eq!(format!("{}", span), "main.etc:1:5-3:10");
    }

    #[test]
    fn test_source_span_extend() {
        let left = SourceSpan::new(
            SourceLocation::new("main.etc", 1, 5),
            SourceLocation::new("main.etc", 1, 10),
        );
        let right = SourceSpan::new(
            SourceLocation::new("main.etc", 1, 8),
            SourceLocation::new("main.etc", 2, 5),
        );

        let extended = left.extend(&right);
        assert_eq!((extended.start.line, extended.start.column), (1, 5));
        assert_eq!((extended.end.line, extended.end.column), (2, 5));
    }

    #[test]
    fn test_extend_across_files_keeps_self() {
        let a = SourceSpan::from_location(SourceLocation::new("a.etc", 1, 1));
        let b = SourceSpan::from_location(SourceLocation::new("b.etc", 9, 9));
        assert_eq!(a.extend(&b), a);
    }

    #[test]
    fn test_source_tracker() {
        let mut tracker = SourceTracker::new("main.etc");
        let start = tracker.location();

        for ch in "hi\nt".chars() {
            tracker.advance(ch);
        }

        let span = tracker.span_from(start);
        assert_eq!((span.start.line, span.start.column), (1, 1));
        assert_eq!((span.end.line, span.end.column), (2, 2));
    }
}
