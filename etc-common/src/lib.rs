//! Etc Compiler - Common Types and Utilities
//!
//! This crate contains shared types, error definitions, and utilities
//! used across all components of the etc compiler.

pub mod error;
pub mod types;
pub mod source_loc;

pub use error::{internal_fault, CompilerError, Diagnostic, ErrorReporter, Severity};
pub use types::*;
pub use source_loc::{HasSpan, SourceLocation, SourceSpan, SourceTracker};
