//! Semantic analysis error definitions
//!
//! Every error points at the node that caused it. They are collected by the
//! checker and surface as `CompilerError::SemanticError`.

use crate::types::Type;
use etc_common::{CompilerError, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String, span: SourceSpan },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String, span: SourceSpan },

    #[error("Undefined type: '{name}'")]
    UndefinedType { name: String, span: SourceSpan },

    #[error("Struct '{struct_name}' has no field '{field}'")]
    UnknownField {
        struct_name: String,
        field: String,
        span: SourceSpan,
    },

    #[error("Field access on non-struct type {found}")]
    NotAStruct { found: Type, span: SourceSpan },

    #[error("Expression does not denote a storage location")]
    NotAnLvalue { span: SourceSpan },

    #[error("Cannot take the address of a location reached through a pointer")]
    NotAddressable { span: SourceSpan },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        span: SourceSpan,
    },

    #[error("Invalid operand for {operation}: {operand_type}")]
    InvalidOperand {
        operation: String,
        operand_type: Type,
        span: SourceSpan,
    },

    #[error("Function '{function}' expects {expected} argument(s), found {found}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        found: usize,
        span: SourceSpan,
    },

    #[error("Struct '{struct_name}' has {expected} field(s), found {found} value(s)")]
    FieldCountMismatch {
        struct_name: String,
        expected: usize,
        found: usize,
        span: SourceSpan,
    },

    #[error("If branches have different types: {then_type} and {else_type}")]
    BranchTypeMismatch {
        then_type: Type,
        else_type: Type,
        span: SourceSpan,
    },

    #[error("Return type mismatch: expected {expected}, found {found}")]
    ReturnTypeMismatch {
        expected: Type,
        found: Type,
        span: SourceSpan,
    },

    #[error("Redefinition of '{name}'")]
    Redefinition { name: String, span: SourceSpan },

    #[error("Incomplete type: {type_name}")]
    IncompleteType { type_name: String, span: SourceSpan },

    #[error("Integer literal {value} does not fit in int")]
    IntegerOutOfRange { value: u64, span: SourceSpan },

    #[error("No 'main' function defined")]
    MissingMain { span: SourceSpan },
}

impl SemanticError {
    pub fn span(&self) -> &SourceSpan {
        match self {
            SemanticError::UndefinedVariable { span, .. }
            | SemanticError::UndefinedFunction { span, .. }
            | SemanticError::UndefinedType { span, .. }
            | SemanticError::UnknownField { span, .. }
            | SemanticError::NotAStruct { span, .. }
            | SemanticError::NotAnLvalue { span }
            | SemanticError::NotAddressable { span }
            | SemanticError::TypeMismatch { span, .. }
            | SemanticError::InvalidOperand { span, .. }
            | SemanticError::ArgumentCountMismatch { span, .. }
            | SemanticError::FieldCountMismatch { span, .. }
            | SemanticError::BranchTypeMismatch { span, .. }
            | SemanticError::ReturnTypeMismatch { span, .. }
            | SemanticError::Redefinition { span, .. }
            | SemanticError::IncompleteType { span, .. }
            | SemanticError::IntegerOutOfRange { span, .. }
            | SemanticError::MissingMain { span } => span,
        }
    }
}

impl From<SemanticError> for CompilerError {
    fn from(err: SemanticError) -> Self {
        CompilerError::semantic_error(err.to_string(), err.span().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_and_span_survive_conversion() {
        let err = SemanticError::TypeMismatch {
            expected: Type::INT,
            found: Type::pointer_to(Type::BOOL),
            span: SourceSpan::dummy(),
        };
        let converted: CompilerError = err.into();
        assert_eq!(converted.span(), Some(SourceSpan::dummy()));
        assert!(converted.to_string().contains("expected int, found *bool"));
    }
}
