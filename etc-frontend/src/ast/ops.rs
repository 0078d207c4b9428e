//! Operator definitions
//!
//! Nodes keep the exact operator token; these enums are recovered from it
//! when a pass needs to dispatch on the operator kind.

use crate::lexer::TokenType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add, Sub, Mul, Div, Mod,

    // Logical
    And, Or,
}

impl BinaryOp {
    pub fn from_token(token: &TokenType) -> Option<Self> {
        let op = match token {
            TokenType::Plus => BinaryOp::Add,
            TokenType::Minus => BinaryOp::Sub,
            TokenType::Star => BinaryOp::Mul,
            TokenType::Slash => BinaryOp::Div,
            TokenType::Percent => BinaryOp::Mod,
            TokenType::AmpersandAmpersand => BinaryOp::And,
            TokenType::PipePipe => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", op_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Eq, Ne, Lt, Le, Gt, Ge,
}

impl ComparisonOp {
    pub fn from_token(token: &TokenType) -> Option<Self> {
        let op = match token {
            TokenType::EqualEqual => ComparisonOp::Eq,
            TokenType::BangEqual => ComparisonOp::Ne,
            TokenType::Less => ComparisonOp::Lt,
            TokenType::LessEqual => ComparisonOp::Le,
            TokenType::Greater => ComparisonOp::Gt,
            TokenType::GreaterEqual => ComparisonOp::Ge,
            _ => return None,
        };
        Some(op)
    }

    /// Ordering comparisons only make sense on integers
    pub fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        };
        write!(f, "{}", op_str)
    }
}

/// Value-level prefix operators. `*` and `&` have their own node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn from_token(token: &TokenType) -> Option<Self> {
        match token {
            TokenType::Minus => Some(UnaryOp::Neg),
            TokenType::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}
