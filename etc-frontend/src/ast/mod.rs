//! Abstract Syntax Tree definitions
//!
//! The tree is built once, bottom-up, by the parser through [`AstBuilder`].
//! After that its shape never changes; later passes only fill in annotation
//! slots (types, storage locations) or read them.

pub mod builder;
pub mod expressions;
pub mod lvalue;
pub mod ops;
pub mod slot;
pub mod statements;

pub use builder::AstBuilder;
pub use expressions::*;
pub use lvalue::{Address, Location, LvalueSlot};
pub use ops::{BinaryOp, ComparisonOp, UnaryOp};
pub use slot::Slot;
pub use statements::*;

/// Unique identifier for AST nodes
pub type NodeId = u32;

#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator {
    next_id: NodeId,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn next(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
