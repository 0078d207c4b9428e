//! Storage-location ("lvalue") semantics
//!
//! `VarAccess`, `FieldAccess` and `Deref` denote storage. A location is
//! *direct* when its address is fixed at compile time and *indirect* when
//! reaching it means following a pointer at run time. Directness flows
//! through field projection; a dereference is never direct.

use super::expressions::{Expression, ExpressionKind};
use super::slot::Slot;
use etc_common::internal_fault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Storage location identifier: byte offset into the enclosing frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Add<u64> for Address {
    type Output = Address;

    fn add(self, offset: u64) -> Address {
        Address(self.0 + offset)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Resolved storage of an lvalue node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Direct(Address),
    /// Only reachable through a runtime pointer; no compile-time address
    Indirect,
}

impl Location {
    pub fn is_direct(&self) -> bool {
        matches!(self, Location::Direct(_))
    }

    /// Location of a field `offset` bytes into the struct stored here
    pub fn project(self, offset: u64) -> Location {
        match self {
            Location::Direct(base) => Location::Direct(base + offset),
            Location::Indirect => Location::Indirect,
        }
    }
}

pub type LvalueSlot = Slot<Location>;

impl Expression {
    /// Does this expression denote a storage location?
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::VarAccess(_) | ExpressionKind::FieldAccess(_) | ExpressionKind::Deref(_)
        )
    }

    /// Whether the location is known at compile time.
    ///
    /// Faults on non-lvalues and on lvalues the checker has not resolved.
    #[track_caller]
    pub fn is_direct(&self) -> bool {
        match &self.kind {
            ExpressionKind::VarAccess(var) => var.location.get().is_direct(),
            ExpressionKind::FieldAccess(access) => access.operand.is_direct(),
            ExpressionKind::Deref(_) => false,
            _ => internal_fault(format!("is_direct() on non-lvalue {} node {}", self.kind_name(), self.node_id)),
        }
    }

    /// Compile-time address of a direct lvalue.
    ///
    /// There is no fixed address behind a dereference, so asking for one is
    /// a fault, as is asking before resolution.
    #[track_caller]
    pub fn address(&self) -> Address {
        let location = match &self.kind {
            ExpressionKind::VarAccess(var) => *var.location.get(),
            ExpressionKind::FieldAccess(access) => *access.location.get(),
            ExpressionKind::Deref(_) => {
                internal_fault("cannot take the address of a pointer dereference at compile time")
            }
            _ => internal_fault(format!("address() on non-lvalue {} node {}", self.kind_name(), self.node_id)),
        };

        match location {
            Location::Direct(address) => address,
            Location::Indirect => internal_fault(format!("node {} has no compile-time address", self.node_id)),
        }
    }
}
