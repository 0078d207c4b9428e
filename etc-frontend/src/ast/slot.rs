//! Write-once annotation slots
//!
//! The parser builds nodes with every slot unresolved; the type checker fills
//! each slot exactly once. Reading an unresolved slot or writing a resolved
//! one means a pass ran out of order, which is a compiler bug.

use etc_common::internal_fault;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot<T> {
    Unresolved,
    Resolved(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Unresolved
    }
}

impl<T> Slot<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(_))
    }

    /// Fill the slot. Faults if it was already filled.
    #[track_caller]
    pub fn set(&mut self, value: T) {
        if self.is_resolved() {
            internal_fault("annotation slot written twice");
        }
        *self = Slot::Resolved(value);
    }

    /// Read the slot. Faults if the checker has not filled it yet.
    #[track_caller]
    pub fn get(&self) -> &T {
        match self {
            Slot::Resolved(value) => value,
            Slot::Unresolved => internal_fault("annotation slot read before it was resolved"),
        }
    }

    pub fn try_get(&self) -> Option<&T> {
        match self {
            Slot::Resolved(value) => Some(value),
            Slot::Unresolved => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut slot = Slot::default();
        assert!(slot.try_get().is_none());
        slot.set(7u32);
        assert_eq!(*slot.get(), 7);
        assert_eq!(slot.try_get(), Some(&7));
    }

    #[test]
    #[should_panic(expected = "internal compiler error")]
    fn test_read_unresolved_faults() {
        let slot: Slot<u32> = Slot::Unresolved;
        slot.get();
    }

    #[test]
    #[should_panic(expected = "written twice")]
    fn test_double_write_faults() {
        let mut slot = Slot::Unresolved;
        slot.set(1u32);
        slot.set(2u32);
    }
}
