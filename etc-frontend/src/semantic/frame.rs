//! Per-function storage allocation
//!
//! Parameters and locals get consecutive byte offsets in the function's
//! frame, in the order the checker declares them. Space is not reused
//! between sibling blocks. Every slot is at least one byte wide, so two
//! live variables never share an address.

use crate::ast::Address;
use crate::types::Type;

#[derive(Debug, Default)]
pub struct FrameAllocator {
    next_offset: u64,
}

impl FrameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve storage for a value of type `ty`.
    ///
    /// Returns `None` for types without storage: unsized ones and
    /// zero-sized ones such as `unit`.
    pub fn allocate(&mut self, ty: &Type) -> Option<Address> {
        let size = ty.size_in_bytes().filter(|&size| size > 0)?;
        let address = Address(self.next_offset);
        self.next_offset += size;
        Some(address)
    }

    /// Bytes handed out so far
    pub fn frame_size(&self) -> u64 {
        self.next_offset
    }
}
