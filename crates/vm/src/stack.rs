use types::{STACK_SIZE, WORD_SIZE};

use crate::memory::{read32, write32};

/// The call stack: a fixed region of 4-byte slots, separate from memory.
///
/// The stack does not own its pointer. SP lives in the register file and is
/// passed in; the methods hand back the updated value instead of storing it.
#[derive(Clone, PartialEq, Eq)]
pub struct Stack {
    slots: [u8; STACK_SIZE],
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: [0u8; STACK_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(0);
    }

    /// Store `value` at `sp` and return the new stack pointer, or `None` if
    /// the stack is full.
    pub fn push(&mut self, sp: u32, value: u32) -> Option<u32> {
        let offset = sp as usize;
        if offset.checked_add(WORD_SIZE)? > self.slots.len() {
            return None;
        }
        write32(&mut self.slots, offset, value);
        Some(sp + WORD_SIZE as u32)
    }

    /// Remove the word below `sp`, returning the new stack pointer and the
    /// value, or `None` if fewer than 4 bytes are on the stack.
    pub fn pop(&self, sp: u32) -> Option<(u32, u32)> {
        let top = sp.checked_sub(WORD_SIZE as u32)?;
        let value = self.slot(top)?;
        Some((top, value))
    }

    /// Read the word at byte `offset` without moving SP.
    pub fn slot(&self, offset: u32) -> Option<u32> {
        let offset = offset as usize;
        if offset.checked_add(WORD_SIZE)? > self.slots.len() {
            return None;
        }
        Some(read32(&self.slots, offset))
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack").field("capacity", &self.slots.len()).finish()
    }
}
