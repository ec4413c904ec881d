//! Fixed memory layout of a FONZ machine and its image format.
//!
//! The image on disk is `magic | data segment | code segment`; in memory
//! the data segment sits at offset 0 and the code segment follows it.

/// Signature every image starts with ("FONZ").
pub const FONZ_MAGIC: [u8; 4] = [70, 79, 78, 90];

pub const DATA_SEGMENT_SIZE: usize = 512;
pub const CODE_SEGMENT_SIZE: usize = 2048;
pub const MEMORY_SIZE: usize = DATA_SEGMENT_SIZE + CODE_SEGMENT_SIZE;

/// Capacity of the call stack in bytes (64 four-byte slots).
pub const STACK_SIZE: usize = 256;

/// Width of every value moved by the machine.
pub const WORD_SIZE: usize = 4;

pub const REGISTER_COUNT: usize = 9;

/// IP after reset: the first byte of the code segment.
pub const CODE_START: u32 = DATA_SEGMENT_SIZE as u32;

/// Exclusive upper bound for operand addresses. An address must leave room
/// for a full word inside the image.
pub const ADDRESS_LIMIT: u32 = (MEMORY_SIZE - WORD_SIZE) as u32;

/// Exclusive upper bound for host-side data segment access.
pub const DATA_ADDRESS_LIMIT: u32 = (DATA_SEGMENT_SIZE - WORD_SIZE) as u32;

/// Returns true if `address` may be used as an instruction operand.
pub const fn is_valid_address(address: u32) -> bool {
    address < ADDRESS_LIMIT
}
