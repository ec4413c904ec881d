use types::{CODE_SEGMENT_SIZE, DATA_SEGMENT_SIZE, MEMORY_SIZE, WORD_SIZE};

/// Read a word stored in canonical (big-endian) order.
///
/// The caller guarantees `offset + 4 <= buf.len()`.
#[inline]
pub fn read32(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(&buf[offset..offset + WORD_SIZE]);
    u32::from_be_bytes(word)
}

/// Write a word in canonical (big-endian) order.
///
/// The caller guarantees `offset + 4 <= buf.len()`.
#[inline]
pub fn write32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + WORD_SIZE].copy_from_slice(&value.to_be_bytes());
}

/// The flat memory image: data segment at offset 0, code segment right after.
///
/// Every accessor checks bounds against the whole image and reports failure
/// through its return value. Operand-level rules (the 4-byte headroom an
/// instruction address needs) are enforced by the decoder, not here.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    mem: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            mem: Box::new([0u8; MEMORY_SIZE]),
        }
    }

    pub fn size(&self) -> usize {
        self.mem.len()
    }

    pub fn mem(&self) -> &[u8] {
        &self.mem[..]
    }

    pub fn data(&self) -> &[u8] {
        &self.mem[..DATA_SEGMENT_SIZE]
    }

    pub fn code(&self) -> &[u8] {
        &self.mem[DATA_SEGMENT_SIZE..]
    }

    pub fn clear(&mut self) {
        self.mem.fill(0);
    }

    pub fn byte(&self, addr: u32) -> Option<u8> {
        self.mem.get(addr as usize).copied()
    }

    pub fn mem_slice(&self, start: usize, end: usize) -> Option<&[u8]> {
        if start > end {
            return None;
        }
        self.mem.get(start..end)
    }

    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        let addr = addr as usize;
        if addr.checked_add(WORD_SIZE)? > self.mem.len() {
            return None;
        }
        Some(read32(&self.mem[..], addr))
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> bool {
        let addr = addr as usize;
        match addr.checked_add(WORD_SIZE) {
            Some(end) if end <= self.mem.len() => {
                write32(&mut self.mem[..], addr, value);
                true
            }
            _ => false,
        }
    }

    /// Copy `bytes` to the start of the data segment.
    pub fn write_data(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > DATA_SEGMENT_SIZE {
            return false;
        }
        self.mem[..bytes.len()].copy_from_slice(bytes);
        true
    }

    /// Copy `bytes` to the start of the code segment.
    pub fn write_code(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > CODE_SEGMENT_SIZE {
            return false;
        }
        let start = DATA_SEGMENT_SIZE;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
        true
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &self.mem.len()).finish()
    }
}
