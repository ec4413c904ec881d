use types::{Register, REGISTER_COUNT, WORD_SIZE};

use crate::memory::{read32, write32};

/// The nine 32-bit registers, kept as raw words in canonical byte order.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile {
    bytes: [u8; REGISTER_COUNT * WORD_SIZE],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            bytes: [0u8; REGISTER_COUNT * WORD_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn read(&self, reg: Register) -> u32 {
        read32(&self.bytes, reg.index() * WORD_SIZE)
    }

    pub fn write(&mut self, reg: Register, value: u32) {
        write32(&mut self.bytes, reg.index() * WORD_SIZE, value);
    }

    /// Id-based read for callers holding a raw register number.
    pub fn read_id(&self, id: u8) -> Option<u32> {
        Register::from_u8(id).map(|reg| self.read(reg))
    }

    pub fn write_id(&mut self, id: u8, value: u32) -> bool {
        match Register::from_u8(id) {
            Some(reg) => {
                self.write(reg, value);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            a0: self.read(Register::A0),
            a1: self.read(Register::A1),
            a2: self.read(Register::A2),
            a3: self.read(Register::A3),
            r: self.read(Register::R),
            ip: self.read(Register::Ip),
            sp: self.read(Register::Sp),
            fl: self.read(Register::Fl),
            ex: self.read(Register::Ex),
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RegisterFile").field(&self.snapshot()).finish()
    }
}

/// Copy of all registers at one point in time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub a0: u32,
    pub a1: u32,
    pub a2: u32,
    pub a3: u32,
    pub r: u32,
    pub ip: u32,
    pub sp: u32,
    pub fl: u32,
    pub ex: u32,
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "a0={}, a1={}, a2={}, a3={}, r={}, ip={}, sp={}, fl={}, ex={}",
            self.a0, self.a1, self.a2, self.a3, self.r, self.ip, self.sp, self.fl, self.ex
        )
    }
}
