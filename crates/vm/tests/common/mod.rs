#![allow(dead_code)]

use types::{Opcode, Register, CODE_START, DATA_SEGMENT_SIZE, FONZ_MAGIC};
use vm::VM;

/// Tiny assembler for hand-written test programs.
///
/// Tracks the current address so tests can compute jump targets.
#[derive(Default)]
pub struct Asm {
    code: Vec<u8>,
}

impl Asm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of the next emitted byte.
    pub fn here(&self) -> u32 {
        CODE_START + self.code.len() as u32
    }

    pub fn op(mut self, op: Opcode) -> Self {
        self.code.push(op.as_u8());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.code.extend_from_slice(bytes);
        self
    }

    pub fn reg(self, op: Opcode, r: Register) -> Self {
        self.op(op).raw(&[r.id()])
    }

    pub fn reg_reg(self, op: Opcode, r0: Register, r1: Register) -> Self {
        self.op(op).raw(&[r0.id(), r1.id()])
    }

    pub fn reg_word(self, op: Opcode, r: Register, word: u32) -> Self {
        self.op(op).raw(&[r.id()]).raw(&word.to_be_bytes())
    }

    pub fn addr_reg(self, op: Opcode, addr: u32, r: Register) -> Self {
        self.op(op).raw(&addr.to_be_bytes()).raw(&[r.id()])
    }

    pub fn target(self, op: Opcode, addr: u32) -> Self {
        self.op(op).raw(&addr.to_be_bytes())
    }

    pub fn mov(self, r: Register, imm: u32) -> Self {
        self.reg_word(Opcode::MovRegDword, r, imm)
    }

    /// Zero-pad up to `addr`.
    pub fn pad_to(mut self, addr: u32) -> Self {
        let len = (addr - CODE_START) as usize;
        assert!(len >= self.code.len(), "already past 0x{:x}", addr);
        self.code.resize(len, 0);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.code
    }
}

/// A reset machine with `code` at the start of the code segment.
pub fn vm_with(code: &[u8]) -> VM {
    let mut vm = VM::new();
    assert!(vm.set_code(code));
    vm
}

/// Serialise a full FONZ image.
pub fn image(data: &[u8], code: &[u8]) -> Vec<u8> {
    let mut bytes = FONZ_MAGIC.to_vec();
    let mut segment = vec![0u8; DATA_SEGMENT_SIZE];
    segment[..data.len()].copy_from_slice(data);
    bytes.extend_from_slice(&segment);
    bytes.extend_from_slice(code);
    bytes
}
