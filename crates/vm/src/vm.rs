use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use types::{MachineState, Register, DATA_ADDRESS_LIMIT};

use crate::cpu::CPU;
use crate::loader::{Image, LoadError};
use crate::memory::Memory;
use crate::registers::Snapshot;

/// A complete FONZ machine: CPU plus its memory image.
///
/// Each `VM` is an independent value. Nothing is shared between machines,
/// so running several of them side by side only needs several values.
#[derive(Debug, Clone)]
pub struct VM {
    pub cpu: CPU,
    pub memory: Memory,
    last_state: MachineState,
}

impl VM {
    /// A freshly reset machine.
    pub fn new() -> Self {
        let mut vm = Self {
            cpu: CPU::new(),
            memory: Memory::new(),
            last_state: MachineState::Undefined,
        };
        vm.reset();
        vm
    }

    /// Zero all state and point IP at the first code address.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.memory.clear();
        self.last_state = MachineState::Undefined;
    }

    /// Load an image from `source`. On error the machine is left untouched.
    pub fn load<R: Read>(&mut self, source: R) -> Result<(), LoadError> {
        let image = Image::read_from(source)?;
        image.write_to(&mut self.memory)?;
        tracing::info!(code = image.code.len(), "image loaded");
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }

    /// Copy raw bytes to the start of the code segment, bypassing the image
    /// format.
    pub fn set_code(&mut self, code: &[u8]) -> bool {
        self.memory.write_code(code)
    }

    pub fn set_data(&mut self, data: &[u8]) -> bool {
        self.memory.write_data(data)
    }

    pub fn step(&mut self) -> MachineState {
        self.last_state = self.cpu.step(&mut self.memory);
        self.last_state
    }

    /// Step until a terminal state or until `max_steps` steps have run.
    pub fn run(&mut self, max_steps: usize) -> MachineState {
        let mut state = MachineState::Undefined;
        for _ in 0..max_steps {
            state = self.step();
            if state.is_terminal() {
                break;
            }
        }
        state
    }

    /// State returned by the most recent `step`, `Undefined` after reset.
    pub fn last_state(&self) -> MachineState {
        self.last_state
    }

    pub fn read_register(&self, id: u8) -> Option<u32> {
        self.cpu.regs.read_id(id)
    }

    pub fn write_register(&mut self, id: u8, value: u32) -> bool {
        self.cpu.regs.write_id(id, value)
    }

    pub fn register(&self, reg: Register) -> u32 {
        self.cpu.regs.read(reg)
    }

    pub fn set_register(&mut self, reg: Register, value: u32) {
        self.cpu.regs.write(reg, value);
    }

    /// Clear EX so a halted machine can be stepped again. IP is left alone.
    pub fn clear_exceptions(&mut self) {
        self.cpu.regs.write(Register::Ex, 0);
    }

    /// Host-side read from the data segment.
    pub fn read_dword(&self, addr: u32) -> Option<u32> {
        if addr >= DATA_ADDRESS_LIMIT {
            return None;
        }
        self.memory.read_u32(addr)
    }

    /// Host-side write to the data segment.
    pub fn write_dword(&mut self, addr: u32, value: u32) -> bool {
        addr < DATA_ADDRESS_LIMIT && self.memory.write_u32(addr, value)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cpu.regs.snapshot()
    }

    /// Hex dump of `start..end`, 16 bytes per line, each prefixed with its
    /// address. The range is clamped to the image.
    pub fn dump_memory(&self, start: usize, end: usize) -> String {
        let mem = self.memory.mem();
        let end = end.min(mem.len());
        let start = start.min(end);
        mem[start..end]
            .chunks(16)
            .enumerate()
            .map(|(i, line)| format!("{:04x}  {}\n", start + i * 16, hex::encode(line)))
            .collect()
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}
