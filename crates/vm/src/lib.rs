pub mod cpu;
pub mod decoder;
pub mod instruction;
pub mod loader;
pub mod memory;
pub mod registers;
pub mod stack;
pub mod vm;

pub use cpu::CPU;
pub use loader::LoadError;
pub use registers::Snapshot;
pub use vm::VM;

pub use types::{Exception, MachineState, Register};
