#![no_std]

pub mod layout;
pub use layout::*;

pub mod register;
pub use register::Register;

pub mod isa;
pub use isa::Opcode;

pub mod exception;
pub use exception::{Exception, Flag};

pub mod state;
pub use state::MachineState;
