use types::{Exception, Flag, MachineState, Register};

use crate::decoder::{decode, validate_address, LEN_TARGET};
use crate::instruction::{AluOp, Instruction, Operand};
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::stack::Stack;

/// The FONZ execution engine: register file, call stack and the
/// fetch-decode-execute cycle.
///
/// EDUCATIONAL PURPOSE: The CPU owns everything an instruction can change
/// except memory, which is handed in by the owning [`crate::VM`]. This keeps
/// the three storage areas (registers, memory, stack) separate: no
/// instruction reaches one through another.
///
/// FAULT MODEL: Faults never unwind. Decoding and execution report an
/// [`Exception`] as a value, `step` ors its bit into EX and returns
/// `MachineState::Exception`. While EX is non-zero the CPU refuses to run.
#[derive(Debug, Clone, Default)]
pub struct CPU {
    pub regs: RegisterFile,
    pub stack: Stack,

    /// Emit a debug trace line for every executed instruction.
    pub verbose: bool,
}

impl CPU {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero registers and stack and point IP at the first code byte.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.stack.clear();
        self.regs.write(Register::Ip, types::CODE_START);
    }

    /// Executes a single instruction cycle (fetch, decode, execute).
    ///
    /// EDUCATIONAL: The instruction pointer is worked on as a local copy and
    /// written back on every path, faults included:
    /// - decode failure: IP still points at the faulting instruction
    /// - arithmetic or stack failure: IP already points past it
    /// - control flow: IP is whatever the instruction chose
    ///
    /// RETURN VALUE: `Ok` to keep stepping, `Stopped` or `Exception` to stop.
    pub fn step(&mut self, memory: &mut Memory) -> MachineState {
        if self.regs.read(Register::Ex) != 0 {
            return MachineState::Exception;
        }

        let mut ip = self.regs.read(Register::Ip);
        let state = match self.cycle(memory, &mut ip) {
            Ok(state) => state,
            Err(exception) => {
                tracing::warn!(ip, %exception, "cpu fault");
                self.raise(exception);
                MachineState::Exception
            }
        };

        self.regs.write(Register::Ip, ip);
        state
    }

    /// Set an exception bit. Existing bits are kept.
    pub fn raise(&mut self, exception: Exception) {
        let ex = self.regs.read(Register::Ex);
        self.regs.write(Register::Ex, ex | exception.bit());
    }

    fn cycle(&mut self, memory: &mut Memory, ip: &mut u32) -> Result<MachineState, Exception> {
        let (instr, size) = decode(memory, *ip)?;

        if self.verbose {
            let bytes = memory
                .mem_slice(*ip as usize, *ip as usize + size as usize)
                .map(hex::encode)
                .unwrap_or_default();
            tracing::debug!(ip = *ip, bytes = %bytes, "{}", instr.pretty_print());
        }

        self.execute(instr, size, memory, ip)
    }

    /// Executes a decoded instruction.
    ///
    /// `ip` is advanced past the instruction before any side effect happens,
    /// unless the instruction stops the machine or transfers control.
    pub fn execute(
        &mut self,
        instr: Instruction,
        size: u8,
        memory: &mut Memory,
        ip: &mut u32,
    ) -> Result<MachineState, Exception> {
        let next = ip.wrapping_add(size as u32);

        match instr {
            Instruction::Halt => return Ok(MachineState::Stopped),

            // Data movement
            Instruction::Mov { dst, src } => {
                *ip = next;
                let value = self.operand(memory, src)?;
                self.regs.write(dst, value);
            }
            Instruction::MovIndirect { dst, src } => {
                let addr = validate_address(self.regs.read(src))?;
                *ip = next;
                let value = load(memory, addr)?;
                self.regs.write(dst, value);
            }
            Instruction::Store { addr, src } => {
                *ip = next;
                if !memory.write_u32(addr, self.regs.read(src)) {
                    return Err(Exception::InvalidAddress);
                }
            }

            Instruction::Inc { reg } => {
                *ip = next;
                let value = alu(AluOp::Add, self.regs.read(reg), 1)?;
                self.regs.write(reg, value);
            }
            Instruction::Dec { reg } => {
                *ip = next;
                let value = alu(AluOp::Sub, self.regs.read(reg), 1)?;
                self.regs.write(reg, value);
            }

            // Binary arithmetic: result register only, never an operand
            Instruction::Alu { op, lhs, rhs } => {
                *ip = next;
                let rhs = self.operand(memory, rhs)?;
                let value = alu(op, self.regs.read(lhs), rhs)?;
                self.regs.write(Register::R, value);
            }

            Instruction::Cmp { lhs, rhs } => {
                *ip = next;
                let rhs = self.operand(memory, rhs)?;
                self.compare(self.regs.read(lhs), rhs);
            }

            // Control flow
            Instruction::Jump { cond, target } => {
                if cond.holds(self.regs.read(Register::Fl)) {
                    self.jump(ip, target)?;
                } else {
                    *ip = ip.wrapping_add(LEN_TARGET as u32);
                }
            }
            Instruction::Call { target } => self.jump(ip, target)?,
            Instruction::Ret => {
                let sp = self.regs.read(Register::Sp);
                match self.stack.pop(sp) {
                    Some((sp, ret)) => {
                        self.regs.write(Register::Sp, sp);
                        *ip = ret;
                    }
                    // Returning from the outermost frame ends the program.
                    None => return Ok(MachineState::Stopped),
                }
            }

            Instruction::Push { reg } => {
                *ip = next;
                self.push(self.regs.read(reg))?;
            }
            Instruction::Pop { reg } => {
                *ip = next;
                let sp = self.regs.read(Register::Sp);
                let (sp, value) = self.stack.pop(sp).ok_or(Exception::InvalidStackAddress)?;
                self.regs.write(Register::Sp, sp);
                self.regs.write(reg, value);
            }
        }

        Ok(MachineState::Ok)
    }

    fn operand(&self, memory: &Memory, operand: Operand) -> Result<u32, Exception> {
        match operand {
            Operand::Register(reg) => Ok(self.regs.read(reg)),
            Operand::Memory(addr) => load(memory, addr),
            Operand::Immediate(imm) => Ok(imm),
        }
    }

    /// Update SMALLER/GREATER from `lhs - rhs`, computed signed and wide.
    fn compare(&mut self, lhs: u32, rhs: u32) {
        let mut fl = self.regs.read(Register::Fl) & !(Flag::Smaller.bit() | Flag::Greater.bit());
        let diff = lhs as i64 - rhs as i64;
        if diff > 0 {
            fl |= Flag::Greater.bit();
        } else if diff < 0 {
            fl |= Flag::Smaller.bit();
        }
        self.regs.write(Register::Fl, fl);
    }

    fn push(&mut self, value: u32) -> Result<(), Exception> {
        let sp = self.regs.read(Register::Sp);
        let sp = self.stack.push(sp, value).ok_or(Exception::StackOverflow)?;
        self.regs.write(Register::Sp, sp);
        Ok(())
    }

    /// Push the address after the 5-byte jump and continue at `target`.
    /// On failure `ip` is left on the jump.
    fn jump(&mut self, ip: &mut u32, target: u32) -> Result<(), Exception> {
        let target = validate_address(target)?;
        self.push(ip.wrapping_add(LEN_TARGET as u32))?;
        *ip = target;
        Ok(())
    }
}

fn load(memory: &Memory, addr: u32) -> Result<u32, Exception> {
    memory.read_u32(addr).ok_or(Exception::InvalidAddress)
}

/// Arithmetic in a 64-bit intermediate so the overflow checks see the
/// untruncated result.
fn alu(op: AluOp, lhs: u32, rhs: u32) -> Result<u32, Exception> {
    let (a, b) = (lhs as u64, rhs as u64);
    let wide = match op {
        AluOp::Add => a + b,
        AluOp::Sub => a.checked_sub(b).ok_or(Exception::CarryOver)?,
        AluOp::Mul => a * b,
        AluOp::Div => a.checked_div(b).ok_or(Exception::DivZero)?,
        AluOp::Mod => a.checked_rem(b).ok_or(Exception::DivZero)?,
        AluOp::And => a & b,
        AluOp::Or => a | b,
    };
    u32::try_from(wide).map_err(|_| Exception::CarryOver)
}
