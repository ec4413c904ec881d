use types::{is_valid_address, Exception, Opcode, Register};

use crate::instruction::{AluOp, Condition, Instruction, Operand};
use crate::memory::Memory;

/// Instruction lengths in bytes, one per operand shape.
pub const LEN_NONE: u8 = 1;
pub const LEN_REG: u8 = 2;
pub const LEN_REG_REG: u8 = 3;
pub const LEN_TARGET: u8 = 5;
pub const LEN_REG_WORD: u8 = 6;
pub const LEN_ADDR_REG: u8 = 6;

/// Decodes the instruction starting at `ip`.
///
/// EDUCATIONAL: This is the addressing and validation layer. Each operand is
/// checked as soon as it is read:
/// - register ids must name one of the nine registers
/// - address operands must leave room for a full word in the image
/// - operand bytes must lie inside the image at all
///
/// The first failing check decides the exception; later operands are not
/// looked at. Nothing is mutated here, the caller keeps IP where it was
/// and raises the returned exception.
///
/// RETURNS: the instruction and its length in bytes.
pub fn decode(memory: &Memory, ip: u32) -> Result<(Instruction, u8), Exception> {
    let raw = fetch_byte(memory, ip, 0)?;
    let opcode = Opcode::from_u8(raw).ok_or(Exception::InvalidOpCode)?;

    use Opcode::*;
    let decoded = match opcode {
        Halt => (Instruction::Halt, LEN_NONE),
        Ret => (Instruction::Ret, LEN_NONE),

        MovRegReg => {
            let (dst, src) = reg_reg(memory, ip)?;
            let src = Operand::Register(src);
            (Instruction::Mov { dst, src }, LEN_REG_REG)
        }
        MovRegAddr => {
            let (dst, addr) = reg_addr(memory, ip)?;
            let src = Operand::Memory(addr);
            (Instruction::Mov { dst, src }, LEN_REG_WORD)
        }
        MovAddrReg => {
            let (addr, src) = addr_reg(memory, ip)?;
            (Instruction::Store { addr, src }, LEN_ADDR_REG)
        }
        MovRegDword => {
            let (dst, imm) = reg_dword(memory, ip)?;
            let src = Operand::Immediate(imm);
            (Instruction::Mov { dst, src }, LEN_REG_WORD)
        }
        MovRegAddrInReg => {
            let (dst, src) = reg_reg(memory, ip)?;
            (Instruction::MovIndirect { dst, src }, LEN_REG_REG)
        }

        Inc | Dec | Push | Pop => {
            let reg = reg(memory, ip)?;
            let instr = match opcode {
                Inc => Instruction::Inc { reg },
                Dec => Instruction::Dec { reg },
                Push => Instruction::Push { reg },
                _ => Instruction::Pop { reg },
            };
            (instr, LEN_REG)
        }

        SubRegReg | AddRegReg | MulRegReg | DivRegReg | AndRegReg | OrRegReg | ModRegReg => {
            let (lhs, rhs) = reg_reg(memory, ip)?;
            let (op, rhs) = (alu_op(opcode), Operand::Register(rhs));
            (Instruction::Alu { op, lhs, rhs }, LEN_REG_REG)
        }
        SubRegAddr | AddRegAddr | MulRegAddr | DivRegAddr | AndRegAddr | OrRegAddr
        | ModRegAddr => {
            let (lhs, addr) = reg_addr(memory, ip)?;
            let (op, rhs) = (alu_op(opcode), Operand::Memory(addr));
            (Instruction::Alu { op, lhs, rhs }, LEN_REG_WORD)
        }
        SubRegDword | AddRegDword | MulRegDword | DivRegDword | AndRegDword | OrRegDword
        | ModRegDword => {
            let (lhs, imm) = reg_dword(memory, ip)?;
            let (op, rhs) = (alu_op(opcode), Operand::Immediate(imm));
            (Instruction::Alu { op, lhs, rhs }, LEN_REG_WORD)
        }

        CmpRegReg => {
            let (lhs, rhs) = reg_reg(memory, ip)?;
            let rhs = Operand::Register(rhs);
            (Instruction::Cmp { lhs, rhs }, LEN_REG_REG)
        }
        CmpRegAddr => {
            let (lhs, addr) = reg_addr(memory, ip)?;
            let rhs = Operand::Memory(addr);
            (Instruction::Cmp { lhs, rhs }, LEN_REG_WORD)
        }

        Je | Jne | Jge | Jg | Jle | Jl => {
            let cond = condition(opcode);
            let target = fetch_word(memory, ip, 1)?;
            (Instruction::Jump { cond, target }, LEN_TARGET)
        }
        Call => {
            let target = fetch_word(memory, ip, 1)?;
            (Instruction::Call { target }, LEN_TARGET)
        }
    };

    Ok(decoded)
}

/// Check an address operand against the image bounds.
pub fn validate_address(addr: u32) -> Result<u32, Exception> {
    if is_valid_address(addr) {
        Ok(addr)
    } else {
        Err(Exception::InvalidAddress)
    }
}

/// Check a raw register id.
pub fn validate_register(id: u8) -> Result<Register, Exception> {
    Register::from_u8(id).ok_or(Exception::InvalidRegister)
}

fn fetch_byte(memory: &Memory, ip: u32, offset: u32) -> Result<u8, Exception> {
    ip.checked_add(offset)
        .and_then(|at| memory.byte(at))
        .ok_or(Exception::InvalidAddress)
}

fn fetch_word(memory: &Memory, ip: u32, offset: u32) -> Result<u32, Exception> {
    ip.checked_add(offset)
        .and_then(|at| memory.read_u32(at))
        .ok_or(Exception::InvalidAddress)
}

// `op r`
fn reg(memory: &Memory, ip: u32) -> Result<Register, Exception> {
    validate_register(fetch_byte(memory, ip, 1)?)
}

// `op r0 r1`
fn reg_reg(memory: &Memory, ip: u32) -> Result<(Register, Register), Exception> {
    let r0 = validate_register(fetch_byte(memory, ip, 1)?)?;
    let r1 = validate_register(fetch_byte(memory, ip, 2)?)?;
    Ok((r0, r1))
}

// `op r imm32`
fn reg_dword(memory: &Memory, ip: u32) -> Result<(Register, u32), Exception> {
    let r = validate_register(fetch_byte(memory, ip, 1)?)?;
    let imm = fetch_word(memory, ip, 2)?;
    Ok((r, imm))
}

// `op r addr32`
fn reg_addr(memory: &Memory, ip: u32) -> Result<(Register, u32), Exception> {
    let (r, addr) = reg_dword(memory, ip)?;
    Ok((r, validate_address(addr)?))
}

// `op addr32 r`
fn addr_reg(memory: &Memory, ip: u32) -> Result<(u32, Register), Exception> {
    let addr = validate_address(fetch_word(memory, ip, 1)?)?;
    let r = validate_register(fetch_byte(memory, ip, 5)?)?;
    Ok((addr, r))
}

fn alu_op(opcode: Opcode) -> AluOp {
    use Opcode::*;
    match opcode {
        SubRegReg | SubRegAddr | SubRegDword => AluOp::Sub,
        AddRegReg | AddRegAddr | AddRegDword => AluOp::Add,
        MulRegReg | MulRegAddr | MulRegDword => AluOp::Mul,
        DivRegReg | DivRegAddr | DivRegDword => AluOp::Div,
        AndRegReg | AndRegAddr | AndRegDword => AluOp::And,
        OrRegReg | OrRegAddr | OrRegDword => AluOp::Or,
        _ => AluOp::Mod,
    }
}

fn condition(opcode: Opcode) -> Condition {
    match opcode {
        Opcode::Je => Condition::Equal,
        Opcode::Jne => Condition::NotEqual,
        Opcode::Jge => Condition::GreaterOrEqual,
        Opcode::Jg => Condition::Greater,
        Opcode::Jle => Condition::LessOrEqual,
        _ => Condition::Less,
    }
}
