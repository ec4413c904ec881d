use types::{Flag, Register};

/// Right-hand operand of a move, arithmetic or compare instruction.
///
/// Memory addresses are already validated by the decoder when an operand
/// is built, so the executor can read them without further checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Memory(u32),
    Immediate(u32),
}

/// Binary operation writing the result register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AluOp {
    Sub,
    Add,
    Mul,
    Div,
    And,
    Or,
    Mod,
}

impl AluOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Sub => "sub",
            AluOp::Add => "add",
            AluOp::Mul => "mul",
            AluOp::Div => "div",
            AluOp::And => "and",
            AluOp::Or => "or",
            AluOp::Mod => "mod",
        }
    }
}

/// Branch predicate over the FL register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
}

impl Condition {
    /// Evaluate against the current flags. No comparison is performed here.
    pub fn holds(self, fl: u32) -> bool {
        let greater = Flag::Greater.is_set(fl);
        let smaller = Flag::Smaller.is_set(fl);
        let equal = !greater && !smaller;
        match self {
            Condition::Equal => equal,
            Condition::NotEqual => !equal,
            Condition::GreaterOrEqual => equal || greater,
            Condition::Greater => greater,
            Condition::LessOrEqual => equal || smaller,
            Condition::Less => smaller,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Condition::Equal => "je",
            Condition::NotEqual => "jne",
            Condition::GreaterOrEqual => "jge",
            Condition::Greater => "jg",
            Condition::LessOrEqual => "jle",
            Condition::Less => "jl",
        }
    }
}

/// A decoded FONZ instruction.
///
/// Register fields are always valid ids. Jump and call targets are kept raw:
/// they are only validated once the jump is actually taken.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Halt,
    /// dst = src
    Mov { dst: Register, src: Operand },
    /// dst = mem[src], address taken from a register at run time
    MovIndirect { dst: Register, src: Register },
    /// mem[addr] = src
    Store { addr: u32, src: Register },
    Inc { reg: Register },
    Dec { reg: Register },
    /// R = lhs <op> rhs
    Alu { op: AluOp, lhs: Register, rhs: Operand },
    Cmp { lhs: Register, rhs: Operand },
    Jump { cond: Condition, target: u32 },
    Call { target: u32 },
    Ret,
    Push { reg: Register },
    Pop { reg: Register },
}

impl Instruction {
    pub fn pretty_print(&self) -> String {
        fn operand(op: &Operand) -> String {
            match op {
                Operand::Register(r) => r.to_string(),
                Operand::Memory(addr) => format!("[0x{:04x}]", addr),
                Operand::Immediate(imm) => format!("{}", imm),
            }
        }

        match self {
            Instruction::Halt => "halt".to_string(),
            Instruction::Mov { dst, src } => format!("mov  {}, {}", dst, operand(src)),
            Instruction::MovIndirect { dst, src } => format!("mov  {}, [{}]", dst, src),
            Instruction::Store { addr, src } => format!("mov  [0x{:04x}], {}", addr, src),
            Instruction::Inc { reg } => format!("inc  {}", reg),
            Instruction::Dec { reg } => format!("dec  {}", reg),
            Instruction::Alu { op, lhs, rhs } => {
                format!("{:<4} {}, {}", op.mnemonic(), lhs, operand(rhs))
            }
            Instruction::Cmp { lhs, rhs } => format!("cmp  {}, {}", lhs, operand(rhs)),
            Instruction::Jump { cond, target } => {
                format!("{:<4} 0x{:04x}", cond.mnemonic(), target)
            }
            Instruction::Call { target } => format!("call 0x{:04x}", target),
            Instruction::Ret => "ret".to_string(),
            Instruction::Push { reg } => format!("push {}", reg),
            Instruction::Pop { reg } => format!("pop  {}", reg),
        }
    }
}
