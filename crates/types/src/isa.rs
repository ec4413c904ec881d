/// EDUCATIONAL: FONZ Instruction Set Architecture (ISA) opcodes
///
/// Every FONZ instruction starts with a single opcode byte. The opcode alone
/// determines how many operand bytes follow and how they are laid out, so
/// the decoder never needs to look further than this byte to know the
/// instruction length.
///
/// OPERAND SHAPES:
/// - none:              `op`                (1 byte)
/// - register+register: `op r0 r1`          (3 bytes)
/// - register+address:  `op r addr32`       (6 bytes)
/// - address+register:  `op addr32 r`       (6 bytes)
/// - register+dword:    `op r imm32`        (6 bytes)
/// - register:          `op r`              (2 bytes)
/// - target:            `op addr32`         (5 bytes)
///
/// Binary arithmetic comes in three flavours per operation (register,
/// memory, immediate right-hand side) and always writes the result register.
///
/// Opcodes 29 (RND) and 42/43 (MOVS) are reserved: they are part of the
/// numbering but the machine treats them like any unknown opcode.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// HALT (0): stop the machine, IP stays on the HALT
    Halt = 0,

    /// MOV r0, r1 (1): copy register to register
    MovRegReg = 1,
    /// MOV r, [addr] (2): load a word from memory
    MovRegAddr = 2,
    /// MOV [addr], r (3): store a word to memory
    MovAddrReg = 3,
    /// MOV r, imm (4): load an immediate
    MovRegDword = 4,
    /// MOV r0, [r1] (5): load from the address held in r1
    MovRegAddrInReg = 5,

    /// INC r (6) / DEC r (7): in-place +1 / -1 with carry detection
    Inc = 6,
    Dec = 7,

    SubRegReg = 8,
    SubRegAddr = 9,
    SubRegDword = 10,
    AddRegReg = 11,
    AddRegAddr = 12,
    AddRegDword = 13,
    MulRegReg = 14,
    MulRegAddr = 15,
    MulRegDword = 16,
    DivRegReg = 17,
    DivRegAddr = 18,
    DivRegDword = 19,
    AndRegReg = 20,
    AndRegAddr = 21,
    AndRegDword = 22,
    OrRegReg = 23,
    OrRegAddr = 24,
    OrRegDword = 25,
    ModRegReg = 26,
    ModRegAddr = 27,
    ModRegDword = 28,

    /// RET (30): pop the return address into IP; an empty stack stops the machine
    Ret = 30,

    /// CMP (31, 32): set SMALLER/GREATER from a signed wide subtraction
    CmpRegAddr = 31,
    CmpRegReg = 32,

    /// EDUCATIONAL: Conditional jumps read the flags left by the last CMP.
    /// A taken jump pushes the address of the next instruction, exactly like
    /// CALL, so a RET later resumes right after the jump.
    Je = 33,
    Jne = 34,
    Jge = 35,
    Jg = 36,
    Jle = 37,
    Jl = 38,

    /// CALL (39): unconditional push-and-jump
    Call = 39,

    /// PUSH r (40) / POP r (41)
    Push = 40,
    Pop = 41,
}

impl Opcode {
    /// Convert a raw opcode byte. Reserved and unknown values yield `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        use Opcode::*;
        Some(match value {
            0 => Halt,
            1 => MovRegReg,
            2 => MovRegAddr,
            3 => MovAddrReg,
            4 => MovRegDword,
            5 => MovRegAddrInReg,
            6 => Inc,
            7 => Dec,
            8 => SubRegReg,
            9 => SubRegAddr,
            10 => SubRegDword,
            11 => AddRegReg,
            12 => AddRegAddr,
            13 => AddRegDword,
            14 => MulRegReg,
            15 => MulRegAddr,
            16 => MulRegDword,
            17 => DivRegReg,
            18 => DivRegAddr,
            19 => DivRegDword,
            20 => AndRegReg,
            21 => AndRegAddr,
            22 => AndRegDword,
            23 => OrRegReg,
            24 => OrRegAddr,
            25 => OrRegDword,
            26 => ModRegReg,
            27 => ModRegAddr,
            28 => ModRegDword,
            30 => Ret,
            31 => CmpRegAddr,
            32 => CmpRegReg,
            33 => Je,
            34 => Jne,
            35 => Jge,
            36 => Jg,
            37 => Jle,
            38 => Jl,
            39 => Call,
            40 => Push,
            41 => Pop,
            _ => return None, // 29, 42, 43 reserved; everything else unknown
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
