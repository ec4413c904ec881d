/// The nine architectural registers.
///
/// Ids start at 1; id 0 and anything above `Ex` are invalid and make the
/// decoder raise `Exception::InvalidRegister`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    A0 = 1, // argument 0
    A1 = 2, // argument 1
    A2 = 3, // argument 2
    A3 = 4, // argument 3
    R = 5,  // result of binary arithmetic
    Ip = 6, // instruction pointer
    Sp = 7, // stack pointer (byte offset into the stack)
    Fl = 8, // comparison flags
    Ex = 9, // sticky exception bits
}

impl Register {
    pub const ALL: [Register; 9] = [
        Register::A0,
        Register::A1,
        Register::A2,
        Register::A3,
        Register::R,
        Register::Ip,
        Register::Sp,
        Register::Fl,
        Register::Ex,
    ];

    pub fn from_u8(id: u8) -> Option<Self> {
        use Register::*;
        Some(match id {
            1 => A0,
            2 => A1,
            3 => A2,
            4 => A3,
            5 => R,
            6 => Ip,
            7 => Sp,
            8 => Fl,
            9 => Ex,
            _ => return None,
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Zero-based slot in the register file.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::A0 => "a0",
            Register::A1 => "a1",
            Register::A2 => "a2",
            Register::A3 => "a3",
            Register::R => "r",
            Register::Ip => "ip",
            Register::Sp => "sp",
            Register::Fl => "fl",
            Register::Ex => "ex",
        }
    }
}

impl core::fmt::Display for Register {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
