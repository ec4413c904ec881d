/// Fault classes recorded in the EX register.
///
/// Each variant is a distinct bit so several faults could in principle be
/// or-ed together; the engine itself stops at the first one.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Exception {
    InvalidAddress = 1,
    InvalidRegister = 2,
    StackOverflow = 4,
    /// Arithmetic overflow or underflow.
    CarryOver = 8,
    DivZero = 16,
    InvalidOpCode = 32,
    /// POP from an empty stack.
    InvalidStackAddress = 64,
}

impl Exception {
    pub const ALL: [Exception; 7] = [
        Exception::InvalidAddress,
        Exception::InvalidRegister,
        Exception::StackOverflow,
        Exception::CarryOver,
        Exception::DivZero,
        Exception::InvalidOpCode,
        Exception::InvalidStackAddress,
    ];

    pub fn bit(self) -> u32 {
        self as u32
    }

    /// True if this exception's bit is set in `ex`.
    pub fn is_set(self, ex: u32) -> bool {
        ex & self.bit() != 0
    }

    pub fn name(self) -> &'static str {
        match self {
            Exception::InvalidAddress => "invalid address",
            Exception::InvalidRegister => "invalid register",
            Exception::StackOverflow => "stack overflow",
            Exception::CarryOver => "carry over",
            Exception::DivZero => "division by zero",
            Exception::InvalidOpCode => "invalid opcode",
            Exception::InvalidStackAddress => "invalid stack address",
        }
    }

    /// Iterate over the exceptions whose bits are set in `ex`.
    pub fn decompose(ex: u32) -> impl Iterator<Item = Exception> {
        Self::ALL.into_iter().filter(move |e| e.is_set(ex))
    }
}

impl core::fmt::Display for Exception {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Condition bits in the FL register. Both clear means "equal".
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    Smaller = 1,
    Greater = 2,
}

impl Flag {
    pub fn bit(self) -> u32 {
        self as u32
    }

    pub fn is_set(self, fl: u32) -> bool {
        fl & self.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_distinct() {
        let mut seen = 0u32;
        for e in Exception::ALL {
            assert_eq!(seen & e.bit(), 0, "{} overlaps", e);
            seen |= e.bit();
        }
        assert_eq!(seen, 0x7f);
    }

    #[test]
    fn decompose_lists_set_bits() {
        let ex = Exception::CarryOver.bit() | Exception::InvalidOpCode.bit();
        let mut found = Exception::decompose(ex);
        assert_eq!(found.next(), Some(Exception::CarryOver));
        assert_eq!(found.next(), Some(Exception::InvalidOpCode));
        assert_eq!(found.next(), None);
    }
}
