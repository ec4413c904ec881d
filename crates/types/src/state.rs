/// Outcome of a single step.
///
/// Only `Ok` means "keep stepping". The integer codes are what the driver
/// prints as `state=<code>`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MachineState {
    /// Nothing has been executed since the last reset.
    #[default]
    Undefined,
    Ok,
    /// Halted on a fault; see the EX register.
    Exception,
    /// HALT, or RET with an empty stack.
    Stopped,
}

impl MachineState {
    pub fn code(self) -> i32 {
        match self {
            MachineState::Undefined => -1,
            MachineState::Ok => 0,
            MachineState::Exception => 1,
            MachineState::Stopped => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MachineState::Exception | MachineState::Stopped)
    }
}

impl core::fmt::Display for MachineState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            MachineState::Undefined => "undefined",
            MachineState::Ok => "ok",
            MachineState::Exception => "exception",
            MachineState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
