mod common;

use common::{vm_with, Asm};
use types::{Exception, MachineState, Opcode, Register, CODE_START};

const SENTINEL: u32 = 0x5a5a_5a5a;

/// Run `code` to its first terminal or faulting step with R preset.
fn run_with_sentinel(code: Vec<u8>) -> vm::VM {
    let mut vm = vm_with(&code);
    vm.set_register(Register::R, SENTINEL);
    vm.run(32);
    vm
}

#[test]
fn add_overflow_leaves_result_untouched() {
    let vm = run_with_sentinel(
        Asm::new()
            .mov(Register::A0, u32::MAX)
            .reg_word(Opcode::AddRegDword, Register::A0, 1)
            .op(Opcode::Halt)
            .build(),
    );
    assert_eq!(vm.last_state(), MachineState::Exception);
    assert_eq!(vm.register(Register::Ex), Exception::CarryOver.bit());
    assert_eq!(vm.register(Register::R), SENTINEL);
    assert_eq!(vm.register(Register::A0), u32::MAX);
    // decode succeeded, so ip already points past the faulting add
    assert_eq!(vm.register(Register::Ip), CODE_START + 12);
}

#[test]
fn sub_underflow_sets_carry() {
    let vm = run_with_sentinel(
        Asm::new()
            .mov(Register::A1, 1)
            .reg_reg(Opcode::SubRegReg, Register::A0, Register::A1)
            .build(),
    );
    assert_eq!(vm.last_state(), MachineState::Exception);
    assert_eq!(vm.register(Register::Ex), Exception::CarryOver.bit());
    assert_eq!(vm.register(Register::R), SENTINEL);
}

#[test]
fn division_by_zero() {
    for op in [Opcode::DivRegDword, Opcode::ModRegDword] {
        let vm = run_with_sentinel(
            Asm::new()
                .mov(Register::A0, 10)
                .reg_word(op, Register::A0, 0)
                .build(),
        );
        assert_eq!(vm.last_state(), MachineState::Exception, "{:?}", op);
        assert_eq!(vm.register(Register::Ex), Exception::DivZero.bit());
        assert_eq!(vm.register(Register::R), SENTINEL);
    }
}

#[test]
fn mul_overflow_sets_carry() {
    let vm = run_with_sentinel(
        Asm::new()
            .mov(Register::A0, 0x1_0000)
            .reg_word(Opcode::MulRegDword, Register::A0, 0x1_0000)
            .build(),
    );
    assert_eq!(vm.register(Register::Ex), Exception::CarryOver.bit());
    assert_eq!(vm.register(Register::R), SENTINEL);
}

#[test]
fn results_land_in_r_only() {
    let cases = [
        (Opcode::SubRegReg, 20, 6, 14),
        (Opcode::AddRegReg, 20, 6, 26),
        (Opcode::MulRegReg, 20, 6, 120),
        (Opcode::DivRegReg, 20, 6, 3),
        (Opcode::ModRegReg, 20, 6, 2),
        (Opcode::AndRegReg, 0b1100, 0b1010, 0b1000),
        (Opcode::OrRegReg, 0b1100, 0b1010, 0b1110),
    ];
    for (op, a, b, want) in cases {
        let mut vm = vm_with(
            &Asm::new()
                .mov(Register::A0, a)
                .mov(Register::A1, b)
                .reg_reg(op, Register::A0, Register::A1)
                .op(Opcode::Halt)
                .build(),
        );
        assert_eq!(vm.run(10), MachineState::Stopped, "{:?}", op);
        assert_eq!(vm.register(Register::R), want, "{:?}", op);
        assert_eq!(vm.register(Register::A0), a);
        assert_eq!(vm.register(Register::A1), b);
    }
}

#[test]
fn memory_and_immediate_operands() {
    let mut data = [0u8; 8];
    data[4..8].copy_from_slice(&40u32.to_be_bytes());
    let mut vm = vm_with(
        &Asm::new()
            .mov(Register::A0, 2)
            .reg_word(Opcode::AddRegAddr, Register::A0, 4)
            .reg_reg(Opcode::MovRegReg, Register::A1, Register::R)
            .reg_word(Opcode::SubRegDword, Register::A1, 2)
            .op(Opcode::Halt)
            .build(),
    );
    assert!(vm.set_data(&data));
    assert_eq!(vm.run(10), MachineState::Stopped);
    assert_eq!(vm.register(Register::A1), 42);
    assert_eq!(vm.register(Register::R), 40);
}

#[test]
fn memory_operand_address_is_validated() {
    let mut vm = vm_with(&Asm::new().reg_word(Opcode::MulRegAddr, Register::A0, 2556).build());
    assert_eq!(vm.step(), MachineState::Exception);
    assert_eq!(vm.register(Register::Ex), Exception::InvalidAddress.bit());
    assert_eq!(vm.register(Register::Ip), CODE_START);
}

#[test]
fn inc_dec_in_place() {
    let mut vm = vm_with(
        &Asm::new()
            .mov(Register::A3, 41)
            .reg(Opcode::Inc, Register::A3)
            .reg(Opcode::Inc, Register::A3)
            .reg(Opcode::Dec, Register::A3)
            .op(Opcode::Halt)
            .build(),
    );
    assert_eq!(vm.run(10), MachineState::Stopped);
    assert_eq!(vm.register(Register::A3), 42);
    assert_eq!(vm.register(Register::R), 0);
}

#[test]
fn inc_overflow_and_dec_underflow() {
    let vm = run_with_sentinel(
        Asm::new()
            .mov(Register::A0, u32::MAX)
            .reg(Opcode::Inc, Register::A0)
            .build(),
    );
    assert_eq!(vm.register(Register::Ex), Exception::CarryOver.bit());
    assert_eq!(vm.register(Register::A0), u32::MAX);

    let vm = run_with_sentinel(Asm::new().reg(Opcode::Dec, Register::A2).build());
    assert_eq!(vm.register(Register::Ex), Exception::CarryOver.bit());
    assert_eq!(vm.register(Register::A2), 0);
}
