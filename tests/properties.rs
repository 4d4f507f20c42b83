use i8080_emulator::cpu::Registers;
use i8080_emulator::{Cpu, Emulator, Flags, Memory, RunState};
use proptest::prelude::*;

const UNDEFINED: [u8; 12] = [
    0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xCB, 0xD9, 0xDD, 0xED, 0xFD,
];

// Places `program` far enough above SP that stack writes cannot reach it.
fn machine(sp: u16, program: &[u8]) -> (Cpu, Memory) {
    let mut cpu = Cpu::new();
    let mut memory = Memory::new();
    let pc = sp.wrapping_add(0x100);
    memory.load(pc, program);
    cpu.regs.pc = pc;
    cpu.regs.sp = sp;
    (cpu, memory)
}

// Everything but F is as before, and PC has moved past the instruction.
fn only_flags_changed(before: &Registers, after: &Registers, len: u16) -> Result<(), TestCaseError> {
    let mut expected = before.clone();
    expected.f = after.f;
    expected.pc = before.pc.wrapping_add(len);
    prop_assert_eq!(after, &expected);
    Ok(())
}

fn seed_registers(cpu: &mut Cpu, a: u8, others: [u8; 6], f: u8) {
    cpu.regs.a = a;
    cpu.regs.b = others[0];
    cpu.regs.c = others[1];
    cpu.regs.d = others[2];
    cpu.regs.e = others[3];
    cpu.regs.h = others[4];
    cpu.regs.l = others[5];
    cpu.regs.f = Flags::from_bits_retain(f);
}

proptest! {
    #[test]
    fn push_then_pop_restores_value_and_sp(sp in any::<u16>(), value in any::<u16>()) {
        // PUSH B ; POP D
        let (mut cpu, mut memory) = machine(sp, &[0xC5, 0xD1]);
        cpu.regs.set_bc(value);

        cpu.step(&mut memory).unwrap();
        prop_assert_eq!(cpu.regs.sp, sp.wrapping_sub(2));
        prop_assert_eq!(memory.read(sp.wrapping_sub(1)), (value >> 8) as u8);
        prop_assert_eq!(memory.read(sp.wrapping_sub(2)), value as u8);

        cpu.step(&mut memory).unwrap();
        prop_assert_eq!(cpu.regs.de(), value);
        prop_assert_eq!(cpu.regs.sp, sp);
    }

    #[test]
    fn push_psw_keeps_raw_flag_bits(sp in any::<u16>(), a in any::<u8>(), f in any::<u8>()) {
        // PUSH PSW ; POP B ; PUSH B ; POP PSW
        let (mut cpu, mut memory) = machine(sp, &[0xF5, 0xC1, 0xC5, 0xF1]);
        cpu.regs.a = a;
        cpu.regs.f = Flags::from_bits_retain(f);

        cpu.step(&mut memory).unwrap();
        cpu.step(&mut memory).unwrap();
        prop_assert_eq!(cpu.regs.b, a);
        prop_assert_eq!(cpu.regs.c, f);

        cpu.regs.a = 0;
        cpu.regs.f = Flags::empty();
        cpu.step(&mut memory).unwrap();
        cpu.step(&mut memory).unwrap();
        prop_assert_eq!(cpu.regs.a, a);
        prop_assert_eq!(cpu.regs.f.bits(), f);
        prop_assert_eq!(cpu.regs.sp, sp);
    }

    #[test]
    fn compare_immediate_changes_only_flags(
        a in any::<u8>(),
        operand in any::<u8>(),
        others in any::<[u8; 6]>(),
        f in any::<u8>(),
    ) {
        // CPI operand
        let (mut cpu, mut memory) = machine(0xFFFF, &[0xFE, operand]);
        seed_registers(&mut cpu, a, others, f);
        let before = cpu.regs.clone();
        let ram = memory.slice().to_vec();

        cpu.step(&mut memory).unwrap();

        only_flags_changed(&before, &cpu.regs, 2)?;
        prop_assert!(memory.slice() == &ram[..]);
        prop_assert_eq!(cpu.regs.f.contains(Flags::ZERO), a == operand);
        prop_assert_eq!(cpu.regs.f.contains(Flags::CARRY), a < operand);
    }

    #[test]
    fn compare_memory_changes_only_flags(
        a in any::<u8>(),
        operand in any::<u8>(),
        others in any::<[u8; 4]>(),
        hl in 0x1000u16..0x8000,
        f in any::<u8>(),
    ) {
        // CMP M, placed at 0x00FF, below every HL the strategy picks.
        let (mut cpu, mut memory) = machine(0xFFFF, &[0xBE]);
        memory.write(hl, operand);
        let [b, c, d, e] = others;
        seed_registers(&mut cpu, a, [b, c, d, e, (hl >> 8) as u8, hl as u8], f);
        let before = cpu.regs.clone();
        let ram = memory.slice().to_vec();

        cpu.step(&mut memory).unwrap();

        only_flags_changed(&before, &cpu.regs, 1)?;
        prop_assert!(memory.slice() == &ram[..]);
        prop_assert_eq!(cpu.regs.f.contains(Flags::ZERO), a == operand);
        prop_assert_eq!(cpu.regs.f.contains(Flags::CARRY), a < operand);
    }

    #[test]
    fn undefined_opcode_faults_without_side_effects(
        index in 0usize..UNDEFINED.len(),
        origin in any::<u16>(),
        a in any::<u8>(),
    ) {
        let opcode = UNDEFINED[index];
        let mut emu = Emulator::default();
        emu.load(origin, &[opcode]);
        emu.set_pc(origin);
        emu.cpu_mut().regs.a = a;
        let before = emu.cpu().regs.clone();

        let fault = emu.step().unwrap_err();

        prop_assert_eq!(fault.opcode, opcode);
        prop_assert_eq!(fault.pc, origin);
        prop_assert_eq!(emu.state(), RunState::Faulted(fault));
        prop_assert_eq!(&emu.cpu().regs, &before);
        prop_assert_eq!(emu.cpu().cycles(), 0);
    }
}
