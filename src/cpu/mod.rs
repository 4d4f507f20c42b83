use serde::{Deserialize, Serialize};

use crate::cpu_bus::CpuBus;

mod arith;
mod branch;
pub mod decode;
pub mod flags;
pub mod registers;
mod stack;
mod transfer;


pub use decode::{decode, disassemble, Cond, Family, Op, Unwired};
pub use flags::{compute_flags, FlagOp, Flags};
pub use registers::{Pair, Reg, Registers, StackPair};

/// Which address CALL and its conditional forms leave on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnAddress {
    /// The instruction after the 3-byte call, as on real hardware.
    #[default]
    NextInstruction,
    /// The call opcode itself. A plain RET then re-executes the call.
    CallSite,
}

/// Raised when the byte at PC has no handler: either an undefined opcode or
/// one the instruction set declares but this core leaves unwired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no handler for opcode 0x{opcode:02X} at PC 0x{pc:04X}")]
pub struct Fault {
    pub opcode: u8,
    pub pc: u16,
}

impl Fault {
    /// Mnemonic of the faulting opcode if the instruction set defines one.
    pub fn mnemonic(&self) -> Option<String> {
        decode(self.opcode).map(|op| op.to_string())
    }
}

pub struct Cpu {
    pub regs: Registers,
    pub halted: bool,
    cycles: u64,
    return_address: ReturnAddress,
}

impl Cpu {
    pub fn new() -> Self {
        Self::with_return_address(ReturnAddress::default())
    }

    pub fn with_return_address(return_address: ReturnAddress) -> Self {
        Cpu {
            regs: Registers::new(),
            halted: false,
            cycles: 0,
            return_address,
        }
    }

    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.halted = false;
        self.cycles = 0;
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn set_cycles(&mut self, cycles: u64) {
        self.cycles = cycles;
    }

    pub fn return_address(&self) -> ReturnAddress {
        self.return_address
    }

    /// Fetches, decodes and executes one instruction, returning its T-state
    /// count. On a fault nothing has been modified and PC still names the
    /// offending opcode.
    pub fn step(&mut self, bus: &mut dyn CpuBus) -> Result<u8, Fault> {
        let pc = self.regs.pc;
        let opcode = bus.read(pc);
        let op = decode(opcode).ok_or(Fault { opcode, pc })?;

        let cycles = self
            .execute_instruction(op, bus)
            .ok_or(Fault { opcode, pc })?;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    fn execute_instruction(&mut self, op: Op, bus: &mut dyn CpuBus) -> Option<u8> {
        let cycles = match op {
            Op::Nop => {
                self.advance(1);
                4
            }
            Op::Hlt => {
                self.halted = true;
                self.advance(1);
                7
            }

            Op::Mov { dst, src } => self.mov(bus, dst, src),
            Op::Mvi(reg) => self.mvi(bus, reg),
            Op::Lxi(pair) => self.lxi(bus, pair),
            Op::Lda => self.lda(bus),
            Op::Sta => self.sta(bus),
            Op::Lhld => self.lhld(bus),
            Op::Shld => self.shld(bus),
            Op::Ldax(pair) => self.ldax(bus, pair),
            Op::Stax(pair) => self.stax(bus, pair),
            Op::Xchg => self.xchg(),

            Op::Inr(reg) => self.inr(bus, reg),
            Op::Dcr(reg) => self.dcr(bus, reg),
            Op::Inx(pair) => self.inx(pair),
            Op::Dcx(pair) => self.dcx(pair),
            Op::Cmp(reg) => self.cmp(bus, reg),
            Op::Cpi => self.cpi(bus),

            Op::Jmp => self.jmp(bus),
            Op::Jcc(cond) => self.jcc(bus, cond),
            Op::Call => self.call(bus),
            Op::Ccc(cond) => self.ccc(bus, cond),
            Op::Ret => self.ret(bus),
            Op::Rcc(cond) => self.rcc(bus, cond),
            Op::Pchl => self.pchl(),

            Op::Push(pair) => self.push(bus, pair),
            Op::Pop(pair) => self.pop(bus, pair),
            Op::Xthl => self.xthl(bus),
            Op::Sphl => self.sphl(),

            Op::Unwired(_) => return None,
        };
        Some(cycles)
    }

    /// Reads an 8-bit operand. `M` resolves through HL as it stands now.
    fn read_reg(&self, bus: &mut dyn CpuBus, reg: Reg) -> u8 {
        match self.regs.get(reg) {
            Some(value) => value,
            None => bus.read(self.regs.hl()),
        }
    }

    fn write_reg(&mut self, bus: &mut dyn CpuBus, reg: Reg, value: u8) {
        if !self.regs.set(reg, value) {
            bus.write(self.regs.hl(), value);
        }
    }

    fn imm8(&self, bus: &mut dyn CpuBus) -> u8 {
        bus.read(self.regs.pc.wrapping_add(1))
    }

    fn imm16(&self, bus: &mut dyn CpuBus) -> u16 {
        bus.read_u16(self.regs.pc.wrapping_add(1))
    }

    fn advance(&mut self, len: u16) {
        self.regs.pc = self.regs.pc.wrapping_add(len);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
