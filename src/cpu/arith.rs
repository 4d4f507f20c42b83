//! Increment, decrement and compare.

use super::flags::{compute_flags, FlagOp};
use super::registers::{Pair, Reg};
use super::Cpu;
use crate::cpu_bus::CpuBus;

impl Cpu {
    pub(super) fn inr(&mut self, bus: &mut dyn CpuBus, reg: Reg) -> u8 {
        let previous = self.read_reg(bus, reg);
        let value = previous.wrapping_add(1);
        self.write_reg(bus, reg, value);
        self.regs.f = compute_flags(previous, value as i16, FlagOp::Increment);
        self.advance(1);
        if reg == Reg::M {
            10
        } else {
            5
        }
    }

    pub(super) fn dcr(&mut self, bus: &mut dyn CpuBus, reg: Reg) -> u8 {
        let previous = self.read_reg(bus, reg);
        let value = previous.wrapping_sub(1);
        self.write_reg(bus, reg, value);
        self.regs.f = compute_flags(previous, value as i16, FlagOp::Decrement);
        self.advance(1);
        if reg == Reg::M {
            10
        } else {
            5
        }
    }

    pub(super) fn inx(&mut self, pair: Pair) -> u8 {
        let value = self.regs.pair(pair).wrapping_add(1);
        self.regs.set_pair(pair, value);
        self.advance(1);
        5
    }

    pub(super) fn dcx(&mut self, pair: Pair) -> u8 {
        let value = self.regs.pair(pair).wrapping_sub(1);
        self.regs.set_pair(pair, value);
        self.advance(1);
        5
    }

    pub(super) fn cmp(&mut self, bus: &mut dyn CpuBus, reg: Reg) -> u8 {
        let operand = self.read_reg(bus, reg);
        self.compare(operand);
        self.advance(1);
        if reg == Reg::M {
            7
        } else {
            4
        }
    }

    pub(super) fn cpi(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let operand = self.imm8(bus);
        self.compare(operand);
        self.advance(2);
        7
    }

    // Flags only; A is left as it was.
    fn compare(&mut self, operand: u8) {
        let a = self.regs.a;
        let result = a as i16 - operand as i16;
        self.regs.f = compute_flags(a, result, FlagOp::Subtract(operand));
    }
}
