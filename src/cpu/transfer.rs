//! Data-transfer group. None of these touch the flags.

use super::registers::{Pair, Reg};
use super::Cpu;
use crate::cpu_bus::CpuBus;

impl Cpu {
    pub(super) fn mov(&mut self, bus: &mut dyn CpuBus, dst: Reg, src: Reg) -> u8 {
        let touches_memory = dst == Reg::M || src == Reg::M;
        if dst != src {
            let value = self.read_reg(bus, src);
            self.write_reg(bus, dst, value);
        }
        self.advance(1);
        if touches_memory {
            7
        } else {
            5
        }
    }

    pub(super) fn mvi(&mut self, bus: &mut dyn CpuBus, reg: Reg) -> u8 {
        let value = self.imm8(bus);
        self.write_reg(bus, reg, value);
        self.advance(2);
        if reg == Reg::M {
            10
        } else {
            7
        }
    }

    pub(super) fn lxi(&mut self, bus: &mut dyn CpuBus, pair: Pair) -> u8 {
        let value = self.imm16(bus);
        self.regs.set_pair(pair, value);
        self.advance(3);
        10
    }

    pub(super) fn lda(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let addr = self.imm16(bus);
        self.regs.a = bus.read(addr);
        self.advance(3);
        13
    }

    pub(super) fn sta(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let addr = self.imm16(bus);
        bus.write(addr, self.regs.a);
        self.advance(3);
        13
    }

    pub(super) fn lhld(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let addr = self.imm16(bus);
        let value = bus.read_u16(addr);
        self.regs.set_hl(value);
        self.advance(3);
        16
    }

    pub(super) fn shld(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let addr = self.imm16(bus);
        bus.write_u16(addr, self.regs.hl());
        self.advance(3);
        16
    }

    pub(super) fn ldax(&mut self, bus: &mut dyn CpuBus, pair: Pair) -> u8 {
        self.regs.a = bus.read(self.regs.pair(pair));
        self.advance(1);
        7
    }

    pub(super) fn stax(&mut self, bus: &mut dyn CpuBus, pair: Pair) -> u8 {
        bus.write(self.regs.pair(pair), self.regs.a);
        self.advance(1);
        7
    }

    pub(super) fn xchg(&mut self) -> u8 {
        std::mem::swap(&mut self.regs.h, &mut self.regs.d);
        std::mem::swap(&mut self.regs.l, &mut self.regs.e);
        self.advance(1);
        4
    }
}
