//! Jumps, calls and returns. These set PC directly instead of advancing it.

use super::decode::Cond;
use super::{Cpu, ReturnAddress};
use crate::cpu_bus::CpuBus;

impl Cpu {
    pub(super) fn jmp(&mut self, bus: &mut dyn CpuBus) -> u8 {
        self.regs.pc = self.imm16(bus);
        10
    }

    pub(super) fn jcc(&mut self, bus: &mut dyn CpuBus, cond: Cond) -> u8 {
        if cond.holds(self.regs.f) {
            self.regs.pc = self.imm16(bus);
        } else {
            self.advance(3);
        }
        10
    }

    pub(super) fn call(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let target = self.imm16(bus);
        let return_to = match self.return_address {
            ReturnAddress::NextInstruction => self.regs.pc.wrapping_add(3),
            ReturnAddress::CallSite => self.regs.pc,
        };
        self.push_word(bus, return_to);
        self.regs.pc = target;
        17
    }

    pub(super) fn ccc(&mut self, bus: &mut dyn CpuBus, cond: Cond) -> u8 {
        if cond.holds(self.regs.f) {
            self.call(bus)
        } else {
            self.advance(3);
            11
        }
    }

    pub(super) fn ret(&mut self, bus: &mut dyn CpuBus) -> u8 {
        self.regs.pc = self.pop_word(bus);
        10
    }

    pub(super) fn rcc(&mut self, bus: &mut dyn CpuBus, cond: Cond) -> u8 {
        if cond.holds(self.regs.f) {
            self.regs.pc = self.pop_word(bus);
            11
        } else {
            self.advance(1);
            5
        }
    }

    pub(super) fn pchl(&mut self) -> u8 {
        self.regs.pc = self.regs.hl();
        5
    }
}
