use super::registers::StackPair;
use super::Cpu;
use crate::cpu_bus::CpuBus;

impl Cpu {
    /// High byte first, each write preceded by a decrement of SP.
    pub(super) fn push_word(&mut self, bus: &mut dyn CpuBus, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, (value >> 8) as u8);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, value as u8);
    }

    pub(super) fn pop_word(&mut self, bus: &mut dyn CpuBus) -> u16 {
        let low = bus.read(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let high = bus.read(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        (high << 8) | low
    }

    pub(super) fn push(&mut self, bus: &mut dyn CpuBus, pair: StackPair) -> u8 {
        let value = self.regs.stack_pair(pair);
        self.push_word(bus, value);
        self.advance(1);
        11
    }

    pub(super) fn pop(&mut self, bus: &mut dyn CpuBus, pair: StackPair) -> u8 {
        let value = self.pop_word(bus);
        self.regs.set_stack_pair(pair, value);
        self.advance(1);
        10
    }

    // Swaps HL with the word on top of the stack; SP is unchanged.
    pub(super) fn xthl(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let sp = self.regs.sp;
        let top = bus.read_u16(sp);
        bus.write_u16(sp, self.regs.hl());
        self.regs.set_hl(top);
        self.advance(1);
        18
    }

    pub(super) fn sphl(&mut self) -> u8 {
        self.regs.sp = self.regs.hl();
        self.advance(1);
        5
    }
}
