use crate::cpu_bus::CpuBus;

pub const MEMORY_SIZE: usize = 0x10000;

/// Flat 64 KiB address space. Every 16-bit address is backed, so reads and
/// writes never fail.
pub struct Memory {
    pub(crate) ram: Box<[u8]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            ram: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.ram[addr as usize] = data;
    }

    /// Copies `bytes` into memory starting at `origin`, wrapping past 0xFFFF.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        let mut addr = origin;
        for &byte in bytes {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    // Save state methods
    pub fn slice(&self) -> &[u8] {
        &self.ram
    }

    /// Replaces the whole address space. Returns `false` and leaves memory
    /// untouched when `data` is not exactly 64 KiB.
    pub fn restore(&mut self, data: &[u8]) -> bool {
        if data.len() != MEMORY_SIZE {
            return false;
        }
        self.ram.copy_from_slice(data);
        true
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for Memory {
    fn read(&mut self, addr: u16) -> u8 {
        Memory::read(self, addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        Memory::write(self, addr, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_address_space() {
        let mut memory = Memory::new();
        memory.load(0xFFFE, &[0x11, 0x22, 0x33]);
        assert_eq!(memory.read(0xFFFE), 0x11);
        assert_eq!(memory.read(0xFFFF), 0x22);
        assert_eq!(memory.read(0x0000), 0x33);
    }

    #[test]
    fn word_access_is_little_endian_and_wraps() {
        let mut memory = Memory::new();
        memory.write_u16(0xFFFF, 0xBEEF);
        assert_eq!(memory.read(0xFFFF), 0xEF);
        assert_eq!(memory.read(0x0000), 0xBE);
        assert_eq!(memory.read_u16(0xFFFF), 0xBEEF);
    }

    #[test]
    fn restore_rejects_wrong_size() {
        let mut memory = Memory::new();
        memory.write(0x1234, 0x56);
        assert!(!memory.restore(&[0; 16]));
        assert_eq!(memory.read(0x1234), 0x56);
        assert!(memory.restore(&vec![0xAA; MEMORY_SIZE]));
        assert_eq!(memory.read(0x1234), 0xAA);
    }
}
