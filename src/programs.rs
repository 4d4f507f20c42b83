//! Built-in demo programs.

use std::ops::RangeInclusive;

use crate::emulator::Emulator;

pub const SORT_ORIGIN: u16 = 0x2000;
/// Length byte followed by the values to sort.
pub const SORT_DATA: u16 = 0x2040;

/// In-place bubble sort of the byte list at [`SORT_DATA`]. Makes passes
/// until one completes without a swap, then halts.
#[rustfmt::skip]
pub const BUBBLE_SORT: [u8; 35] = [
    0x21, 0x40, 0x20,   // 2000  LXI H,2040H
    0x16, 0x00,         // 2003  MVI D,00H     swapped = 0
    0x4E,               // 2005  MOV C,M       count
    0x0D,               // 2006  DCR C
    0x23,               // 2007  INX H
    0x7E,               // 2008  MOV A,M
    0x23,               // 2009  INX H
    0xBE,               // 200A  CMP M
    0xDA, 0x18, 0x20,   // 200B  JC 2018H
    0xCA, 0x18, 0x20,   // 200E  JZ 2018H
    0x46,               // 2011  MOV B,M
    0x77,               // 2012  MOV M,A
    0x2B,               // 2013  DCX H
    0x70,               // 2014  MOV M,B
    0x23,               // 2015  INX H
    0x16, 0x01,         // 2016  MVI D,01H     swapped = 1
    0x0D,               // 2018  DCR C
    0xC2, 0x08, 0x20,   // 2019  JNZ 2008H
    0x7A,               // 201C  MOV A,D
    0xFE, 0x01,         // 201D  CPI 01H
    0xCA, 0x00, 0x20,   // 201F  JZ 2000H
    0x76,               // 2022  HLT
];

/// Values sorted by the demo when none are given.
pub const DEFAULT_SORT_VALUES: [u8; 5] = [9, 3, 2, 4, 1];

/// The count prefix is one byte, and the inner loop counter wraps below two
/// values.
pub const SORT_LEN_RANGE: RangeInclusive<usize> = 2..=255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("bubble sort takes 2 to 255 values, got {0}")]
    ValueCount(usize),
}

/// Loads the sort program and its data and points PC at it. Nothing is
/// written when the value count is out of range.
pub fn load_bubble_sort(emu: &mut Emulator, values: &[u8]) -> Result<(), ProgramError> {
    if !SORT_LEN_RANGE.contains(&values.len()) {
        return Err(ProgramError::ValueCount(values.len()));
    }
    emu.load(SORT_DATA, &[values.len() as u8]);
    emu.load(SORT_DATA.wrapping_add(1), values);
    emu.load(SORT_ORIGIN, &BUBBLE_SORT);
    emu.set_pc(SORT_ORIGIN);
    Ok(())
}

/// Reads back `count` values from the sort data area.
pub fn sorted_values(emu: &Emulator, count: usize) -> Vec<u8> {
    (0..count)
        .map(|i| emu.memory().read(SORT_DATA.wrapping_add(1 + i as u16)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::{RunState, StopReason};

    fn sort(values: &[u8]) -> Vec<u8> {
        let mut emu = Emulator::default();
        load_bubble_sort(&mut emu, values).unwrap();
        assert_eq!(emu.run(), Ok(StopReason::Halted));
        assert_eq!(emu.state(), RunState::Halted);
        sorted_values(&emu, values.len())
    }

    #[test]
    fn test_sorts_default_values() {
        assert_eq!(sort(&DEFAULT_SORT_VALUES), vec![1, 2, 3, 4, 9]);
    }

    #[test]
    fn test_already_sorted_takes_one_pass() {
        let mut emu = Emulator::default();
        load_bubble_sort(&mut emu, &[1, 2, 3]).unwrap();
        emu.run().unwrap();
        // LXI, MVI, MOV, DCR, INX; two compare iterations that take JC
        // straight to the counter; MOV, CPI, JZ, HLT.
        assert_eq!(emu.steps(), 5 + 2 * 6 + 4);
        assert_eq!(sorted_values(&emu, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicates_and_extremes() {
        assert_eq!(sort(&[0xFF, 0x00, 0x80, 0x00, 0x7F]), vec![0x00, 0x00, 0x7F, 0x80, 0xFF]);
    }

    #[test]
    fn test_reverse_order() {
        let values: Vec<u8> = (1..=16).rev().collect();
        let expected: Vec<u8> = (1..=16).collect();
        assert_eq!(sort(&values), expected);
    }

    #[test]
    fn test_stack_is_untouched() {
        let mut emu = Emulator::default();
        load_bubble_sort(&mut emu, &DEFAULT_SORT_VALUES).unwrap();
        emu.run().unwrap();
        assert_eq!(emu.cpu().regs.sp, 0xFFFF);
    }

    #[test]
    fn test_rejects_counts_outside_one_byte_prefix() {
        let mut emu = Emulator::default();
        let too_many = vec![7u8; 256];
        assert_eq!(
            load_bubble_sort(&mut emu, &too_many),
            Err(ProgramError::ValueCount(256))
        );
        assert_eq!(
            load_bubble_sort(&mut emu, &[1]),
            Err(ProgramError::ValueCount(1))
        );
        assert_eq!(emu.memory().read(SORT_DATA), 0);
        assert_eq!(emu.memory().read(SORT_ORIGIN), 0);
        assert_eq!(emu.cpu().regs.pc, 0x0000);
    }

    #[test]
    fn test_sorts_largest_accepted_list() {
        let values: Vec<u8> = (1..=255).rev().collect();
        let expected: Vec<u8> = (1..=255).collect();
        assert_eq!(sort(&values), expected);
    }
}
