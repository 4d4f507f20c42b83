use crate::cpu::flags::{compute_flags, FlagOp, Flags};

// Straight transcription of the signed-shape rule the named operation kinds
// replace. Used to check the two agree over the whole byte domain.
fn shape_reference(previous: u8, result: i16, shape: i16) -> u8 {
    let low = result as u8;
    let mut f = 0u8;
    if low == 0 {
        f |= 0x40;
    }
    if low & 0x80 != 0 {
        f |= 0x80;
    }
    if result as u16 > 0xFF {
        f |= 0x01;
    }
    if result < 0 {
        f |= 0x01;
    }
    if low.count_ones() % 2 == 0 {
        f |= 0x08;
    }
    let prev_low = (previous & 0x0F) as i16;
    let mut ac = prev_low + (result.wrapping_sub(previous as i16) & 0x0F) > 0x0F;
    if shape < -1 {
        ac = prev_low < -shape;
    }
    if shape > 1 {
        ac = prev_low + shape > 0x0F;
    }
    if ac {
        f |= 0x10;
    }
    f
}

#[cfg(test)]
mod flag_unit_tests {
    use super::*;

    #[test]
    fn test_decrement_to_zero() {
        let f = compute_flags(1, 0, FlagOp::Decrement);
        assert!(f.contains(Flags::ZERO));
        assert!(!f.contains(Flags::SIGN));
        assert!(f.contains(Flags::PARITY));
        assert!(!f.contains(Flags::CARRY));
    }

    #[test]
    fn test_sign_follows_bit_seven_of_low_byte() {
        assert!(compute_flags(0x7F, 0x80, FlagOp::Increment).contains(Flags::SIGN));
        assert!(!compute_flags(0x80, 0x7F, FlagOp::Decrement).contains(Flags::SIGN));
    }

    #[test]
    fn test_carry_on_overflow_above_byte() {
        let f = compute_flags(0x10, 0x100, FlagOp::Add(0xF0));
        assert!(f.contains(Flags::CARRY));
        assert!(f.contains(Flags::ZERO));
    }

    #[test]
    fn test_carry_on_negative_result() {
        let f = compute_flags(0x01, -1, FlagOp::Subtract(2));
        assert!(f.contains(Flags::CARRY));
        assert!(f.contains(Flags::SIGN));
        assert!(f.contains(Flags::PARITY));
        assert!(!f.contains(Flags::ZERO));
    }

    #[test]
    fn test_parity_counts_low_byte_only() {
        // 0x103: low byte 0x03 has two set bits.
        assert!(compute_flags(0, 0x103, FlagOp::Add(0xFF)).contains(Flags::PARITY));
        assert!(!compute_flags(0, 0x07, FlagOp::Add(0x07)).contains(Flags::PARITY));
    }

    #[test]
    fn test_aux_carry_increment_and_decrement() {
        assert!(compute_flags(0x0F, 0x10, FlagOp::Increment).contains(Flags::AUX_CARRY));
        assert!(!compute_flags(0x0E, 0x0F, FlagOp::Increment).contains(Flags::AUX_CARRY));
        assert!(compute_flags(0x11, 0x10, FlagOp::Decrement).contains(Flags::AUX_CARRY));
        assert!(!compute_flags(0x10, 0x0F, FlagOp::Decrement).contains(Flags::AUX_CARRY));
    }

    #[test]
    fn test_aux_carry_subtract_compares_nibble_with_operand() {
        assert!(compute_flags(0x23, 0x23 - 0x05, FlagOp::Subtract(5)).contains(Flags::AUX_CARRY));
        assert!(!compute_flags(0x05, 0x03, FlagOp::Subtract(2)).contains(Flags::AUX_CARRY));
        // Operand of one keeps the nibble-sum rule.
        assert!(!compute_flags(0x10, 0x0F, FlagOp::Subtract(1)).contains(Flags::AUX_CARRY));
        assert!(compute_flags(0x11, 0x10, FlagOp::Subtract(1)).contains(Flags::AUX_CARRY));
    }

    #[test]
    fn test_aux_carry_add_uses_operand() {
        assert!(compute_flags(0x02, 0x10, FlagOp::Add(0x0E)).contains(Flags::AUX_CARRY));
        assert!(!compute_flags(0x02, 0x04, FlagOp::Add(0x02)).contains(Flags::AUX_CARRY));
    }

    #[test]
    fn test_only_defined_bits_are_produced() {
        let defined = Flags::all().bits();
        for previous in 0..=255u8 {
            for operand in 0..=255u8 {
                let result = previous as i16 - operand as i16;
                let f = compute_flags(previous, result, FlagOp::Subtract(operand));
                assert_eq!(f.bits() & !defined, 0);
            }
        }
    }

    #[test]
    fn test_named_kinds_match_signed_shape_rule() {
        for previous in 0..=255u8 {
            let inc = previous.wrapping_add(1) as i16;
            let dec = previous.wrapping_sub(1) as i16;
            assert_eq!(
                compute_flags(previous, inc, FlagOp::Increment).bits(),
                shape_reference(previous, inc, 1)
            );
            assert_eq!(
                compute_flags(previous, dec, FlagOp::Decrement).bits(),
                shape_reference(previous, dec, -1)
            );
            for operand in 0..=255u8 {
                let sub = previous as i16 - operand as i16;
                let add = previous as i16 + operand as i16;
                let op_sub = FlagOp::Subtract(operand);
                let op_add = FlagOp::Add(operand);
                assert_eq!(
                    compute_flags(previous, sub, op_sub).bits(),
                    shape_reference(previous, sub, op_sub.shape()),
                    "subtract {previous:#04x} - {operand:#04x}"
                );
                assert_eq!(
                    compute_flags(previous, add, op_add).bits(),
                    shape_reference(previous, add, op_add.shape()),
                    "add {previous:#04x} + {operand:#04x}"
                );
            }
        }
    }
}
