use bitflags::bitflags;

bitflags! {
    /// Condition bits of the F register. Bits 1, 2 and 5 carry no meaning
    /// here and are never forced to the values real silicon gives them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const CARRY = 0b0000_0001;
        const PARITY = 0b0000_1000;
        const AUX_CARRY = 0b0001_0000;
        const ZERO = 0b0100_0000;
        const SIGN = 0b1000_0000;
    }
}

/// Shape of the operation that produced a flag-affecting result.
///
/// The operand carried by `Add`/`Subtract` selects the auxiliary-carry rule:
/// operands above one compare the previous low nibble against the operand,
/// smaller ones fall back to the nibble-sum rule used by increment and
/// decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOp {
    Increment,
    Decrement,
    Add(u8),
    Subtract(u8),
}

impl FlagOp {
    /// Signed hint equivalent: +1, -1, +operand or -operand.
    pub fn shape(self) -> i16 {
        match self {
            FlagOp::Increment => 1,
            FlagOp::Decrement => -1,
            FlagOp::Add(n) => n as i16,
            FlagOp::Subtract(n) => -(n as i16),
        }
    }
}

/// Computes the complete flags byte for `result`, the 16-bit signed outcome
/// of an operation whose target held `previous` beforehand.
pub fn compute_flags(previous: u8, result: i16, op: FlagOp) -> Flags {
    let low = result as u8;
    let mut flags = Flags::empty();

    flags.set(Flags::ZERO, low == 0);
    flags.set(Flags::SIGN, low & 0x80 != 0);

    // Two checks, applied in order: unsigned overflow, then a negative result.
    flags.set(Flags::CARRY, result as u16 > 0xFF);
    if result < 0 {
        flags.insert(Flags::CARRY);
    }

    flags.set(Flags::PARITY, low.count_ones() % 2 == 0);
    flags.set(Flags::AUX_CARRY, aux_carry(previous, result, op));
    flags
}

fn aux_carry(previous: u8, result: i16, op: FlagOp) -> bool {
    let low_nibble = (previous & 0x0F) as i16;
    let delta = result.wrapping_sub(previous as i16);
    let nibble_sum = low_nibble + (delta & 0x0F) > 0x0F;

    match op {
        FlagOp::Increment | FlagOp::Decrement => nibble_sum,
        FlagOp::Add(n) if n > 1 => low_nibble + n as i16 > 0x0F,
        FlagOp::Subtract(n) if n > 1 => low_nibble < n as i16,
        FlagOp::Add(_) | FlagOp::Subtract(_) => nibble_sum,
    }
}
