use super::flags::Flags;

/// 8-bit operand selector in the order the opcode's 3-bit register field
/// encodes it. `M` is the memory byte addressed by HL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    A,
}

impl Reg {
    pub const fn from_bits(bits: u8) -> Reg {
        match bits & 0x07 {
            0 => Reg::B,
            1 => Reg::C,
            2 => Reg::D,
            3 => Reg::E,
            4 => Reg::H,
            5 => Reg::L,
            6 => Reg::M,
            _ => Reg::A,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Reg::B => "B",
            Reg::C => "C",
            Reg::D => "D",
            Reg::E => "E",
            Reg::H => "H",
            Reg::L => "L",
            Reg::M => "M",
            Reg::A => "A",
        }
    }
}

/// Register pair selector used by LXI, INX, DCX, LDAX and STAX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pair {
    Bc,
    De,
    Hl,
    Sp,
}

impl Pair {
    pub const fn from_bits(bits: u8) -> Pair {
        match bits & 0x03 {
            0 => Pair::Bc,
            1 => Pair::De,
            2 => Pair::Hl,
            _ => Pair::Sp,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Pair::Bc => "B",
            Pair::De => "D",
            Pair::Hl => "H",
            Pair::Sp => "SP",
        }
    }
}

/// Register pair selector used by PUSH and POP, where the fourth slot is
/// the accumulator/flags word instead of SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPair {
    Bc,
    De,
    Hl,
    Psw,
}

impl StackPair {
    pub const fn from_bits(bits: u8) -> StackPair {
        match bits & 0x03 {
            0 => StackPair::Bc,
            1 => StackPair::De,
            2 => StackPair::Hl,
            _ => StackPair::Psw,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            StackPair::Bc => "B",
            StackPair::De => "D",
            StackPair::Hl => "H",
            StackPair::Psw => "PSW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            a: 0,
            f: Flags::empty(),
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            pc: 0,
            sp: 0,
        }
    }

    /// Reads a plain register. `M` is not a register slot; callers resolve it
    /// through the bus, so asking for it here yields `None`.
    pub fn get(&self, reg: Reg) -> Option<u8> {
        match reg {
            Reg::B => Some(self.b),
            Reg::C => Some(self.c),
            Reg::D => Some(self.d),
            Reg::E => Some(self.e),
            Reg::H => Some(self.h),
            Reg::L => Some(self.l),
            Reg::M => None,
            Reg::A => Some(self.a),
        }
    }

    /// Writes a plain register. Returns `false` for `M`.
    pub fn set(&mut self, reg: Reg, value: u8) -> bool {
        match reg {
            Reg::B => self.b = value,
            Reg::C => self.c = value,
            Reg::D => self.d = value,
            Reg::E => self.e = value,
            Reg::H => self.h = value,
            Reg::L => self.l = value,
            Reg::M => return false,
            Reg::A => self.a = value,
        }
        true
    }

    pub fn bc(&self) -> u16 {
        (self.b as u16) << 8 | self.c as u16
    }

    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    pub fn de(&self) -> u16 {
        (self.d as u16) << 8 | self.e as u16
    }

    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    pub fn hl(&self) -> u16 {
        (self.h as u16) << 8 | self.l as u16
    }

    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }

    pub fn psw(&self) -> u16 {
        (self.a as u16) << 8 | self.f.bits() as u16
    }

    pub fn set_psw(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.f = Flags::from_bits_retain(value as u8);
    }

    pub fn pair(&self, pair: Pair) -> u16 {
        match pair {
            Pair::Bc => self.bc(),
            Pair::De => self.de(),
            Pair::Hl => self.hl(),
            Pair::Sp => self.sp,
        }
    }

    pub fn set_pair(&mut self, pair: Pair, value: u16) {
        match pair {
            Pair::Bc => self.set_bc(value),
            Pair::De => self.set_de(value),
            Pair::Hl => self.set_hl(value),
            Pair::Sp => self.sp = value,
        }
    }

    pub fn stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::Bc => self.bc(),
            StackPair::De => self.de(),
            StackPair::Hl => self.hl(),
            StackPair::Psw => self.psw(),
        }
    }

    pub fn set_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::Bc => self.set_bc(value),
            StackPair::De => self.set_de(value),
            StackPair::Hl => self.set_hl(value),
            StackPair::Psw => self.set_psw(value),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
