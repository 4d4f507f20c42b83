//! Opcode decoding.
//!
//! Every opcode byte is mapped once, from its bit fields, to an [`Op`]: the
//! instruction family plus the operand selector it carries. The table is
//! built at compile time so the dispatch loop is a single array lookup.

use std::fmt;

use super::flags::Flags;
use super::registers::{Pair, Reg, StackPair};
use crate::cpu_bus::CpuBus;

/// Branch condition encoded in bits 3..=5 of Jcc, Ccc and Rcc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Cond {
    pub const fn from_bits(bits: u8) -> Cond {
        match bits & 0x07 {
            0 => Cond::NotZero,
            1 => Cond::Zero,
            2 => Cond::NoCarry,
            3 => Cond::Carry,
            4 => Cond::ParityOdd,
            5 => Cond::ParityEven,
            6 => Cond::Plus,
            _ => Cond::Minus,
        }
    }

    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Cond::NotZero => !flags.contains(Flags::ZERO),
            Cond::Zero => flags.contains(Flags::ZERO),
            Cond::NoCarry => !flags.contains(Flags::CARRY),
            Cond::Carry => flags.contains(Flags::CARRY),
            Cond::ParityOdd => !flags.contains(Flags::PARITY),
            Cond::ParityEven => flags.contains(Flags::PARITY),
            Cond::Plus => !flags.contains(Flags::SIGN),
            Cond::Minus => flags.contains(Flags::SIGN),
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Cond::NotZero => "NZ",
            Cond::Zero => "Z",
            Cond::NoCarry => "NC",
            Cond::Carry => "C",
            Cond::ParityOdd => "PO",
            Cond::ParityEven => "PE",
            Cond::Plus => "P",
            Cond::Minus => "M",
        }
    }
}

/// Accumulator operations of the arithmetic/logic group other than compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    AddWithCarry,
    Subtract,
    SubtractWithBorrow,
    And,
    Xor,
    Or,
}

impl AluOp {
    const fn from_bits(bits: u8) -> AluOp {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::AddWithCarry,
            2 => AluOp::Subtract,
            3 => AluOp::SubtractWithBorrow,
            4 => AluOp::And,
            5 => AluOp::Xor,
            _ => AluOp::Or,
        }
    }

    fn register_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::AddWithCarry => "ADC",
            AluOp::Subtract => "SUB",
            AluOp::SubtractWithBorrow => "SBB",
            AluOp::And => "ANA",
            AluOp::Xor => "XRA",
            AluOp::Or => "ORA",
        }
    }

    fn immediate_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADI",
            AluOp::AddWithCarry => "ACI",
            AluOp::Subtract => "SUI",
            AluOp::SubtractWithBorrow => "SBI",
            AluOp::And => "ANI",
            AluOp::Xor => "XRI",
            AluOp::Or => "ORI",
        }
    }
}

/// Opcodes the instruction set defines but this core has no handler for.
/// Executing one faults exactly like an undefined byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unwired {
    Alu(AluOp, Reg),
    AluImmediate(AluOp),
    Dad(Pair),
    /// Single-byte rotate, decimal-adjust, carry and interrupt-enable opcodes.
    Control(&'static str),
    /// IN / OUT, followed by a port byte.
    Port(&'static str),
    Restart(u8),
}

impl Unwired {
    fn len(self) -> u8 {
        match self {
            Unwired::AluImmediate(_) | Unwired::Port(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Unwired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Unwired::Alu(op, src) => write!(f, "{} {}", op.register_mnemonic(), src.name()),
            Unwired::AluImmediate(op) => f.write_str(op.immediate_mnemonic()),
            Unwired::Dad(pair) => write!(f, "DAD {}", pair.name()),
            Unwired::Control(name) | Unwired::Port(name) => f.write_str(name),
            Unwired::Restart(n) => write!(f, "RST {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    DataTransfer,
    Arithmetic,
    Branch,
    Stack,
    Control,
    Unwired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Nop,
    Hlt,

    Mov { dst: Reg, src: Reg },
    Mvi(Reg),
    Lxi(Pair),
    Lda,
    Sta,
    Lhld,
    Shld,
    Ldax(Pair),
    Stax(Pair),
    Xchg,

    Inr(Reg),
    Dcr(Reg),
    Inx(Pair),
    Dcx(Pair),
    Cmp(Reg),
    Cpi,

    Jmp,
    Jcc(Cond),
    Call,
    Ccc(Cond),
    Ret,
    Rcc(Cond),
    Pchl,

    Push(StackPair),
    Pop(StackPair),
    Xthl,
    Sphl,

    Unwired(Unwired),
}

impl Op {
    /// Instruction length in bytes, opcode included.
    pub fn len(self) -> u8 {
        match self {
            Op::Mvi(_) | Op::Cpi => 2,
            Op::Lxi(_)
            | Op::Lda
            | Op::Sta
            | Op::Lhld
            | Op::Shld
            | Op::Jmp
            | Op::Jcc(_)
            | Op::Call
            | Op::Ccc(_) => 3,
            Op::Unwired(u) => u.len(),
            _ => 1,
        }
    }

    pub fn family(self) -> Family {
        match self {
            Op::Nop | Op::Hlt => Family::Control,
            Op::Mov { .. }
            | Op::Mvi(_)
            | Op::Lxi(_)
            | Op::Lda
            | Op::Sta
            | Op::Lhld
            | Op::Shld
            | Op::Ldax(_)
            | Op::Stax(_)
            | Op::Xchg => Family::DataTransfer,
            Op::Inr(_) | Op::Dcr(_) | Op::Inx(_) | Op::Dcx(_) | Op::Cmp(_) | Op::Cpi => {
                Family::Arithmetic
            }
            Op::Jmp | Op::Jcc(_) | Op::Call | Op::Ccc(_) | Op::Ret | Op::Rcc(_) | Op::Pchl => {
                Family::Branch
            }
            Op::Push(_) | Op::Pop(_) | Op::Xthl | Op::Sphl => Family::Stack,
            Op::Unwired(_) => Family::Unwired,
        }
    }

    // Operand already printed by Display, so the immediate follows a comma.
    fn immediate_after_comma(self) -> bool {
        matches!(self, Op::Mvi(_) | Op::Lxi(_))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Nop => f.write_str("NOP"),
            Op::Hlt => f.write_str("HLT"),
            Op::Mov { dst, src } => write!(f, "MOV {},{}", dst.name(), src.name()),
            Op::Mvi(r) => write!(f, "MVI {}", r.name()),
            Op::Lxi(p) => write!(f, "LXI {}", p.name()),
            Op::Lda => f.write_str("LDA"),
            Op::Sta => f.write_str("STA"),
            Op::Lhld => f.write_str("LHLD"),
            Op::Shld => f.write_str("SHLD"),
            Op::Ldax(p) => write!(f, "LDAX {}", p.name()),
            Op::Stax(p) => write!(f, "STAX {}", p.name()),
            Op::Xchg => f.write_str("XCHG"),
            Op::Inr(r) => write!(f, "INR {}", r.name()),
            Op::Dcr(r) => write!(f, "DCR {}", r.name()),
            Op::Inx(p) => write!(f, "INX {}", p.name()),
            Op::Dcx(p) => write!(f, "DCX {}", p.name()),
            Op::Cmp(r) => write!(f, "CMP {}", r.name()),
            Op::Cpi => f.write_str("CPI"),
            Op::Jmp => f.write_str("JMP"),
            Op::Jcc(c) => write!(f, "J{}", c.suffix()),
            Op::Call => f.write_str("CALL"),
            Op::Ccc(c) => write!(f, "C{}", c.suffix()),
            Op::Ret => f.write_str("RET"),
            Op::Rcc(c) => write!(f, "R{}", c.suffix()),
            Op::Pchl => f.write_str("PCHL"),
            Op::Push(p) => write!(f, "PUSH {}", p.name()),
            Op::Pop(p) => write!(f, "POP {}", p.name()),
            Op::Xthl => f.write_str("XTHL"),
            Op::Sphl => f.write_str("SPHL"),
            Op::Unwired(u) => fmt::Display::fmt(&u, f),
        }
    }
}

static OPCODE_TABLE: [Option<Op>; 256] = build_table();

/// Looks up the instruction for `opcode`. `None` marks the bytes the 8080
/// leaves undefined (0x08, 0x10, ..., 0xCB, 0xD9, 0xDD, 0xED, 0xFD).
pub fn decode(opcode: u8) -> Option<Op> {
    OPCODE_TABLE[opcode as usize]
}

const fn build_table() -> [Option<Op>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_opcode(i as u8);
        i += 1;
    }
    table
}

const fn decode_opcode(opcode: u8) -> Option<Op> {
    let ddd = (opcode >> 3) & 0x07;
    let sss = opcode & 0x07;
    match opcode >> 6 {
        0b00 => decode_low_block(opcode, ddd, sss),
        0b01 => {
            if opcode == 0x76 {
                Some(Op::Hlt)
            } else {
                Some(Op::Mov {
                    dst: Reg::from_bits(ddd),
                    src: Reg::from_bits(sss),
                })
            }
        }
        0b10 => {
            if ddd == 0b111 {
                Some(Op::Cmp(Reg::from_bits(sss)))
            } else {
                Some(Op::Unwired(Unwired::Alu(AluOp::from_bits(ddd), Reg::from_bits(sss))))
            }
        }
        _ => decode_high_block(opcode, ddd, sss),
    }
}

const fn decode_low_block(opcode: u8, ddd: u8, sss: u8) -> Option<Op> {
    let pair = Pair::from_bits(opcode >> 4);
    let odd = opcode & 0x08 != 0;
    match sss {
        0b000 => {
            if opcode == 0x00 {
                Some(Op::Nop)
            } else {
                None
            }
        }
        0b001 => {
            if odd {
                Some(Op::Unwired(Unwired::Dad(pair)))
            } else {
                Some(Op::Lxi(pair))
            }
        }
        0b010 => match opcode {
            0x02 => Some(Op::Stax(Pair::Bc)),
            0x12 => Some(Op::Stax(Pair::De)),
            0x0A => Some(Op::Ldax(Pair::Bc)),
            0x1A => Some(Op::Ldax(Pair::De)),
            0x22 => Some(Op::Shld),
            0x2A => Some(Op::Lhld),
            0x32 => Some(Op::Sta),
            _ => Some(Op::Lda),
        },
        0b011 => {
            if odd {
                Some(Op::Dcx(pair))
            } else {
                Some(Op::Inx(pair))
            }
        }
        0b100 => Some(Op::Inr(Reg::from_bits(ddd))),
        0b101 => Some(Op::Dcr(Reg::from_bits(ddd))),
        0b110 => Some(Op::Mvi(Reg::from_bits(ddd))),
        _ => {
            let name = match ddd {
                0 => "RLC",
                1 => "RRC",
                2 => "RAL",
                3 => "RAR",
                4 => "DAA",
                5 => "CMA",
                6 => "STC",
                _ => "CMC",
            };
            Some(Op::Unwired(Unwired::Control(name)))
        }
    }
}

const fn decode_high_block(opcode: u8, ddd: u8, sss: u8) -> Option<Op> {
    let odd = opcode & 0x08 != 0;
    match sss {
        0b000 => Some(Op::Rcc(Cond::from_bits(ddd))),
        0b001 => {
            if !odd {
                Some(Op::Pop(StackPair::from_bits(opcode >> 4)))
            } else {
                match opcode {
                    0xC9 => Some(Op::Ret),
                    0xE9 => Some(Op::Pchl),
                    0xF9 => Some(Op::Sphl),
                    _ => None,
                }
            }
        }
        0b010 => Some(Op::Jcc(Cond::from_bits(ddd))),
        0b011 => match opcode {
            0xC3 => Some(Op::Jmp),
            0xD3 => Some(Op::Unwired(Unwired::Port("OUT"))),
            0xDB => Some(Op::Unwired(Unwired::Port("IN"))),
            0xE3 => Some(Op::Xthl),
            0xEB => Some(Op::Xchg),
            0xF3 => Some(Op::Unwired(Unwired::Control("DI"))),
            0xFB => Some(Op::Unwired(Unwired::Control("EI"))),
            _ => None,
        },
        0b100 => Some(Op::Ccc(Cond::from_bits(ddd))),
        0b101 => {
            if !odd {
                Some(Op::Push(StackPair::from_bits(opcode >> 4)))
            } else if opcode == 0xCD {
                Some(Op::Call)
            } else {
                None
            }
        }
        0b110 => {
            if ddd == 0b111 {
                Some(Op::Cpi)
            } else {
                Some(Op::Unwired(Unwired::AluImmediate(AluOp::from_bits(ddd))))
            }
        }
        _ => Some(Op::Unwired(Unwired::Restart(ddd))),
    }
}

/// Renders the instruction at `addr` as assembly text, returning the text
/// and the instruction length. Undefined bytes render as `DB nnH`.
pub fn disassemble(bus: &mut dyn CpuBus, addr: u16) -> (String, u8) {
    let opcode = bus.read(addr);
    let Some(op) = decode(opcode) else {
        return (format!("DB {:02X}H", opcode), 1);
    };
    let sep = if op.immediate_after_comma() { "," } else { " " };
    let text = match op.len() {
        2 => format!("{}{}{:02X}H", op, sep, bus.read(addr.wrapping_add(1))),
        3 => format!("{}{}{:04X}H", op, sep, bus.read_u16(addr.wrapping_add(1))),
        _ => op.to_string(),
    };
    (text, op.len())
}
