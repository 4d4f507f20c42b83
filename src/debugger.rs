use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::cpu::{disassemble, Cpu, Op, Registers};
use crate::cpu_bus::CpuBus;

#[derive(Debug, Clone)]
pub struct Breakpoint {
    pub address: u16,
    pub enabled: bool,
    pub hit_count: u32,
}

#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub pc: u16,
    pub opcode: u8,
    pub operands: Vec<u8>,
    pub mnemonic: String,
    pub registers: RegisterSnapshot,
    pub cycle_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
}

impl From<&Registers> for RegisterSnapshot {
    fn from(regs: &Registers) -> Self {
        Self {
            a: regs.a,
            f: regs.f.bits(),
            b: regs.b,
            c: regs.c,
            d: regs.d,
            e: regs.e,
            h: regs.h,
            l: regs.l,
            sp: regs.sp,
        }
    }
}

/// Breakpoints, a bounded history of executed instructions and a shadow
/// call stack. The emulator consults it around every step.
pub struct Debugger {
    breakpoints: HashMap<u16, Breakpoint>,
    trace_buffer: VecDeque<TraceEntry>,
    history_size: usize,
    call_stack: Vec<u16>,
    instruction_count: u64,
}

impl Debugger {
    pub fn new(history_size: usize) -> Self {
        Self {
            breakpoints: HashMap::new(),
            trace_buffer: VecDeque::new(),
            history_size,
            call_stack: Vec::new(),
            instruction_count: 0,
        }
    }

    // Breakpoint management
    pub fn add_breakpoint(&mut self, address: u16) {
        self.breakpoints.insert(
            address,
            Breakpoint {
                address,
                enabled: true,
                hit_count: 0,
            },
        );
        log::debug!("breakpoint added at {:04X}", address);
    }

    pub fn remove_breakpoint(&mut self, address: u16) -> bool {
        let removed = self.breakpoints.remove(&address).is_some();
        if removed {
            log::debug!("breakpoint removed from {:04X}", address);
        }
        removed
    }

    pub fn set_breakpoint_enabled(&mut self, address: u16, enabled: bool) {
        if let Some(bp) = self.breakpoints.get_mut(&address) {
            bp.enabled = enabled;
        }
    }

    pub fn breakpoint(&self, address: u16) -> Option<&Breakpoint> {
        self.breakpoints.get(&address)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = &Breakpoint> {
        self.breakpoints.values()
    }

    /// Counts a hit and reports whether execution should pause at `pc`.
    pub fn hit_breakpoint(&mut self, pc: u16) -> bool {
        match self.breakpoints.get_mut(&pc) {
            Some(bp) if bp.enabled => {
                bp.hit_count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_tracing(&self) -> bool {
        self.history_size > 0
    }

    /// Records the instruction about to execute at the CPU's PC.
    pub fn record(&mut self, cpu: &Cpu, bus: &mut dyn CpuBus) {
        if self.history_size == 0 {
            return;
        }
        let pc = cpu.regs.pc;
        let (mnemonic, len) = disassemble(bus, pc);
        let operands = (1..len as u16)
            .map(|offset| bus.read(pc.wrapping_add(offset)))
            .collect();

        if self.trace_buffer.len() == self.history_size {
            self.trace_buffer.pop_front();
        }
        self.trace_buffer.push_back(TraceEntry {
            pc,
            opcode: bus.read(pc),
            operands,
            mnemonic,
            registers: RegisterSnapshot::from(&cpu.regs),
            cycle_count: cpu.cycles(),
        });
    }

    /// Updates the call stack after `op` ran from `pc`. A call or return
    /// counts only when SP moved by a word, i.e. the branch was taken.
    pub fn observe(&mut self, op: Op, pc: u16, sp_before: u16, regs: &Registers) {
        self.instruction_count += 1;
        match op {
            Op::Call | Op::Ccc(_) if regs.sp == sp_before.wrapping_sub(2) => {
                self.call_stack.push(pc);
            }
            Op::Ret | Op::Rcc(_) if regs.sp == sp_before.wrapping_add(2) => {
                self.call_stack.pop();
            }
            _ => {}
        }
    }

    /// Oldest entry first.
    pub fn trace(&self) -> impl Iterator<Item = &TraceEntry> {
        self.trace_buffer.iter()
    }

    pub fn last_entry(&self) -> Option<&TraceEntry> {
        self.trace_buffer.back()
    }

    pub fn clear_trace(&mut self) {
        self.trace_buffer.clear();
        self.call_stack.clear();
    }

    /// Addresses of the CALL instructions currently active, outermost first.
    pub fn call_stack(&self) -> &[u16] {
        &self.call_stack
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }
}

impl fmt::Display for Debugger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Debugger: {} instructions | Breakpoints: {} | Call depth: {} | Trace: {}/{}",
            self.instruction_count,
            self.breakpoints.len(),
            self.call_stack.len(),
            self.trace_buffer.len(),
            self.history_size
        )
    }
}
