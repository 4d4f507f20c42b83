//! Fetch-decode-execute loop and machine lifecycle.
//!
//! An [`Emulator`] owns one CPU and one 64 KiB memory. It starts `Running`
//! and ends in exactly one terminal state: `Halted` after HLT, or `Faulted`
//! when the byte at PC has no handler. Once terminal, further steps report
//! the same outcome and leave every register and memory cell alone.

use log::{debug, log_enabled, trace, warn, Level};

use crate::cpu::{decode, Cpu, Fault, ReturnAddress};
use crate::debugger::Debugger;
use crate::memory::Memory;
use crate::save_state::{SaveState, StateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Halted,
    Faulted(Fault),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

/// Why [`Emulator::run`] returned without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted,
    Breakpoint(u16),
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// SP value installed before the first step.
    pub stack_pointer: u16,
    pub return_address: ReturnAddress,
    /// Upper bound on instructions per [`Emulator::run`] call.
    pub step_limit: Option<u64>,
    /// Number of executed instructions kept by the debugger; 0 disables tracing.
    pub trace_history: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            stack_pointer: 0xFFFF,
            return_address: ReturnAddress::NextInstruction,
            step_limit: None,
            trace_history: 0,
        }
    }
}

pub struct Emulator {
    cpu: Cpu,
    memory: Memory,
    state: RunState,
    config: EmulatorConfig,
    debugger: Debugger,
    steps: u64,
}

impl Emulator {
    pub fn new(config: EmulatorConfig) -> Self {
        let mut cpu = Cpu::with_return_address(config.return_address);
        cpu.regs.sp = config.stack_pointer;
        Self {
            cpu,
            memory: Memory::new(),
            state: RunState::Running,
            debugger: Debugger::new(config.trace_history),
            config,
            steps: 0,
        }
    }

    /// Places raw bytes at `origin`. Used both for the program and for any
    /// data it expects to find in memory.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        self.memory.load(origin, bytes);
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.regs.pc = pc;
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    /// Instructions executed since creation or the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns the machine to its initial state. Memory is kept so a loaded
    /// program can be run again.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.cpu.regs.sp = self.config.stack_pointer;
        self.state = RunState::Running;
        self.steps = 0;
        self.debugger.clear_trace();
    }

    /// Executes a single instruction.
    pub fn step(&mut self) -> Result<RunState, Fault> {
        match self.state {
            RunState::Halted => return Ok(RunState::Halted),
            RunState::Faulted(fault) => return Err(fault),
            RunState::Running => {}
        }

        let pc = self.cpu.regs.pc;
        let sp_before = self.cpu.regs.sp;
        let opcode = self.memory.read(pc);

        if self.debugger.is_tracing() {
            self.debugger.record(&self.cpu, &mut self.memory);
            if log_enabled!(Level::Trace) {
                if let Some(entry) = self.debugger.last_entry() {
                    trace!("{:04X}  {:<14} {:?}", pc, entry.mnemonic, self.cpu.regs);
                }
            }
        }

        match self.cpu.step(&mut self.memory) {
            Ok(_cycles) => {
                self.steps += 1;
                if let Some(op) = decode(opcode) {
                    self.debugger.observe(op, pc, sp_before, &self.cpu.regs);
                }
                if self.cpu.halted {
                    debug!(
                        "halted at {:04X} after {} steps, {} cycles",
                        pc,
                        self.steps,
                        self.cpu.cycles()
                    );
                    self.state = RunState::Halted;
                }
                Ok(self.state)
            }
            Err(fault) => {
                match fault.mnemonic() {
                    Some(name) => warn!("{} ({} has no handler)", fault, name),
                    None => warn!("{}", fault),
                }
                self.state = RunState::Faulted(fault);
                Err(fault)
            }
        }
    }

    /// Runs until HLT, a fault, an enabled breakpoint or the configured step
    /// limit. A breakpoint at the starting PC does not stop the first step,
    /// so calling `run` again resumes past it.
    pub fn run(&mut self) -> Result<StopReason, Fault> {
        let mut executed: u64 = 0;
        loop {
            match self.state {
                RunState::Halted => return Ok(StopReason::Halted),
                RunState::Faulted(fault) => return Err(fault),
                RunState::Running => {}
            }
            if let Some(limit) = self.config.step_limit {
                if executed >= limit {
                    debug!("step limit of {} reached at {:04X}", limit, self.cpu.regs.pc);
                    return Ok(StopReason::StepLimit);
                }
            }
            let pc = self.cpu.regs.pc;
            if executed > 0 && self.debugger.hit_breakpoint(pc) {
                debug!("breakpoint at {:04X}", pc);
                return Ok(StopReason::Breakpoint(pc));
            }
            self.step()?;
            executed += 1;
        }
    }

    pub fn save_state(&self) -> SaveState {
        SaveState::capture(&self.cpu, &self.memory, self.state)
    }

    pub fn load_state(&mut self, state: &SaveState) -> Result<(), StateError> {
        self.state = state.restore(&mut self.cpu, &mut self.memory)?;
        self.debugger.clear_trace();
        Ok(())
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}
