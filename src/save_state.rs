use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cpu::{Cpu, Fault, Flags};
use crate::emulator::RunState;
use crate::memory::Memory;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to encode or decode save state: {0}")]
    Codec(#[from] bincode::Error),
    #[error("save state I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save state version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("save state holds {0} bytes of memory, expected 64 KiB")]
    MemorySize(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedRunState {
    Running,
    Halted,
    Faulted { opcode: u8, pc: u16 },
}

impl From<RunState> for SavedRunState {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Running => SavedRunState::Running,
            RunState::Halted => SavedRunState::Halted,
            RunState::Faulted(fault) => SavedRunState::Faulted {
                opcode: fault.opcode,
                pc: fault.pc,
            },
        }
    }
}

impl From<SavedRunState> for RunState {
    fn from(state: SavedRunState) -> Self {
        match state {
            SavedRunState::Running => RunState::Running,
            SavedRunState::Halted => RunState::Halted,
            SavedRunState::Faulted { opcode, pc } => RunState::Faulted(Fault { opcode, pc }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub version: u32,

    // CPU state
    pub cpu_a: u8,
    pub cpu_f: u8,
    pub cpu_b: u8,
    pub cpu_c: u8,
    pub cpu_d: u8,
    pub cpu_e: u8,
    pub cpu_h: u8,
    pub cpu_l: u8,
    pub cpu_pc: u16,
    pub cpu_sp: u16,
    pub cpu_halted: bool,
    pub cpu_cycles: u64,

    pub run_state: SavedRunState,

    // Full 64 KiB address space
    pub ram: Vec<u8>,
}

impl SaveState {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn capture(cpu: &Cpu, memory: &Memory, state: RunState) -> Self {
        let regs = &cpu.regs;
        Self {
            version: Self::CURRENT_VERSION,
            cpu_a: regs.a,
            cpu_f: regs.f.bits(),
            cpu_b: regs.b,
            cpu_c: regs.c,
            cpu_d: regs.d,
            cpu_e: regs.e,
            cpu_h: regs.h,
            cpu_l: regs.l,
            cpu_pc: regs.pc,
            cpu_sp: regs.sp,
            cpu_halted: cpu.halted,
            cpu_cycles: cpu.cycles(),
            run_state: state.into(),
            ram: memory.slice().to_vec(),
        }
    }

    /// Writes this state into `cpu` and `memory`. Nothing is modified if the
    /// state is rejected.
    pub fn restore(&self, cpu: &mut Cpu, memory: &mut Memory) -> Result<RunState, StateError> {
        self.check_version()?;
        if !memory.restore(&self.ram) {
            return Err(StateError::MemorySize(self.ram.len()));
        }

        let regs = &mut cpu.regs;
        regs.a = self.cpu_a;
        regs.f = Flags::from_bits_retain(self.cpu_f);
        regs.b = self.cpu_b;
        regs.c = self.cpu_c;
        regs.d = self.cpu_d;
        regs.e = self.cpu_e;
        regs.h = self.cpu_h;
        regs.l = self.cpu_l;
        regs.pc = self.cpu_pc;
        regs.sp = self.cpu_sp;
        cpu.halted = self.cpu_halted;
        cpu.set_cycles(self.cpu_cycles);

        Ok(self.run_state.into())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StateError> {
        let state: SaveState = bincode::deserialize(data)?;
        state.check_version()?;
        Ok(state)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        let data = self.to_bytes()?;
        std::fs::write(path.as_ref(), data)?;
        log::info!("save state written to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let data = std::fs::read(path.as_ref())?;
        let state = Self::from_bytes(&data)?;
        log::info!("save state loaded from {}", path.as_ref().display());
        Ok(state)
    }

    fn check_version(&self) -> Result<(), StateError> {
        if self.version > Self::CURRENT_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: self.version,
                supported: Self::CURRENT_VERSION,
            });
        }
        Ok(())
    }
}
