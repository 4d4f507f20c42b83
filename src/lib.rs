//! Intel 8080 register-transfer core.
//!
//! Executes pre-assembled 8080 machine code against a flat 64 KiB memory:
//! data transfer, INR/DCR/INX/DCX, compares, jumps, calls and returns, and
//! the stack group. The accumulator ALU family, I/O ports, interrupts and
//! restarts are decoded for disassembly but fault when executed.
//!
//! ```
//! use i8080_emulator::{Emulator, StopReason};
//!
//! let mut emu = Emulator::default();
//! // MVI A,2Ah ; HLT
//! emu.load(0x0000, &[0x3E, 0x2A, 0x76]);
//! assert_eq!(emu.run(), Ok(StopReason::Halted));
//! assert_eq!(emu.cpu().regs.a, 0x2A);
//! ```

pub mod cpu;
pub mod cpu_bus;
pub mod debugger;
pub mod emulator;
pub mod memory;
pub mod programs;
pub mod save_state;

pub use cpu::{Cpu, Fault, Flags, ReturnAddress};
pub use cpu_bus::CpuBus;
pub use debugger::Debugger;
pub use emulator::{Emulator, EmulatorConfig, RunState, StopReason};
pub use memory::Memory;
pub use save_state::{SaveState, StateError};
