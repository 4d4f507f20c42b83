use std::sync::OnceLock;

use i8080_emulator::{EmulatorConfig, ReturnAddress};

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(default)
}

// Accepts decimal or 0x-prefixed hex.
fn parse_u64(v: &str) -> Option<u64> {
    match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => v.parse::<u64>().ok(),
    }
}

fn env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_u64(&v))
        .and_then(|n| u16::try_from(n).ok())
        .unwrap_or(default)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| parse_u64(&v))
}

pub fn stack_pointer() -> u16 {
    static V: OnceLock<u16> = OnceLock::new();
    *V.get_or_init(|| env_u16("I8080_SP", 0xFFFF))
}

// Push the CALL opcode's own address instead of the next instruction.
pub fn call_site_return() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| env_flag("I8080_CALL_SITE_RETURN", false))
}

pub fn step_limit() -> Option<u64> {
    static V: OnceLock<Option<u64>> = OnceLock::new();
    *V.get_or_init(|| env_u64("I8080_STEP_LIMIT"))
}

// Keep a trace of the last N instructions and dump it on fault (0 = off)
pub fn trace_history() -> usize {
    static V: OnceLock<usize> = OnceLock::new();
    *V.get_or_init(|| env_u64("I8080_TRACE").map_or(0, |n| n as usize))
}

pub fn save_state_path() -> Option<String> {
    std::env::var("I8080_SAVE_STATE").ok().filter(|p| !p.is_empty())
}

pub fn emulator_config() -> EmulatorConfig {
    EmulatorConfig {
        stack_pointer: stack_pointer(),
        return_address: if call_site_return() {
            ReturnAddress::CallSite
        } else {
            ReturnAddress::NextInstruction
        },
        step_limit: step_limit(),
        trace_history: trace_history(),
    }
}
