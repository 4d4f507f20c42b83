mod debug_flags;

use std::env;
use std::path::Path;
use std::process;

use i8080_emulator::programs::{self, DEFAULT_SORT_VALUES, SORT_DATA};
use i8080_emulator::{Emulator, Fault, StopReason};

fn parse_origin(arg: &str) -> Result<u16, String> {
    let digits = arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
        .unwrap_or(arg);
    let digits = digits.strip_suffix(['h', 'H']).unwrap_or(digits);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid origin '{}': {}", arg, e))
}

fn load_program(emulator: &mut Emulator, path: &Path, origin: u16) -> Result<(), String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    if bytes.len() > 0x10000 {
        return Err(format!(
            "{} is {} bytes, larger than the 64 KiB address space",
            path.display(),
            bytes.len()
        ));
    }
    log::info!(
        "loaded {} bytes from {} at {:04X}",
        bytes.len(),
        path.display(),
        origin
    );
    emulator.load(origin, &bytes);
    emulator.set_pc(origin);
    Ok(())
}

fn report_fault(emulator: &Emulator, fault: &Fault) {
    eprintln!("Fault: {}", fault);
    if let Some(name) = fault.mnemonic() {
        eprintln!("  {} is part of the instruction set but has no handler", name);
    }
    let trace: Vec<_> = emulator.debugger().trace().collect();
    if !trace.is_empty() {
        eprintln!("Last {} instructions:", trace.len());
        for entry in trace {
            eprintln!("  {:04X}  {}", entry.pc, entry.mnemonic);
        }
    }
}

fn print_registers(emulator: &Emulator) {
    let cpu = emulator.cpu();
    let r = &cpu.regs;
    println!(
        "A={:02X} F={:02X} B={:02X} C={:02X} D={:02X} E={:02X} H={:02X} L={:02X} PC={:04X} SP={:04X}",
        r.a,
        r.f.bits(),
        r.b,
        r.c,
        r.d,
        r.e,
        r.h,
        r.l,
        r.pc,
        r.sp
    );
    println!(
        "{} instructions, {} cycles",
        emulator.steps(),
        cpu.cycles()
    );
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: {} [program.bin [origin-hex]]", args[0]);
        eprintln!("With no program, sorts {:?} with the built-in demo.", DEFAULT_SORT_VALUES);
        return;
    }

    let mut emulator = Emulator::new(debug_flags::emulator_config());

    let demo = args.len() < 2;
    if demo {
        if let Err(e) = programs::load_bubble_sort(&mut emulator, &DEFAULT_SORT_VALUES) {
            eprintln!("{}", e);
            process::exit(1);
        }
        println!("Sorting {:?} at {:04X}", DEFAULT_SORT_VALUES, SORT_DATA);
    } else {
        let origin = match args.get(2).map(|a| parse_origin(a)).transpose() {
            Ok(origin) => origin.unwrap_or(0x0000),
            Err(msg) => {
                eprintln!("{}", msg);
                process::exit(2);
            }
        };
        if let Err(msg) = load_program(&mut emulator, Path::new(&args[1]), origin) {
            eprintln!("{}", msg);
            process::exit(1);
        }
    }

    let outcome = emulator.run();

    if let Some(path) = debug_flags::save_state_path() {
        if let Err(e) = emulator.save_state().save_to_file(&path) {
            eprintln!("Failed to write save state: {}", e);
        }
    }

    match outcome {
        Ok(reason) => {
            match reason {
                StopReason::Halted => log::info!("program halted"),
                StopReason::StepLimit => println!("Stopped after step limit"),
                StopReason::Breakpoint(pc) => println!("Stopped at breakpoint {:04X}", pc),
            }
            if demo {
                let sorted = programs::sorted_values(&emulator, DEFAULT_SORT_VALUES.len());
                println!("Sorted: {:?}", sorted);
            }
            print_registers(&emulator);
        }
        Err(fault) => {
            report_fault(&emulator, &fault);
            print_registers(&emulator);
            process::exit(1);
        }
    }
}
