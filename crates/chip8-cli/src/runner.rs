//! `run` and `disasm` command implementations.

use std::fmt::Write as _;
use std::thread;
use std::time::Instant;

use chip8_core::{
    disassemble_range, Cadence, CoreConfig, Fault, Machine, RunSummary, INSTRUCTION_BYTES,
    PROGRAM_START,
};
use log::{debug, info, warn};

use crate::args::{DisasmArgs, RunArgs};
use crate::render::render_frame;

/// Loads the ROM, applies held keys and steps the machine.
///
/// Returns the summary together with the machine so the caller can render
/// its final state.
pub fn execute(args: &RunArgs) -> Result<(Machine, RunSummary), Fault> {
    let mut machine = Machine::with_config(&CoreConfig {
        rng_seed: args.seed,
        trace_instructions: args.trace,
    });
    machine.load_rom_file(&args.rom)?;
    for &key in &args.keys {
        machine.set_key(key, true);
    }

    let cadence = args.hz.and_then(Cadence::new);
    let started = Instant::now();
    let mut summary = RunSummary::default();

    while summary.steps < args.steps {
        let remaining = args.steps - summary.steps;
        let chunk = match cadence {
            Some(cadence) => {
                let due = cadence.steps_due(started.elapsed()).saturating_sub(summary.steps);
                if due == 0 {
                    thread::sleep(cadence.step_interval());
                    continue;
                }
                due.min(remaining)
            }
            None => remaining,
        };
        let segment = machine.run_steps(chunk, args.halt_on_error);
        let halted = args.halt_on_error && segment.faults > 0;
        if segment.beeps > 0 {
            debug!("{} beeps by step {}", segment.beeps, summary.steps + segment.steps);
        }
        summary.absorb(segment);
        if halted {
            break;
        }
    }

    info!(
        "ran {} steps in {:?} ({} faults)",
        summary.steps,
        started.elapsed(),
        summary.faults
    );
    Ok((machine, summary))
}

/// Formats the final frame followed by a register and run summary.
pub fn report(machine: &Machine, summary: &RunSummary) -> String {
    let mut out = render_frame(machine.display());
    let registers: Vec<String> = (0..16)
        .map(|index| format!("{:02X}", machine.register(index).unwrap_or(0)))
        .collect();
    let _ = writeln!(
        out,
        "pc=0x{:03X} i=0x{:03X} sp={} dt={} st={}",
        machine.program_counter(),
        machine.index_register(),
        machine.stack_pointer(),
        machine.delay_timer(),
        machine.sound_timer()
    );
    let _ = writeln!(out, "v={}", registers.join(" "));
    let _ = writeln!(
        out,
        "steps={} faults={} beeps={}",
        summary.steps, summary.faults, summary.beeps
    );
    if let Some(fault) = &summary.last_fault {
        let _ = writeln!(out, "last fault: {fault}");
    }
    out
}

/// `run` command; the exit code is 1 when `--halt-on-error` stopped on a fault.
pub fn run(args: &RunArgs) -> Result<(), i32> {
    let (machine, summary) = execute(args).map_err(|fault| {
        eprintln!("error: {fault}");
        1
    })?;
    print!("{}", report(&machine, &summary));

    match &summary.last_fault {
        Some(fault) if args.halt_on_error => {
            eprintln!("error: halted on fault: {fault}");
            Err(1)
        }
        Some(fault) => {
            warn!("{} faults during run; last: {fault}", summary.faults);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Formats the disassembly listing of the loaded program.
pub fn listing(args: &DisasmArgs) -> Result<String, Fault> {
    let mut machine = Machine::new();
    let len = machine.load_rom_file(&args.rom)?;
    let words = len.div_ceil(usize::from(INSTRUCTION_BYTES));
    let count = args.count.unwrap_or(words);

    let mut out = String::new();
    for row in disassemble_range(machine.memory(), PROGRAM_START, count, PROGRAM_START) {
        let _ = writeln!(
            out,
            "{:03X}: {:04X}  {:<20} ; {}",
            row.address, row.opcode, row.mnemonic, row.description
        );
    }
    Ok(out)
}

/// `disasm` command.
pub fn disasm(args: &DisasmArgs) -> Result<(), i32> {
    let text = listing(args).map_err(|fault| {
        eprintln!("error: {fault}");
        1
    })?;
    print!("{text}");
    Ok(())
}
