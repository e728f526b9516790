//! Interpreter core for the CHIP-8 virtual machine.
//!
//! The crate owns machine state (memory, registers, stack, timers, display
//! and keypad), the bounds-checked accessor layer, and the
//! fetch/decode/execute engine. Hosts drive it one [`Machine::step`] at a
//! time and read the framebuffer when [`Machine::redraw_requested`] is set.

/// Memory model primitives, address layout and glyph table.
pub mod memory;
pub use memory::{
    glyph_address, validate_address, validate_fetch_access, validate_range, Memory, GLYPH_BYTES,
    GLYPH_TABLE, GLYPH_TABLE_BYTES, GLYPH_TABLE_START, INSTRUCTION_BYTES, INTERPRETER_END,
    MAX_PROGRAM_BYTES, MEMORY_BYTES, PROGRAM_END, PROGRAM_START,
};

/// Fault taxonomy shared by accessors, the engine and the loader.
pub mod fault;
pub use fault::{Fault, FaultKind};

/// Register file, call stack and timers.
pub mod state;
pub use state::{
    CallStack, Register, RegisterFile, Timers, GENERAL_REGISTER_COUNT, STACK_DEPTH,
};

/// Display and keypad devices.
pub mod peripherals;
pub use peripherals::{Display, Keypad, DISPLAY_HEIGHT, DISPLAY_PIXELS, DISPLAY_WIDTH, KEY_COUNT};

/// Public host-facing API contract.
pub mod api;
pub use api::{CoreConfig, Machine, RunSummary, StepOutcome};

/// Opcode field extraction and encoding table.
pub mod encoding;
pub use encoding::{classify_opcode, OpcodeEncoding, OpcodeFields, OPCODE_ENCODING_TABLE};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{Decoder, Instruction};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{execute_instruction, step_one, ExecuteOutcome, PcUpdate};

/// ROM loading.
pub mod loader;
pub use loader::{read_rom, validate_rom_size};

/// Text disassembly of instruction words and memory.
pub mod disasm;
pub use disasm::{
    describe_instruction, disassemble_instruction, disassemble_range, disassemble_window,
    DisassemblyRow,
};

/// Step-rate pacing helpers for schedulers.
pub mod timing;
pub use timing::{Cadence, DEFAULT_STEPS_PER_SECOND};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
