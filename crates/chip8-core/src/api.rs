//! Public host-facing API for embedding the interpreter core.
//!
//! Every accessor returns an explicit `Result`. The machine also keeps a
//! snapshot of the most recent fault, set by failing accessors and steps and
//! cleared by successful ones.

use std::cell::RefCell;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::execute::step_one;
use crate::{
    CallStack, Display, Fault, Keypad, Memory, Register, RegisterFile, Timers, MEMORY_BYTES,
};

/// Immutable per-machine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Seed for the `CXNN` random source; `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
    /// Emits a `trace!` record for every executed instruction.
    pub trace_instructions: bool,
}

impl CoreConfig {
    fn build_rng(&self) -> StdRng {
        self.rng_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// Result of a single [`Machine::step`].
///
/// `beep` reports the one cycle on which the sound timer expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Instruction executed and `PC` moved.
    Retired {
        /// Sound timer went from 1 to 0 this cycle.
        beep: bool,
    },
    /// `FX0A` is polling for a key; `PC` unchanged.
    AwaitingKey {
        /// Sound timer went from 1 to 0 this cycle.
        beep: bool,
    },
    /// The step was rejected; the machine remains steppable.
    Fault {
        /// Fault recorded for this step.
        fault: Fault,
        /// Sound timer went from 1 to 0 this cycle.
        beep: bool,
    },
}

impl StepOutcome {
    /// Whether the audio collaborator should sound a beep.
    #[must_use]
    pub const fn beep(&self) -> bool {
        match self {
            Self::Retired { beep } | Self::AwaitingKey { beep } | Self::Fault { beep, .. } => *beep,
        }
    }

    /// Fault raised by this step, if any.
    #[must_use]
    pub const fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault { fault, .. } => Some(fault),
            Self::Retired { .. } | Self::AwaitingKey { .. } => None,
        }
    }
}

/// Aggregate result of [`Machine::run_steps`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps actually executed.
    pub steps: u64,
    /// Steps that faulted.
    pub faults: u64,
    /// Beep notifications raised.
    pub beeps: u64,
    /// Most recent fault observed during the run.
    pub last_fault: Option<Fault>,
}

impl RunSummary {
    /// Folds a later run segment into this one.
    pub fn absorb(&mut self, later: Self) {
        self.steps += later.steps;
        self.faults += later.faults;
        self.beeps += later.beeps;
        if later.last_fault.is_some() {
            self.last_fault = later.last_fault;
        }
    }
}

/// The complete interpreter: machine state plus the execution engine.
#[derive(Debug, Clone)]
pub struct Machine {
    pub(crate) memory: Memory,
    pub(crate) registers: RegisterFile,
    pub(crate) stack: CallStack,
    pub(crate) timers: Timers,
    pub(crate) display: Display,
    pub(crate) keypad: Keypad,
    pub(crate) rng: StdRng,
    config: CoreConfig,
    last_error: RefCell<Option<Fault>>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Creates a machine in its reset state with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CoreConfig::default())
    }

    /// Creates a machine in its reset state.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        let mut machine = Self {
            memory: Memory::new(),
            registers: RegisterFile::default(),
            stack: CallStack::default(),
            timers: Timers::default(),
            display: Display::default(),
            keypad: Keypad::default(),
            rng: config.build_rng(),
            config: config.clone(),
            last_error: RefCell::new(None),
        };
        machine.memory.reset();
        machine
    }

    /// Configuration this machine was built with.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Restores power-on state: `PC = 0x200`, registers, stack, timers,
    /// display and keys cleared, memory zeroed with the glyph table reloaded.
    ///
    /// The random source is re-seeded so seeded runs replay identically.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.registers = RegisterFile::default();
        self.stack = CallStack::default();
        self.timers = Timers::default();
        self.display = Display::default();
        self.keypad.release_all();
        self.rng = self.config.build_rng();
        self.clear_last_error();
        info!("machine reset");
    }

    /// Executes exactly one fetch/decode/execute/timer cycle.
    pub fn step(&mut self) -> StepOutcome {
        step_one(self)
    }

    /// Executes up to `steps` cycles, stopping early on the first fault when
    /// `halt_on_error` is set.
    pub fn run_steps(&mut self, steps: u64, halt_on_error: bool) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..steps {
            let outcome = self.step();
            summary.steps += 1;
            summary.beeps += u64::from(outcome.beep());
            if let StepOutcome::Fault { fault, .. } = outcome {
                summary.faults += 1;
                summary.last_fault = Some(fault);
                if halt_on_error {
                    break;
                }
            }
        }
        summary
    }

    /// Most recent fault, if the last fallible call failed.
    #[must_use]
    pub fn last_error(&self) -> Option<Fault> {
        self.last_error.borrow().clone()
    }

    pub(crate) fn clear_last_error(&self) {
        self.last_error.replace(None);
    }

    pub(crate) fn record_fault(&self, fault: &Fault) {
        self.last_error.replace(Some(fault.clone()));
    }

    /// Mirrors `result` into the last-error snapshot.
    pub(crate) fn record<T>(&self, result: Result<T, Fault>) -> Result<T, Fault> {
        self.last_error.replace(result.as_ref().err().cloned());
        result
    }

    /// Reads one memory byte.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for `addr >= 4096`.
    pub fn read_memory(&self, addr: usize) -> Result<u8, Fault> {
        self.record(self.memory.read(addr))
    }

    /// Writes one memory byte.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for `addr >= 4096`; memory is unchanged.
    pub fn write_memory(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        let result = self.memory.write(addr, value);
        self.record(result)
    }

    /// Read-only view of the whole address space.
    #[must_use]
    pub const fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// Reads `V{index}`.
    ///
    /// # Errors
    ///
    /// `InvalidRegister` for `index > 0xF`.
    pub fn register(&self, index: u8) -> Result<u8, Fault> {
        let result = Register::try_from_index(index).map(|reg| self.registers.v(reg));
        self.record(result)
    }

    /// Writes `V{index}`.
    ///
    /// # Errors
    ///
    /// `InvalidRegister` for `index > 0xF`.
    pub fn set_register(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        let result = Register::try_from_index(index).map(|reg| self.registers.set_v(reg, value));
        self.record(result)
    }

    /// Reads the index register `I`.
    #[must_use]
    pub const fn index_register(&self) -> u16 {
        self.registers.index()
    }

    /// Writes the index register `I`. Any 16-bit value is accepted.
    pub const fn set_index_register(&mut self, value: u16) {
        self.registers.set_index(value);
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn program_counter(&self) -> u16 {
        self.registers.pc()
    }

    /// Writes the program counter.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for `addr >= 4096`; `PC` is unchanged.
    pub fn set_program_counter(&mut self, addr: u16) -> Result<(), Fault> {
        let result = if usize::from(addr) < MEMORY_BYTES {
            self.registers.set_pc(addr);
            Ok(())
        } else {
            Err(Fault::invalid_address(usize::from(addr)))
        };
        self.record(result)
    }

    /// Reads a stack slot regardless of the stack pointer.
    ///
    /// # Errors
    ///
    /// `StackOverflow` for `slot >= 16`.
    pub fn stack_slot(&self, slot: u8) -> Result<u16, Fault> {
        self.record(self.stack.slot(slot))
    }

    /// Writes a stack slot regardless of the stack pointer.
    ///
    /// # Errors
    ///
    /// `StackOverflow` for `slot >= 16`.
    pub fn set_stack_slot(&mut self, slot: u8, addr: u16) -> Result<(), Fault> {
        let result = self.stack.set_slot(slot, addr);
        self.record(result)
    }

    /// Reads the stack pointer (`0..=16`).
    #[must_use]
    pub const fn stack_pointer(&self) -> u8 {
        self.stack.pointer()
    }

    /// Writes the stack pointer.
    ///
    /// # Errors
    ///
    /// `StackOverflow` for `pointer > 16`.
    pub fn set_stack_pointer(&mut self, pointer: u8) -> Result<(), Fault> {
        let result = self.stack.set_pointer(pointer);
        self.record(result)
    }

    /// Delay timer value.
    #[must_use]
    pub const fn delay_timer(&self) -> u8 {
        self.timers.delay()
    }

    /// Sound timer value.
    #[must_use]
    pub const fn sound_timer(&self) -> u8 {
        self.timers.sound()
    }

    /// Loads the delay timer.
    pub const fn set_delay_timer(&mut self, value: u8) {
        self.timers.set_delay(value);
    }

    /// Loads the sound timer.
    pub const fn set_sound_timer(&mut self, value: u8) {
        self.timers.set_sound(value);
    }

    /// Updates one key. Indices `>= 16` are ignored without error.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keypad.set(key, pressed);
    }

    /// `false` for released keys and indices `>= 16`.
    #[must_use]
    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.keypad.is_pressed(key)
    }

    /// Read-only framebuffer for renderers.
    #[must_use]
    pub const fn display(&self) -> &Display {
        &self.display
    }

    /// Reads one pixel.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` outside the 64×32 grid.
    pub fn pixel(&self, x: usize, y: usize) -> Result<u8, Fault> {
        self.record(self.display.pixel(x, y))
    }

    /// Sets or clears one pixel.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` outside the 64×32 grid; nothing changes.
    pub fn set_pixel(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Fault> {
        let result = self.display.set_pixel(x, y, lit);
        self.record(result)
    }

    /// `true` when the display changed since the last acknowledged frame.
    #[must_use]
    pub const fn redraw_requested(&self) -> bool {
        self.display.redraw_requested()
    }

    /// Called by the renderer after consuming a frame.
    pub const fn acknowledge_redraw(&mut self) {
        self.display.acknowledge_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FaultKind, GLYPH_TABLE, PROGRAM_START};

    #[test]
    fn default_core_config_is_entropy_seeded_without_tracing() {
        let config = CoreConfig::default();
        assert_eq!(config.rng_seed, None);
        assert!(!config.trace_instructions);
    }

    #[test]
    fn new_machine_is_in_reset_state() {
        let machine = Machine::new();
        assert_eq!(machine.program_counter(), PROGRAM_START);
        assert_eq!(machine.stack_pointer(), 0);
        assert_eq!(&machine.memory()[..GLYPH_TABLE.len()], &GLYPH_TABLE[..]);
        assert!(!machine.redraw_requested());
        assert_eq!(machine.last_error(), None);
    }

    #[test]
    fn successful_access_clears_previous_error() {
        let mut machine = Machine::new();
        assert!(machine.read_memory(4096).is_err());
        assert_eq!(
            machine.last_error().map(|fault| fault.kind()),
            Some(FaultKind::InvalidAddress)
        );
        machine.write_memory(0x300, 1).expect("in range");
        assert_eq!(machine.last_error(), None);
    }

    #[test]
    fn run_summary_counts_faults_and_halts_on_request() {
        let mut machine = Machine::new();
        machine.load(&[0x00, 0xFF]).expect("fits");
        let summary = machine.run_steps(10, false);
        assert_eq!(summary.steps, 10);
        assert_eq!(summary.faults, 10);

        let summary = machine.run_steps(10, true);
        assert_eq!(summary.steps, 1);
        assert_eq!(
            summary.last_fault.map(|fault| fault.kind()),
            Some(FaultKind::UnknownOpcode)
        );
    }

    #[test]
    fn absorbed_segments_add_up_and_keep_the_latest_fault() {
        let mut machine = Machine::new();
        machine.load(&[0x00, 0xFF]).expect("fits");
        let mut total = machine.run_steps(3, false);
        total.absorb(RunSummary::default());
        assert_eq!(total.faults, 3);
        assert!(total.last_fault.is_some());
        total.absorb(machine.run_steps(2, false));
        assert_eq!((total.steps, total.faults), (5, 5));
    }

    #[test]
    fn step_outcome_helpers_expose_beep_and_fault() {
        let fault = Fault::stack_underflow(0x200);
        let outcome = StepOutcome::Fault {
            fault: fault.clone(),
            beep: true,
        };
        assert!(outcome.beep());
        assert_eq!(outcome.fault(), Some(&fault));
        assert_eq!(StepOutcome::AwaitingKey { beep: false }.fault(), None);
    }

    #[test]
    fn seeded_machines_draw_the_same_random_bytes() {
        let config = CoreConfig {
            rng_seed: Some(42),
            trace_instructions: false,
        };
        let program = [0xC0, 0xFF, 0xC1, 0xFF, 0xC2, 0xFF];
        let mut first = Machine::with_config(&config);
        let mut second = Machine::with_config(&config);
        first.load(&program).expect("fits");
        second.load(&program).expect("fits");
        first.run_steps(3, true);
        second.run_steps(3, true);
        for reg in 0..3 {
            assert_eq!(first.register(reg), second.register(reg));
        }
    }
}
