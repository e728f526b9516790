//! Instruction execution pipeline.
//!
//! One step runs the fixed sequence:
//! 1. Guard and fetch the instruction word at `PC`
//! 2. Decode it
//! 3. Validate every operand and memory range the instruction touches
//! 4. Commit register, memory, display and stack effects
//! 5. Move `PC`
//! 6. Tick the timers
//!
//! Faulting instructions produce no partial side effects, with two
//! exceptions: a call on a full stack still advances `PC`, and a draw that
//! runs off the end of memory keeps the rows it blitted, the cleared or
//! collision `VF`, and the redraw request.

mod flow;
mod helpers;

pub use flow::PcUpdate;
pub use helpers::{add_with_carry, bcd_digits, shift_left, shift_right, sub_not_borrow};

use log::{debug, trace, warn};
use rand::Rng;

use crate::decoder::Instruction;
use crate::{glyph_address, Decoder, Fault, Machine, Register, StepOutcome, MEMORY_BYTES};

/// Outcome of executing a single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction committed; `PC` moves as described.
    Retired(PcUpdate),
    /// `FX0A` found no pressed key; `PC` stays put.
    AwaitingKey,
    /// Instruction was rejected.
    Fault {
        /// The recorded fault.
        fault: Fault,
        /// `PC` movement that still applies.
        pc: PcUpdate,
    },
}

fn retire(result: Result<PcUpdate, Fault>) -> ExecuteOutcome {
    match result {
        Ok(update) => ExecuteOutcome::Retired(update),
        Err(fault) => ExecuteOutcome::Fault {
            fault,
            pc: PcUpdate::Hold,
        },
    }
}

/// Applies one decoded instruction fetched from `pc`. Does not move `PC`.
pub fn execute_instruction(
    machine: &mut Machine,
    instruction: Instruction,
    pc: u16,
) -> ExecuteOutcome {
    let result = match instruction {
        Instruction::Call { addr } => return execute_call(machine, pc, addr),
        Instruction::WaitKey { x } => return execute_wait_key(machine, x),
        Instruction::Return => execute_return(machine, pc),
        Instruction::JumpOffset { addr } => execute_jump_offset(machine, addr),
        Instruction::Draw { x, y, n } => execute_draw(machine, x, y, n),
        Instruction::LoadGlyph { x } => execute_load_glyph(machine, x),
        Instruction::StoreBcd { x } => execute_store_bcd(machine, x),
        Instruction::StoreRegisters { x } => execute_store_registers(machine, x),
        Instruction::LoadRegisters { x } => execute_load_registers(machine, x),
        Instruction::Clear => {
            machine.display.clear();
            Ok(PcUpdate::Next)
        }
        Instruction::Jump { addr } => Ok(PcUpdate::Jump(addr)),
        Instruction::AddReg { x, y } => Ok(execute_alu(machine, x, y, AluOp::Add)),
        Instruction::Sub { x, y } => Ok(execute_alu(machine, x, y, AluOp::Sub)),
        Instruction::SubReverse { x, y } => Ok(execute_alu(machine, x, y, AluOp::SubReverse)),
        Instruction::ShiftRight { x, y } => Ok(execute_alu(machine, x, y, AluOp::ShiftRight)),
        Instruction::ShiftLeft { x, y } => Ok(execute_alu(machine, x, y, AluOp::ShiftLeft)),
        Instruction::Random { x, nn } => {
            let byte: u8 = machine.rng.gen();
            machine.registers.set_v(x, byte & nn);
            Ok(PcUpdate::Next)
        }
        other => Ok(execute_register_op(machine, other)),
    };
    retire(result)
}

fn execute_call(machine: &mut Machine, pc: u16, addr: u16) -> ExecuteOutcome {
    if machine.stack.push(pc).is_some() {
        ExecuteOutcome::Retired(PcUpdate::Jump(addr))
    } else {
        ExecuteOutcome::Fault {
            fault: Fault::stack_overflow(pc, addr),
            pc: PcUpdate::Next,
        }
    }
}

fn execute_wait_key(machine: &mut Machine, x: Register) -> ExecuteOutcome {
    match machine.keypad.first_pressed() {
        Some(key) => {
            machine.registers.set_v(x, key);
            ExecuteOutcome::Retired(PcUpdate::Next)
        }
        None => ExecuteOutcome::AwaitingKey,
    }
}

fn execute_return(machine: &mut Machine, pc: u16) -> Result<PcUpdate, Fault> {
    let call_site = machine
        .stack
        .pop()
        .ok_or_else(|| Fault::stack_underflow(pc))?;
    Ok(PcUpdate::Jump(PcUpdate::Next.apply(call_site)))
}

fn execute_jump_offset(machine: &Machine, addr: u16) -> Result<PcUpdate, Fault> {
    let target = addr + u16::from(machine.registers.v(Register::V0));
    if usize::from(target) >= MEMORY_BYTES {
        return Err(Fault::invalid_jump(usize::from(target)));
    }
    Ok(PcUpdate::Jump(target))
}

fn execute_draw(
    machine: &mut Machine,
    x: Register,
    y: Register,
    n: u8,
) -> Result<PcUpdate, Fault> {
    let origin_x = machine.registers.v(x);
    let origin_y = machine.registers.v(y);
    machine.registers.set_flag(false);
    let start = usize::from(machine.registers.index());
    let len = usize::from(n);
    // Rows past the end of memory are dropped; the ones before them still land.
    let readable = MEMORY_BYTES.saturating_sub(start).min(len);
    let sprite = machine.memory.slice(start.min(MEMORY_BYTES), readable)?;
    let collision = machine.display.draw_sprite(origin_x, origin_y, sprite);
    machine.registers.set_flag(collision);
    if readable < len {
        return Err(Fault::invalid_range(start, len));
    }
    Ok(PcUpdate::Next)
}

fn execute_load_glyph(machine: &mut Machine, x: Register) -> Result<PcUpdate, Fault> {
    let digit = machine.registers.v(x);
    let addr = glyph_address(digit).ok_or_else(|| Fault::invalid_glyph(digit))?;
    machine.registers.set_index(addr);
    Ok(PcUpdate::Next)
}

fn execute_store_bcd(machine: &mut Machine, x: Register) -> Result<PcUpdate, Fault> {
    let digits = bcd_digits(machine.registers.v(x));
    machine
        .memory
        .write_slice(usize::from(machine.registers.index()), &digits)?;
    Ok(PcUpdate::Next)
}

fn execute_store_registers(machine: &mut Machine, x: Register) -> Result<PcUpdate, Fault> {
    let start = usize::from(machine.registers.index());
    machine
        .memory
        .write_slice(start, machine.registers.prefix(x))?;
    Ok(PcUpdate::Next)
}

fn execute_load_registers(machine: &mut Machine, x: Register) -> Result<PcUpdate, Fault> {
    let start = usize::from(machine.registers.index());
    let bytes = machine.memory.slice(start, x.index() + 1)?;
    machine.registers.load_prefix(bytes);
    Ok(PcUpdate::Next)
}

#[derive(Debug, Clone, Copy)]
enum AluOp {
    Add,
    Sub,
    SubReverse,
    ShiftRight,
    ShiftLeft,
}

/// Writes `VF` first and `Vx` second, so `Vx = VF` keeps the result.
///
/// Shifts read only `Vx`; `Vy` is decoded but ignored.
fn execute_alu(machine: &mut Machine, x: Register, y: Register, op: AluOp) -> PcUpdate {
    let vx = machine.registers.v(x);
    let vy = machine.registers.v(y);
    let (value, flag) = match op {
        AluOp::Add => add_with_carry(vx, vy),
        AluOp::Sub => sub_not_borrow(vx, vy),
        AluOp::SubReverse => sub_not_borrow(vy, vx),
        AluOp::ShiftRight => shift_right(vx),
        AluOp::ShiftLeft => shift_left(vx),
    };
    machine.registers.set_flag(flag);
    machine.registers.set_v(x, value);
    PcUpdate::Next
}

/// Register, timer, keypad and index operations that cannot fault.
fn execute_register_op(machine: &mut Machine, instruction: Instruction) -> PcUpdate {
    let regs = &mut machine.registers;
    match instruction {
        Instruction::SkipEqImm { x, nn } => return PcUpdate::skip_if(regs.v(x) == nn),
        Instruction::SkipNeImm { x, nn } => return PcUpdate::skip_if(regs.v(x) != nn),
        Instruction::SkipEqReg { x, y } => return PcUpdate::skip_if(regs.v(x) == regs.v(y)),
        Instruction::SkipNeReg { x, y } => return PcUpdate::skip_if(regs.v(x) != regs.v(y)),
        Instruction::SkipKeyPressed { x } => {
            return PcUpdate::skip_if(machine.keypad.is_pressed(regs.v(x)));
        }
        Instruction::SkipKeyReleased { x } => {
            return PcUpdate::skip_if(!machine.keypad.is_pressed(regs.v(x)));
        }
        Instruction::LoadImm { x, nn } => regs.set_v(x, nn),
        Instruction::AddImm { x, nn } => regs.set_v(x, regs.v(x).wrapping_add(nn)),
        Instruction::Move { x, y } => regs.set_v(x, regs.v(y)),
        Instruction::Or { x, y } => regs.set_v(x, regs.v(x) | regs.v(y)),
        Instruction::And { x, y } => regs.set_v(x, regs.v(x) & regs.v(y)),
        Instruction::Xor { x, y } => regs.set_v(x, regs.v(x) ^ regs.v(y)),
        Instruction::LoadIndex { addr } => regs.set_index(addr),
        Instruction::AddIndex { x } => {
            regs.set_index(regs.index().wrapping_add(u16::from(regs.v(x))));
        }
        Instruction::ReadDelay { x } => regs.set_v(x, machine.timers.delay()),
        Instruction::SetDelay { x } => machine.timers.set_delay(regs.v(x)),
        Instruction::SetSound { x } => machine.timers.set_sound(regs.v(x)),
        // Control-flow and memory instructions are handled by `execute_instruction`.
        _ => return PcUpdate::Hold,
    }
    PcUpdate::Next
}

/// Runs one fetch/decode/execute/timer cycle against `machine`.
///
/// The last-error snapshot is cleared on entry and set when the step faults.
pub fn step_one(machine: &mut Machine) -> StepOutcome {
    machine.clear_last_error();
    let pc = machine.registers.pc();

    let word = match machine.memory.read_word(pc) {
        Ok(word) => word,
        Err(fault) => {
            warn!("{fault}");
            machine.record_fault(&fault);
            return StepOutcome::Fault { fault, beep: false };
        }
    };

    let outcome = match Decoder::decode(word) {
        Ok(instruction) => {
            if machine.config().trace_instructions {
                trace!("0x{pc:03X}: {word:04X} {instruction:?}");
            }
            execute_instruction(machine, instruction, pc)
        }
        Err(fault) => ExecuteOutcome::Fault {
            fault: fault.at_pc(pc),
            pc: PcUpdate::Hold,
        },
    };

    let beep = machine.timers.tick();
    if beep {
        debug!("sound timer expired at 0x{pc:03X}");
    }

    match outcome {
        ExecuteOutcome::Retired(update) => {
            machine.registers.set_pc(update.apply(pc));
            StepOutcome::Retired { beep }
        }
        ExecuteOutcome::AwaitingKey => StepOutcome::AwaitingKey { beep },
        ExecuteOutcome::Fault { fault, pc: update } => {
            warn!("{fault}");
            machine.registers.set_pc(update.apply(pc));
            machine.record_fault(&fault);
            StepOutcome::Fault { fault, beep }
        }
    }
}
