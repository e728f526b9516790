//! Instruction disassembly.
//!
//! A read-only pretty-printer over instruction words and memory images. It
//! uses the same field extraction and encoding table as the decoder, so a
//! word the engine rejects always renders as `UNK` (or `SYS` for `0NNN`).

use crate::encoding::{classify_opcode, OpcodeEncoding, OpcodeFields};
use crate::INSTRUCTION_BYTES;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the first instruction byte.
    pub address: u16,
    /// Raw instruction word.
    pub opcode: u16,
    /// Mnemonic with operands, e.g. `LD V1, 0x2A`.
    pub mnemonic: String,
    /// Short human-readable description.
    pub description: String,
    /// Whether `address` equals the caller's current program counter.
    pub is_current_pc: bool,
}

fn reg(index: u8) -> String {
    format!("V{index:X}")
}

/// Renders one instruction word as assembly text.
#[must_use]
pub fn disassemble_instruction(word: u16) -> String {
    let f = OpcodeFields::from_word(word);
    let (x, y) = (reg(f.x), reg(f.y));
    let addr = format!("0x{:04X}", f.nnn);
    let byte = format!("0x{:02X}", f.nn);

    let Some(encoding) = classify_opcode(word) else {
        return format!("UNK 0x{word:04X}");
    };
    let name = encoding.mnemonic();
    match encoding {
        OpcodeEncoding::Cls | OpcodeEncoding::Ret => name.to_string(),
        OpcodeEncoding::Sys | OpcodeEncoding::Jp | OpcodeEncoding::Call => {
            format!("{name} {addr}")
        }
        OpcodeEncoding::SeImm
        | OpcodeEncoding::SneImm
        | OpcodeEncoding::LdImm
        | OpcodeEncoding::AddImm
        | OpcodeEncoding::Rnd => format!("{name} {x}, {byte}"),
        OpcodeEncoding::SeReg
        | OpcodeEncoding::SneReg
        | OpcodeEncoding::LdReg
        | OpcodeEncoding::Or
        | OpcodeEncoding::And
        | OpcodeEncoding::Xor
        | OpcodeEncoding::AddReg
        | OpcodeEncoding::Sub
        | OpcodeEncoding::Subn => format!("{name} {x}, {y}"),
        OpcodeEncoding::Shr | OpcodeEncoding::Shl => format!("{name} {x} {{, {y}}}"),
        OpcodeEncoding::LdI => format!("{name} I, {addr}"),
        OpcodeEncoding::JpV0 => format!("{name} V0, {addr}"),
        OpcodeEncoding::Drw => format!("{name} {x}, {y}, {}", f.n),
        OpcodeEncoding::Skp | OpcodeEncoding::Sknp => format!("{name} {x}"),
        OpcodeEncoding::LdVxDt => format!("{name} {x}, DT"),
        OpcodeEncoding::LdVxK => format!("{name} {x}, K"),
        OpcodeEncoding::LdDtVx => format!("{name} DT, {x}"),
        OpcodeEncoding::LdStVx => format!("{name} ST, {x}"),
        OpcodeEncoding::AddIVx => format!("{name} I, {x}"),
        OpcodeEncoding::LdFVx => format!("{name} F, {x}"),
        OpcodeEncoding::LdBVx => format!("{name} B, {x}"),
        OpcodeEncoding::LdIVx => format!("{name} [I], {x}"),
        OpcodeEncoding::LdVxI => format!("{name} {x}, [I]"),
    }
}

/// Short description for an instruction word.
#[must_use]
pub fn describe_instruction(word: u16) -> &'static str {
    classify_opcode(word).map_or("Unknown instruction", OpcodeEncoding::description)
}

fn disassemble_one(address: u16, memory: &[u8], current_pc: u16) -> Option<DisassemblyRow> {
    let hi = *memory.get(usize::from(address))?;
    let lo = *memory.get(usize::from(address) + 1)?;
    let opcode = u16::from_be_bytes([hi, lo]);
    Some(DisassemblyRow {
        address,
        opcode,
        mnemonic: disassemble_instruction(opcode),
        description: describe_instruction(opcode).to_string(),
        is_current_pc: address == current_pc,
    })
}

/// Disassembles `count` consecutive words starting at `start`.
///
/// Rows whose two bytes cannot both be read from `memory` are omitted.
#[must_use]
pub fn disassemble_range(
    memory: &[u8],
    start: u16,
    count: usize,
    current_pc: u16,
) -> Vec<DisassemblyRow> {
    (0..count)
        .map_while(|i| {
            let offset = u16::try_from(i).ok()?.checked_mul(INSTRUCTION_BYTES)?;
            start.checked_add(offset)
        })
        .filter_map(|address| disassemble_one(address, memory, current_pc))
        .collect()
}

/// Disassembles `before` words ahead of `center_pc`, the word at `center_pc`,
/// and `after` words following it. The centre row is marked current.
///
/// Near address 0 fewer than `before` leading rows are produced.
#[must_use]
pub fn disassemble_window(
    center_pc: u16,
    before: usize,
    after: usize,
    memory: &[u8],
) -> Vec<DisassemblyRow> {
    let available_before = usize::from(center_pc / INSTRUCTION_BYTES);
    let leading = before.min(available_before);
    let lead_bytes = u16::try_from(leading).unwrap_or(0) * INSTRUCTION_BYTES;
    disassemble_range(
        memory,
        center_pc - lead_bytes,
        leading + 1 + after,
        center_pc,
    )
}
