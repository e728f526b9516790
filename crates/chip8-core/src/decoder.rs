//! Instruction decoder.
//!
//! Turns a raw instruction word into a typed [`Instruction`] with its
//! operands already resolved to registers and immediates.

use crate::encoding::{classify_opcode, OpcodeEncoding, OpcodeFields};
use crate::{Fault, Register};

/// A decoded, executable instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Instruction {
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `1NNN`
    Jump { addr: u16 },
    /// `2NNN`
    Call { addr: u16 },
    /// `3XNN`
    SkipEqImm { x: Register, nn: u8 },
    /// `4XNN`
    SkipNeImm { x: Register, nn: u8 },
    /// `5XY_` (low nibble ignored)
    SkipEqReg { x: Register, y: Register },
    /// `6XNN`
    LoadImm { x: Register, nn: u8 },
    /// `7XNN`
    AddImm { x: Register, nn: u8 },
    /// `8XY0`
    Move { x: Register, y: Register },
    /// `8XY1`
    Or { x: Register, y: Register },
    /// `8XY2`
    And { x: Register, y: Register },
    /// `8XY3`
    Xor { x: Register, y: Register },
    /// `8XY4`
    AddReg { x: Register, y: Register },
    /// `8XY5`
    Sub { x: Register, y: Register },
    /// `8XY6`; `y` is decoded but not read.
    ShiftRight { x: Register, y: Register },
    /// `8XY7`
    SubReverse { x: Register, y: Register },
    /// `8XYE`; `y` is decoded but not read.
    ShiftLeft { x: Register, y: Register },
    /// `9XY_` (low nibble ignored)
    SkipNeReg { x: Register, y: Register },
    /// `ANNN`
    LoadIndex { addr: u16 },
    /// `BNNN`
    JumpOffset { addr: u16 },
    /// `CXNN`
    Random { x: Register, nn: u8 },
    /// `DXYN`
    Draw { x: Register, y: Register, n: u8 },
    /// `EX9E`
    SkipKeyPressed { x: Register },
    /// `EXA1`
    SkipKeyReleased { x: Register },
    /// `FX07`
    ReadDelay { x: Register },
    /// `FX0A`
    WaitKey { x: Register },
    /// `FX15`
    SetDelay { x: Register },
    /// `FX18`
    SetSound { x: Register },
    /// `FX1E`
    AddIndex { x: Register },
    /// `FX29`
    LoadGlyph { x: Register },
    /// `FX33`
    StoreBcd { x: Register },
    /// `FX55`
    StoreRegisters { x: Register },
    /// `FX65`
    LoadRegisters { x: Register },
}

impl Instruction {
    /// Encoding-table entry this instruction was decoded from.
    #[must_use]
    pub const fn encoding(self) -> OpcodeEncoding {
        match self {
            Self::Clear => OpcodeEncoding::Cls,
            Self::Return => OpcodeEncoding::Ret,
            Self::Jump { .. } => OpcodeEncoding::Jp,
            Self::Call { .. } => OpcodeEncoding::Call,
            Self::SkipEqImm { .. } => OpcodeEncoding::SeImm,
            Self::SkipNeImm { .. } => OpcodeEncoding::SneImm,
            Self::SkipEqReg { .. } => OpcodeEncoding::SeReg,
            Self::LoadImm { .. } => OpcodeEncoding::LdImm,
            Self::AddImm { .. } => OpcodeEncoding::AddImm,
            Self::Move { .. } => OpcodeEncoding::LdReg,
            Self::Or { .. } => OpcodeEncoding::Or,
            Self::And { .. } => OpcodeEncoding::And,
            Self::Xor { .. } => OpcodeEncoding::Xor,
            Self::AddReg { .. } => OpcodeEncoding::AddReg,
            Self::Sub { .. } => OpcodeEncoding::Sub,
            Self::ShiftRight { .. } => OpcodeEncoding::Shr,
            Self::SubReverse { .. } => OpcodeEncoding::Subn,
            Self::ShiftLeft { .. } => OpcodeEncoding::Shl,
            Self::SkipNeReg { .. } => OpcodeEncoding::SneReg,
            Self::LoadIndex { .. } => OpcodeEncoding::LdI,
            Self::JumpOffset { .. } => OpcodeEncoding::JpV0,
            Self::Random { .. } => OpcodeEncoding::Rnd,
            Self::Draw { .. } => OpcodeEncoding::Drw,
            Self::SkipKeyPressed { .. } => OpcodeEncoding::Skp,
            Self::SkipKeyReleased { .. } => OpcodeEncoding::Sknp,
            Self::ReadDelay { .. } => OpcodeEncoding::LdVxDt,
            Self::WaitKey { .. } => OpcodeEncoding::LdVxK,
            Self::SetDelay { .. } => OpcodeEncoding::LdDtVx,
            Self::SetSound { .. } => OpcodeEncoding::LdStVx,
            Self::AddIndex { .. } => OpcodeEncoding::AddIVx,
            Self::LoadGlyph { .. } => OpcodeEncoding::LdFVx,
            Self::StoreBcd { .. } => OpcodeEncoding::LdBVx,
            Self::StoreRegisters { .. } => OpcodeEncoding::LdIVx,
            Self::LoadRegisters { .. } => OpcodeEncoding::LdVxI,
        }
    }
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes a 16-bit instruction word.
    ///
    /// `SYS 0NNN` is named by the encoding table but has no executable form.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownOpcode` fault for `0NNN` and for any word that
    /// matches no table entry.
    pub fn decode(word: u16) -> Result<Instruction, Fault> {
        let fields = OpcodeFields::from_word(word);
        let encoding = classify_opcode(word).ok_or_else(|| Fault::unknown_opcode(word))?;
        let x = Register::from_nibble(fields.x);
        let y = Register::from_nibble(fields.y);
        let (nn, addr) = (fields.nn, fields.nnn);

        let instruction = match encoding {
            OpcodeEncoding::Sys => return Err(Fault::unknown_opcode(word)),
            OpcodeEncoding::Cls => Instruction::Clear,
            OpcodeEncoding::Ret => Instruction::Return,
            OpcodeEncoding::Jp => Instruction::Jump { addr },
            OpcodeEncoding::Call => Instruction::Call { addr },
            OpcodeEncoding::SeImm => Instruction::SkipEqImm { x, nn },
            OpcodeEncoding::SneImm => Instruction::SkipNeImm { x, nn },
            OpcodeEncoding::SeReg => Instruction::SkipEqReg { x, y },
            OpcodeEncoding::LdImm => Instruction::LoadImm { x, nn },
            OpcodeEncoding::AddImm => Instruction::AddImm { x, nn },
            OpcodeEncoding::LdReg => Instruction::Move { x, y },
            OpcodeEncoding::Or => Instruction::Or { x, y },
            OpcodeEncoding::And => Instruction::And { x, y },
            OpcodeEncoding::Xor => Instruction::Xor { x, y },
            OpcodeEncoding::AddReg => Instruction::AddReg { x, y },
            OpcodeEncoding::Sub => Instruction::Sub { x, y },
            OpcodeEncoding::Shr => Instruction::ShiftRight { x, y },
            OpcodeEncoding::Subn => Instruction::SubReverse { x, y },
            OpcodeEncoding::Shl => Instruction::ShiftLeft { x, y },
            OpcodeEncoding::SneReg => Instruction::SkipNeReg { x, y },
            OpcodeEncoding::LdI => Instruction::LoadIndex { addr },
            OpcodeEncoding::JpV0 => Instruction::JumpOffset { addr },
            OpcodeEncoding::Rnd => Instruction::Random { x, nn },
            OpcodeEncoding::Drw => Instruction::Draw { x, y, n: fields.n },
            OpcodeEncoding::Skp => Instruction::SkipKeyPressed { x },
            OpcodeEncoding::Sknp => Instruction::SkipKeyReleased { x },
            OpcodeEncoding::LdVxDt => Instruction::ReadDelay { x },
            OpcodeEncoding::LdVxK => Instruction::WaitKey { x },
            OpcodeEncoding::LdDtVx => Instruction::SetDelay { x },
            OpcodeEncoding::LdStVx => Instruction::SetSound { x },
            OpcodeEncoding::AddIVx => Instruction::AddIndex { x },
            OpcodeEncoding::LdFVx => Instruction::LoadGlyph { x },
            OpcodeEncoding::LdBVx => Instruction::StoreBcd { x },
            OpcodeEncoding::LdIVx => Instruction::StoreRegisters { x },
            OpcodeEncoding::LdVxI => Instruction::LoadRegisters { x },
        };
        Ok(instruction)
    }
}
