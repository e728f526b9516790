//! Opcode field extraction and the mask/pattern encoding table.

#![allow(clippy::cast_possible_truncation)]

/// The six fields every instruction word is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeFields {
    /// The raw instruction word.
    pub word: u16,
    /// Bits 12..=15: instruction family.
    pub family: u8,
    /// Bits 8..=11: first register index.
    pub x: u8,
    /// Bits 4..=7: second register index.
    pub y: u8,
    /// Bits 0..=3: 4-bit immediate.
    pub n: u8,
    /// Bits 0..=7: 8-bit immediate.
    pub nn: u8,
    /// Bits 0..=11: 12-bit address.
    pub nnn: u16,
}

impl OpcodeFields {
    /// Splits an instruction word into its fields.
    #[must_use]
    pub const fn from_word(word: u16) -> Self {
        Self {
            word,
            family: ((word >> 12) & 0x000F) as u8,
            x: ((word >> 8) & 0x000F) as u8,
            y: ((word >> 4) & 0x000F) as u8,
            n: (word & 0x000F) as u8,
            nn: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }
}

/// Every encoding the instruction set names, including `SYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum OpcodeEncoding {
    Cls,
    Ret,
    Sys,
    Jp,
    Call,
    SeImm,
    SneImm,
    SeReg,
    LdImm,
    AddImm,
    LdReg,
    Or,
    And,
    Xor,
    AddReg,
    Sub,
    Shr,
    Subn,
    Shl,
    SneReg,
    LdI,
    JpV0,
    Rnd,
    Drw,
    Skp,
    Sknp,
    LdVxDt,
    LdVxK,
    LdDtVx,
    LdStVx,
    AddIVx,
    LdFVx,
    LdBVx,
    LdIVx,
    LdVxI,
}

impl OpcodeEncoding {
    /// Assembly mnemonic without operands.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Cls => "CLS",
            Self::Ret => "RET",
            Self::Sys => "SYS",
            Self::Jp | Self::JpV0 => "JP",
            Self::Call => "CALL",
            Self::SeImm | Self::SeReg => "SE",
            Self::SneImm | Self::SneReg => "SNE",
            Self::LdImm
            | Self::LdReg
            | Self::LdI
            | Self::LdVxDt
            | Self::LdVxK
            | Self::LdDtVx
            | Self::LdStVx
            | Self::LdFVx
            | Self::LdBVx
            | Self::LdIVx
            | Self::LdVxI => "LD",
            Self::AddImm | Self::AddReg | Self::AddIVx => "ADD",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Xor => "XOR",
            Self::Sub => "SUB",
            Self::Shr => "SHR",
            Self::Subn => "SUBN",
            Self::Shl => "SHL",
            Self::Rnd => "RND",
            Self::Drw => "DRW",
            Self::Skp => "SKP",
            Self::Sknp => "SKNP",
        }
    }

    /// One-line human-readable summary.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Cls => "Clear the display",
            Self::Ret => "Return from subroutine",
            Self::Sys => "Call machine routine (unsupported)",
            Self::Jp => "Jump to address",
            Self::Call => "Call subroutine",
            Self::SeImm => "Skip next if Vx equals byte",
            Self::SneImm => "Skip next if Vx differs from byte",
            Self::SeReg => "Skip next if Vx equals Vy",
            Self::LdImm => "Load byte into Vx",
            Self::AddImm => "Add byte to Vx without carry",
            Self::LdReg => "Copy Vy into Vx",
            Self::Or => "Vx = Vx OR Vy",
            Self::And => "Vx = Vx AND Vy",
            Self::Xor => "Vx = Vx XOR Vy",
            Self::AddReg => "Vx = Vx + Vy, VF = carry",
            Self::Sub => "Vx = Vx - Vy, VF = not borrow",
            Self::Shr => "Vx = Vx >> 1, VF = old bit 0",
            Self::Subn => "Vx = Vy - Vx, VF = not borrow",
            Self::Shl => "Vx = Vx << 1, VF = old bit 7",
            Self::SneReg => "Skip next if Vx differs from Vy",
            Self::LdI => "Load address into I",
            Self::JpV0 => "Jump to address + V0",
            Self::Rnd => "Vx = random byte AND mask",
            Self::Drw => "Draw N-row sprite at (Vx, Vy), VF = collision",
            Self::Skp => "Skip next if key Vx is pressed",
            Self::Sknp => "Skip next if key Vx is not pressed",
            Self::LdVxDt => "Load delay timer into Vx",
            Self::LdVxK => "Wait for key press, store in Vx",
            Self::LdDtVx => "Load Vx into delay timer",
            Self::LdStVx => "Load Vx into sound timer",
            Self::AddIVx => "I = I + Vx",
            Self::LdFVx => "Point I at glyph for Vx",
            Self::LdBVx => "Store BCD of Vx at I..I+2",
            Self::LdIVx => "Store V0..Vx at I",
            Self::LdVxI => "Load V0..Vx from I",
        }
    }
}

/// Ordered `(mask, pattern, encoding)` table; the first match wins.
///
/// `SYS` sits after `CLS` and `RET` so those two exact words shadow it.
/// Words matching no entry are unknown opcodes.
pub const OPCODE_ENCODING_TABLE: &[(u16, u16, OpcodeEncoding)] = &[
    (0xFFFF, 0x00E0, OpcodeEncoding::Cls),
    (0xFFFF, 0x00EE, OpcodeEncoding::Ret),
    (0xF000, 0x0000, OpcodeEncoding::Sys),
    (0xF000, 0x1000, OpcodeEncoding::Jp),
    (0xF000, 0x2000, OpcodeEncoding::Call),
    (0xF000, 0x3000, OpcodeEncoding::SeImm),
    (0xF000, 0x4000, OpcodeEncoding::SneImm),
    (0xF000, 0x5000, OpcodeEncoding::SeReg),
    (0xF000, 0x6000, OpcodeEncoding::LdImm),
    (0xF000, 0x7000, OpcodeEncoding::AddImm),
    (0xF00F, 0x8000, OpcodeEncoding::LdReg),
    (0xF00F, 0x8001, OpcodeEncoding::Or),
    (0xF00F, 0x8002, OpcodeEncoding::And),
    (0xF00F, 0x8003, OpcodeEncoding::Xor),
    (0xF00F, 0x8004, OpcodeEncoding::AddReg),
    (0xF00F, 0x8005, OpcodeEncoding::Sub),
    (0xF00F, 0x8006, OpcodeEncoding::Shr),
    (0xF00F, 0x8007, OpcodeEncoding::Subn),
    (0xF00F, 0x800E, OpcodeEncoding::Shl),
    (0xF000, 0x9000, OpcodeEncoding::SneReg),
    (0xF000, 0xA000, OpcodeEncoding::LdI),
    (0xF000, 0xB000, OpcodeEncoding::JpV0),
    (0xF000, 0xC000, OpcodeEncoding::Rnd),
    (0xF000, 0xD000, OpcodeEncoding::Drw),
    (0xF0FF, 0xE09E, OpcodeEncoding::Skp),
    (0xF0FF, 0xE0A1, OpcodeEncoding::Sknp),
    (0xF0FF, 0xF007, OpcodeEncoding::LdVxDt),
    (0xF0FF, 0xF00A, OpcodeEncoding::LdVxK),
    (0xF0FF, 0xF015, OpcodeEncoding::LdDtVx),
    (0xF0FF, 0xF018, OpcodeEncoding::LdStVx),
    (0xF0FF, 0xF01E, OpcodeEncoding::AddIVx),
    (0xF0FF, 0xF029, OpcodeEncoding::LdFVx),
    (0xF0FF, 0xF033, OpcodeEncoding::LdBVx),
    (0xF0FF, 0xF055, OpcodeEncoding::LdIVx),
    (0xF0FF, 0xF065, OpcodeEncoding::LdVxI),
];

/// Classifies an instruction word; `None` means unknown.
#[must_use]
pub fn classify_opcode(word: u16) -> Option<OpcodeEncoding> {
    OPCODE_ENCODING_TABLE
        .iter()
        .find_map(|(mask, pattern, encoding)| (word & mask == *pattern).then_some(*encoding))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{classify_opcode, OpcodeEncoding, OpcodeFields, OPCODE_ENCODING_TABLE};

    #[test]
    fn table_names_thirty_five_unique_encodings() {
        let encodings: HashSet<_> = OPCODE_ENCODING_TABLE.iter().map(|(_, _, e)| *e).collect();
        assert_eq!(OPCODE_ENCODING_TABLE.len(), 35);
        assert_eq!(encodings.len(), 35);
    }

    #[test]
    fn every_pattern_classifies_to_its_own_entry() {
        for (mask, pattern, encoding) in OPCODE_ENCODING_TABLE {
            assert_eq!(pattern & !mask, 0, "{encoding:?} pattern has bits outside mask");
            assert_eq!(classify_opcode(*pattern), Some(*encoding));
        }
    }

    #[test]
    fn only_sys_overlaps_other_entries() {
        for word in 0..=u16::MAX {
            let hits: Vec<_> = OPCODE_ENCODING_TABLE
                .iter()
                .filter(|(mask, pattern, _)| word & mask == *pattern)
                .map(|(_, _, e)| *e)
                .collect();
            match hits.as_slice() {
                [] | [_] => {}
                [first, OpcodeEncoding::Sys] => {
                    assert!(matches!(first, OpcodeEncoding::Cls | OpcodeEncoding::Ret));
                }
                other => panic!("word {word:04X} matches {other:?}"),
            }
        }
    }

    #[test]
    fn unassigned_sub_opcodes_are_unknown() {
        for word in [0x8008, 0x800F, 0xE000, 0xE0A2, 0xF000, 0xF066, 0xF0FF] {
            assert_eq!(classify_opcode(word), None, "{word:04X}");
        }
    }

    #[test]
    fn register_compare_skips_ignore_low_nibble() {
        assert_eq!(classify_opcode(0x5121), Some(OpcodeEncoding::SeReg));
        assert_eq!(classify_opcode(0x912F), Some(OpcodeEncoding::SneReg));
    }

    #[test]
    fn field_extraction_matches_bit_layout() {
        let fields = OpcodeFields::from_word(0xD12F);
        assert_eq!(fields.family, 0xD);
        assert_eq!(fields.x, 0x1);
        assert_eq!(fields.y, 0x2);
        assert_eq!(fields.n, 0xF);
        assert_eq!(fields.nn, 0x2F);
        assert_eq!(fields.nnn, 0x12F);
    }

    #[test]
    fn mnemonics_collapse_load_variants() {
        assert_eq!(OpcodeEncoding::LdVxI.mnemonic(), "LD");
        assert_eq!(OpcodeEncoding::JpV0.mnemonic(), "JP");
        assert_eq!(OpcodeEncoding::Sknp.description(), "Skip next if key Vx is not pressed");
    }
}
