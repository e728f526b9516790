//! General-purpose registers, the index register and the program counter.

#![allow(clippy::cast_lossless)]

use crate::{Fault, PROGRAM_START};

/// Number of general-purpose byte registers (`V0..=VF`).
pub const GENERAL_REGISTER_COUNT: usize = 16;

/// General-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    VA = 0xA,
    VB = 0xB,
    VC = 0xC,
    VD = 0xD,
    VE = 0xE,
    VF = 0xF,
}

impl Register {
    /// Ordered list of all general-purpose registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
        Self::V6,
        Self::V7,
        Self::V8,
        Self::V9,
        Self::VA,
        Self::VB,
        Self::VC,
        Self::VD,
        Self::VE,
        Self::VF,
    ];

    /// Carry/borrow/shift/collision output register.
    pub const FLAG: Self = Self::VF;

    /// Returns the array index for this register (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a register index, rejecting anything above `0xF`.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Option<Self> {
        if bits as usize >= GENERAL_REGISTER_COUNT {
            None
        } else {
            Some(Self::ALL[bits as usize])
        }
    }

    /// Decodes the low nibble of an instruction field; upper bits are ignored.
    #[must_use]
    pub const fn from_nibble(bits: u8) -> Self {
        Self::ALL[(bits & 0x0F) as usize]
    }

    /// Checked variant of [`Self::from_u4`] for caller-supplied indices.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRegister` fault for indices above `0xF`.
    pub fn try_from_index(index: u8) -> Result<Self, Fault> {
        Self::from_u4(index).ok_or_else(|| Fault::invalid_register(index))
    }
}

/// Byte registers plus the 16-bit index register and program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    v: [u8; GENERAL_REGISTER_COUNT],
    index: u16,
    pc: u16,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            v: [0; GENERAL_REGISTER_COUNT],
            index: 0,
            pc: PROGRAM_START,
        }
    }
}

impl RegisterFile {
    /// Reads a general-purpose register.
    #[must_use]
    pub const fn v(&self, reg: Register) -> u8 {
        self.v[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set_v(&mut self, reg: Register, value: u8) {
        self.v[reg.index()] = value;
    }

    /// Reads the flag register `VF`.
    #[must_use]
    pub const fn flag(&self) -> u8 {
        self.v(Register::FLAG)
    }

    /// Writes `1` or `0` into `VF`.
    pub const fn set_flag(&mut self, set: bool) {
        self.set_v(Register::FLAG, set as u8);
    }

    /// Reads the index register `I`.
    #[must_use]
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Writes the index register `I`.
    pub const fn set_index(&mut self, value: u16) {
        self.index = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Registers `V0..=last` in order.
    #[must_use]
    pub fn prefix(&self, last: Register) -> &[u8] {
        &self.v[..=last.index()]
    }

    /// Overwrites `V0..V(values.len() - 1)`.
    pub fn load_prefix(&mut self, values: &[u8]) {
        self.v[..values.len()].copy_from_slice(values);
    }
}

#[cfg(test)]
mod tests {
    use super::{Register, RegisterFile, GENERAL_REGISTER_COUNT};
    use crate::FaultKind;

    #[test]
    fn register_count_and_decode_match_architecture() {
        assert_eq!(GENERAL_REGISTER_COUNT, 16);

        for bits in 0_u8..=0xF {
            let reg = Register::from_u4(bits).expect("valid 4-bit register encoding");
            assert_eq!(reg.index(), usize::from(bits));
        }

        assert!(Register::from_u4(0x10).is_none());
        assert_eq!(
            Register::try_from_index(20).map_err(|fault| fault.kind()),
            Err(FaultKind::InvalidRegister)
        );
    }

    #[test]
    fn register_file_tracks_each_register_independently() {
        let mut file = RegisterFile::default();

        for (offset, reg) in (0_u8..).zip(Register::ALL.iter().copied()) {
            file.set_v(reg, 0x10 + offset);
        }

        for (offset, reg) in (0_u8..).zip(Register::ALL.iter().copied()) {
            assert_eq!(file.v(reg), 0x10 + offset);
        }
    }

    #[test]
    fn reset_values_start_at_program_space() {
        let file = RegisterFile::default();
        assert_eq!(file.pc(), 0x200);
        assert_eq!(file.index(), 0);
        assert_eq!(file.flag(), 0);
    }

    #[test]
    fn prefix_views_are_inclusive() {
        let mut file = RegisterFile::default();
        file.load_prefix(&[1, 2, 3]);
        assert_eq!(file.prefix(Register::V2), &[1, 2, 3]);
        assert_eq!(file.v(Register::V3), 0);
        assert_eq!(file.prefix(Register::VF).len(), 16);
    }
}
