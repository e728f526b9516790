//! Memory model primitives and fixed address-space policies.

/// Bounds policy helpers for byte, range and fetch accesses.
pub mod access;
/// Address-space layout constants and glyph table.
pub mod map;

pub use access::{validate_address, validate_fetch_access, validate_range, INSTRUCTION_BYTES};
pub use map::{
    glyph_address, GLYPH_BYTES, GLYPH_TABLE, GLYPH_TABLE_BYTES, GLYPH_TABLE_START,
    INTERPRETER_END, MAX_PROGRAM_BYTES, PROGRAM_END, PROGRAM_START,
};

use crate::Fault;

/// Size in bytes of the flat address space (4 KiB).
pub const MEMORY_BYTES: usize = 4096;

/// The 4 KiB byte store. Every index goes through [`access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_BYTES],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Allocates a zeroed address space.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; MEMORY_BYTES],
        }
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault for `addr >= 4096`.
    pub fn read(&self, addr: usize) -> Result<u8, Fault> {
        let addr = validate_address(addr)?;
        Ok(self.bytes[addr])
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault for `addr >= 4096`; memory is unchanged.
    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        let addr = validate_address(addr)?;
        self.bytes[addr] = value;
        Ok(())
    }

    /// Fetches the big-endian instruction word at `pc`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault when `pc >= 4095`.
    pub fn read_word(&self, pc: u16) -> Result<u16, Fault> {
        let addr = validate_fetch_access(pc)?;
        Ok(u16::from_be_bytes([self.bytes[addr], self.bytes[addr + 1]]))
    }

    /// Borrows `len` bytes starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault when the range leaves the address space.
    pub fn slice(&self, start: usize, len: usize) -> Result<&[u8], Fault> {
        let range = validate_range(start, len)?;
        Ok(&self.bytes[range])
    }

    /// Copies `data` into memory starting at `start`, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault when the range leaves the address
    /// space; memory is unchanged in that case.
    pub fn write_slice(&mut self, start: usize, data: &[u8]) -> Result<(), Fault> {
        let range = validate_range(start, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Zeroes all memory and installs the glyph table in low memory.
    pub fn reset(&mut self) {
        self.bytes = [0; MEMORY_BYTES];
        let start = usize::from(GLYPH_TABLE_START);
        self.bytes[start..start + GLYPH_TABLE_BYTES].copy_from_slice(&GLYPH_TABLE);
    }

    /// Read-only view of the whole address space.
    #[must_use]
    pub const fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
