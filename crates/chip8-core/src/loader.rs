//! Program loading into program space.
//!
//! ROM images are raw big-endian instruction streams with no header.

use std::fs;
use std::path::Path;

use log::info;

use crate::{Fault, Machine, MAX_PROGRAM_BYTES, PROGRAM_START};

/// Checks that a ROM image fits program space.
///
/// # Errors
///
/// `InvalidRomSize` for empty images or images over 3584 bytes.
pub fn validate_rom_size(len: usize) -> Result<usize, Fault> {
    if len == 0 || len > MAX_PROGRAM_BYTES {
        Err(Fault::invalid_rom_size(len, MAX_PROGRAM_BYTES))
    } else {
        Ok(len)
    }
}

/// Reads a ROM image from disk and validates its size.
///
/// # Errors
///
/// `FileNotFound` when the file cannot be read; `InvalidRomSize` when its
/// length is outside `1..=3584`.
pub fn read_rom(path: &Path) -> Result<Vec<u8>, Fault> {
    let bytes = fs::read(path).map_err(|err| Fault::file_not_found(path, &err))?;
    validate_rom_size(bytes.len())?;
    Ok(bytes)
}

impl Machine {
    /// Copies `program` to `0x200`. Registers, `PC` and the rest of memory
    /// are left as they are; call [`Machine::reset`] first for a clean boot.
    ///
    /// # Errors
    ///
    /// `InvalidRomSize` for empty programs or programs over 3584 bytes; memory
    /// is unchanged in that case.
    pub fn load(&mut self, program: &[u8]) -> Result<usize, Fault> {
        let result = validate_rom_size(program.len()).and_then(|len| {
            self.memory
                .write_slice(usize::from(PROGRAM_START), program)
                .map(|()| len)
        });
        if let Ok(len) = result {
            info!("loaded {len} byte program at 0x{PROGRAM_START:03X}");
        }
        self.record(result)
    }

    /// Reads a ROM file and loads it with [`Machine::load`].
    ///
    /// # Errors
    ///
    /// `FileNotFound` when the file cannot be read, otherwise as [`Machine::load`].
    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<usize, Fault> {
        match read_rom(path.as_ref()) {
            Ok(bytes) => self.load(&bytes),
            Err(fault) => self.record(Err(fault)),
        }
    }
}
