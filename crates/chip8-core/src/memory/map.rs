//! Address-space layout constants and the built-in glyph table.

#![allow(clippy::cast_lossless)]

/// Inclusive end address of the interpreter region.
pub const INTERPRETER_END: u16 = 0x1FF;
/// Inclusive start address of program space; also the reset program counter.
pub const PROGRAM_START: u16 = 0x200;
/// Inclusive end address of program space.
pub const PROGRAM_END: u16 = 0xFFF;

/// Address of the first glyph byte.
pub const GLYPH_TABLE_START: u16 = 0x000;
/// Bytes per hex-digit glyph.
pub const GLYPH_BYTES: u16 = 5;
/// Total size of the glyph table (16 glyphs × 5 bytes).
pub const GLYPH_TABLE_BYTES: usize = 80;

/// 4×5 bitmaps for the hex digits `0..=F`, one row per byte, high nibble used.
#[rustfmt::skip]
pub const GLYPH_TABLE: [u8; GLYPH_TABLE_BYTES] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Largest program image accepted by the loader (`4096 - 0x200`).
pub const MAX_PROGRAM_BYTES: usize = (PROGRAM_END - PROGRAM_START) as usize + 1;

/// Address of the glyph for hex digit `digit`; `None` for values above `0xF`.
#[must_use]
pub const fn glyph_address(digit: u8) -> Option<u16> {
    if digit > 0xF {
        None
    } else {
        Some(GLYPH_TABLE_START + digit as u16 * GLYPH_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_capacity_is_3584_bytes() {
        assert_eq!(MAX_PROGRAM_BYTES, 4096 - 0x200);
        assert_eq!(usize::from(PROGRAM_END) + 1, crate::MEMORY_BYTES);
    }

    #[test]
    fn glyph_addresses_step_by_five() {
        assert_eq!(glyph_address(0x0), Some(0x00));
        assert_eq!(glyph_address(0x1), Some(0x05));
        assert_eq!(glyph_address(0xF), Some(0x4B));
        assert_eq!(glyph_address(0x10), None);
    }

    #[test]
    fn glyph_table_fits_interpreter_region() {
        let last = usize::from(GLYPH_TABLE_START) + GLYPH_TABLE_BYTES - 1;
        assert!(last <= usize::from(INTERPRETER_END));
    }
}
