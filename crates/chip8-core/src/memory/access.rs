//! Bounds policy for every memory access made by the core.

use std::ops::Range;

use crate::{Fault, MEMORY_BYTES};

/// Width in bytes of one instruction word.
pub const INSTRUCTION_BYTES: u16 = 2;

/// Validates a single-byte access.
///
/// # Errors
///
/// Returns an [`crate::FaultKind::InvalidAddress`] fault when `addr >= 4096`.
pub fn validate_address(addr: usize) -> Result<usize, Fault> {
    if addr < MEMORY_BYTES {
        Ok(addr)
    } else {
        Err(Fault::invalid_address(addr))
    }
}

/// Validates a contiguous access of `len` bytes starting at `start`.
///
/// An empty range is legal anywhere inside the address space, including
/// one past the last byte.
///
/// # Errors
///
/// Returns an [`crate::FaultKind::InvalidAddress`] fault when any byte of the
/// range lies at or beyond `4096`.
pub fn validate_range(start: usize, len: usize) -> Result<Range<usize>, Fault> {
    match start.checked_add(len) {
        Some(end) if end <= MEMORY_BYTES && start <= MEMORY_BYTES => Ok(start..end),
        _ => Err(Fault::invalid_range(start, len)),
    }
}

/// Validates that a whole instruction word can be fetched at `pc`.
///
/// # Errors
///
/// Returns an [`crate::FaultKind::InvalidAddress`] fault when `pc >= 4095`,
/// where the second byte of the word would fall outside memory.
pub fn validate_fetch_access(pc: u16) -> Result<usize, Fault> {
    let start = usize::from(pc);
    if start + usize::from(INSTRUCTION_BYTES) <= MEMORY_BYTES {
        Ok(start)
    } else {
        Err(Fault::invalid_pc(pc))
    }
}
