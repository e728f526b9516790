//! Pure arithmetic helpers for the ALU and BCD instructions.
//!
//! Each returns `(result, flag)` so callers can commit `VF` and the
//! destination in a fixed order.

/// `Vx + Vy` with carry out.
#[must_use]
pub const fn add_with_carry(x: u8, y: u8) -> (u8, bool) {
    x.overflowing_add(y)
}

/// `minuend - subtrahend` with the not-borrow flag (`1` when no borrow).
#[must_use]
pub const fn sub_not_borrow(minuend: u8, subtrahend: u8) -> (u8, bool) {
    (minuend.wrapping_sub(subtrahend), minuend >= subtrahend)
}

/// `v >> 1` with the bit shifted out.
#[must_use]
pub const fn shift_right(v: u8) -> (u8, bool) {
    (v >> 1, v & 0x01 != 0)
}

/// `v << 1` with the bit shifted out.
#[must_use]
pub const fn shift_left(v: u8) -> (u8, bool) {
    (v << 1, v & 0x80 != 0)
}

/// Hundreds, tens and units of `v`.
#[must_use]
pub const fn bcd_digits(v: u8) -> [u8; 3] {
    [v / 100, (v / 10) % 10, v % 10]
}
