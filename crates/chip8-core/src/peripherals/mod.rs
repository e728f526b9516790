//! Display and keypad devices owned by the machine.

/// Monochrome framebuffer.
pub mod display;
/// Hex keypad state.
pub mod keypad;

pub use display::{Display, DISPLAY_HEIGHT, DISPLAY_PIXELS, DISPLAY_WIDTH};
pub use keypad::{Keypad, KEY_COUNT};
