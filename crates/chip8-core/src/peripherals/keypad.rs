//! Sixteen-key hex keypad state.

/// Number of hex keys.
pub const KEY_COUNT: usize = 16;

/// Pressed/released state for keys `0x0..=0xF`.
///
/// Input mapping is best-effort: out-of-range indices are ignored on write
/// and read as released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Updates one key; indices `>= 16` are ignored.
    pub fn set(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(usize::from(key)) {
            *slot = pressed;
        }
    }

    /// `false` for released keys and for indices `>= 16`.
    #[must_use]
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(usize::from(key)).copied().unwrap_or(false)
    }

    /// Lowest-numbered pressed key.
    #[must_use]
    pub fn first_pressed(&self) -> Option<u8> {
        (0_u8..).zip(self.keys).find_map(|(key, down)| down.then_some(key))
    }

    /// Releases every key.
    pub const fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}
