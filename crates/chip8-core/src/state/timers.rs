//! Delay and sound timers, decremented once per executed step.

/// Delay and sound countdown timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    /// Current delay timer value.
    #[must_use]
    pub const fn delay(&self) -> u8 {
        self.delay
    }

    /// Current sound timer value.
    #[must_use]
    pub const fn sound(&self) -> u8 {
        self.sound
    }

    /// Loads the delay timer.
    pub const fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Loads the sound timer.
    pub const fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Decrements both timers by one, floored at zero.
    ///
    /// Returns `true` on the one cycle where the sound timer goes from `1` to `0`.
    pub const fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let beep = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        beep
    }
}

#[cfg(test)]
mod tests {
    use super::Timers;

    #[test]
    fn tick_floors_at_zero() {
        let mut timers = Timers::default();
        assert!(!timers.tick());
        assert_eq!((timers.delay(), timers.sound()), (0, 0));
    }

    #[test]
    fn beep_fires_once_on_last_sound_decrement() {
        let mut timers = Timers::default();
        timers.set_sound(3);
        timers.set_delay(1);
        let beeps: Vec<bool> = (0..5).map(|_| timers.tick()).collect();
        assert_eq!(beeps, [false, false, true, false, false]);
        assert_eq!(timers.delay(), 0);
    }
}
