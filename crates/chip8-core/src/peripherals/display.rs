//! 64×32 monochrome framebuffer with XOR sprite blitting.

use crate::Fault;

/// Display width in pixels.
pub const DISPLAY_WIDTH: usize = 64;
/// Display height in pixels.
pub const DISPLAY_HEIGHT: usize = 32;
/// Total pixel count.
pub const DISPLAY_PIXELS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// Row-major framebuffer of `0`/`1` bytes plus the redraw flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [u8; DISPLAY_PIXELS],
    redraw: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            pixels: [0; DISPLAY_PIXELS],
            redraw: false,
        }
    }
}

const fn offset(x: usize, y: usize) -> Option<usize> {
    if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT {
        Some(y * DISPLAY_WIDTH + x)
    } else {
        None
    }
}

impl Display {
    /// Reads one pixel.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault outside the 64×32 grid.
    pub fn pixel(&self, x: usize, y: usize) -> Result<u8, Fault> {
        offset(x, y)
            .map(|at| self.pixels[at])
            .ok_or_else(|| Fault::invalid_pixel(x, y))
    }

    /// Sets or clears one pixel and requests a redraw.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidAddress` fault outside the 64×32 grid; nothing changes.
    pub fn set_pixel(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Fault> {
        let at = offset(x, y).ok_or_else(|| Fault::invalid_pixel(x, y))?;
        self.pixels[at] = u8::from(lit);
        self.redraw = true;
        Ok(())
    }

    /// Clears every pixel and requests a redraw.
    pub const fn clear(&mut self) {
        self.pixels = [0; DISPLAY_PIXELS];
        self.redraw = true;
    }

    /// Blits an 8-pixel-wide sprite at `(x, y)`, wrapping on both axes.
    ///
    /// Returns `true` when any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (row, bits) in rows.iter().enumerate() {
            let py = (usize::from(y) + row) % DISPLAY_HEIGHT;
            for column in 0..8 {
                if bits & (0x80 >> column) == 0 {
                    continue;
                }
                let px = (usize::from(x) + column) % DISPLAY_WIDTH;
                let cell = &mut self.pixels[py * DISPLAY_WIDTH + px];
                collision |= *cell == 1;
                *cell ^= 1;
            }
        }
        self.redraw = true;
        collision
    }

    /// Row-major view of all 2048 pixels.
    #[must_use]
    pub const fn frame(&self) -> &[u8; DISPLAY_PIXELS] {
        &self.pixels
    }

    /// Iterates the framebuffer one 64-pixel row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.pixels.chunks_exact(DISPLAY_WIDTH)
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel != 0).count()
    }

    /// `true` when the framebuffer changed since the last acknowledgement.
    #[must_use]
    pub const fn redraw_requested(&self) -> bool {
        self.redraw
    }

    /// Clears the redraw flag after a frame has been consumed.
    pub const fn acknowledge_redraw(&mut self) {
        self.redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_wraps_on_both_axes() {
        let mut display = Display::default();
        assert!(!display.draw_sprite(62, 31, &[0b1110_0000, 0b1000_0000]));
        assert_eq!(display.pixel(62, 31), Ok(1));
        assert_eq!(display.pixel(63, 31), Ok(1));
        assert_eq!(display.pixel(0, 31), Ok(1));
        assert_eq!(display.pixel(62, 0), Ok(1));
        assert_eq!(display.lit_pixels(), 4);
    }

    #[test]
    fn redraw_is_sticky_until_acknowledged() {
        let mut display = Display::default();
        assert!(!display.redraw_requested());
        display.clear();
        assert!(display.redraw_requested());
        display.acknowledge_redraw();
        assert!(!display.redraw_requested());
    }

    #[test]
    fn out_of_range_pixels_are_rejected() {
        let mut display = Display::default();
        assert!(display.pixel(64, 0).is_err());
        let fault = display.set_pixel(0, 32, true).expect_err("row 32");
        assert!(fault.message().contains("0x20"));
        assert_eq!(display.lit_pixels(), 0);
        assert!(!display.redraw_requested());
    }

    #[test]
    fn rows_are_sixty_four_wide() {
        let mut display = Display::default();
        display.set_pixel(5, 1, true).expect("in range");
        let rows: Vec<&[u8]> = display.rows().collect();
        assert_eq!(rows.len(), DISPLAY_HEIGHT);
        assert_eq!(rows[1][5], 1);
        assert_eq!(display.frame()[DISPLAY_WIDTH + 5], 1);
    }
}
