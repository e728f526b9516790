//! Text rendering of the framebuffer.

use chip8_core::Display;

const LIT: char = '#';
const DARK: char = '.';

/// One line per display row, `#` for lit pixels.
pub fn render_frame(display: &Display) -> String {
    let mut out = String::with_capacity(display.frame().len() + display.rows().count());
    for row in display.rows() {
        out.extend(row.iter().map(|&pixel| if pixel == 0 { DARK } else { LIT }));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8_core::{Machine, DISPLAY_HEIGHT, DISPLAY_WIDTH};

    #[test]
    fn renders_every_row_with_lit_pixels_marked() {
        let mut machine = Machine::new();
        machine.set_pixel(0, 0, true).expect("in range");
        machine.set_pixel(63, 31, true).expect("in range");

        let text = render_frame(machine.display());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), DISPLAY_HEIGHT);
        assert!(lines.iter().all(|line| line.len() == DISPLAY_WIDTH));
        assert!(lines[0].starts_with("#."));
        assert!(lines[31].ends_with(".#"));
        assert_eq!(text.matches(LIT).count(), 2);
    }
}
