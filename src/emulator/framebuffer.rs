use std::fmt;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome display, one bit per pixel in row-major order.
///
/// Pixels are only ever flipped by XOR during sprite drawing or wiped by
/// the clear-screen opcode; the machine owns the buffer and hands out
/// read-only references to the renderer once per tick.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; WIDTH * HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer {
            pixels: [false; WIDTH * HEIGHT],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * WIDTH + x]
    }

    /// Flip the pixel at (x, y), returning its previous state.
    /// A `true` return on a sprite bit is a collision.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[y * WIDTH + x];
        let was_set = *pixel;
        *pixel = !was_set;
        was_set
    }

    pub fn clear(&mut self) {
        self.pixels = [false; WIDTH * HEIGHT];
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.iter().all(|p| !p)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Framebuffer({}x{})", WIDTH, HEIGHT)
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                write!(f, "{}", if self.pixel(x, y) { '#' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_empty() {
        let fb = Framebuffer::new();
        assert!(fb.is_empty());
        assert!(!fb.pixel(0, 0));
        assert!(!fb.pixel(WIDTH - 1, HEIGHT - 1));
    }

    #[test]
    fn toggle_reports_previous_state() {
        let mut fb = Framebuffer::new();
        assert!(!fb.toggle(3, 5));
        assert!(fb.pixel(3, 5));
        assert!(fb.toggle(3, 5));
        assert!(!fb.pixel(3, 5));
    }

    #[test]
    fn toggle_is_self_inverse() {
        let mut fb = Framebuffer::new();
        fb.toggle(10, 20);
        fb.toggle(10, 20);
        assert_eq!(fb, Framebuffer::new());
    }

    #[test]
    fn clear_wipes_everything() {
        let mut fb = Framebuffer::new();
        fb.toggle(0, 0);
        fb.toggle(WIDTH - 1, HEIGHT - 1);
        fb.clear();
        assert!(fb.is_empty());
    }

    #[test]
    fn pixels_are_row_major() {
        let mut fb = Framebuffer::new();
        fb.toggle(1, 0);
        assert!(fb.pixels[1]);
        fb.toggle(0, 1);
        assert!(fb.pixels[WIDTH]);
    }
}
