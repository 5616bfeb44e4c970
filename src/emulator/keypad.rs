pub const NUM_KEYS: usize = 16;

/// The 16-key hexadecimal input latch, keys 0x0 to 0xF.
///
/// Only the external input adapter mutates it; opcode execution reads it.
/// Key indices are masked to 4 bits so register values above 0xF from
/// malformed programs cannot index out of range.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// The lowest-indexed pressed key, if any. FX0A's tie-break.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&held| held).map(|k| k as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keypad = Keypad::new();
        assert!(!keypad.is_pressed(0xA));
        keypad.press(0xA);
        assert!(keypad.is_pressed(0xA));
        keypad.release(0xA);
        assert!(!keypad.is_pressed(0xA));
    }

    #[test]
    fn lowest_index_wins() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.first_pressed(), None);
        keypad.press(0xC);
        keypad.press(0x3);
        assert_eq!(keypad.first_pressed(), Some(0x3));
    }

    #[test]
    fn out_of_range_indices_are_masked() {
        let mut keypad = Keypad::new();
        keypad.press(0x1A);
        assert!(keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0x1));
    }
}
