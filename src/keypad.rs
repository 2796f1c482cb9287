/// The 16-key hex keypad. Written only by host input events; the executor
/// just reads it.
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self { keys: [false; 16] }
    }

    pub fn reset(&mut self) {
        self.keys = [false; 16];
    }

    /// `key` outside 0..=0xF is a caller error.
    pub fn press(&mut self, key: u8) {
        self.keys[key as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[key as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[key as usize]
    }

    /// Lowest pressed key id, scanning 0 upward.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|id| id as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_toggle_one_flag() {
        let mut keypad = Keypad::new();
        keypad.press(0xA);
        assert!(keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0xB));
        keypad.release(0xA);
        assert!(!keypad.is_pressed(0xA));
    }

    #[test]
    fn lowest_id_wins_on_simultaneous_press() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.first_pressed(), None);
        keypad.press(0xC);
        keypad.press(0x3);
        assert_eq!(keypad.first_pressed(), Some(0x3));
    }
}
