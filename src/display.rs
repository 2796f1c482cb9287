use crate::error::Fault;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome frame buffer, row-major, one byte per cell (0 or 1).
///
/// The dirty flag is set by any mutation and only cleared when the host takes
/// the frame, so a renderer can skip repaints between draws.
pub struct FrameBuffer {
    cells: [u8; WIDTH * HEIGHT],
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            cells: [0; WIDTH * HEIGHT],
            dirty: true,
        }
    }

    pub fn clear(&mut self) {
        self.cells = [0; WIDTH * HEIGHT];
        self.dirty = true;
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the current frame and clears the dirty flag.
    pub fn take_frame(&mut self) -> [u8; WIDTH * HEIGHT] {
        self.dirty = false;
        self.cells
    }

    #[cfg(test)]
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y * WIDTH + x]
    }

    #[cfg(test)]
    pub fn fill(&mut self) {
        self.cells = [1; WIDTH * HEIGHT];
        self.dirty = true;
    }

    /// XOR-blits an 8-pixel-wide sprite with its top-left corner at `(x, y)`.
    /// Returns true if any cell was erased (1 -> 0) during the draw.
    ///
    /// Cell addresses are linear (`x + y*64`) with no wraparound; a set pixel
    /// that would land past the end of the buffer is a fault, and the buffer
    /// is left as drawn up to that point.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> Result<bool, Fault> {
        let mut erased = false;
        self.dirty = true;
        for (row, bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let cell = x as usize + col + (y as usize + row) * WIDTH;
                if cell >= self.cells.len() {
                    return Err(Fault::DisplayOutOfRange { cell });
                }
                self.cells[cell] ^= 1;
                if self.cells[cell] == 0 {
                    erased = true;
                }
            }
        }
        Ok(erased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_sets_pixels_from_sprite_bits() {
        let mut fb = FrameBuffer::new();
        let erased = fb.paint(1, 2, &[0b1010_0001]).unwrap();
        assert!(!erased);
        assert_eq!(fb.cell(1, 2), 1);
        assert_eq!(fb.cell(2, 2), 0);
        assert_eq!(fb.cell(3, 2), 1);
        assert_eq!(fb.cell(8, 2), 1);
    }

    #[test]
    fn paint_xors_and_reports_erasure() {
        let mut fb = FrameBuffer::new();
        fb.paint(0, 0, &[0b1100_0000]).unwrap();
        let erased = fb.paint(0, 0, &[0b0100_0000]).unwrap();
        assert!(erased);
        assert_eq!(fb.cell(0, 0), 1);
        assert_eq!(fb.cell(1, 0), 0);
    }

    #[test]
    fn paint_past_buffer_end_faults() {
        let mut fb = FrameBuffer::new();
        // bottom row is fine
        assert!(fb.paint(56, 31, &[0xFF]).is_ok());
        // one row further is not
        let err = fb.paint(56, 32, &[0xFF]).unwrap_err();
        assert!(matches!(err, Fault::DisplayOutOfRange { .. }));
    }

    #[test]
    fn take_frame_clears_dirty_until_next_mutation() {
        let mut fb = FrameBuffer::new();
        fb.paint(0, 0, &[0x80]).unwrap();
        assert!(fb.dirty());
        let first = fb.take_frame();
        assert!(!fb.dirty());
        let second = fb.take_frame();
        assert_eq!(first[..], second[..]);
        fb.clear();
        assert!(fb.dirty());
    }

    #[test]
    fn paint_marks_dirty_even_without_visible_change() {
        let mut fb = FrameBuffer::new();
        fb.take_frame();
        fb.paint(0, 0, &[0x00]).unwrap();
        assert!(fb.dirty());
    }
}
