use crate::error::Fault;

pub type Addr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const LOAD_ADDR: usize = 0x200;

/// Bytes per glyph; glyph `g` starts at address `g * GLYPH_SIZE`.
pub const GLYPH_SIZE: u8 = 5;

type FontBytes = [u8; 5 * 16];

// 16 hex glyphs, 4x5 pixels each, resident from address 0x000
const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4k of addressable RAM with the font table in the low region.
///
/// Every access goes through `get`/`set` so a computed address past 0xFFF
/// surfaces as a fault instead of an index panic.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.bytes[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        mem
    }

    /// Zero everything and put the font back.
    pub fn reset(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
        self.bytes[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    pub fn set(&mut self, addr: Addr, val: u8) -> Result<(), Fault> {
        match self.bytes.get_mut(addr as usize) {
            Some(byte) => {
                *byte = val;
                Ok(())
            }
            None => Err(Fault::MemoryOutOfRange { addr }),
        }
    }

    pub fn get(&self, addr: Addr) -> Result<u8, Fault> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Fault::MemoryOutOfRange { addr })
    }

    /// Big-endian 16-bit opcode at `addr`.
    pub fn opcode_at(&self, addr: Addr) -> Result<u16, Fault> {
        let hi = self.get(addr)?;
        let lo = self.get(addr + 1)?;
        Ok(((hi as u16) << 8) | lo as u16)
    }

    /// Copies a program image in starting at 0x200. Nothing is written when
    /// the image would run past the end of memory.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        if LOAD_ADDR + image.len() > MEMORY_SIZE {
            return Err(Fault::LoadOverflow { len: image.len() });
        }
        self.bytes[LOAD_ADDR..LOAD_ADDR + image.len()].copy_from_slice(image);
        Ok(())
    }
}

/// Bounded call stack; 16 return addresses, as on the original hardware.
pub struct Stack {
    addresses: [Addr; Stack::DEPTH],
    sp: usize,
}

impl Stack {
    pub const DEPTH: usize = 16;

    pub fn new() -> Self {
        Self {
            addresses: [0; Stack::DEPTH],
            sp: 0,
        }
    }

    pub fn reset(&mut self) {
        self.addresses = [0; Stack::DEPTH];
        self.sp = 0;
    }

    pub fn push(&mut self, addr: Addr) -> Result<(), Fault> {
        if self.sp == Stack::DEPTH {
            return Err(Fault::StackOverflow);
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Addr, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_glyphs_start_at_zero() {
        let mem = Memory::new();
        // glyph "0" is F0 90 90 90 F0
        assert_eq!(mem.get(0).unwrap(), 0xF0);
        assert_eq!(mem.get(4).unwrap(), 0xF0);
        // glyph "2" starts at 10
        assert_eq!(mem.get(10).unwrap(), 0xF0);
        assert_eq!(mem.get(11).unwrap(), 0x10);
    }

    #[test]
    fn load_places_image_at_0x200() {
        let mut mem = Memory::new();
        mem.load(&[0xAA, 0xBB]).unwrap();
        assert_eq!(mem.get(0x200).unwrap(), 0xAA);
        assert_eq!(mem.get(0x201).unwrap(), 0xBB);
        assert_eq!(mem.opcode_at(0x200).unwrap(), 0xAABB);
    }

    #[test]
    fn load_rejects_oversized_image() {
        let mut mem = Memory::new();
        assert!(mem.load(&vec![0; 0xE00]).is_ok());
        let err = mem.load(&vec![1; 0xE01]).unwrap_err();
        assert_eq!(err, Fault::LoadOverflow { len: 0xE01 });
        // the failed load must not have touched memory
        assert_eq!(mem.get(0x200).unwrap(), 0);
    }

    #[test]
    fn access_past_end_faults() {
        let mut mem = Memory::new();
        assert!(mem.get(0xFFF).is_ok());
        assert_eq!(
            mem.get(0x1000).unwrap_err(),
            Fault::MemoryOutOfRange { addr: 0x1000 }
        );
        assert_eq!(
            mem.set(0x1000, 1).unwrap_err(),
            Fault::MemoryOutOfRange { addr: 0x1000 }
        );
    }

    #[test]
    fn reset_restores_font_and_clears_program() {
        let mut mem = Memory::new();
        mem.load(&[0xFF]).unwrap();
        mem.set(3, 0xAB).unwrap();
        mem.reset();
        assert_eq!(mem.get(0x200).unwrap(), 0);
        assert_eq!(mem.get(3).unwrap(), 0x90);
    }

    #[test]
    fn stack_bounds_are_enforced() {
        let mut stack = Stack::new();
        for addr in 0..16 {
            stack.push(addr).unwrap();
        }
        assert_eq!(stack.push(16).unwrap_err(), Fault::StackOverflow);
        for addr in (0..16).rev() {
            assert_eq!(stack.pop().unwrap(), addr);
        }
        assert_eq!(stack.pop().unwrap_err(), Fault::StackUnderflow);
    }
}
