use crate::memory::Addr;

/// The flag register. Carry, borrow and sprite collision all land here, so
/// any opcode that names VF as its destination clobbers the flag.
pub const FLAG: u8 = 0xF;

/// V0..VF plus the index register and program counter.
pub struct Registers {
    v: [u8; 16],
    pub i: Addr,
    pub pc: Addr,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            v: [0; 16],
            i: 0,
            pc: crate::memory::LOAD_ADDR as Addr,
        }
    }

    pub fn reset(&mut self) {
        self.v = [0; 16];
        self.i = 0;
        self.pc = crate::memory::LOAD_ADDR as Addr;
    }

    pub fn get(&self, reg: u8) -> u8 {
        self.v[reg as usize]
    }

    pub fn set(&mut self, reg: u8, value: u8) {
        self.v[reg as usize] = value;
    }

    pub fn set_flag(&mut self, value: u8) {
        self.v[FLAG as usize] = value;
    }
}
