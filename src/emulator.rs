use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::decode::OpCodes;
use crate::display::{FrameBuffer, HEIGHT, WIDTH};
use crate::error::Fault;
use crate::keypad::Keypad;
use crate::memory::{Addr, Memory, Stack, GLYPH_SIZE};
use crate::registers::Registers;
use crate::timer::Timer;

/// Execution mode. `AwaitingKey` is entered by the get-key opcode when no key
/// is down; while in it, steps neither execute instructions nor tick timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Running,
    AwaitingKey { dest: u8 },
}

/// What an executed instruction wants done with the program counter.
enum Flow {
    Advance,
    Skip,
    Jump(Addr),
}

/// The whole machine: memory, registers, stack, frame buffer, timers and
/// keypad in one aggregate, stepped one instruction at a time.
///
/// The caller owns all pacing; `step` executes exactly one cycle and returns.
/// Nothing here is internally synchronized, so a host that steps and delivers
/// key events from different threads must serialize access itself.
pub struct Emulator {
    pub mem: Memory,
    pub regs: Registers,
    stack: Stack,
    fb: FrameBuffer,
    keypad: Keypad,
    delay: Timer,
    sound: Timer,
    rng: StdRng,
    mode: Mode,
    fault: Option<Fault>,
    tone: bool,
}

impl Emulator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A machine with a deterministic random source, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            mem: Memory::new(),
            regs: Registers::new(),
            stack: Stack::new(),
            fb: FrameBuffer::new(),
            keypad: Keypad::new(),
            delay: Timer::new(),
            sound: Timer::new(),
            rng,
            mode: Mode::Running,
            fault: None,
            tone: false,
        }
    }

    /// Reinitializes everything: memory (font included), registers, stack,
    /// display, timers, keypad, and any latched fault.
    pub fn reset(&mut self) {
        self.mem.reset();
        self.regs.reset();
        self.stack.reset();
        self.fb.clear();
        self.keypad.reset();
        self.delay.set(0);
        self.sound.set(0);
        self.mode = Mode::Running;
        self.fault = None;
        self.tone = false;
    }

    /// Copies a program image into memory at 0x200.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        self.mem.load(image)
    }

    pub fn key_down(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn key_up(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn display_dirty(&self) -> bool {
        self.fb.dirty()
    }

    /// The current frame; clears the dirty flag.
    pub fn read_display(&mut self) -> [u8; WIDTH * HEIGHT] {
        self.fb.take_frame()
    }

    /// True once per sound-timer expiry; cleared on read.
    pub fn take_tone(&mut self) -> bool {
        std::mem::take(&mut self.tone)
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Runs one fetch/decode/execute cycle and then ticks the timers.
    ///
    /// While awaiting a key the call is a cheap no-op that re-polls the
    /// keypad; the lowest pressed id resolves the wait and execution (timers
    /// included) resumes on the following step. A fault is latched and
    /// returned from every subsequent call until `reset`.
    pub fn step(&mut self) -> Result<(), Fault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        if let Mode::AwaitingKey { dest } = self.mode {
            if let Some(key) = self.keypad.first_pressed() {
                self.regs.set(dest, key);
                self.mode = Mode::Running;
            }
            return Ok(());
        }
        match self.cycle() {
            Ok(()) => Ok(()),
            Err(fault) => {
                self.fault = Some(fault);
                Err(fault)
            }
        }
    }

    fn cycle(&mut self) -> Result<(), Fault> {
        let code = self.mem.opcode_at(self.regs.pc)?;
        let flow = self.execute(OpCodes::decode(code))?;
        match flow {
            Flow::Advance => self.regs.pc += 2,
            Flow::Skip => self.regs.pc += 4,
            Flow::Jump(addr) => self.regs.pc = addr,
        }
        // a step that lands in the key-wait state holds the timers as well
        if let Mode::AwaitingKey { .. } = self.mode {
            return Ok(());
        }
        self.delay.tick();
        if self.sound.tick() {
            self.tone = true;
        }
        Ok(())
    }

    fn execute(&mut self, ins: OpCodes) -> Result<Flow, Fault> {
        let flow = match ins {
            OpCodes::ClearScreen => {
                self.fb.clear();
                Flow::Advance
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop()?;
                // resume at the instruction after the call
                Flow::Jump(addr + 2)
            }
            OpCodes::Jump(addr) => Flow::Jump(addr),
            OpCodes::PushSubroutine(addr) => {
                self.stack.push(self.regs.pc)?;
                Flow::Jump(addr)
            }
            OpCodes::SkipEqualConstant(x, nn) => {
                if self.regs.get(x) == nn {
                    Flow::Skip
                } else {
                    Flow::Advance
                }
            }
            OpCodes::SkipNotEqualConstant(x, nn) => {
                if self.regs.get(x) != nn {
                    Flow::Skip
                } else {
                    Flow::Advance
                }
            }
            OpCodes::SkipEqualRegister(x, y) => {
                if self.regs.get(x) == self.regs.get(y) {
                    Flow::Skip
                } else {
                    Flow::Advance
                }
            }
            OpCodes::SkipNotEqualRegister(x, y) => {
                if self.regs.get(x) != self.regs.get(y) {
                    Flow::Skip
                } else {
                    Flow::Advance
                }
            }
            OpCodes::SetRegister(x, nn) => {
                self.regs.set(x, nn);
                Flow::Advance
            }
            OpCodes::AddToRegister(x, nn) => {
                let sum = self.regs.get(x) as u16 + nn as u16;
                self.regs.set_flag((sum > 0xFF) as u8);
                self.regs.set(x, sum as u8);
                Flow::Advance
            }
            OpCodes::CopyRegister(x, y) => {
                self.regs.set(x, self.regs.get(y));
                Flow::Advance
            }
            OpCodes::Or(x, y) => {
                self.regs.set(x, self.regs.get(x) | self.regs.get(y));
                Flow::Advance
            }
            OpCodes::And(x, y) => {
                self.regs.set(x, self.regs.get(x) & self.regs.get(y));
                Flow::Advance
            }
            OpCodes::XOr(x, y) => {
                self.regs.set(x, self.regs.get(x) ^ self.regs.get(y));
                Flow::Advance
            }
            OpCodes::Add(x, y) => {
                let sum = self.regs.get(x) as u16 + self.regs.get(y) as u16;
                self.regs.set_flag((sum > 0xFF) as u8);
                self.regs.set(x, sum as u8);
                Flow::Advance
            }
            OpCodes::SubtractForward(x, y) => {
                let (vx, vy) = (self.regs.get(x), self.regs.get(y));
                // flag is 0 on borrow, 1 otherwise
                self.regs.set_flag((vx >= vy) as u8);
                self.regs.set(x, vx.wrapping_sub(vy));
                Flow::Advance
            }
            OpCodes::SubtractBackward(x, y) => {
                let (vx, vy) = (self.regs.get(x), self.regs.get(y));
                self.regs.set_flag((vy >= vx) as u8);
                self.regs.set(x, vy.wrapping_sub(vx));
                Flow::Advance
            }
            OpCodes::RightShift(x) => {
                let vx = self.regs.get(x);
                self.regs.set_flag(vx & 0x1);
                self.regs.set(x, vx >> 1);
                Flow::Advance
            }
            OpCodes::LeftShift(x) => {
                let vx = self.regs.get(x);
                self.regs.set_flag(vx >> 7);
                self.regs.set(x, vx << 1);
                Flow::Advance
            }
            OpCodes::SetIndexRegister(addr) => {
                self.regs.i = addr;
                Flow::Advance
            }
            OpCodes::JumpWithOffset(addr) => Flow::Jump(addr + self.regs.get(0) as Addr),
            OpCodes::Random(x, nn) => {
                let byte: u8 = self.rng.gen();
                self.regs.set(x, byte & nn);
                Flow::Advance
            }
            OpCodes::Display(x, y, n) => {
                let mut sprite = Vec::with_capacity(n as usize);
                for offset in 0..n as Addr {
                    sprite.push(self.mem.get(self.regs.i + offset)?);
                }
                let erased = self
                    .fb
                    .paint(self.regs.get(x), self.regs.get(y), &sprite)?;
                self.regs.set_flag(erased as u8);
                Flow::Advance
            }
            OpCodes::SkipIfPressed(x) => {
                if self.keypad.is_pressed(self.regs.get(x) & 0xF) {
                    Flow::Skip
                } else {
                    Flow::Advance
                }
            }
            OpCodes::SkipIfNotPressed(x) => {
                if !self.keypad.is_pressed(self.regs.get(x) & 0xF) {
                    Flow::Skip
                } else {
                    Flow::Advance
                }
            }
            OpCodes::CopyDelayToRegister(x) => {
                self.regs.set(x, self.delay.get());
                Flow::Advance
            }
            OpCodes::GetKey(x) => {
                match self.keypad.first_pressed() {
                    Some(key) => self.regs.set(x, key),
                    None => self.mode = Mode::AwaitingKey { dest: x },
                }
                Flow::Advance
            }
            OpCodes::CopyRegisterToDelay(x) => {
                self.delay.set(self.regs.get(x));
                Flow::Advance
            }
            OpCodes::CopyRegisterToSound(x) => {
                self.sound.set(self.regs.get(x));
                Flow::Advance
            }
            OpCodes::AddToIndex(x) => {
                let sum = self.regs.i as u32 + self.regs.get(x) as u32;
                self.regs.set_flag((sum > 0xFFF) as u8);
                self.regs.i = sum as Addr;
                Flow::Advance
            }
            OpCodes::PointChar(x) => {
                self.regs.i = self.regs.get(x) as Addr * GLYPH_SIZE as Addr;
                Flow::Advance
            }
            OpCodes::ToDecimal(x) => {
                let vx = self.regs.get(x);
                self.mem.set(self.regs.i, vx / 100)?;
                self.mem.set(self.regs.i + 1, vx % 100 / 10)?;
                self.mem.set(self.regs.i + 2, vx % 10)?;
                Flow::Advance
            }
            OpCodes::StoreRegistersToMemory(x) => {
                for reg in 0..=x {
                    self.mem.set(self.regs.i + reg as Addr, self.regs.get(reg))?;
                }
                Flow::Advance
            }
            OpCodes::LoadRegistersFromMemory(x) => {
                for reg in 0..=x {
                    let val = self.mem.get(self.regs.i + reg as Addr)?;
                    self.regs.set(reg, val);
                }
                Flow::Advance
            }
            OpCodes::Unknown(code) => {
                // keep moving; stalling on a bad opcode would loop forever
                warn!("unknown opcode {code:#06X} at {:#05X}", self.regs.pc);
                Flow::Advance
            }
        };
        Ok(flow)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
