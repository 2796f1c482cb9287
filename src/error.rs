use std::error::Error;
use std::fmt;

/// A machine fault raised by the core.
///
/// `LoadOverflow` is returned from `load` before anything is written. The
/// remaining variants are out-of-range accesses computed at run time; the
/// emulator latches the first one and refuses to step until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Program image does not fit between 0x200 and 0xFFF.
    LoadOverflow { len: usize },
    /// A computed memory address above 0xFFF.
    MemoryOutOfRange { addr: u16 },
    /// A sprite row would land outside the 2048-cell frame buffer.
    DisplayOutOfRange { cell: usize },
    /// A 17th nested call.
    StackOverflow,
    /// A return with no call outstanding.
    StackUnderflow,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::LoadOverflow { len } => {
                write!(f, "program image of {len} bytes does not fit in memory")
            }
            Fault::MemoryOutOfRange { addr } => {
                write!(f, "memory access out of range: {addr:#05X}")
            }
            Fault::DisplayOutOfRange { cell } => {
                write!(f, "sprite draw out of range: cell {cell}")
            }
            Fault::StackOverflow => write!(f, "call stack overflow"),
            Fault::StackUnderflow => write!(f, "call stack underflow"),
        }
    }
}

impl Error for Fault {}
