pub use emulator::Emulator;
pub use error::Fault;

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keymap;
pub mod keypad;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timer;
