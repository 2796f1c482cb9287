use crate::memory::Addr;

/// Field extraction helpers over a raw 16-bit opcode.
///
/// The conventional field names:
///     NNN: 12-bit address (low three nibbles)
///     NN: 8-bit constant (low byte)
///     N: 4-bit constant (low nibble)
///     X and Y: 4-bit register identifiers (second and third nibbles)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOpcode(pub u16);

impl RawOpcode {
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn nnn(self) -> Addr {
        self.0 & 0xFFF
    }
}

/// One variant per opcode, carrying its decoded operand fields. Decoding up
/// front keeps the executor a single flat match with no bit twiddling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    Jump(Addr),
    // 2NNN
    PushSubroutine(Addr),
    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),
    // 6XNN
    SetRegister(u8, u8),
    // 7XNN, carry goes to VF
    AddToRegister(u8, u8),
    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XY6, shifts VX
    RightShift(u8),
    // 8XYE, shifts VX
    LeftShift(u8),
    // ANNN
    SetIndexRegister(Addr),
    // BNNN
    JumpWithOffset(Addr),
    // CXNN
    Random(u8, u8),
    // DXYN
    Display(u8, u8, u8),
    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),
    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegistersToMemory(u8),
    // FX65
    LoadRegistersFromMemory(u8),
    // anything else; carries the raw code for reporting
    Unknown(u16),
}

impl OpCodes {
    pub fn decode(code: u16) -> Self {
        let raw = RawOpcode(code);
        match raw.family() {
            0x0 => match code {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                // 0NNN machine-code call; not supported
                _ => Self::Unknown(code),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(raw.x(), raw.nn()),
            0x4 => Self::SkipNotEqualConstant(raw.x(), raw.nn()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(raw.x(), raw.y()),
            0x6 => Self::SetRegister(raw.x(), raw.nn()),
            0x7 => Self::AddToRegister(raw.x(), raw.nn()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(raw.x(), raw.y()),
                0x1 => Self::Or(raw.x(), raw.y()),
                0x2 => Self::And(raw.x(), raw.y()),
                0x3 => Self::XOr(raw.x(), raw.y()),
                0x4 => Self::Add(raw.x(), raw.y()),
                0x5 => Self::SubtractForward(raw.x(), raw.y()),
                0x6 => Self::RightShift(raw.x()),
                0x7 => Self::SubtractBackward(raw.x(), raw.y()),
                0xE => Self::LeftShift(raw.x()),
                _ => Self::Unknown(code),
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(raw.x(), raw.y()),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(raw.x(), raw.nn()),
            0xD => Self::Display(raw.x(), raw.y(), raw.n()),
            0xE => match raw.nn() {
                0x9E => Self::SkipIfPressed(raw.x()),
                0xA1 => Self::SkipIfNotPressed(raw.x()),
                _ => Self::Unknown(code),
            },
            0xF => match raw.nn() {
                0x07 => Self::CopyDelayToRegister(raw.x()),
                0x0A => Self::GetKey(raw.x()),
                0x15 => Self::CopyRegisterToDelay(raw.x()),
                0x18 => Self::CopyRegisterToSound(raw.x()),
                0x1E => Self::AddToIndex(raw.x()),
                0x29 => Self::PointChar(raw.x()),
                0x33 => Self::ToDecimal(raw.x()),
                0x55 => Self::StoreRegistersToMemory(raw.x()),
                0x65 => Self::LoadRegistersFromMemory(raw.x()),
                _ => Self::Unknown(code),
            },
            _ => Self::Unknown(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_field_extraction() {
        let raw = RawOpcode(0x4CEE);
        assert_eq!(raw.family(), 0x4);
        assert_eq!(raw.x(), 0xC);
        assert_eq!(raw.y(), 0xE);
        assert_eq!(raw.n(), 0xE);
        assert_eq!(raw.nn(), 0xEE);
        assert_eq!(raw.nnn(), 0xCEE);
    }

    #[test]
    fn decodes_fixed_codes() {
        assert_eq!(OpCodes::decode(0x00E0), OpCodes::ClearScreen);
        assert_eq!(OpCodes::decode(0x00EE), OpCodes::PopSubroutine);
    }

    #[test]
    fn decodes_operand_fields() {
        assert_eq!(OpCodes::decode(0x1ABC), OpCodes::Jump(0xABC));
        assert_eq!(OpCodes::decode(0x2123), OpCodes::PushSubroutine(0x123));
        assert_eq!(OpCodes::decode(0x6A05), OpCodes::SetRegister(0xA, 0x05));
        assert_eq!(OpCodes::decode(0x7AFF), OpCodes::AddToRegister(0xA, 0xFF));
        assert_eq!(OpCodes::decode(0x8124), OpCodes::Add(0x1, 0x2));
        assert_eq!(OpCodes::decode(0x8106), OpCodes::RightShift(0x1));
        assert_eq!(OpCodes::decode(0x810E), OpCodes::LeftShift(0x1));
        assert_eq!(OpCodes::decode(0xD7A5), OpCodes::Display(0x7, 0xA, 0x5));
        assert_eq!(OpCodes::decode(0xF133), OpCodes::ToDecimal(0x1));
        assert_eq!(
            OpCodes::decode(0xF455),
            OpCodes::StoreRegistersToMemory(0x4)
        );
    }

    #[test]
    fn unmatched_codes_decode_to_unknown() {
        assert_eq!(OpCodes::decode(0x0123), OpCodes::Unknown(0x0123));
        assert_eq!(OpCodes::decode(0x5121), OpCodes::Unknown(0x5121));
        assert_eq!(OpCodes::decode(0x8128), OpCodes::Unknown(0x8128));
        assert_eq!(OpCodes::decode(0x9121), OpCodes::Unknown(0x9121));
        assert_eq!(OpCodes::decode(0xE1A2), OpCodes::Unknown(0xE1A2));
        assert_eq!(OpCodes::decode(0xF1FF), OpCodes::Unknown(0xF1FF));
    }
}
