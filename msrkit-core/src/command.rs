//! MSRxxx command opcodes

use std::fmt;

use crate::error::{Error, Result};

/// Command opcodes
///
/// Every command goes out as `ESC` followed by one of these bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    // Device control
    Reset = 0x61,
    TestComms = 0x65,

    // Card access
    ReadIso = 0x72,
    ReadRaw = 0x6D,
    WriteRaw = 0x6E,
    Erase = 0x63,

    // Settings
    SetDensity = 0x62,
    GetCoercivity = 0x64,
    GetLeadingZeros = 0x6C,
    SetBitsPerChar = 0x6F,
    SetHiCo = 0x78,
    SetLoCo = 0x79,
    SetLeadingZeros = 0x7A,
}

impl Opcode {
    /// Check if the device answers this command
    pub fn expects_response(self) -> bool {
        !matches!(self, Self::Reset)
    }

    /// Check if this command waits for a card swipe before answering
    pub fn waits_for_card(self) -> bool {
        matches!(
            self,
            Self::ReadIso | Self::ReadRaw | Self::WriteRaw | Self::Erase
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::TestComms => "TEST_COMMS",
            Self::ReadIso => "READ_ISO",
            Self::ReadRaw => "READ_RAW",
            Self::WriteRaw => "WRITE_RAW",
            Self::Erase => "ERASE",
            Self::SetDensity => "SET_BPI",
            Self::GetCoercivity => "GET_COERCIVITY",
            Self::GetLeadingZeros => "GET_LEADING_ZEROS",
            Self::SetBitsPerChar => "SET_BPC",
            Self::SetHiCo => "SET_HICO",
            Self::SetLoCo => "SET_LOCO",
            Self::SetLeadingZeros => "SET_LEADING_ZEROS",
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x61 => Ok(Self::Reset),
            0x65 => Ok(Self::TestComms),
            0x72 => Ok(Self::ReadIso),
            0x6D => Ok(Self::ReadRaw),
            0x6E => Ok(Self::WriteRaw),
            0x63 => Ok(Self::Erase),
            0x62 => Ok(Self::SetDensity),
            0x64 => Ok(Self::GetCoercivity),
            0x6C => Ok(Self::GetLeadingZeros),
            0x6F => Ok(Self::SetBitsPerChar),
            0x78 => Ok(Self::SetHiCo),
            0x79 => Ok(Self::SetLoCo),
            0x7A => Ok(Self::SetLeadingZeros),
            _ => Err(Error::InvalidArgument(format!(
                "unknown opcode 0x{:02X}",
                value
            ))),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_conversion() {
        assert_eq!(u8::from(Opcode::ReadIso), 0x72);
        assert_eq!(Opcode::try_from(0x6D).unwrap(), Opcode::ReadRaw);
    }

    #[test]
    fn test_unknown_opcode() {
        assert!(matches!(
            Opcode::try_from(0x00),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_reset_has_no_response() {
        assert!(!Opcode::Reset.expects_response());
        assert!(Opcode::TestComms.expects_response());
        assert!(Opcode::ReadRaw.waits_for_card());
        assert!(!Opcode::SetHiCo.waits_for_card());
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(Opcode::Erase.to_string(), "ERASE(0x63)");
    }
}
