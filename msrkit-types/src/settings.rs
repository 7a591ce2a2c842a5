//! Device write settings

use std::fmt;

use crate::error::{Error, Result};

/// Write coercivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercivity {
    /// Hi-Co (2750-4000 Oe stripes)
    High,
    /// Lo-Co (300 Oe stripes)
    Low,
}

impl Coercivity {
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for Coercivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("Hi-Co"),
            Self::Low => f.write_str("Lo-Co"),
        }
    }
}

/// Recording density in bits per inch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bpi {
    Bpi75,
    Bpi210,
}

impl Bpi {
    pub fn value(self) -> u16 {
        match self {
            Self::Bpi75 => 75,
            Self::Bpi210 => 210,
        }
    }
}

impl TryFrom<u16> for Bpi {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            75 => Ok(Self::Bpi75),
            210 => Ok(Self::Bpi210),
            _ => Err(Error::InvalidDensity(value)),
        }
    }
}

impl fmt::Display for Bpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bpi", self.value())
    }
}

/// Number of zero bits written ahead of track data
///
/// Tracks 1 and 3 share one setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LeadingZeros {
    pub tracks13: u8,
    pub track2: u8,
}

impl LeadingZeros {
    pub fn new(tracks13: u8, track2: u8) -> Self {
        Self { tracks13, track2 }
    }
}

impl fmt::Display for LeadingZeros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tracks 1&3: {}, track 2: {}", self.tracks13, self.track2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpi_conversion() {
        assert_eq!(Bpi::try_from(75u16).unwrap(), Bpi::Bpi75);
        assert_eq!(Bpi::try_from(210u16).unwrap().value(), 210);
        assert!(matches!(Bpi::try_from(100u16), Err(Error::InvalidDensity(100))));
    }

    #[test]
    fn test_coercivity_display() {
        assert_eq!(Coercivity::High.to_string(), "Hi-Co");
        assert!(!Coercivity::Low.is_high());
    }
}
