//! Flash sector identifiers.

use std::fmt;
use std::str::FromStr;

use crate::common::ImageError;
use crate::common::constants::FLASH_SECTOR_SIZE;
use crate::protocol::Opcode;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Index of the flash sector that receives an uploaded image (0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sector(u8);

impl Sector {
    /// Wraps a sector index.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the raw sector index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Byte address of the sector's first byte in flash.
    pub fn flash_address(self) -> u32 {
        u32::from(self.0) * FLASH_SECTOR_SIZE
    }

    /// Upload initiation frame: `u` followed by two lowercase hex digits.
    ///
    /// Sector 10 yields `b"u0a"`, sector 255 yields `b"uff"`.
    pub const fn frame(self) -> [u8; 3] {
        [
            Opcode::Upload.byte(),
            HEX_DIGITS[(self.0 >> 4) as usize],
            HEX_DIGITS[(self.0 & 0x0f) as usize],
        ]
    }
}

impl From<u8> for Sector {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl TryFrom<u64> for Sector {
    type Error = ImageError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ImageError::SectorOutOfRange(value))
    }
}

impl FromStr for Sector {
    type Err = ImageError;

    /// Parses a decimal sector number, rejecting anything above 255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: u64 = trimmed
            .parse()
            .map_err(|_| ImageError::InvalidSector(trimmed.to_owned()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
