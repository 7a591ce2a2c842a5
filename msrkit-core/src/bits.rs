//! Bit-level character transform
//!
//! Every character is `bpc` bits wide, the top one being a parity bit. The
//! reader returns characters LSB first and right-aligned in a byte, so
//! unpacking means reversing the byte, realigning the character and
//! dropping the parity bit. The raw write command takes characters MSB
//! first, so packing only adds the parity bit.
//!
//! ```text
//! read form (bpc = 5):   0 0 0 d0 d1 d2 d3 p
//! reversed:              p d3 d2 d1 d0 0 0 0
//! >> (8 - bpc):          0 0 0 p d3 d2 d1 d0    (write form)
//! data:                  0 0 0 0 d3 d2 d1 d0
//! ```

use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// Bit-reversal lookup table
pub const REVERSE: [u8; 256] = build_reverse_table();

const fn build_reverse_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut b = i as u8;
        let mut r = 0u8;
        let mut bit = 0;
        while bit < 8 {
            r = (r << 1) | (b & 1);
            b >>= 1;
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

/// Character width, parity bit included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BitsPerChar {
    /// Numeric tracks (ISO track 2 and 3)
    Five = 5,
    /// Alphanumeric track (ISO track 1)
    Seven = 7,
}

impl BitsPerChar {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Mask selecting the data bits of a realigned character
    pub fn data_mask(self) -> u8 {
        (1u8 << (self.bits() - 1)) - 1
    }

    /// Mask selecting the parity bit of a realigned character
    pub fn parity_mask(self) -> u8 {
        1u8 << (self.bits() - 1)
    }

    /// ASCII code of data value zero
    pub fn ascii_offset(self) -> u8 {
        match self {
            Self::Five => 0x30,
            Self::Seven => 0x20,
        }
    }
}

impl TryFrom<u8> for BitsPerChar {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            5 => Ok(Self::Five),
            7 => Ok(Self::Seven),
            _ => Err(Error::InvalidArgument(format!(
                "bits per character must be 5 or 7, got {}",
                value
            ))),
        }
    }
}

impl TryFrom<u32> for BitsPerChar {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        u8::try_from(value)
            .map_err(|_| {
                Error::InvalidArgument(format!(
                    "bits per character must be 5 or 7, got {}",
                    value
                ))
            })
            .and_then(<Self as TryFrom<u8>>::try_from)
    }
}

impl fmt::Display for BitsPerChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bpc", self.bits())
    }
}

/// Parity handling while unpacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParityMode {
    /// Drop the parity bit without looking at it
    #[default]
    Ignore,
    /// Reject characters whose set-bit count (parity included) is odd
    Even,
}

fn realign(bpc: BitsPerChar, byte: u8) -> u8 {
    REVERSE[byte as usize] >> (8 - bpc.bits())
}

/// Parity bit value giving an even number of set bits
pub fn even_parity(bpc: BitsPerChar, data: u8) -> u8 {
    if (data & bpc.data_mask()).count_ones() % 2 == 1 {
        bpc.parity_mask()
    } else {
        0
    }
}

/// Unpack one wire character into its data bits
pub fn unpack(bpc: BitsPerChar, byte: u8) -> u8 {
    realign(bpc, byte) & bpc.data_mask()
}

/// Check the parity of one wire character
pub fn parity_ok(bpc: BitsPerChar, byte: u8) -> bool {
    let ch = realign(bpc, byte);
    ch & bpc.parity_mask() == even_parity(bpc, ch)
}

/// Pack data bits into one character for the raw write command
///
/// The result is MSB first and right-aligned, parity at bit `bpc - 1`.
/// Bits above the data width are ignored.
pub fn pack(bpc: BitsPerChar, value: u8) -> u8 {
    let data = value & bpc.data_mask();
    data | even_parity(bpc, data)
}

/// Turn a packed character into the LSB-first form raw reads return
///
/// `unpack(bpc, to_read_form(bpc, pack(bpc, v))) == v` for every data value.
pub fn to_read_form(bpc: BitsPerChar, packed: u8) -> u8 {
    let ch = packed & (bpc.parity_mask() | bpc.data_mask());
    REVERSE[(ch << (8 - bpc.bits())) as usize]
}

/// Unpack a buffer into an equal-length destination
pub fn unpack_into(bpc: BitsPerChar, src: &[u8], dst: &mut [u8], parity: ParityMode) -> Result<()> {
    check_lengths(src, dst)?;

    for (position, (out, &byte)) in dst.iter_mut().zip(src).enumerate() {
        if parity == ParityMode::Even && !parity_ok(bpc, byte) {
            return Err(Error::Parity { position, byte });
        }
        *out = unpack(bpc, byte);
    }

    trace!(bpc = bpc.bits(), len = src.len(), "Unpacked track data");
    Ok(())
}

/// Pack a buffer into an equal-length destination
pub fn pack_into(bpc: BitsPerChar, src: &[u8], dst: &mut [u8]) -> Result<()> {
    check_lengths(src, dst)?;

    for (out, &value) in dst.iter_mut().zip(src) {
        *out = pack(bpc, value);
    }
    Ok(())
}

/// Unpack a whole track
pub fn unpack_track(bpc: BitsPerChar, src: &[u8], parity: ParityMode) -> Result<Vec<u8>> {
    let mut dst = vec![0u8; src.len()];
    unpack_into(bpc, src, &mut dst, parity)?;
    Ok(dst)
}

/// Pack a whole track
pub fn pack_track(bpc: BitsPerChar, src: &[u8]) -> Vec<u8> {
    src.iter().map(|&value| pack(bpc, value)).collect()
}

/// Turn a whole packed track into read form
pub fn to_read_form_track(bpc: BitsPerChar, packed: &[u8]) -> Vec<u8> {
    packed.iter().map(|&ch| to_read_form(bpc, ch)).collect()
}

fn check_lengths(src: &[u8], dst: &[u8]) -> Result<()> {
    if src.len() != dst.len() {
        return Err(Error::InvalidArgument(format!(
            "source and destination lengths differ ({} vs {})",
            src.len(),
            dst.len()
        )));
    }
    Ok(())
}
