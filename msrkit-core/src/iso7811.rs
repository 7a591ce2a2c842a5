//! ISO/IEC 7811-2/-6 character sets
//!
//! Track characters are small numbers: 4 data bits on 5 bpc tracks, 6 data
//! bits on 7 bpc tracks. Both alphabets are contiguous runs of ASCII, so the
//! conversion is a fixed offset (`0x30` and `0x20` respectively).

use crate::{
    bits::{self, BitsPerChar, ParityMode},
    error::{Error, Result},
};

/// Convert one character value to ASCII
///
/// Uses wrapping arithmetic, so the conversion is total and exactly
/// undone by [`from_ascii`].
pub fn to_ascii(bpc: BitsPerChar, value: u8) -> u8 {
    value.wrapping_add(bpc.ascii_offset())
}

/// Convert one ASCII character to its character value
pub fn from_ascii(bpc: BitsPerChar, ascii: u8) -> u8 {
    ascii.wrapping_sub(bpc.ascii_offset())
}

/// Check whether an ASCII character exists in the track alphabet
pub fn is_valid_char(bpc: BitsPerChar, ascii: u8) -> bool {
    ascii >= bpc.ascii_offset() && from_ascii(bpc, ascii) <= bpc.data_mask()
}

/// Convert a buffer of character values into an equal-length ASCII buffer
pub fn to_ascii_into(bpc: BitsPerChar, src: &[u8], dst: &mut [u8]) -> Result<()> {
    check_lengths(src, dst)?;
    for (out, &value) in dst.iter_mut().zip(src) {
        *out = to_ascii(bpc, value);
    }
    Ok(())
}

/// Convert an ASCII buffer into an equal-length buffer of character values
pub fn from_ascii_into(bpc: BitsPerChar, src: &[u8], dst: &mut [u8]) -> Result<()> {
    check_lengths(src, dst)?;
    for (out, &ascii) in dst.iter_mut().zip(src) {
        *out = from_ascii(bpc, ascii);
    }
    Ok(())
}

/// Decode raw track data into text
///
/// `raw` is in the form raw reads return (LSB first). The text length is
/// the length of `raw`; no terminator is appended. Callers that need a
/// NUL-terminated buffer can wrap the result in an
/// [`IsoTrack`](msrkit_types::IsoTrack) and use
/// [`IsoTrack::to_nul_terminated`](msrkit_types::IsoTrack::to_nul_terminated).
///
/// # Examples
///
/// ```
/// use msrkit_core::{iso7811, BitsPerChar};
/// use msrkit_types::IsoTrack;
///
/// let text = iso7811::decode_track(BitsPerChar::Five, &[0x1B, 0x11, 0x1E]);
/// assert_eq!(text, ";1?");
/// assert_eq!(IsoTrack::new(text).to_nul_terminated(), b";1?\0".to_vec());
/// ```
pub fn decode_track(bpc: BitsPerChar, raw: &[u8]) -> String {
    raw.iter()
        .map(|&byte| char::from(to_ascii(bpc, bits::unpack(bpc, byte))))
        .collect()
}

/// Decode raw track data, checking the parity of every character
pub fn decode_track_checked(bpc: BitsPerChar, raw: &[u8], parity: ParityMode) -> Result<String> {
    let values = bits::unpack_track(bpc, raw, parity)?;
    Ok(values
        .into_iter()
        .map(|value| char::from(to_ascii(bpc, value)))
        .collect())
}

/// Encode text into raw track data for the raw write command
///
/// Characters come out MSB first with their parity bit, see
/// [`bits::pack`]. Fails if a character is outside the track alphabet.
///
/// ```
/// use msrkit_core::{iso7811, BitsPerChar};
///
/// let raw = iso7811::encode_track(BitsPerChar::Five, b";1?").unwrap();
/// assert_eq!(raw, vec![0x1B, 0x11, 0x0F]);
/// ```
pub fn encode_track(bpc: BitsPerChar, ascii: &[u8]) -> Result<Vec<u8>> {
    ascii
        .iter()
        .enumerate()
        .map(|(position, &c)| {
            if !is_valid_char(bpc, c) {
                return Err(Error::InvalidArgument(format!(
                    "character 0x{:02X} at position {} is not in the {} alphabet",
                    c, position, bpc
                )));
            }
            Ok(bits::pack(bpc, from_ascii(bpc, c)))
        })
        .collect()
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
