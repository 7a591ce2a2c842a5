//! Conversions between raw and decoded cards

use msrkit_core::{BitsPerChar, ParityMode, bits, iso7811};
use msrkit_types::{IsoCard, IsoTrack, RawCard, RawTrack, TrackNumber};

use crate::error::Result;

/// Character width of each track on an ISO 7811 card
pub const ISO_WIDTHS: [BitsPerChar; 3] =
    [BitsPerChar::Seven, BitsPerChar::Five, BitsPerChar::Five];

/// Decode every present raw track with its character width
///
/// `card` is in the form raw reads return. Absent tracks stay absent.
pub fn decode_card(
    card: &RawCard,
    widths: [BitsPerChar; 3],
    parity: ParityMode,
) -> Result<IsoCard> {
    let mut out = IsoCard::new();
    for (track, raw) in card.iter() {
        let text = iso7811::decode_track_checked(width(widths, track), raw.as_bytes(), parity)?;
        out.set(track, IsoTrack::new(text));
    }
    Ok(out)
}

/// Encode every present decoded track, ready for a raw write
pub fn encode_card(card: &IsoCard, widths: [BitsPerChar; 3]) -> Result<RawCard> {
    let mut out = RawCard::new();
    for (track, text) in card.iter() {
        let raw = iso7811::encode_track(width(widths, track), text.as_bytes())?;
        out.set(track, RawTrack::from(raw));
    }
    Ok(out)
}

/// Convert a card built by [`encode_card`] into what a raw read of it returns
pub fn to_read_form(card: &RawCard, widths: [BitsPerChar; 3]) -> RawCard {
    let mut out = RawCard::new();
    for (track, raw) in card.iter() {
        let read = bits::to_read_form_track(width(widths, track), raw.as_bytes());
        out.set(track, RawTrack::from(read));
    }
    out
}

fn width(widths: [BitsPerChar; 3], track: TrackNumber) -> BitsPerChar {
    widths[track.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_card_round_trip() {
        let card = IsoCard::new()
            .with_track(TrackNumber::One, "%B4111111111111111^DOE/JOHN^2512?")
            .with_track(TrackNumber::Two, ";4111111111111111=2512?");

        let written = encode_card(&card, ISO_WIDTHS).unwrap();
        assert!(written.track(TrackNumber::Three).is_none());
        assert_eq!(written.track(TrackNumber::Two).unwrap().len(), 23);

        let raw = to_read_form(&written, ISO_WIDTHS);
        let decoded = decode_card(&raw, ISO_WIDTHS, ParityMode::Even).unwrap();
        assert_eq!(decoded, card);
    }

    #[test]
    fn test_encode_is_write_form() {
        let card = IsoCard::new().with_track(TrackNumber::Two, ";1?");
        let written = encode_card(&card, ISO_WIDTHS).unwrap();
        assert_eq!(written.track(TrackNumber::Two).unwrap().as_bytes(), &[0x1B, 0x11, 0x0F]);

        let raw = to_read_form(&written, ISO_WIDTHS);
        assert_eq!(raw.track(TrackNumber::Two).unwrap().as_bytes(), &[0x1B, 0x11, 0x1E]);
    }

    #[test]
    fn test_encode_wrong_alphabet() {
        let card = IsoCard::new().with_track(TrackNumber::Two, "%ABC?");
        let err = encode_card(&card, ISO_WIDTHS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_decode_strict_parity() {
        let written = iso7811::encode_track(BitsPerChar::Five, b";12?").unwrap();
        let mut bytes = bits::to_read_form_track(BitsPerChar::Five, &written);
        bytes[2] ^= 0x01;
        let raw = RawCard::new().with_track(TrackNumber::Two, bytes);

        assert!(decode_card(&raw, ISO_WIDTHS, ParityMode::Ignore).is_ok());
        let err = decode_card(&raw, ISO_WIDTHS, ParityMode::Even).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParityError);
    }
}
