//! Device operations driven over a scripted transport

use pretty_assertions::assert_eq;

use msrkit::{
    Coercivity, Device, DeviceConfig, ErrorKind, IsoCard, LeadingZeros, MockTransport,
    ParityMode, RawCard, TrackNumber, TrackSet, Transport,
    card::{self, ISO_WIDTHS},
};

const ACK: [u8; 2] = [0x1B, 0x30];

fn device_with(exchanges: &[(&[u8], &[u8])]) -> Device<MockTransport> {
    let mut mock = MockTransport::new();
    for (request, response) in exchanges {
        mock.expect(request, response);
    }
    Device::new(mock)
}

fn assert_nothing_sent(device: &Device<MockTransport>) {
    assert!(device.transport().sent_data().is_empty());
}

#[test]
fn reset_expects_no_answer() {
    let mut device = device_with(&[(&[0x1B, 0x61], &[])]);

    device.reset().unwrap();

    assert_eq!(device.transport().purge_count(), 1);
    assert_eq!(device.transport().remaining_expectations(), 0);
}

#[test]
fn test_comms_ok() {
    let mut device = device_with(&[(&[0x1B, 0x65], &[0x1B, 0x79])]);
    device.test_comms().unwrap();
}

#[test]
fn test_comms_wrong_status() {
    let mut device = device_with(&[(&[0x1B, 0x65], &[0x1B, 0x30])]);
    let err = device.test_comms().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CommandFailed);
}

#[test]
fn test_comms_custom_status() {
    let mut device = device_with(&[(&[0x1B, 0x65], &[0x1B, 0x30])])
        .with_config(DeviceConfig::default().with_test_comms_status(0x30));
    device.test_comms().unwrap();
}

#[test]
fn purge_discards_stale_input() {
    let mut mock = MockTransport::new();
    mock.inject(&[0x1B, 0x41, 0x00]);
    mock.expect(&[0x1B, 0x65], &[0x1B, 0x79]);

    let mut device = Device::new(mock);
    device.test_comms().unwrap();
}

#[test]
fn missing_escape_is_unexpected_response() {
    let mut device = device_with(&[(&[0x1B, 0x65], &[0x79, 0x1B])]);
    let err = device.test_comms().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
}

#[test]
fn erase_sends_track_mask() {
    let mut device = device_with(&[(&[0x1B, 0x63, 0x05], &ACK)]);
    device.erase(TrackSet::TRACK1 | TrackSet::TRACK3).unwrap();
}

#[test]
fn erase_all_tracks() {
    let mut device = device_with(&[(&[0x1B, 0x63, 0x07], &ACK)]);
    device.erase(TrackSet::from_flags(true, true, true)).unwrap();
}

#[test]
fn erase_failure_status() {
    let mut device = device_with(&[(&[0x1B, 0x63, 0x02], &[0x1B, 0x41])]);
    let err = device.erase(TrackSet::TRACK2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CommandFailed);
}

#[test]
fn erase_nothing_is_rejected_before_sending() {
    let mut device = device_with(&[]);

    let err = device.erase(TrackSet::empty()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_nothing_sent(&device);
    assert_eq!(device.transport().purge_count(), 0);
}

#[test]
fn set_coercivity_opcodes() {
    let mut device = device_with(&[(&[0x1B, 0x78], &ACK), (&[0x1B, 0x79], &ACK)]);

    device.set_coercivity(Coercivity::High).unwrap();
    device.set_coercivity(Coercivity::Low).unwrap();

    assert_eq!(device.transport().remaining_expectations(), 0);
}

#[test]
fn get_coercivity() {
    let mut device = device_with(&[
        (&[0x1B, 0x64], &[0x1B, b'H']),
        (&[0x1B, 0x64], &[0x1B, b'L']),
        (&[0x1B, 0x64], &[0x1B, b'X']),
    ]);

    assert_eq!(device.coercivity().unwrap(), Coercivity::High);
    assert_eq!(device.coercivity().unwrap(), Coercivity::Low);

    let err = device.coercivity().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
}

#[test]
fn leading_zeros_round_trip() {
    let mut device = device_with(&[
        (&[0x1B, 0x7A, 0x3D, 0x16], &ACK),
        (&[0x1B, 0x6C], &[0x1B, 0x3D, 0x16]),
    ]);

    device.set_leading_zeros(LeadingZeros::new(61, 22)).unwrap();
    assert_eq!(device.leading_zeros().unwrap(), LeadingZeros::new(61, 22));
}

#[test]
fn set_density_encodes_table_setting() {
    let mut device = device_with(&[(&[0x1B, 0x62, 0xD2], &ACK), (&[0x1B, 0x62, 0xC0], &ACK)]);

    device.set_density(2, 210).unwrap();
    device.set_density(3, 75).unwrap();
}

#[test]
fn set_density_rejects_bad_arguments() {
    let mut device = device_with(&[]);

    for (track, bpi) in [(4, 210), (0, 75), (1, 100)] {
        let err = device.set_density(track, bpi).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    assert_nothing_sent(&device);
}

#[test]
fn set_bits_per_char_drains_echo() {
    let mut device = device_with(&[(
        &[0x1B, 0x6F, 0x07, 0x05, 0x05],
        &[0x1B, 0x30, 0x07, 0x05, 0x05],
    )]);

    device.set_bits_per_char(7, 5, 5).unwrap();

    assert_eq!(device.transport().pending_bytes(), 0);
}

#[test]
fn read_iso_card() {
    let mut device = device_with(&[(
        &[0x1B, 0x72],
        &[
            0x1B, 0x73, 0x1B, 0x01, 0x41, 0x42, 0x3F, 0x1B, 0x02, 0x1B, 0x2B, 0x1B, 0x03, 0x1B,
            0x2B, 0x3F, 0x1C, 0x1B, 0x30,
        ],
    )]);

    let card = device.read_iso().unwrap();

    assert_eq!(card.track(TrackNumber::One).unwrap().as_str(), Some("AB?"));
    assert!(card.track(TrackNumber::Two).unwrap().is_empty());
    assert!(card.track(TrackNumber::Three).unwrap().is_empty());
    assert_eq!(device.transport().pending_bytes(), 0);
}

#[test]
fn read_iso_track2_only() {
    let mut response = vec![0x1B, 0x73, 0x1B, 0x02];
    response.extend_from_slice(b";4111111111111111=2512?");
    response.extend_from_slice(&[0x3F, 0x1C, 0x1B, 0x30]);

    let mut device = device_with(&[(&[0x1B, 0x72], &response)]);
    let card = device.read_iso().unwrap();

    let expected = IsoCard::new().with_track(TrackNumber::Two, ";4111111111111111=2512?");
    assert_eq!(card, expected);
    assert_eq!(card.track(TrackNumber::Two).unwrap().to_nul_terminated().last(), Some(&0));
}

#[test]
fn read_iso_bad_sync() {
    let mut device = device_with(&[(&[0x1B, 0x72], &[0x1B, 0x74, 0x3F, 0x1C, 0x1B, 0x30])]);
    let err = device.read_iso().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
    assert!(err.is_recoverable());
}

#[test]
fn read_iso_failure_status() {
    let mut device = device_with(&[(&[0x1B, 0x72], &[0x1B, 0x73, 0x3F, 0x1C, 0x1B, 0x31])]);
    let err = device.read_iso().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CommandFailed);
}

#[test]
fn read_iso_truncated_times_out() {
    let mut device = device_with(&[(&[0x1B, 0x72], &[0x1B, 0x73, 0x1B, 0x01, 0x41])]);
    let err = device.read_iso().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PortReadFailed);
    assert!(err.is_timeout());
    assert!(err.is_recoverable());
}

#[test]
fn read_iso_track_over_capacity() {
    let mut response = vec![0x1B, 0x73, 0x1B, 0x01];
    response.extend_from_slice(b"ABCDEFG?");
    response.extend_from_slice(&[0x3F, 0x1C, 0x1B, 0x30]);

    let mut device = device_with(&[(&[0x1B, 0x72], &response)])
        .with_config(DeviceConfig::default().with_max_track_len(4));

    let err = device.read_iso().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
}

#[test]
fn read_raw_card_keeps_escape_bytes() {
    let mut device = device_with(&[(
        &[0x1B, 0x6D],
        &[
            0x1B, 0x73, 0x1B, 0x01, 0x05, 0x1B, 0x00, 0x1B, 0x3F, 0x1C, 0x1B, 0x02, 0x00, 0x3F,
            0x1C, 0x1B, 0x30,
        ],
    )]);

    let card = device.read_raw().unwrap();

    let track1 = card.track(TrackNumber::One).unwrap();
    assert_eq!(track1.len(), 5);
    assert_eq!(track1.as_bytes(), &[0x1B, 0x00, 0x1B, 0x3F, 0x1C]);
    assert!(card.track(TrackNumber::Two).unwrap().is_empty());
    assert!(card.track(TrackNumber::Three).is_none());
}

#[test]
fn read_raw_decoded_card() {
    let text = IsoCard::new().with_track(TrackNumber::Two, ";123=45?");
    let written = card::encode_card(&text, ISO_WIDTHS).unwrap();
    let raw = card::to_read_form(&written, ISO_WIDTHS);
    let track2 = raw.track(TrackNumber::Two).unwrap().as_bytes();

    let mut response = vec![0x1B, 0x73, 0x1B, 0x02, track2.len() as u8];
    response.extend_from_slice(track2);
    response.extend_from_slice(&[0x3F, 0x1C, 0x1B, 0x30]);

    let mut device = device_with(&[(&[0x1B, 0x6D], &response)])
        .with_config(DeviceConfig::default().with_parity(ParityMode::Even));

    assert_eq!(device.read_raw_decoded(ISO_WIDTHS).unwrap(), text);
}

#[test]
fn write_raw_card() {
    let card = RawCard::new()
        .with_track(TrackNumber::One, vec![0xAAu8, 0x55])
        .with_track(TrackNumber::Three, vec![0x01u8]);

    let mut device = device_with(&[(
        &[
            0x1B, 0x6E, 0x1B, 0x73, 0x1B, 0x01, 0x02, 0xAA, 0x55, 0x1B, 0x02, 0x00, 0x1B, 0x03,
            0x01, 0x01, 0x3F, 0x1C,
        ],
        &ACK,
    )]);

    device.write_raw(&card).unwrap();
    assert_eq!(device.transport().remaining_expectations(), 0);
}

#[test]
fn write_raw_encoded_card() {
    let text = IsoCard::new().with_track(TrackNumber::Two, ";1?");
    let card = card::encode_card(&text, ISO_WIDTHS).unwrap();

    let mut device = device_with(&[(
        &[
            0x1B, 0x6E, 0x1B, 0x73, 0x1B, 0x01, 0x00, 0x1B, 0x02, 0x03, 0x1B, 0x11, 0x0F, 0x1B,
            0x03, 0x00, 0x3F, 0x1C,
        ],
        &ACK,
    )]);

    device.write_raw(&card).unwrap();
    assert_eq!(device.transport().remaining_expectations(), 0);
}

#[test]
fn write_raw_rejects_long_track() {
    let card = RawCard::new().with_track(TrackNumber::Two, vec![0u8; 256]);
    let mut device = device_with(&[]);

    let err = device.write_raw(&card).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_nothing_sent(&device);
}

#[test]
fn closed_device_fails() {
    let mut device = device_with(&[(&[0x1B, 0x65], &[0x1B, 0x79])]);

    device.close().unwrap();
    assert!(!device.is_open());

    let err = device.test_comms().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PortOpenFailed);

    let mock = device.into_transport();
    assert!(!mock.is_open());
}
