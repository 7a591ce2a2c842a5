//! Transport failures and argument checks, observed through a mocked transport

use std::io;

use mockall::{Sequence, mock};

use msrkit::{Device, ErrorKind, TrackSet};
use msrkit_transport::{Error as TransportError, Result as TransportResult, Transport};

mock! {
    pub Port {}

    impl Transport for Port {
        fn purge(&mut self) -> TransportResult<()>;
        fn send(&mut self, data: &[u8]) -> TransportResult<()>;
        fn read_byte(&mut self) -> TransportResult<u8>;
        fn read_exact(&mut self, buf: &mut [u8]) -> TransportResult<()>;
        fn close(&mut self) -> TransportResult<()>;
        fn is_open(&self) -> bool;
        fn port_name(&self) -> String;
    }
}

#[test]
fn invalid_arguments_never_touch_the_port() {
    // No expectations: any call on the port panics
    let mut device = Device::new(MockPort::new());

    assert_eq!(
        device.erase(TrackSet::empty()).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        device.set_density(4, 210).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        device.set_density(1, 100).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn purge_precedes_send() {
    let mut seq = Sequence::new();
    let mut port = MockPort::new();

    port.expect_purge()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    port.expect_send()
        .withf(|data| data.to_vec() == vec![0x1Bu8, 0x61])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let mut device = Device::new(port);
    device.reset().unwrap();
}

#[test]
fn write_failure_is_reported() {
    let mut port = MockPort::new();
    port.expect_purge().returning(|| Ok(()));
    port.expect_send().returning(|_| {
        Err(TransportError::WriteFailed(io::Error::from(
            io::ErrorKind::BrokenPipe,
        )))
    });
    port.expect_read_byte().never();

    let mut device = Device::new(port);
    let err = device.test_comms().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PortWriteFailed);
    assert!(!err.is_recoverable());
}

#[test]
fn read_timeout_is_recoverable() {
    let mut port = MockPort::new();
    port.expect_purge().returning(|| Ok(()));
    port.expect_send().returning(|_| Ok(()));
    port.expect_read_byte().times(1).returning(|| {
        Err(TransportError::ReadFailed(io::Error::from(
            io::ErrorKind::TimedOut,
        )))
    });

    let mut device = Device::new(port);
    let err = device.read_iso().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PortReadFailed);
    assert!(err.is_timeout());
    assert!(err.is_recoverable());
}

#[test]
fn purge_failure_stops_the_command() {
    let mut port = MockPort::new();
    port.expect_purge().returning(|| {
        Err(TransportError::PurgeFailed(serialport::Error::new(
            serialport::ErrorKind::NoDevice,
            "device unplugged",
        )))
    });
    port.expect_send().never();

    let mut device = Device::new(port);
    let err = device.erase(TrackSet::all()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PortSetupFailed);
}
