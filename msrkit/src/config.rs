//! Device configuration

use msrkit_core::{
    ParityMode,
    constants::{DEFAULT_MAX_TRACK_LEN, STATUS_OK, STATUS_TEST_COMMS},
};

/// Per-device protocol settings
///
/// The defaults match the MSR206 family. Clones built on the same firmware
/// sometimes answer with other status codes, hence the overrides.
///
/// ```
/// use msrkit::{DeviceConfig, ParityMode};
///
/// let config = DeviceConfig::default()
///     .with_max_track_len(256)
///     .with_parity(ParityMode::Even);
/// assert_eq!(config.ack_status, 0x30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Status byte acknowledging a successful command
    pub ack_status: u8,

    /// Status byte answered to the communication test
    pub test_comms_status: u8,

    /// Status byte closing a successful card read
    pub read_status: u8,

    /// Per-track capacity for card reads
    pub max_track_len: usize,

    /// Parity handling when raw tracks are decoded
    pub parity: ParityMode,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            ack_status: STATUS_OK,
            test_comms_status: STATUS_TEST_COMMS,
            read_status: STATUS_OK,
            max_track_len: DEFAULT_MAX_TRACK_LEN,
            parity: ParityMode::Ignore,
        }
    }
}

impl DeviceConfig {
    pub fn with_ack_status(mut self, status: u8) -> Self {
        self.ack_status = status;
        self
    }

    pub fn with_test_comms_status(mut self, status: u8) -> Self {
        self.test_comms_status = status;
        self
    }

    pub fn with_read_status(mut self, status: u8) -> Self {
        self.read_status = status;
        self
    }

    pub fn with_max_track_len(mut self, max_track_len: usize) -> Self {
        self.max_track_len = max_track_len;
        self
    }

    pub fn with_parity(mut self, parity: ParityMode) -> Self {
        self.parity = parity;
        self
    }
}
