//! Error types for msrkit-core

use crate::parser::ParserState;

/// Result type alias for msrkit protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller passed a value outside the allowed domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Response bytes do not follow the protocol framing
    #[error("Unexpected response: expected {expected}, received 0x{received:02X}")]
    UnexpectedResponse {
        expected: &'static str,
        received: u8,
    },

    /// Device reported that the command failed
    #[error("Command failed: device status 0x{status:02X} (expected 0x{expected:02X})")]
    CommandFailed {
        status: u8,
        expected: u8,
    },

    /// A track did not fit in the configured capacity
    #[error("Track {track} exceeds buffer capacity of {capacity} bytes")]
    BufferTooSmall {
        track: u8,
        capacity: usize,
    },

    /// Character failed the parity check
    #[error("Parity error at position {position} (byte 0x{byte:02X})")]
    Parity {
        position: usize,
        byte: u8,
    },

    /// Response ended before the parser reached its final state
    #[error("Incomplete response: parser stopped in state {state:?}")]
    Incomplete {
        state: ParserState,
    },
}

impl Error {
    /// Check if error is recoverable (repeating the whole operation might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedResponse { .. }
                | Self::CommandFailed { .. }
                | Self::Parity { .. }
                | Self::Incomplete { .. }
        )
    }

    /// Check if error indicates the byte stream is out of step with the device
    pub fn is_desync(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedResponse { .. } | Self::Incomplete { .. }
        )
    }
}

impl From<msrkit_types::Error> for Error {
    fn from(err: msrkit_types::Error) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
