//! High-level error types

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Protocol error: {0}")]
    Core(#[from] msrkit_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] msrkit_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] msrkit_types::Error),
}

/// Coarse failure category, stable across the crate boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    PortOpenFailed,
    PortSetupFailed,
    PortWriteFailed,
    PortReadFailed,
    UnexpectedResponse,
    CommandFailed,
    BufferTooSmall,
    ParityError,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        use msrkit_core::Error as Core;
        use msrkit_transport::Error as Transport;

        match self {
            Self::Core(e) => match e {
                Core::InvalidArgument(_) => ErrorKind::InvalidArgument,
                Core::UnexpectedResponse { .. } | Core::Incomplete { .. } => {
                    ErrorKind::UnexpectedResponse
                }
                Core::CommandFailed { .. } => ErrorKind::CommandFailed,
                Core::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
                Core::Parity { .. } => ErrorKind::ParityError,
            },
            Self::Transport(e) => match e {
                Transport::NotOpen | Transport::AlreadyOpen | Transport::OpenFailed { .. } => {
                    ErrorKind::PortOpenFailed
                }
                Transport::SetupFailed { .. } | Transport::PurgeFailed(_) => {
                    ErrorKind::PortSetupFailed
                }
                Transport::WriteFailed(_) => ErrorKind::PortWriteFailed,
                Transport::ReadFailed(_) => ErrorKind::PortReadFailed,
            },
            Self::Types(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Check if repeating the whole operation might succeed
    ///
    /// True for framing errors, device-reported failures and failed reads
    /// (a swipe that never came, a garbled one).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_recoverable(),
            Self::Transport(e) => matches!(e, msrkit_transport::Error::ReadFailed(_)),
            Self::Types(_) => false,
        }
    }

    /// Check if the read gave up waiting for the device
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidArgument => "invalid argument",
            Self::PortOpenFailed => "port open failed",
            Self::PortSetupFailed => "port setup failed",
            Self::PortWriteFailed => "port write failed",
            Self::PortReadFailed => "port read failed",
            Self::UnexpectedResponse => "unexpected response",
            Self::CommandFailed => "command failed",
            Self::BufferTooSmall => "buffer too small",
            Self::ParityError => "parity error",
        };
        f.write_str(name)
    }
}
