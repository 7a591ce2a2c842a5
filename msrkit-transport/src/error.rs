//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Port not open")]
    NotOpen,

    #[error("Port already open")]
    AlreadyOpen,

    #[error("Failed to open port {port}: {source}")]
    OpenFailed {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to configure port {port}: {source}")]
    SetupFailed {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to purge port buffers: {0}")]
    PurgeFailed(#[source] serialport::Error),

    #[error("Write failed: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("Read failed: {0}")]
    ReadFailed(#[source] io::Error),
}

impl Error {
    /// Check if the read gave up because no byte arrived in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadFailed(e) if e.kind() == io::ErrorKind::TimedOut)
    }
}
