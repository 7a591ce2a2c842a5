//! Transport layer for MSRxxx devices
//!
//! Provides blocking byte-level communication with the reader.

pub mod error;
pub mod mock;
pub mod serial;

pub use error::{Error, Result};
pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Byte transport to a device
///
/// All operations block. A read blocks until a byte arrives or the
/// transport's own timeout expires.
pub trait Transport: Send {
    /// Discard anything pending in the input and output queues
    fn purge(&mut self) -> Result<()>;

    /// Send raw bytes, returning only once all of them are written
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive exactly one byte
    fn read_byte(&mut self) -> Result<u8>;

    /// Receive exactly `buf.len()` bytes
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.read_byte()?;
        }
        Ok(())
    }

    /// Release the underlying port
    fn close(&mut self) -> Result<()>;

    /// Check if the port is open
    fn is_open(&self) -> bool;

    /// Port identifier, for logging
    fn port_name(&self) -> String;
}
