//! Serial port transport
//!
//! Every MSRxxx device seen so far talks 9600 baud, 8 data bits, no parity,
//! one stop bit, without flow control.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default read timeout
///
/// Card commands only answer after a swipe, so this is generous.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Serial transport for MSRxxx devices
pub struct SerialTransport {
    port_name: String,
    baud_rate: u32,
    read_timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Create new serial transport (not opened yet)
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            port: None,
        }
    }

    /// Set baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Open and configure the port
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }

        debug!("Opening {} at {} baud...", self.port_name, self.baud_rate);

        let mut port = serialport::new(self.port_name.as_str(), self.baud_rate)
            .timeout(self.read_timeout)
            .open()
            .map_err(|source| Error::OpenFailed {
                port: self.port_name.clone(),
                source,
            })?;

        self.configure(port.as_mut())?;

        debug!("Opened {}", self.port_name);

        self.port = Some(port);
        Ok(())
    }

    /// Apply 8N1 without flow control
    fn configure(&self, port: &mut dyn SerialPort) -> Result<()> {
        let setup = |source| Error::SetupFailed {
            port: self.port_name.clone(),
            source,
        };

        port.set_baud_rate(self.baud_rate).map_err(setup)?;
        port.set_data_bits(DataBits::Eight).map_err(setup)?;
        port.set_parity(Parity::None).map_err(setup)?;
        port.set_stop_bits(StopBits::One).map_err(setup)?;
        port.set_flow_control(FlowControl::None).map_err(setup)?;

        Ok(())
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(Error::NotOpen)
    }
}

impl Transport for SerialTransport {
    fn purge(&mut self) -> Result<()> {
        let port = self.port_mut()?;
        port.clear(ClearBuffer::All).map_err(Error::PurgeFailed)
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port_mut()?;

        trace!("Sending {} bytes: {}", data.len(), hex::encode(data));

        // write_all keeps going through partial writes and fails on a zero-length one
        port.write_all(data).map_err(Error::WriteFailed)?;
        port.flush().map_err(Error::WriteFailed)?;

        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let port = self.port_mut()?;

        let mut buf = [0u8; 1];
        port.read_exact(&mut buf).map_err(|e| {
            warn!("Read error: {}", e);
            Error::ReadFailed(e)
        })?;

        trace!("Received byte: {:02X}", buf[0]);

        Ok(buf[0])
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!("Closed {}", self.port_name);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn port_name(&self) -> String {
        self.port_name.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("Serial transport {} dropped while still open", self.port_name);
        }
    }
}
