//! Scripted transport for driving the protocol without hardware
//!
//! [`MockTransport`] holds an ordered queue of request/response pairs.
//! Each `send` must match the next request exactly; its response then
//! becomes readable byte by byte. Running out of bytes reads as a timeout.
//!
//! ```
//! use msrkit_transport::{MockTransport, Transport};
//!
//! let mut mock = MockTransport::new();
//! mock.expect(&[0x1B, 0x65], &[0x1B, 0x79]);
//!
//! mock.purge().unwrap();
//! mock.send(&[0x1B, 0x65]).unwrap();
//! assert_eq!(mock.read_byte().unwrap(), 0x1B);
//! assert_eq!(mock.read_byte().unwrap(), 0x79);
//! assert!(mock.read_byte().unwrap_err().is_timeout());
//! ```

use std::collections::VecDeque;
use std::io;

use tracing::trace;

use crate::{Transport, error::*};

#[derive(Debug, Clone)]
struct Exchange {
    request: Vec<u8>,
    response: Vec<u8>,
}

/// In-memory [`Transport`] replaying pre-loaded exchanges
#[derive(Debug)]
pub struct MockTransport {
    exchanges: VecDeque<Exchange>,
    rx: VecDeque<u8>,
    sent: Vec<Vec<u8>>,
    purges: usize,
    open: bool,
}

impl MockTransport {
    /// Create an open mock with no exchanges queued
    pub fn new() -> Self {
        Self {
            exchanges: VecDeque::new(),
            rx: VecDeque::new(),
            sent: Vec::new(),
            purges: 0,
            open: true,
        }
    }

    /// Queue an exchange: when `request` is sent, `response` becomes readable
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.exchanges.push_back(Exchange {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Place bytes in the input queue right away
    ///
    /// Models line noise or a late answer that a purge should discard.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Every buffer passed to `send`, in order
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Exchanges not yet consumed
    pub fn remaining_expectations(&self) -> usize {
        self.exchanges.len()
    }

    /// Bytes still waiting to be read
    pub fn pending_bytes(&self) -> usize {
        self.rx.len()
    }

    /// Number of purges performed
    pub fn purge_count(&self) -> usize {
        self.purges
    }

    /// Force the open state
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open { Ok(()) } else { Err(Error::NotOpen) }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn purge(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.purges += 1;
        self.rx.clear();
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_open()?;

        trace!("Mock send: {}", hex::encode(data));
        self.sent.push(data.to_vec());

        let exchange = self.exchanges.pop_front().ok_or_else(|| {
            Error::WriteFailed(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no exchange queued for {}", hex::encode(data)),
            ))
        })?;

        if exchange.request != data {
            return Err(Error::WriteFailed(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "unexpected request: expected {}, got {}",
                    hex::encode(&exchange.request),
                    hex::encode(data)
                ),
            )));
        }

        self.rx.extend(exchange.response);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        self.ensure_open()?;

        self.rx.pop_front().ok_or_else(|| {
            Error::ReadFailed(io::Error::new(io::ErrorKind::TimedOut, "no data"))
        })
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.rx.clear();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn port_name(&self) -> String {
        "mock".to_string()
    }
}
