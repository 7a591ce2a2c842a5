//! Command frames and acknowledgements

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use msrkit_types::{RawCard, TrackNumber};

use crate::{
    command::Opcode,
    constants::{END_MARKER, ESC, MAX_RAW_TRACK_LEN, SYNC, TRACK_END},
    error::{Error, Result},
};

/// Command sent to the device
///
/// # Frame Structure
///
/// ```text
/// +---------+---------+--------------+
/// |   ESC   | Opcode  |  Parameters  |
/// |  0x1B   | 1 byte  |   N bytes    |
/// +---------+---------+--------------+
/// ```
///
/// # Examples
///
/// ```
/// use msrkit_core::{CommandFrame, Opcode};
///
/// let frame = CommandFrame::new(Opcode::Erase).with_params(vec![0x07u8]);
/// assert_eq!(&frame.encode()[..], &[0x1B, 0x63, 0x07]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CommandFrame {
    /// Command opcode
    pub opcode: Opcode,

    /// Parameter bytes (command-specific)
    pub params: Bytes,
}

impl CommandFrame {
    /// Create a frame without parameters
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            params: Bytes::new(),
        }
    }

    /// Attach parameter bytes
    pub fn with_params(mut self, params: impl Into<Bytes>) -> Self {
        self.params = params.into();
        self
    }

    /// Build the raw write command for a card
    ///
    /// All three track sections are always present; a missing track goes out
    /// with length zero.
    ///
    /// ```text
    /// ESC n  ESC s  [ESC id len data...]×3  ?  FS
    /// ```
    pub fn raw_write(card: &RawCard) -> Result<Self> {
        let mut params = BytesMut::with_capacity(2 + 3 * 3 + 2);
        params.put_u8(ESC);
        params.put_u8(SYNC);

        for track in TrackNumber::ALL {
            let data = card.track(track).map(|t| t.as_bytes()).unwrap_or(&[]);
            if data.len() > MAX_RAW_TRACK_LEN {
                return Err(Error::InvalidArgument(format!(
                    "{} is {} bytes long, at most {} can be written",
                    track,
                    data.len(),
                    MAX_RAW_TRACK_LEN
                )));
            }

            params.put_u8(ESC);
            params.put_u8(track.into());
            params.put_u8(data.len() as u8);
            params.put_slice(data);
        }

        params.put_u8(TRACK_END);
        params.put_u8(END_MARKER);

        Ok(Self::new(Opcode::WriteRaw).with_params(params.freeze()))
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());
        buf.put_u8(ESC);
        buf.put_u8(self.opcode.into());
        buf.put_slice(&self.params);

        trace!(
            opcode = %self.opcode,
            frame = %hex::encode(&buf),
            "Encoded command frame"
        );

        buf
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        2 + self.params.len()
    }
}

impl fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFrame")
            .field("opcode", &self.opcode)
            .field("params", &hex::encode(&self.params))
            .finish()
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command[{}](len={})", self.opcode, self.params.len())
    }
}

/// Two-byte acknowledgement: `ESC` followed by a status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub escape: u8,
    pub status: u8,
}

impl Ack {
    pub fn new(escape: u8, status: u8) -> Self {
        Self { escape, status }
    }

    /// Verify the leading byte of a response
    pub fn check_escape(byte: u8) -> Result<()> {
        if byte != ESC {
            return Err(Error::UnexpectedResponse {
                expected: "ESC",
                received: byte,
            });
        }
        Ok(())
    }

    /// Verify framing, then compare the status with the expected success code
    pub fn check(self, expected: u8) -> Result<()> {
        Self::check_escape(self.escape)?;
        if self.status != expected {
            return Err(Error::CommandFailed {
                status: self.status,
                expected,
            });
        }
        Ok(())
    }
}
