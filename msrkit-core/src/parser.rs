//! Card data block parser
//!
//! Both card read commands answer with one data block carrying 0 to 3 track
//! sections in any order:
//!
//! ```text
//! ESC s  {ESC id content}*  ?  FS  ESC status
//! ```
//!
//! The leading `ESC` is checked by the caller like for every other response;
//! the parser starts at the `s` sync byte.
//!
//! In ISO mode a section's content runs up to and including the `?` end
//! sentinel. `ESC` is overloaded: between sections it starts a new section,
//! inside a section it means "no data on this track" and is followed by one
//! filler byte. In raw mode a section's content is a length byte followed by
//! exactly that many bytes, taken verbatim.
//!
//! # State Machine
//!
//! ```text
//! AwaitSync --s--> AwaitTrackOrEnd --ESC--> AwaitTrackId
//!                    ^      |                  |
//!                    |      | ?                +-(iso)-> InTrack --?--------------+
//!                    |      v                  |           +--ESC--> EmptyTrack --+
//!                    |  AwaitEndMarker         +-(raw)-> AwaitLength -> InRawTrack+
//!                    |      | FS                                                  |
//!                    |      v                                                     |
//!                    |  AwaitFinalEscape --ESC--> AwaitFinalStatus --ok--> Done   |
//!                    +------------------------------------------------------------+
//! ```
//!
//! # Usage
//!
//! ```
//! use msrkit_core::{ParseMode, Progress, TrackParser};
//! use msrkit_types::TrackNumber;
//!
//! let mut parser = TrackParser::new(ParseMode::Iso);
//! let response = [0x73, 0x1B, 0x02, b';', b'1', b'?', 0x3F, 0x1C, 0x1B, 0x30];
//!
//! for &byte in &response {
//!     if parser.feed(byte).unwrap() == Progress::Complete {
//!         break;
//!     }
//! }
//!
//! let tracks = parser.finish().unwrap();
//! assert_eq!(tracks.track(TrackNumber::Two).unwrap(), b";1?");
//! ```

use tracing::{debug, trace};

use msrkit_types::{TrackNumber, Tracks};

use crate::{
    constants::{DEFAULT_MAX_TRACK_LEN, END_MARKER, ESC, STATUS_OK, SYNC, TRACK_END},
    error::{Error, Result},
};

/// Track section encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Decoded characters terminated by `?`, `ESC` marks an empty track
    Iso,
    /// Length-prefixed bytes
    Raw,
}

/// Where the content of the current section goes
///
/// `None` is the discard sink for unknown track ids.
pub type Slot = Option<TrackNumber>;

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for the `s` sync byte
    AwaitSync,

    /// Between sections: `ESC` opens a section, anything else ends the loop
    AwaitTrackOrEnd,

    /// Waiting for the track id following a section `ESC`
    AwaitTrackId,

    /// Reading ISO section content
    InTrack { slot: Slot },

    /// `ESC` seen inside an ISO section; the next byte is filler
    EmptyTrack { slot: Slot },

    /// Waiting for the length byte of a raw section
    AwaitLength { slot: Slot },

    /// Reading raw section content
    InRawTrack { slot: Slot, remaining: u8 },

    /// Waiting for the FS end marker
    AwaitEndMarker,

    /// Waiting for the `ESC` before the final status
    AwaitFinalEscape,

    /// Waiting for the final status
    AwaitFinalStatus,

    /// Response complete
    Done,
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NeedMore,
    Complete,
}

/// Push parser for card data blocks
#[derive(Debug)]
pub struct TrackParser {
    mode: ParseMode,
    state: ParserState,
    success_status: u8,
    max_track_len: usize,
    current: Vec<u8>,
    tracks: Tracks<Vec<u8>>,
}

impl TrackParser {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            state: ParserState::AwaitSync,
            success_status: STATUS_OK,
            max_track_len: DEFAULT_MAX_TRACK_LEN,
            current: Vec::new(),
            tracks: Tracks::new(),
        }
    }

    /// Set the status byte that marks a successful read
    pub fn with_success_status(mut self, status: u8) -> Self {
        self.success_status = status;
        self
    }

    /// Set the per-track capacity
    pub fn with_max_track_len(mut self, max_track_len: usize) -> Self {
        self.max_track_len = max_track_len;
        self
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ParserState::Done
    }

    /// Consume one response byte
    ///
    /// On error the parser must be discarded; tracks closed so far are lost.
    pub fn feed(&mut self, byte: u8) -> Result<Progress> {
        let next = match self.state {
            ParserState::AwaitSync => {
                expect(byte, SYNC, "sync byte 0x73")?;
                ParserState::AwaitTrackOrEnd
            }

            ParserState::AwaitTrackOrEnd => {
                if byte == ESC {
                    ParserState::AwaitTrackId
                } else {
                    // Loop terminator: must be the block-closing '?'
                    expect(byte, TRACK_END, "track section or block end 0x3F")?;
                    ParserState::AwaitEndMarker
                }
            }

            ParserState::AwaitTrackId => {
                let slot = TrackNumber::try_from(byte).ok();
                if slot.is_none() {
                    debug!(track_id = byte, "Discarding section with unknown track id");
                }
                self.current.clear();
                match self.mode {
                    ParseMode::Iso => ParserState::InTrack { slot },
                    ParseMode::Raw => ParserState::AwaitLength { slot },
                }
            }

            ParserState::InTrack { slot } => {
                if byte == ESC {
                    ParserState::EmptyTrack { slot }
                } else {
                    self.push(slot, byte)?;
                    if byte == TRACK_END {
                        self.close_track(slot);
                        ParserState::AwaitTrackOrEnd
                    } else {
                        ParserState::InTrack { slot }
                    }
                }
            }

            ParserState::EmptyTrack { slot } => {
                trace!(filler = byte, "Empty track marker");
                self.close_track(slot);
                ParserState::AwaitTrackOrEnd
            }

            ParserState::AwaitLength { slot } => {
                if slot.is_some() && byte as usize > self.max_track_len {
                    return Err(self.too_small(slot));
                }
                if byte == 0 {
                    self.close_track(slot);
                    ParserState::AwaitTrackOrEnd
                } else {
                    ParserState::InRawTrack {
                        slot,
                        remaining: byte,
                    }
                }
            }

            ParserState::InRawTrack { slot, remaining } => {
                self.push(slot, byte)?;
                if remaining == 1 {
                    self.close_track(slot);
                    ParserState::AwaitTrackOrEnd
                } else {
                    ParserState::InRawTrack {
                        slot,
                        remaining: remaining - 1,
                    }
                }
            }

            ParserState::AwaitEndMarker => {
                expect(byte, END_MARKER, "end marker 0x1C")?;
                ParserState::AwaitFinalEscape
            }

            ParserState::AwaitFinalEscape => {
                expect(byte, ESC, "ESC before final status")?;
                ParserState::AwaitFinalStatus
            }

            ParserState::AwaitFinalStatus => {
                if byte != self.success_status {
                    return Err(Error::CommandFailed {
                        status: byte,
                        expected: self.success_status,
                    });
                }
                ParserState::Done
            }

            ParserState::Done => {
                return Err(Error::UnexpectedResponse {
                    expected: "end of response",
                    received: byte,
                });
            }
        };

        if next != self.state {
            trace!(from = ?self.state, to = ?next, byte = byte, "Parser transition");
        }
        self.state = next;

        Ok(if self.is_complete() {
            Progress::Complete
        } else {
            Progress::NeedMore
        })
    }

    /// Feed a whole buffer, stopping at completion
    ///
    /// Returns the number of bytes consumed.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Result<usize> {
        for (i, &byte) in bytes.iter().enumerate() {
            if self.feed(byte)? == Progress::Complete {
                return Ok(i + 1);
            }
        }
        Ok(bytes.len())
    }

    /// Take the parsed tracks
    ///
    /// A track is present iff its section appeared in the response.
    pub fn finish(self) -> Result<Tracks<Vec<u8>>> {
        if !self.is_complete() {
            return Err(Error::Incomplete { state: self.state });
        }
        Ok(self.tracks)
    }

    fn push(&mut self, slot: Slot, byte: u8) -> Result<()> {
        if slot.is_none() {
            return Ok(());
        }
        if self.current.len() >= self.max_track_len {
            return Err(self.too_small(slot));
        }
        self.current.push(byte);
        Ok(())
    }

    fn close_track(&mut self, slot: Slot) {
        let data = std::mem::take(&mut self.current);
        if let Some(track) = slot {
            debug!(track = u8::from(track), len = data.len(), "Track section closed");
            self.tracks.set(track, data);
        }
    }

    fn too_small(&self, slot: Slot) -> Error {
        Error::BufferTooSmall {
            track: slot.map(u8::from).unwrap_or(0),
            capacity: self.max_track_len,
        }
    }
}

fn expect(byte: u8, wanted: u8, expected: &'static str) -> Result<()> {
    if byte != wanted {
        return Err(Error::UnexpectedResponse {
            expected,
            received: byte,
        });
    }
    Ok(())
}
