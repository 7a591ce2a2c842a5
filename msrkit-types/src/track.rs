//! Track identifiers and card contents

use std::fmt;

use bitflags::bitflags;
use bytes::Bytes;

use crate::error::{Error, Result};

/// Magnetic stripe track number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TrackNumber {
    One = 1,
    Two = 2,
    Three = 3,
}

impl TrackNumber {
    /// All tracks, in stripe order
    pub const ALL: [TrackNumber; 3] = [Self::One, Self::Two, Self::Three];

    /// Zero-based slot index
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl From<TrackNumber> for u8 {
    fn from(track: TrackNumber) -> u8 {
        track as u8
    }
}

impl TryFrom<u8> for TrackNumber {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(Error::InvalidTrack(value)),
        }
    }
}

impl fmt::Display for TrackNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", *self as u8)
    }
}

bitflags! {
    /// Set of tracks, encoded the way the erase command expects its mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrackSet: u8 {
        const TRACK1 = 0x01;
        const TRACK2 = 0x02;
        const TRACK3 = 0x04;
    }
}

impl TrackSet {
    /// Build a set from per-track flags
    pub fn from_flags(track1: bool, track2: bool, track3: bool) -> Self {
        let mut set = Self::empty();
        set.set(Self::TRACK1, track1);
        set.set(Self::TRACK2, track2);
        set.set(Self::TRACK3, track3);
        set
    }

    /// Check whether a single track is part of the set
    pub fn contains_track(self, track: TrackNumber) -> bool {
        self.contains(Self::from(track))
    }
}

impl From<TrackNumber> for TrackSet {
    fn from(track: TrackNumber) -> Self {
        match track {
            TrackNumber::One => Self::TRACK1,
            TrackNumber::Two => Self::TRACK2,
            TrackNumber::Three => Self::TRACK3,
        }
    }
}

/// Decoded (ASCII) track content as reported by the ISO read command
///
/// The device's end sentinel (`?`) is kept as the last character when the
/// track carried data. An empty track has no content at all.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IsoTrack {
    data: Vec<u8>,
}

impl IsoTrack {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Content as text, if the device sent valid UTF-8 (it normally sends ASCII)
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy of the content followed by a NUL byte, for C-style consumers
    pub fn to_nul_terminated(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.extend_from_slice(&self.data);
        out.push(0);
        out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for IsoTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IsoTrack({:?})", String::from_utf8_lossy(&self.data))
    }
}

impl fmt::Display for IsoTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

impl From<&str> for IsoTrack {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

/// Raw track content: bit-packed characters with parity
///
/// Raw reads return characters LSB first; the raw write command takes them
/// MSB first. The LRC character and trailing zero bits are part of the data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrack {
    data: Bytes,
}

impl RawTrack {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Per-track contents of a card
///
/// A slot is `Some` when the device reported a section for that track,
/// even if the section was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracks<T> {
    slots: [Option<T>; 3],
}

/// Card read through the ISO (decoded) read command
pub type IsoCard = Tracks<IsoTrack>;

/// Card read or written through the raw commands
pub type RawCard = Tracks<RawTrack>;

impl<T> Tracks<T> {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    pub fn with_track(mut self, track: TrackNumber, data: impl Into<T>) -> Self {
        self.set(track, data.into());
        self
    }

    pub fn track(&self, track: TrackNumber) -> Option<&T> {
        self.slots[track.index()].as_ref()
    }

    pub fn set(&mut self, track: TrackNumber, data: T) {
        self.slots[track.index()] = Some(data);
    }

    pub fn take(&mut self, track: TrackNumber) -> Option<T> {
        self.slots[track.index()].take()
    }

    /// Present tracks in stripe order
    pub fn iter(&self) -> impl Iterator<Item = (TrackNumber, &T)> {
        TrackNumber::ALL
            .into_iter()
            .filter_map(|n| self.track(n).map(|t| (n, t)))
    }

    /// Number of tracks present
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Convert every present track, keeping absent ones absent
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Tracks<U> {
        let [t1, t2, t3] = self.slots;
        Tracks {
            slots: [t1.map(&mut f), t2.map(&mut f), t3.map(&mut f)],
        }
    }
}

impl<T> Default for Tracks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl IsoCard {
    /// True when no present track carries data
    pub fn is_blank(&self) -> bool {
        self.iter().all(|(_, t)| t.is_empty())
    }
}

impl RawCard {
    /// True when no present track carries data
    pub fn is_blank(&self) -> bool {
        self.iter().all(|(_, t)| t.is_empty())
    }
}

impl From<&[u8]> for RawTrack {
    fn from(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }
}

impl From<Vec<u8>> for RawTrack {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
