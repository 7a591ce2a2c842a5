//! Type definitions for msrkit

pub mod error;
pub mod settings;
pub mod track;

pub use error::{Error, Result};
pub use settings::{Bpi, Coercivity, LeadingZeros};
pub use track::{IsoCard, IsoTrack, RawCard, RawTrack, TrackNumber, TrackSet, Tracks};
