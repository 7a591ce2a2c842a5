//! # msrkit
//!
//! Host-side driver for MSRxxx (MSR206/MSR605 compatible) magnetic stripe
//! card readers/writers.
//!
//! ## Features
//!
//! - Blocking serial API, one command in flight per device
//! - ISO and raw card reads, raw card writes, erase
//! - Device settings: coercivity, density, bits per character, leading zeros
//! - Host-side ISO 7811 track encoding and decoding
//!
//! ## Quick Start
//!
//! ```no_run
//! use msrkit::{Device, TrackNumber};
//!
//! fn main() -> msrkit::Result<()> {
//!     let mut device = Device::open("/dev/ttyUSB0")?;
//!     device.reset()?;
//!     device.test_comms()?;
//!
//!     let card = device.read_iso()?;
//!     if let Some(track2) = card.track(TrackNumber::Two) {
//!         println!("Track 2: {}", track2);
//!     }
//!
//!     device.close()?;
//!     Ok(())
//! }
//! ```

pub mod card;
pub mod config;
pub mod device;
pub mod error;

// Re-exports
pub use config::DeviceConfig;
pub use device::Device;
pub use error::{Error, ErrorKind, Result};

// Re-export protocol and transport types
pub use msrkit_core::{BitsPerChar, ParityMode};
pub use msrkit_transport::{MockTransport, SerialTransport, Transport};
pub use msrkit_types::{
    Bpi, Coercivity, IsoCard, IsoTrack, LeadingZeros, RawCard, RawTrack, TrackNumber, TrackSet,
};
