//! # msrkit-core
//!
//! Core protocol implementation for MSRxxx magnetic stripe readers/writers.
//!
//! This crate provides the protocol primitives, with no I/O of its own:
//! - Command opcodes and frame encoding
//! - Acknowledgement validation
//! - The card data block parser
//! - Bit-level pack/unpack of parity characters
//! - ISO/IEC 7811 character set conversion

pub mod bits;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod iso7811;
pub mod parser;

pub use bits::{BitsPerChar, ParityMode};
pub use command::Opcode;
pub use error::{Error, Result};
pub use frame::{Ack, CommandFrame};
pub use parser::{ParseMode, ParserState, Progress, TrackParser};
