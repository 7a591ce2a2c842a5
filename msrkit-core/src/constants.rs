//! Protocol constants

/// Escape byte: prefixes every command and response, separates track sections
pub const ESC: u8 = 0x1B;

/// Status byte for a successful command
pub const STATUS_OK: u8 = 0x30;

/// Status byte answered to the communication test command
pub const STATUS_TEST_COMMS: u8 = 0x79;

/// Start of a card data block
pub const SYNC: u8 = 0x73;

/// Track end sentinel, also closes the card data block
pub const TRACK_END: u8 = 0x3F;

/// End of a card data block (ASCII FS)
pub const END_MARKER: u8 = 0x1C;

/// Coercivity answers
pub const COERCIVITY_HIGH: u8 = b'H';
pub const COERCIVITY_LOW: u8 = b'L';

/// Largest raw track section (its length travels in one byte)
pub const MAX_RAW_TRACK_LEN: usize = u8::MAX as usize;

/// Default per-track capacity for card reads
pub const DEFAULT_MAX_TRACK_LEN: usize = 512;
