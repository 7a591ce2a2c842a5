pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid track number: {0} (expected 1, 2 or 3)")]
    InvalidTrack(u8),

    #[error("Invalid recording density: {0} bpi (expected 75 or 210)")]
    InvalidDensity(u16),
}
