//! Error types for retune-core.

use thiserror::Error;

/// Error type for retune-core operations.
///
/// Construction and configuration validation report errors through this
/// enum. The processing path never unwinds: per-block failures are reported
/// in-band through [`crate::ProcessingResult`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid buffer size: {0}. Must be a positive number of samples")]
    InvalidBufferSize(usize),

    #[error("Invalid channel count: {0}. At least one channel is required")]
    InvalidChannelCount(usize),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
