//! Store error types.

use thiserror::Error;

/// Entity store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Key decoding error.
    #[error("invalid key format")]
    InvalidKey,

    /// Counter state in the meta tree is corrupt.
    #[error("invalid id counter state for {0}")]
    InvalidCounter(&'static str),
}
