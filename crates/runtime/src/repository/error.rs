//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("replay repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid replay id {0:?}")]
    InvalidId(String),

    #[error("replay format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("map digest mismatch: recorded {expected}, stored grid hashes to {actual}")]
    DigestMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
