//! Error types for chromakey-color

use thiserror::Error;

/// Errors that can occur during keying operations
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] chromakey_core::Error),

    /// Bucket count outside 1..=256
    #[error("invalid bucket count: {0} (expected 1..=256)")]
    InvalidBucketCount(u32),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for keying operations
pub type ColorResult<T> = Result<T, ColorError>;
