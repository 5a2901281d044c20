//! Error types for chromakey-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal buffer layout details.

use thiserror::Error;

/// Chromakey core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Image dimensions whose buffer size cannot be represented
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel buffer length does not match the declared dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Coordinates outside the image
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for chromakey core operations
pub type Result<T> = std::result::Result<T, Error>;
