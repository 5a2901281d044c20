//! chromakey-color - Dominant-color chroma keying
//!
//! This crate finds the most common color of a foreground image and swaps
//! every pixel close to it for a background pixel:
//!
//! - **Histogram** ([`histogram`]): coarse `count^3` color histogram, sequential or rayon
//! - **Key selection** ([`dominant`]): most populated bin and its midpoint color
//! - **Replacement** ([`replace`]): per-channel tolerance test with a tiled background
//! - **Session** ([`session`]): key color computed once, re-composited per tolerance
//! - **Options** ([`options`]): bucket count, parallelism, tolerance range

pub mod dominant;
pub mod error;
pub mod histogram;
pub mod options;
pub mod replace;
pub mod session;

// Re-export core types
pub use chromakey_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export histogram types and functions
pub use histogram::{
    // Types
    BinIndex,
    BucketSpec,
    ColorHistogram3d,
    MAX_BUCKET_COUNT,
    // Functions
    build_histogram,
    build_histogram_par,
};

// Re-export key selection
pub use dominant::{DominantBin, KeySelection, argmax_3d, bin_center, select_key_color};

// Re-export replacement functions
pub use replace::{
    chroma_replace, chroma_replace_into, chroma_replace_par, count_keyed, is_close, tile_coord,
};

// Re-export configuration and session
pub use options::{ChromaKeyOptions, DEFAULT_BUCKET_COUNT, ToleranceRange};
pub use session::{ChromaKeySession, KeyReport};
