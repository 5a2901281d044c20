//! chromakey - Dominant-color chroma keying
//!
//! Finds the most common color of a foreground image with a coarse 3D
//! histogram and replaces every pixel within a per-channel tolerance of it
//! by the pixel of a (tiled) background image.
//!
//! # Overview
//!
//! - Image container and pixel access ([`Image`], [`PixelAccess`])
//! - Image I/O ([`io`]): PNG, JPEG, binary PPM/PGM
//! - Histogram, key selection and replacement ([`color`])
//!
//! # Example
//!
//! ```
//! use chromakey::color::{ChromaKeyOptions, ChromaKeySession};
//! use chromakey::{Image, Pixel};
//!
//! // A black 4x4 foreground keys completely at the initial tolerance
//! let fg = Image::new(4, 4).unwrap();
//! let bg = Image::from_fn(2, 2, |_, _| Pixel::WHITE).unwrap();
//! let session = ChromaKeySession::new(fg, bg, ChromaKeyOptions::default()).unwrap();
//! let out = session.set_tolerance(session.tolerance_range().initial).unwrap();
//! assert!(out.pixels().all(|p| p == Pixel::WHITE));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use chromakey_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use chromakey_color as color;
pub use chromakey_io as io;
