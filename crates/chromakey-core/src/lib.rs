//! Chromakey Core - Basic data structures for the chroma-key compositor
//!
//! This crate provides the fundamental data structures used throughout
//! the workspace:
//!
//! - [`Pixel`] - A three-channel 8-bit pixel in B, G, R order
//! - [`Image`] / [`ImageMut`] - The packed image container (immutable / mutable)
//! - [`PixelAccess`] - Read-only accessor implemented by every pixel source
//! - [`PixelFn`] - A pixel source backed by a coordinate mapping

pub mod error;
pub mod image;
pub mod pixel;

pub use error::{Error, Result};
pub use image::{Image, ImageMut, PixelAccess, PixelFn};
pub use pixel::{BYTES_PER_PIXEL, Pixel};
