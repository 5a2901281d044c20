//! Image - The packed B,G,R image container
//!
//! `Image` is the buffer type handed to and returned from the compositor.
//!
//! # Pixel layout
//!
//! - Row-major, no row padding
//! - 3 bytes per pixel in B, G, R order
//! - A zero width or height is a valid, empty image
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `ImageMut` via [`Image::try_into_mut`]
//! or [`Image::to_mut`], then convert back with `Into<Image>`.

mod access;

pub use access::{PixelAccess, PixelFn};

use crate::error::{Error, Result};
use crate::pixel::{BYTES_PER_PIXEL, Pixel};
use std::sync::Arc;

/// Internal image data
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Packed B,G,R bytes, `width * height * 3` long
    data: Vec<u8>,
}

impl ImageData {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    #[inline]
    fn row_range(&self, y: u32) -> std::ops::Range<usize> {
        let stride = self.width as usize * BYTES_PER_PIXEL;
        let start = y as usize * stride;
        start..start + stride
    }
}

/// Compute the packed byte length for the given dimensions.
///
/// # Errors
///
/// Returns [`Error::InvalidDimension`] if the size overflows `usize`.
fn buffer_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(Error::InvalidDimension { width, height })
}

/// Packed three-channel image
///
/// # Examples
///
/// ```
/// use chromakey_core::{Image, Pixel};
///
/// let image = Image::new(4, 3).unwrap();
/// assert_eq!(image.width(), 4);
/// assert_eq!(image.height(), 3);
/// assert_eq!(image.get_pixel(0, 0), Some(Pixel::BLACK));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl Image {
    /// Create a new all-black image.
    ///
    /// Zero dimensions produce an empty image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the buffer size overflows.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Ok(Image {
            inner: Arc::new(ImageData {
                width,
                height,
                data: vec![0u8; len],
            }),
        })
    }

    /// Create an empty (0x0) image.
    pub fn empty() -> Self {
        Image {
            inner: Arc::new(ImageData {
                width: 0,
                height: 0,
                data: Vec::new(),
            }),
        }
    }

    /// Wrap an existing packed B,G,R buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 3`.
    pub fn from_bgr_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Image {
            inner: Arc::new(ImageData {
                width,
                height,
                data,
            }),
        })
    }

    /// Build an image from a packed R,G,B buffer, swapping to B,G,R storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 3`.
    pub fn from_rgb_bytes(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        let mut bgr = data.to_vec();
        for px in bgr.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.swap(0, 2);
        }
        Self::from_bgr_bytes(width, height, bgr)
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the buffer size overflows.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        let mut data = Vec::with_capacity(buffer_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).channels());
            }
        }
        Self::from_bgr_bytes(width, height, data)
    }

    /// Copy any [`PixelAccess`] source into a packed image.
    pub fn from_access<P: PixelAccess + ?Sized>(src: &P) -> Result<Self> {
        Self::from_fn(src.width(), src.height(), |x, y| src.pixel_unchecked(x, y))
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Check whether the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.width == 0 || self.inner.height == 0
    }

    /// Get the packed B,G,R data.
    #[inline]
    pub fn as_bgr_bytes(&self) -> &[u8] {
        &self.inner.data
    }

    /// Copy the data out as packed R,G,B bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = self.inner.data.clone();
        for px in rgb.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.swap(0, 2);
        }
        rgb
    }

    /// Get the packed bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_bytes(&self, y: u32) -> &[u8] {
        &self.inner.data[self.inner.row_range(y)]
    }

    /// Get a pixel at (x, y), or `None` if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.pixel_unchecked(x, y))
    }

    /// Get a pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        let off = self.inner.offset(x, y);
        Pixel::from_bgr_slice(&self.inner.data[off..off + BYTES_PER_PIXEL])
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.inner
            .data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(Pixel::from_bgr_slice)
    }

    /// Get the number of strong references to this image.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to convert into a mutable image without copying.
    ///
    /// Succeeds only if this is the sole reference; otherwise returns
    /// the original image unchanged.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(ImageMut { inner: data }),
            Err(arc) => Err(Image { inner: arc }),
        }
    }

    /// Create a mutable copy of this image.
    ///
    /// Always copies the pixel data.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: (*self.inner).clone(),
        }
    }
}

impl Default for Image {
    fn default() -> Self {
        Image::empty()
    }
}

/// Mutable image
///
/// Allows modification of pixel data. Convert back to an immutable
/// [`Image`] with `Into<Image>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Create a new all-black mutable image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Ok(ImageMut {
            inner: ImageData {
                width,
                height,
                data: vec![0u8; len],
            },
        })
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Check whether the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.width == 0 || self.inner.height == 0
    }

    /// Get the packed B,G,R data.
    #[inline]
    pub fn as_bgr_bytes(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the packed B,G,R data.
    #[inline]
    pub fn as_bgr_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get the packed bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_bytes(&self, y: u32) -> &[u8] {
        &self.inner.data[self.inner.row_range(y)]
    }

    /// Get mutable access to row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_bytes_mut(&mut self, y: u32) -> &mut [u8] {
        let range = self.inner.row_range(y);
        &mut self.inner.data[range]
    }

    /// Get a pixel at (x, y), or `None` if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.pixel_unchecked(x, y))
    }

    /// Get a pixel without bounds checking.
    #[inline]
    pub fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        let off = self.inner.offset(x, y);
        Pixel::from_bgr_slice(&self.inner.data[off..off + BYTES_PER_PIXEL])
    }

    /// Set a pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.inner.width,
                height: self.inner.height,
            });
        }
        self.set_pixel_unchecked(x, y, pixel);
        Ok(())
    }

    /// Set a pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, pixel: Pixel) {
        let off = self.inner.offset(x, y);
        self.inner.data[off..off + BYTES_PER_PIXEL].copy_from_slice(&pixel.channels());
    }

    /// Set every pixel to `pixel`.
    pub fn fill(&mut self, pixel: Pixel) {
        let bgr = pixel.channels();
        for px in self.inner.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&bgr);
        }
    }
}

impl From<ImageMut> for Image {
    fn from(image_mut: ImageMut) -> Self {
        Image {
            inner: Arc::new(image_mut.inner),
        }
    }
}
