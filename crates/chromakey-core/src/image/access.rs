//! Read-only pixel access
//!
//! The compositor never touches an image's storage directly; it reads
//! pixels through [`PixelAccess`]. Any representation that can answer
//! "what is the pixel at column `x`, row `y`" can be keyed, whether it is a
//! packed buffer or a coordinate mapping such as [`PixelFn`].

use super::{Image, ImageMut};
use crate::pixel::Pixel;

/// Read-only access to a rectangular grid of pixels.
///
/// `x` is the column, `y` the row. Implementations must return a pixel for
/// every `x < width()` and `y < height()`.
pub trait PixelAccess {
    /// Width in pixels (number of columns).
    fn width(&self) -> u32;

    /// Height in pixels (number of rows).
    fn height(&self) -> u32;

    /// Get the pixel at (x, y).
    ///
    /// May panic if the coordinates are out of bounds.
    fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel;

    /// Get the pixel at (x, y), or `None` if out of bounds.
    fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width() && y < self.height() {
            Some(self.pixel_unchecked(x, y))
        } else {
            None
        }
    }

    /// Check whether the grid has no pixels.
    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Total number of pixels.
    fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

impl PixelAccess for Image {
    #[inline]
    fn width(&self) -> u32 {
        Image::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        Image::height(self)
    }

    #[inline]
    fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        Image::pixel_unchecked(self, x, y)
    }
}

impl PixelAccess for ImageMut {
    #[inline]
    fn width(&self) -> u32 {
        ImageMut::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        ImageMut::height(self)
    }

    #[inline]
    fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        ImageMut::pixel_unchecked(self, x, y)
    }
}

impl<T: PixelAccess + ?Sized> PixelAccess for &T {
    #[inline]
    fn width(&self) -> u32 {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> u32 {
        (**self).height()
    }

    #[inline]
    fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        (**self).pixel_unchecked(x, y)
    }
}

/// A pixel grid defined by a coordinate mapping.
///
/// # Examples
///
/// ```
/// use chromakey_core::{Pixel, PixelAccess, PixelFn};
///
/// let checker = PixelFn::new(8, 8, |x, y| {
///     if (x + y) % 2 == 0 { Pixel::WHITE } else { Pixel::BLACK }
/// });
/// assert_eq!(checker.get_pixel(1, 0), Some(Pixel::BLACK));
/// assert_eq!(checker.get_pixel(8, 0), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PixelFn<F> {
    width: u32,
    height: u32,
    f: F,
}

impl<F> PixelFn<F>
where
    F: Fn(u32, u32) -> Pixel,
{
    /// Create a grid of `width` x `height` pixels produced by `f(x, y)`.
    pub fn new(width: u32, height: u32, f: F) -> Self {
        PixelFn { width, height, f }
    }
}

impl<F> PixelAccess for PixelFn<F>
where
    F: Fn(u32, u32) -> Pixel,
{
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        (self.f)(x, y)
    }
}
