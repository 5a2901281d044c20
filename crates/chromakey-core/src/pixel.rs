//! Three-channel 8-bit pixel
//!
//! Channels are kept in Blue, Green, Red order everywhere in the workspace.
//! Color distances are computed per channel, so the order only has to be
//! consistent, but BGR matches the packed layout of [`Image`](crate::Image).

use std::fmt;

/// Number of bytes per packed pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// A B,G,R pixel with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    /// Blue channel
    pub b: u8,
    /// Green channel
    pub g: u8,
    /// Red channel
    pub r: u8,
}

impl Pixel {
    /// Black (0, 0, 0)
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    /// Create a pixel from channels in B, G, R order.
    #[inline]
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Pixel { b, g, r }
    }

    /// Create a pixel from channels in R, G, B order.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Pixel { b, g, r }
    }

    /// Create a pixel from a packed `[b, g, r]` slice.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` holds fewer than three values.
    #[inline]
    pub fn from_bgr_slice(bytes: &[u8]) -> Self {
        Pixel {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
        }
    }

    /// Channels in B, G, R order.
    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }

    /// Channels in R, G, B order.
    #[inline]
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Largest absolute per-channel difference to `other`.
    #[inline]
    pub fn max_channel_diff(self, other: Pixel) -> u8 {
        self.b
            .abs_diff(other.b)
            .max(self.g.abs_diff(other.g))
            .max(self.r.abs_diff(other.r))
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(bgr: [u8; 3]) -> Self {
        Pixel::new(bgr[0], bgr[1], bgr[2])
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(p: Pixel) -> Self {
        p.channels()
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.b, self.g, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order() {
        let p = Pixel::from_rgb(10, 20, 30);
        assert_eq!(p.channels(), [30, 20, 10]);
        assert_eq!(p.to_rgb(), (10, 20, 30));
        assert_eq!(Pixel::from([30, 20, 10]), p);
    }

    #[test]
    fn test_max_channel_diff() {
        let a = Pixel::new(0, 100, 255);
        let b = Pixel::new(32, 90, 200);
        assert_eq!(a.max_channel_diff(b), 55);
        assert_eq!(a.max_channel_diff(a), 0);
    }

    #[test]
    fn test_display_is_bgr_list() {
        assert_eq!(Pixel::new(32, 96, 224).to_string(), "[32, 96, 224]");
    }
}
