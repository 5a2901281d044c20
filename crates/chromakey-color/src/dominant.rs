//! Dominant color selection
//!
//! Finds the most populated histogram cell and turns it into the key color.
//! The key color is the cell's geometric midpoint, not the mean of the
//! pixels that fell into it.

use crate::error::ColorResult;
use crate::histogram::{BinIndex, ColorHistogram3d, build_histogram};
use chromakey_core::{Pixel, PixelAccess};

/// The most populated cell of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominantBin {
    /// Cell index
    pub index: BinIndex,
    /// Number of pixels in the cell
    pub count: u64,
}

/// Find the cell with the largest count.
///
/// Cells are scanned with B outermost and R innermost, and a cell only
/// replaces the current best when its count is strictly greater, so ties go
/// to the first cell in that order. An all-zero histogram yields bin
/// `(0, 0, 0)` with count 0.
pub fn argmax_3d(hist: &ColorHistogram3d) -> DominantBin {
    let n = hist.bucket_count();
    let counts = hist.counts();
    let mut best = DominantBin {
        index: BinIndex::default(),
        count: 0,
    };

    let mut idx = 0usize;
    for b in 0..n {
        for g in 0..n {
            for r in 0..n {
                let v = counts[idx];
                if v > best.count {
                    best = DominantBin {
                        index: BinIndex::new(b, g, r),
                        count: v,
                    };
                }
                idx += 1;
            }
        }
    }

    best
}

/// Midpoint color of a cell: `index * width + width / 2` per channel.
///
/// For any index inside a valid histogram the result is at most 255;
/// larger values saturate.
pub fn bin_center(index: BinIndex, bucket_width: u32) -> Pixel {
    let center = |i: u32| {
        i.saturating_mul(bucket_width)
            .saturating_add(bucket_width / 2)
            .min(255) as u8
    };
    Pixel::new(center(index.b), center(index.g), center(index.r))
}

/// The key color chosen for a foreground image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySelection {
    /// Most populated cell
    pub bin: BinIndex,
    /// Pixels in that cell
    pub count: u64,
    /// Midpoint color of the cell
    pub color: Pixel,
}

impl KeySelection {
    /// Select the key color from an existing histogram.
    pub fn from_histogram(hist: &ColorHistogram3d) -> Self {
        let DominantBin { index, count } = argmax_3d(hist);
        KeySelection {
            bin: index,
            count,
            color: bin_center(index, hist.bucket_width()),
        }
    }
}

/// Build the histogram of `image` and select its key color.
///
/// # Errors
///
/// Returns [`ColorError::InvalidBucketCount`](crate::ColorError::InvalidBucketCount)
/// unless `1 <= bucket_count <= 256`.
pub fn select_key_color<P: PixelAccess + ?Sized>(
    image: &P,
    bucket_count: u32,
) -> ColorResult<KeySelection> {
    let hist = build_histogram(image, bucket_count)?;
    Ok(KeySelection::from_histogram(&hist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::BucketSpec;
    use chromakey_core::Image;

    #[test]
    fn test_argmax_all_zero() {
        let hist = ColorHistogram3d::new(BucketSpec::new(4).unwrap());
        let best = argmax_3d(&hist);
        assert_eq!(best.index, BinIndex::new(0, 0, 0));
        assert_eq!(best.count, 0);
    }

    #[test]
    fn test_argmax_picks_largest() {
        let mut hist = ColorHistogram3d::new(BucketSpec::new(4).unwrap());
        for _ in 0..3 {
            hist.add_pixel(Pixel::new(10, 200, 10));
        }
        hist.add_pixel(Pixel::WHITE);
        let best = argmax_3d(&hist);
        assert_eq!(best.index, BinIndex::new(0, 3, 0));
        assert_eq!(best.count, 3);
    }

    #[test]
    fn test_argmax_tie_goes_to_first_in_scan_order() {
        let mut hist = ColorHistogram3d::new(BucketSpec::new(4).unwrap());
        // (2,0,0) comes after (0,3,3) and (1,0,0) in B-major order
        hist.add_pixel(Pixel::new(130, 0, 0));
        hist.add_pixel(Pixel::new(0, 200, 200));
        hist.add_pixel(Pixel::new(70, 0, 0));
        let best = argmax_3d(&hist);
        assert_eq!(best.index, BinIndex::new(0, 3, 3));
        assert_eq!(best.count, 1);
    }

    #[test]
    fn test_argmax_deterministic() {
        let image = Image::from_fn(9, 9, |x, y| Pixel::new(x as u8 * 28, y as u8 * 28, 0));
        let hist = build_histogram(&image.unwrap(), 4).unwrap();
        let first = argmax_3d(&hist);
        for _ in 0..5 {
            assert_eq!(argmax_3d(&hist), first);
        }
    }

    #[test]
    fn test_bin_center() {
        let center = |b, g, r, width| bin_center(BinIndex::new(b, g, r), width);
        assert_eq!(center(0, 0, 0, 64), Pixel::new(32, 32, 32));
        assert_eq!(center(3, 1, 2, 64), Pixel::new(224, 96, 160));
        assert_eq!(center(0, 0, 0, 256), Pixel::new(128, 128, 128));
        assert_eq!(center(255, 0, 1, 1), Pixel::new(255, 0, 1));
        // Inexact width: last bucket of 3 centers at 2 * 85 + 42
        assert_eq!(center(2, 2, 2, 85), Pixel::new(212, 212, 212));
    }

    #[test]
    fn test_select_key_color_black_image() {
        let image = Image::new(4, 4).unwrap();
        let key = select_key_color(&image, 4).unwrap();
        assert_eq!(key.bin, BinIndex::new(0, 0, 0));
        assert_eq!(key.count, 16);
        assert_eq!(key.color, Pixel::new(32, 32, 32));
    }

    #[test]
    fn test_select_key_color_empty_image() {
        let key = select_key_color(&Image::empty(), 4).unwrap();
        assert_eq!(key.bin, BinIndex::new(0, 0, 0));
        assert_eq!(key.count, 0);
        assert_eq!(key.color, Pixel::new(32, 32, 32));
    }
}
