//! Coarse 3D color histogram
//!
//! Each channel of a B,G,R pixel is quantized into `count` buckets of
//! `256 / count` values, and the pixel is counted in the cell
//! `[bin_b][bin_g][bin_r]` of a `count^3` histogram.
//!
//! # Bucket width policy
//!
//! The bucket width is `256 / count` with integer division. When 256 is not
//! a multiple of `count` the width is truncated; channel values past
//! `count * width` would map to bin `count`, so every bin index is clamped
//! to `count - 1` and the last bucket absorbs the remainder. With
//! `count = 3` the width is 85 and channel 255 lands in bin 2.

use crate::error::{ColorError, ColorResult};
use chromakey_core::{Pixel, PixelAccess};
use rayon::prelude::*;
use std::fmt;

/// Largest supported number of buckets per channel.
pub const MAX_BUCKET_COUNT: u32 = 256;

/// Index of a histogram cell, one bucket number per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BinIndex {
    /// Blue bucket
    pub b: u32,
    /// Green bucket
    pub g: u32,
    /// Red bucket
    pub r: u32,
}

impl BinIndex {
    /// Create a bin index from bucket numbers in B, G, R order.
    pub const fn new(b: u32, g: u32, r: u32) -> Self {
        BinIndex { b, g, r }
    }
}

impl fmt::Display for BinIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.b, self.g, self.r)
    }
}

/// Validated quantization parameters: bucket count and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketSpec {
    count: u32,
    width: u32,
}

impl BucketSpec {
    /// Create a bucket spec for `count` buckets per channel.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidBucketCount`] unless `1 <= count <= 256`.
    pub fn new(count: u32) -> ColorResult<Self> {
        if count == 0 || count > MAX_BUCKET_COUNT {
            return Err(ColorError::InvalidBucketCount(count));
        }
        Ok(BucketSpec {
            count,
            width: 256 / count,
        })
    }

    /// Buckets per channel.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Channel values per bucket (`256 / count`, truncated).
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Whether `count` divides 256 evenly.
    #[inline]
    pub fn is_exact(&self) -> bool {
        256 % self.count == 0
    }

    /// Number of histogram cells (`count^3`).
    #[inline]
    pub fn cells(&self) -> usize {
        let n = self.count as usize;
        n * n * n
    }

    /// Bucket of a single channel value, clamped to `count - 1`.
    #[inline]
    pub fn bin_of(&self, channel: u8) -> u32 {
        (u32::from(channel) / self.width).min(self.count - 1)
    }

    /// Bin of a pixel.
    #[inline]
    pub fn bin_of_pixel(&self, pixel: Pixel) -> BinIndex {
        BinIndex {
            b: self.bin_of(pixel.b),
            g: self.bin_of(pixel.g),
            r: self.bin_of(pixel.r),
        }
    }

    /// Flat cell offset of a bin; B is the slowest axis, R the fastest.
    #[inline]
    fn flat_index(&self, bin: BinIndex) -> usize {
        let n = self.count as usize;
        (bin.b as usize * n + bin.g as usize) * n + bin.r as usize
    }

    #[inline]
    fn bin_from_flat(&self, idx: usize) -> BinIndex {
        let n = self.count as usize;
        BinIndex {
            b: (idx / (n * n)) as u32,
            g: ((idx / n) % n) as u32,
            r: (idx % n) as u32,
        }
    }

    fn contains(&self, bin: BinIndex) -> bool {
        bin.b < self.count && bin.g < self.count && bin.r < self.count
    }
}

/// Occupancy counts over the `count^3` color cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistogram3d {
    spec: BucketSpec,
    counts: Vec<u64>,
}

impl ColorHistogram3d {
    /// Create an all-zero histogram.
    pub fn new(spec: BucketSpec) -> Self {
        ColorHistogram3d {
            spec,
            counts: vec![0; spec.cells()],
        }
    }

    /// The quantization parameters.
    #[inline]
    pub fn spec(&self) -> BucketSpec {
        self.spec
    }

    /// Buckets per channel.
    #[inline]
    pub fn bucket_count(&self) -> u32 {
        self.spec.count
    }

    /// Channel values per bucket.
    #[inline]
    pub fn bucket_width(&self) -> u32 {
        self.spec.width
    }

    /// Raw counts in scan order (B outer, G middle, R inner).
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Count of one cell.
    ///
    /// # Panics
    ///
    /// Panics if any axis of `bin` is `>= bucket_count()`.
    pub fn get(&self, bin: BinIndex) -> u64 {
        assert!(
            self.spec.contains(bin),
            "bin {bin} outside {} buckets",
            self.spec.count
        );
        self.counts[self.spec.flat_index(bin)]
    }

    /// Count one pixel.
    #[inline]
    pub fn add_pixel(&mut self, pixel: Pixel) {
        let idx = self.spec.flat_index(self.spec.bin_of_pixel(pixel));
        self.counts[idx] += 1;
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Non-zero cells in scan order.
    pub fn occupied(&self) -> impl Iterator<Item = (BinIndex, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (self.spec.bin_from_flat(i), c))
    }

    /// Add another histogram's counts into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] if the bucket counts differ.
    pub fn merge(&mut self, other: &ColorHistogram3d) -> ColorResult<()> {
        if self.spec != other.spec {
            return Err(ColorError::InvalidParameters(format!(
                "cannot merge histograms with {} and {} buckets",
                self.spec.count, other.spec.count
            )));
        }
        self.add_counts(other);
        Ok(())
    }

    fn add_counts(&mut self, other: &ColorHistogram3d) {
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
    }

    fn add_rows<P: PixelAccess + ?Sized>(&mut self, image: &P, rows: std::ops::Range<u32>) {
        let width = image.width();
        for y in rows {
            for x in 0..width {
                self.add_pixel(image.pixel_unchecked(x, y));
            }
        }
    }
}

/// Build the 3D color histogram of an image.
///
/// Every pixel is counted exactly once, so `total()` equals the pixel
/// count. An empty image yields an all-zero histogram.
///
/// # Errors
///
/// Returns [`ColorError::InvalidBucketCount`] unless `1 <= bucket_count <= 256`.
///
/// # Example
///
/// ```
/// use chromakey_color::{BinIndex, build_histogram};
/// use chromakey_core::Image;
///
/// let black = Image::new(4, 4).unwrap();
/// let hist = build_histogram(&black, 4).unwrap();
/// assert_eq!(hist.get(BinIndex::new(0, 0, 0)), 16);
/// assert_eq!(hist.total(), 16);
/// ```
pub fn build_histogram<P: PixelAccess + ?Sized>(
    image: &P,
    bucket_count: u32,
) -> ColorResult<ColorHistogram3d> {
    let spec = BucketSpec::new(bucket_count)?;
    let mut hist = ColorHistogram3d::new(spec);
    if !image.is_empty() {
        hist.add_rows(image, 0..image.height());
    }
    Ok(hist)
}

/// Rows per parallel partition.
///
/// Each partition owns a full local histogram, so partitions are kept
/// large relative to the cell count and limited to the thread count.
fn rows_per_partition(width: u32, height: u32, cells: usize) -> u32 {
    let pixels = width as usize * height as usize;
    let chunk = pixels.div_ceil(rayon::current_num_threads()).max(cells * 4);
    chunk.div_ceil(width as usize).clamp(1, height as usize) as u32
}

/// Build the 3D color histogram with rayon over row partitions.
///
/// Each partition fills a local histogram; the partial histograms are
/// summed at the end, so the result is identical to [`build_histogram`].
pub fn build_histogram_par<P: PixelAccess + Sync + ?Sized>(
    image: &P,
    bucket_count: u32,
) -> ColorResult<ColorHistogram3d> {
    let spec = BucketSpec::new(bucket_count)?;
    if image.is_empty() {
        return Ok(ColorHistogram3d::new(spec));
    }

    let height = image.height();
    let rows = rows_per_partition(image.width(), height, spec.cells());
    let starts: Vec<u32> = (0..height).step_by(rows as usize).collect();
    log::trace!(
        "histogram: {} partitions of {} rows, {} buckets",
        starts.len(),
        rows,
        spec.count
    );

    let hist = starts
        .into_par_iter()
        .map(|y0| {
            let mut local = ColorHistogram3d::new(spec);
            local.add_rows(image, y0..(y0 + rows).min(height));
            local
        })
        .reduce_with(|mut a, b| {
            a.add_counts(&b);
            a
        })
        .unwrap_or_else(|| ColorHistogram3d::new(spec));
    Ok(hist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromakey_core::{Image, PixelFn};

    #[test]
    fn test_bucket_spec_validation() {
        assert!(matches!(
            BucketSpec::new(0),
            Err(ColorError::InvalidBucketCount(0))
        ));
        assert!(matches!(
            BucketSpec::new(257),
            Err(ColorError::InvalidBucketCount(257))
        ));
        assert_eq!(BucketSpec::new(1).unwrap().width(), 256);
        assert_eq!(BucketSpec::new(4).unwrap().width(), 64);
        assert_eq!(BucketSpec::new(256).unwrap().width(), 1);
    }

    #[test]
    fn test_bin_of_boundaries() {
        let spec = BucketSpec::new(4).unwrap();
        assert_eq!(spec.bin_of(0), 0);
        assert_eq!(spec.bin_of(63), 0);
        assert_eq!(spec.bin_of(64), 1);
        assert_eq!(spec.bin_of(191), 2);
        assert_eq!(spec.bin_of(192), 3);
        assert_eq!(spec.bin_of(255), 3);
    }

    #[test]
    fn test_inexact_width_clamps_last_bucket() {
        let spec = BucketSpec::new(3).unwrap();
        assert!(!spec.is_exact());
        assert_eq!(spec.width(), 85);
        assert_eq!(spec.bin_of(254), 2);
        // 255 / 85 == 3, clamped into the last bucket
        assert_eq!(spec.bin_of(255), 2);

        let spec = BucketSpec::new(5).unwrap();
        assert_eq!(spec.width(), 51);
        assert_eq!(spec.bin_of(255), 4);
    }

    #[test]
    fn test_flat_index_roundtrip() {
        let spec = BucketSpec::new(4).unwrap();
        let bin = BinIndex::new(1, 2, 3);
        let idx = spec.flat_index(bin);
        assert_eq!(idx, (4 + 2) * 4 + 3);
        assert_eq!(spec.bin_from_flat(idx), bin);
    }

    #[test]
    fn test_build_counts_every_pixel() {
        let image = Image::from_fn(10, 7, |x, y| {
            Pixel::new((x * 25) as u8, (y * 36) as u8, (x * y) as u8)
        })
        .unwrap();
        let hist = build_histogram(&image, 4).unwrap();
        assert_eq!(hist.total(), 70);
        for (bin, _) in hist.occupied() {
            assert!(bin.b < 4 && bin.g < 4 && bin.r < 4);
        }
    }

    #[test]
    fn test_build_empty_image() {
        let hist = build_histogram(&Image::new(0, 3).unwrap(), 4).unwrap();
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.counts().len(), 64);
        assert_eq!(hist.occupied().count(), 0);
    }

    #[test]
    fn test_build_rejects_bad_bucket_count() {
        let image = Image::new(2, 2).unwrap();
        assert!(build_histogram(&image, 0).is_err());
        assert!(build_histogram(&image, 300).is_err());
    }

    #[test]
    fn test_two_color_split() {
        let rows = [Pixel::BLACK, Pixel::WHITE];
        let image = Image::from_fn(2, 2, |_, y| rows[y as usize]).unwrap();
        let hist = build_histogram(&image, 4).unwrap();
        let occupied: Vec<_> = hist.occupied().collect();
        assert_eq!(
            occupied,
            vec![(BinIndex::new(0, 0, 0), 2), (BinIndex::new(3, 3, 3), 2)]
        );
    }

    #[test]
    fn test_par_matches_sequential() {
        let src = PixelFn::new(301, 157, |x, y| {
            Pixel::new((x * 7 + y) as u8, (y * 13) as u8, (x ^ y) as u8)
        });
        for buckets in [1, 3, 4, 16] {
            let seq = build_histogram(&src, buckets).unwrap();
            let par = build_histogram_par(&src, buckets).unwrap();
            assert_eq!(seq, par, "buckets = {buckets}");
            assert_eq!(par.total(), 301 * 157);
        }
    }

    #[test]
    fn test_merge_requires_same_spec() {
        let mut a = ColorHistogram3d::new(BucketSpec::new(4).unwrap());
        let b = ColorHistogram3d::new(BucketSpec::new(8).unwrap());
        assert!(a.merge(&b).is_err());

        let mut c = ColorHistogram3d::new(BucketSpec::new(4).unwrap());
        c.add_pixel(Pixel::WHITE);
        a.merge(&c).unwrap();
        a.merge(&c).unwrap();
        assert_eq!(a.get(BinIndex::new(3, 3, 3)), 2);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let hist = ColorHistogram3d::new(BucketSpec::new(4).unwrap());
        hist.get(BinIndex::new(4, 0, 0));
    }
}
