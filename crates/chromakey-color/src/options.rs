//! Keying configuration

use crate::histogram::BucketSpec;

/// Default number of buckets per channel
pub const DEFAULT_BUCKET_COUNT: u32 = 4;

/// Options for a chroma-key session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromaKeyOptions {
    /// Buckets per channel (1..=256)
    pub bucket_count: u32,
    /// Build the histogram and replace rows with rayon
    pub parallel: bool,
}

impl Default for ChromaKeyOptions {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            parallel: false,
        }
    }
}

impl ChromaKeyOptions {
    /// Set the number of buckets per channel
    pub fn with_bucket_count(mut self, bucket_count: u32) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Enable or disable parallel processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Tolerance values offered to an interactive driver.
///
/// Starts at half a bucket width and runs up to the larger of one bucket
/// width and 255. The replacer itself accepts any tolerance; this range only
/// bounds what a driver presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceRange {
    /// Starting tolerance
    pub initial: u32,
    /// Largest selectable tolerance
    pub max: u32,
}

impl ToleranceRange {
    /// Range for a given bucket width
    pub fn from_bucket_width(width: u32) -> Self {
        Self {
            initial: width / 2,
            max: width.max(255),
        }
    }

    /// Range for a bucket layout
    pub fn for_spec(spec: BucketSpec) -> Self {
        Self::from_bucket_width(spec.width())
    }

    /// Clamp `value` to `0..=max`
    pub fn clamp(&self, value: u32) -> u32 {
        value.min(self.max)
    }

    /// Whether `value` lies in the range
    pub fn contains(&self, value: u32) -> bool {
        value <= self.max
    }
}
