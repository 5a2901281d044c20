//! Chroma-key session
//!
//! Holds a foreground/background pair together with the key color chosen
//! for the foreground. The histogram is built once in [`ChromaKeySession::new`];
//! every tolerance change afterwards is a pure replacement pass, so a driver
//! (command line, slider, batch job) can call [`ChromaKeySession::set_tolerance`]
//! as often as it likes.
//!
//! # Example
//!
//! ```
//! use chromakey_color::{ChromaKeyOptions, ChromaKeySession};
//! use chromakey_core::{Image, Pixel};
//!
//! let fg = Image::new(4, 4).unwrap();
//! let bg = Image::from_fn(3, 3, |_, _| Pixel::WHITE).unwrap();
//! let session = ChromaKeySession::new(fg, bg, ChromaKeyOptions::default()).unwrap();
//! assert_eq!(session.key_color(), Pixel::new(32, 32, 32));
//!
//! let out = session.set_tolerance(32).unwrap();
//! assert!(out.pixels().all(|p| p == Pixel::WHITE));
//! ```

use std::fmt;

use crate::dominant::KeySelection;
use crate::error::ColorResult;
use crate::histogram::{BinIndex, ColorHistogram3d, build_histogram, build_histogram_par};
use crate::options::{ChromaKeyOptions, ToleranceRange};
use crate::replace::{chroma_replace, chroma_replace_into, chroma_replace_par, count_keyed};
use chromakey_core::{Image, ImageMut, Pixel};

/// Key selection summary printed once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyReport {
    /// Most populated histogram cell
    pub bin: BinIndex,
    /// Midpoint color of that cell
    pub color: Pixel,
    /// Pixels in that cell
    pub count: u64,
}

impl From<KeySelection> for KeyReport {
    fn from(sel: KeySelection) -> Self {
        Self {
            bin: sel.bin,
            color: sel.color,
            count: sel.count,
        }
    }
}

impl fmt::Display for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most common bin (B,G,R): {}", self.bin)?;
        writeln!(f, "Representative color: {}", self.color)?;
        write!(f, "Pixel count: {}", self.count)
    }
}

/// A foreground/background pair with its selected key color
#[derive(Debug, Clone)]
pub struct ChromaKeySession {
    foreground: Image,
    background: Image,
    options: ChromaKeyOptions,
    histogram: ColorHistogram3d,
    selection: KeySelection,
    tolerance_range: ToleranceRange,
}

impl ChromaKeySession {
    /// Build the foreground histogram and select the key color.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidBucketCount`](crate::ColorError::InvalidBucketCount)
    /// unless `1 <= options.bucket_count <= 256`.
    pub fn new(
        foreground: Image,
        background: Image,
        options: ChromaKeyOptions,
    ) -> ColorResult<Self> {
        let histogram = if options.parallel {
            build_histogram_par(&foreground, options.bucket_count)?
        } else {
            build_histogram(&foreground, options.bucket_count)?
        };
        let selection = KeySelection::from_histogram(&histogram);
        let tolerance_range = ToleranceRange::for_spec(histogram.spec());

        log::debug!(
            "key selection: {}x{} foreground, {} buckets of width {}, bin {} ({} px), color {}",
            foreground.width(),
            foreground.height(),
            histogram.bucket_count(),
            histogram.bucket_width(),
            selection.bin,
            selection.count,
            selection.color
        );

        Ok(Self {
            foreground,
            background,
            options,
            histogram,
            selection,
            tolerance_range,
        })
    }

    /// Composite the foreground over the background at `tolerance`.
    pub fn set_tolerance(&self, tolerance: u32) -> ColorResult<Image> {
        let key = self.selection.color;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "tolerance {}: {} of {} pixels keyed",
                tolerance,
                count_keyed(&self.foreground, key, tolerance),
                u64::from(self.foreground.width()) * u64::from(self.foreground.height())
            );
        }
        if self.options.parallel {
            chroma_replace_par(&self.foreground, &self.background, key, tolerance)
        } else {
            chroma_replace(&self.foreground, &self.background, key, tolerance)
        }
    }

    /// Like [`set_tolerance`](Self::set_tolerance), reusing an output buffer
    /// of the foreground's size.
    pub fn set_tolerance_into(&self, tolerance: u32, out: &mut ImageMut) -> ColorResult<()> {
        chroma_replace_into(
            &self.foreground,
            &self.background,
            self.selection.color,
            tolerance,
            out,
        )
    }

    /// Foreground image
    pub fn foreground(&self) -> &Image {
        &self.foreground
    }

    /// Background image
    pub fn background(&self) -> &Image {
        &self.background
    }

    /// Foreground histogram
    pub fn histogram(&self) -> &ColorHistogram3d {
        &self.histogram
    }

    /// Selected bin, count and key color
    pub fn selection(&self) -> KeySelection {
        self.selection
    }

    /// Key color
    pub fn key_color(&self) -> Pixel {
        self.selection.color
    }

    /// Tolerance range derived from the bucket width
    pub fn tolerance_range(&self) -> ToleranceRange {
        self.tolerance_range
    }

    /// Options the session was created with
    pub fn options(&self) -> ChromaKeyOptions {
        self.options
    }

    /// Key selection summary
    pub fn report(&self) -> KeyReport {
        self.selection.into()
    }
}
