//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use chromakey_core::{Image, Pixel};
use chromakey_io::ImageFormat;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Check values and images in memory (default)
    #[default]
    Compare,
    /// Additionally write result images to the regout directory
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    /// Parse mode from a string; anything but "display" means compare
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status. Failures are
/// collected rather than panicking so one run reports every mismatch.
pub struct RegParams {
    /// Name of the test (e.g., "histogram")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        Self::with_mode(test_name, RegTestMode::from_env())
    }

    /// Create regression test parameters with an explicit mode
    pub fn with_mode(test_name: &str, mode: RegTestMode) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record_failure(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Compare two pixels for exact equality
    pub fn compare_pixels(&mut self, expected: Pixel, actual: Pixel) -> bool {
        self.index += 1;

        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: pixel comparison for index {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Compare two images for exact equality
    ///
    /// # Returns
    ///
    /// `true` if images are identical, `false` otherwise.
    pub fn compare_images(&mut self, image1: &Image, image2: &Image) -> bool {
        self.index += 1;

        if image1.dimensions() != image2.dimensions() {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - dimension mismatch \
                 {}x{} vs {}x{}",
                self.test_name,
                self.index,
                image1.width(),
                image1.height(),
                image2.width(),
                image2.height()
            );
            self.record_failure(msg);
            return false;
        }

        for y in 0..image1.height() {
            for x in 0..image1.width() {
                let p1 = image1.pixel_unchecked(x, y);
                let p2 = image2.pixel_unchecked(x, y);
                if p1 != p2 {
                    let msg = format!(
                        "Failure in {}_reg: image comparison for index {} - \
                         pixel mismatch at ({}, {}): {} vs {}",
                        self.test_name,
                        self.index,
                        x,
                        y,
                        p1,
                        p2
                    );
                    self.record_failure(msg);
                    return false;
                }
            }
        }

        true
    }

    /// Compare two byte arrays
    ///
    /// # Returns
    ///
    /// `true` if data is identical, `false` otherwise.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Write an image to the regout directory for visual inspection
    ///
    /// Only writes in display mode; returns the path written, if any.
    pub fn write_image(
        &mut self,
        image: &Image,
        format: ImageFormat,
    ) -> TestResult<Option<String>> {
        self.index += 1;
        if !self.display() {
            return Ok(None);
        }

        let dir = regout_dir();
        fs::create_dir_all(&dir)?;
        let local_path = format!(
            "{}/{}.{:02}.{}",
            dir,
            self.test_name,
            self.index,
            format.extension()
        );

        chromakey_io::write_image(image, &local_path, format).map_err(|e| {
            TestError::ImageWrite {
                path: local_path.clone(),
                message: e.to_string(),
            }
        })?;
        eprintln!("Wrote: {}", local_path);
        Ok(Some(local_path))
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
