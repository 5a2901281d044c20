//! chromakey-test - Regression test framework
//!
//! Small helper shared by the `tests/*_reg.rs` files of every crate. Checks
//! are numbered, failures are collected, and the test asserts once on
//! [`RegParams::cleanup`]. Two modes:
//!
//! - **Compare**: check values and images in memory (default)
//! - **Display**: additionally write result images for visual inspection
//!
//! # Usage
//!
//! ```ignore
//! use chromakey_test::RegParams;
//!
//! let mut rp = RegParams::new("histogram");
//! rp.compare_values(16.0, total as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Load a test image from the test data directory
///
/// # Arguments
///
/// * `name` - Image filename (e.g., "foreground.png")
pub fn load_test_image(name: &str) -> TestResult<chromakey_core::Image> {
    let path = test_data_path(name);
    chromakey_io::read_image(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // chromakey-test is at crates/chromakey-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/images/{}", workspace_root(), name)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
