//! Image format detection
//!
//! Detects image formats by examining magic numbers in the file header,
//! or by file extension when choosing an output encoder.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Supported image file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// PNG format
    Png,
    /// JFIF JPEG format
    Jpeg,
    /// Binary PNM (PPM/PGM)
    Pnm,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pnm => "ppm",
        }
    }

    /// Guess the format from a path's extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(Self::Jpeg),
            "ppm" | "pgm" | "pnm" => Some(Self::Pnm),
            _ => None,
        }
    }
}

/// Magic numbers for image format detection
mod magic {
    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// Binary PGM
    pub const PGM_BINARY: &[u8] = b"P5";
    /// Binary PPM
    pub const PPM_BINARY: &[u8] = b"P6";
}

/// Detect image format from a file path
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut file = File::open(path).map_err(IoError::Io)?;
    let mut header = [0u8; 8];
    let bytes_read = file.read(&mut header).map_err(IoError::Io)?;
    detect_format_from_bytes(&header[..bytes_read])
}

/// Detect image format from bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.len() >= 8 && data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }

    if data.len() >= 3 && data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }

    let first_two = &data[..2];
    if first_two == magic::PGM_BINARY || first_two == magic::PPM_BINARY {
        return Ok(ImageFormat::Pnm);
    }

    Err(IoError::UnsupportedFormat(
        "unknown image format".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_pnm() {
        assert_eq!(detect_format_from_bytes(b"P6\n").unwrap(), ImageFormat::Pnm);
        assert_eq!(detect_format_from_bytes(b"P5\n").unwrap(), ImageFormat::Pnm);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format_from_bytes(b"GIF89a").is_err());
        assert!(detect_format_from_bytes(b"P").is_err());
    }

    #[test]
    fn test_from_path() {
        let upper = ImageFormat::from_path("overlay.JPG");
        assert_eq!(upper, Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("a/b.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path("x.ppm"), Some(ImageFormat::Pnm));
        assert_eq!(ImageFormat::from_path("x.tif"), None);
        assert_eq!(ImageFormat::from_path("noext"), None);
    }
}
