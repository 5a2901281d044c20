//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale input is expanded to three equal channels;
//! CMYK and 16-bit JPEGs are rejected.

use crate::{IoError, IoResult};
use chromakey_core::Image;
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Quality used when encoding overlays.
pub const DEFAULT_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    match info.pixel_format {
        PixelFormat::RGB24 => Ok(Image::from_rgb_bytes(width, height, &pixels)?),
        PixelFormat::L8 => {
            let rgb: Vec<u8> = pixels.iter().flat_map(|&v| [v, v, v]).collect();
            Ok(Image::from_rgb_bytes(width, height, &rgb)?)
        }
        other => Err(IoError::UnsupportedFormat(format!(
            "unsupported JPEG pixel format: {:?}",
            other
        ))),
    }
}

/// Write a JPEG image to a writer.
///
/// # Arguments
/// * `image`   - The image to encode (at most 65535 pixels per side)
/// * `writer`  - Destination writer
/// * `quality` - Encoder quality, 1..=100
pub fn write_jpeg<W: Write>(image: &Image, writer: W, quality: u8) -> IoResult<()> {
    let too_large = |v: u32| IoError::EncodeError(format!("JPEG dimension too large: {v}"));
    let width = u16::try_from(image.width()).map_err(|_| too_large(image.width()))?;
    let height = u16::try_from(image.height()).map_err(|_| too_large(image.height()))?;
    if image.is_empty() {
        return Err(IoError::EncodeError(
            "JPEG cannot encode an empty image".to_string(),
        ));
    }

    let encoder = Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(image.as_bgr_bytes(), width, height, ColorType::Bgr)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromakey_core::Pixel;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_write_read_flat_color() {
        let color = Pixel::new(40, 160, 90);
        let image = Image::from_fn(16, 16, |_, _| color).unwrap();
        let mut buf = Vec::new();
        write_jpeg(&image, &mut buf, 95).unwrap();
        let back = read_jpeg(Cursor::new(buf)).unwrap();
        assert_eq!(back.dimensions(), (16, 16));
        // Lossy, but a flat block stays close
        assert!(back.pixels().all(|p| p.max_channel_diff(color) <= 4));
    }

    #[test]
    fn test_jpeg_empty_rejected() {
        let mut buf = Vec::new();
        assert!(write_jpeg(&Image::empty(), &mut buf, 90).is_err());
    }
}
