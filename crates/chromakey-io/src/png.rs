//! PNG image format support
//!
//! Decoding expands palettes and low bit depths to 8 bits, keeps the high
//! byte of 16-bit samples and drops any alpha channel. Encoding always
//! writes 8-bit RGB.

use crate::{IoError, IoResult};
use chromakey_core::Image;
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let (color_type, bit_depth) = reader.output_color_type();

    let channels = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "PNG palette was not expanded".to_string(),
            ));
        }
    };
    let sample_bytes = match bit_depth {
        BitDepth::Eight => 1,
        BitDepth::Sixteen => 2,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG bit depth after expansion: {:?}",
                other
            )));
        }
    };

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut bgr = Vec::with_capacity(width as usize * height as usize * 3);

    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..];
        for x in 0..width as usize {
            // High byte of each sample comes first for 16-bit data
            let base = x * channels * sample_bytes;
            let sample = |c: usize| row[base + c * sample_bytes];
            let (r, g, b) = if channels < 3 {
                let v = sample(0);
                (v, v, v)
            } else {
                (sample(0), sample(1), sample(2))
            };
            bgr.extend_from_slice(&[b, g, r]);
        }
    }

    Ok(Image::from_bgr_bytes(width, height, bgr)?)
}

/// Write a PNG image as 8-bit RGB
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    if image.is_empty() {
        return Err(IoError::EncodeError(
            "PNG cannot encode an empty image".to_string(),
        ));
    }

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(&image.to_rgb_bytes())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromakey_core::Pixel;
    use std::io::Cursor;

    #[test]
    fn test_png_write_read() {
        let ramp = |x: u32, y: u32| Pixel::new(x as u8 * 50, y as u8 * 60, 200);
        let image = Image::from_fn(5, 4, ramp).unwrap();
        let mut buf = Vec::new();
        write_png(&image, &mut buf).unwrap();
        let back = read_png(Cursor::new(buf)).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_png_empty_rejected() {
        let mut buf = Vec::new();
        assert!(write_png(&Image::empty(), &mut buf).is_err());
    }
}
