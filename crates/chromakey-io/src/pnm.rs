//! PNM (Portable Any Map) format support
//!
//! Reads PGM (P5 binary) and PPM (P6 binary), writes PPM (P6).
//! ASCII variants (P2/P3), bitmaps and 16-bit samples are not supported.
//! Gray input is expanded to three equal channels.

use crate::{IoError, IoResult};
use chromakey_core::Image;
use std::io::{BufRead, Write};

/// Read one whitespace-delimited header token, skipping `#` comments.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            if token.is_empty() {
                return Err(IoError::InvalidData("truncated PNM header".to_string()));
            }
            return Ok(token);
        }
        match byte[0] {
            b'#' if token.is_empty() => {
                let mut comment = Vec::new();
                reader.read_until(b'\n', &mut comment)?;
            }
            c if c.is_ascii_whitespace() => {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
            c => token.push(c as char),
        }
    }
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("bad PNM {what}: {token:?}")))
}

/// Read a binary PNM image (P5/P6) from a reader.
///
/// # Arguments
/// * `reader` - A buffered reader positioned at the `P5`/`P6` magic
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Image> {
    let magic = read_token(&mut reader)?;
    let channels = match magic.as_str() {
        "P5" => 1usize,
        "P6" => 3usize,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM variant: {other}"
            )));
        }
    };

    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNM maxval: {maxval}"
        )));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| IoError::InvalidData(format!("PNM too large: {width}x{height}")))?;
    let mut samples = vec![0u8; len];
    reader
        .read_exact(&mut samples)
        .map_err(|e| IoError::DecodeError(format!("PNM pixel data: {e}")))?;

    if maxval != 255 {
        for s in samples.iter_mut() {
            *s = ((u32::from(*s).min(maxval) * 255 + maxval / 2) / maxval) as u8;
        }
    }

    let rgb = if channels == 1 {
        samples.iter().flat_map(|&v| [v, v, v]).collect()
    } else {
        samples
    };
    Ok(Image::from_rgb_bytes(width, height, &rgb)?)
}

/// Write an image as binary PPM (P6) to a writer.
pub fn write_pnm<W: Write>(image: &Image, mut writer: W) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(&image.to_rgb_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromakey_core::Pixel;
    use std::io::Cursor;

    #[test]
    fn test_write_then_read_ppm() {
        let ramp = |x: u32, y: u32| Pixel::from_rgb(x as u8 * 80, y as u8 * 90, 7);
        let image = Image::from_fn(3, 2, ramp).unwrap();
        let mut buf = Vec::new();
        write_pnm(&image, &mut buf).unwrap();
        assert!(buf.starts_with(b"P6\n3 2\n255\n"));
        let back = read_pnm(Cursor::new(buf)).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_read_pgm_with_comment() {
        let mut data = b"P5\n# a comment\n2 1\n255\n".to_vec();
        data.extend_from_slice(&[10, 200]);
        let image = read_pnm(Cursor::new(data)).unwrap();
        assert_eq!(image.get_pixel(0, 0), Some(Pixel::new(10, 10, 10)));
        assert_eq!(image.get_pixel(1, 0), Some(Pixel::new(200, 200, 200)));
    }

    #[test]
    fn test_read_scales_maxval() {
        let mut data = b"P5 1 1 15 ".to_vec();
        data.push(15);
        let image = read_pnm(Cursor::new(data)).unwrap();
        assert_eq!(image.get_pixel(0, 0), Some(Pixel::WHITE));
    }

    #[test]
    fn test_truncated_data() {
        let data = b"P6\n2 2\n255\n\x00\x01".to_vec();
        let result = read_pnm(Cursor::new(data));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }

    #[test]
    fn test_unsupported_variant() {
        let data = b"P3\n1 1\n255\n0 0 0".to_vec();
        let result = read_pnm(Cursor::new(data));
        assert!(matches!(result, Err(IoError::UnsupportedFormat(_))));
    }
}
