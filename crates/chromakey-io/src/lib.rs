//! Chromakey IO - Image decoding and encoding
//!
//! Loads the foreground and background images handed to the compositor and
//! stores the resulting overlay. Format support is selected with Cargo
//! features:
//!
//! - `png-format`: PNG via the `png` crate
//! - `jpeg`: JPEG via `jpeg-decoder` / `jpeg-encoder`
//! - `pnm`: binary PPM/PGM

pub mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use chromakey_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

fn disabled(format: ImageFormat) -> IoError {
    IoError::UnsupportedFormat(format!("{:?} support not enabled", format))
}

/// Read an image from a file path.
///
/// The format is detected from the file header, not the extension.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    read_image_format(reader, format)
}

/// Read an image from an in-memory encoded buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

#[allow(unused_variables)]
fn read_image_format<R>(reader: R, format: ImageFormat) -> IoResult<Image>
where
    R: std::io::BufRead + std::io::Seek,
{
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(reader),
        #[allow(unreachable_patterns)]
        other => Err(disabled(other)),
    }
}

/// Write an image to a file path in the given format.
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_format(image, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into an in-memory buffer.
pub fn write_image_mem(image: &Image, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_image_format(image, &mut buf, format)?;
    Ok(buf)
}

#[allow(unused_variables)]
fn write_image_format<W: std::io::Write>(
    image: &Image,
    writer: W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(image, writer, jpeg::DEFAULT_QUALITY),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(image, writer),
        #[allow(unreachable_patterns)]
        other => Err(disabled(other)),
    }
}
