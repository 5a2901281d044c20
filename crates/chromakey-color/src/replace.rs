//! Chroma replacement
//!
//! A foreground pixel is keyed when every channel lies within `tolerance`
//! of the key color. Keyed pixels take the background pixel at the same
//! position, with the background tiled (addressed modulo its size) when it
//! is smaller than the foreground. An empty background keys nothing.
//!
//! All functions are pure: the output depends only on the inputs, so they
//! can be re-run for every new tolerance value.

use crate::error::ColorResult;
use chromakey_core::{BYTES_PER_PIXEL, Error, Image, ImageMut, Pixel, PixelAccess};
use rayon::prelude::*;

/// Whether `pixel` is within `tolerance` of `key` on all three channels.
#[inline]
pub fn is_close(pixel: Pixel, key: Pixel, tolerance: u32) -> bool {
    u32::from(pixel.b.abs_diff(key.b)) <= tolerance
        && u32::from(pixel.g.abs_diff(key.g)) <= tolerance
        && u32::from(pixel.r.abs_diff(key.r)) <= tolerance
}

/// Background coordinates for foreground position (x, y).
///
/// Returns `None` when the background has no pixels.
#[inline]
pub fn tile_coord(x: u32, y: u32, bg_width: u32, bg_height: u32) -> Option<(u32, u32)> {
    if bg_width == 0 || bg_height == 0 {
        return None;
    }
    Some((x % bg_width, y % bg_height))
}

/// Key one output row.
///
/// The background row is resolved once per row; `row` must hold exactly
/// `fg.width()` packed pixels.
fn replace_row<F, B>(fg: &F, bg: &B, key: Pixel, tolerance: u32, y: u32, row: &mut [u8])
where
    F: PixelAccess + ?Sized,
    B: PixelAccess + ?Sized,
{
    let bg_width = bg.width();
    let bg_row = tile_coord(0, y, bg_width, bg.height()).map(|(_, by)| by);

    for (x, out) in (0..fg.width()).zip(row.chunks_exact_mut(BYTES_PER_PIXEL)) {
        let px = fg.pixel_unchecked(x, y);
        let value = match bg_row {
            Some(by) if is_close(px, key, tolerance) => bg.pixel_unchecked(x % bg_width, by),
            _ => px,
        };
        out.copy_from_slice(&value.channels());
    }
}

/// Replace keyed foreground pixels with the tiled background.
///
/// The output has the foreground's dimensions.
///
/// # Example
///
/// ```
/// use chromakey_color::chroma_replace;
/// use chromakey_core::{Image, Pixel};
///
/// let fg = Image::new(4, 4).unwrap();
/// let bg = Image::from_fn(2, 2, |_, _| Pixel::WHITE).unwrap();
/// let out = chroma_replace(&fg, &bg, Pixel::new(32, 32, 32), 32).unwrap();
/// assert!(out.pixels().all(|p| p == Pixel::WHITE));
/// ```
pub fn chroma_replace<F, B>(fg: &F, bg: &B, key: Pixel, tolerance: u32) -> ColorResult<Image>
where
    F: PixelAccess + ?Sized,
    B: PixelAccess + ?Sized,
{
    let mut out = ImageMut::new(fg.width(), fg.height())?;
    chroma_replace_into(fg, bg, key, tolerance, &mut out)?;
    Ok(out.into())
}

/// Like [`chroma_replace`], but overwrites an existing output buffer.
///
/// # Errors
///
/// Returns a [`DimensionMismatch`](chromakey_core::Error::DimensionMismatch)
/// core error if `out` is not the foreground's size.
pub fn chroma_replace_into<F, B>(
    fg: &F,
    bg: &B,
    key: Pixel,
    tolerance: u32,
    out: &mut ImageMut,
) -> ColorResult<()>
where
    F: PixelAccess + ?Sized,
    B: PixelAccess + ?Sized,
{
    let expected = (fg.width(), fg.height());
    if out.dimensions() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: out.dimensions(),
        }
        .into());
    }

    log::trace!(
        "replace: {}x{} foreground, {}x{} background, key {}, tolerance {}",
        expected.0,
        expected.1,
        bg.width(),
        bg.height(),
        key,
        tolerance
    );

    for y in 0..fg.height() {
        replace_row(fg, bg, key, tolerance, y, out.row_bytes_mut(y));
    }
    Ok(())
}

/// Like [`chroma_replace`], with rows keyed in parallel by rayon.
///
/// Rows are independent, so the result is identical to the sequential
/// version.
pub fn chroma_replace_par<F, B>(fg: &F, bg: &B, key: Pixel, tolerance: u32) -> ColorResult<Image>
where
    F: PixelAccess + Sync + ?Sized,
    B: PixelAccess + Sync + ?Sized,
{
    let mut out = ImageMut::new(fg.width(), fg.height())?;
    if out.is_empty() {
        return Ok(out.into());
    }

    let stride = fg.width() as usize * BYTES_PER_PIXEL;
    out.as_bgr_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| replace_row(fg, bg, key, tolerance, y as u32, row));
    Ok(out.into())
}

/// Number of foreground pixels within `tolerance` of `key`.
pub fn count_keyed<F: PixelAccess + ?Sized>(fg: &F, key: Pixel, tolerance: u32) -> u64 {
    let mut n = 0;
    for y in 0..fg.height() {
        for x in 0..fg.width() {
            if is_close(fg.pixel_unchecked(x, y), key, tolerance) {
                n += 1;
            }
        }
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromakey_core::PixelFn;

    fn numbered_background(w: u32, h: u32) -> Image {
        Image::from_fn(w, h, |x, y| Pixel::new(x as u8, y as u8, 77)).unwrap()
    }

    #[test]
    fn test_is_close_is_per_channel_conjunction() {
        let key = Pixel::new(100, 100, 100);
        assert!(is_close(Pixel::new(90, 110, 100), key, 10));
        assert!(!is_close(Pixel::new(90, 111, 100), key, 10));
        assert!(is_close(key, key, 0));
        assert!(!is_close(Pixel::new(101, 100, 100), key, 0));
        // Large tolerances are accepted as-is
        assert!(is_close(Pixel::BLACK, Pixel::WHITE, 255));
        assert!(is_close(Pixel::BLACK, Pixel::WHITE, 1000));
    }

    #[test]
    fn test_tile_coord() {
        assert_eq!(tile_coord(5, 7, 3, 2), Some((2, 1)));
        assert_eq!(tile_coord(0, 0, 1, 1), Some((0, 0)));
        assert_eq!(tile_coord(5, 7, 0, 2), None);
        assert_eq!(tile_coord(5, 7, 3, 0), None);
    }

    #[test]
    fn test_black_foreground_fully_replaced() {
        let fg = Image::new(4, 4).unwrap();
        let bg = numbered_background(3, 3);
        let out = chroma_replace(&fg, &bg, Pixel::new(32, 32, 32), 32).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get_pixel(x, y), bg.get_pixel(x % 3, y % 3));
            }
        }
    }

    #[test]
    fn test_tolerance_zero_without_match_is_identity() {
        let fg = Image::from_fn(5, 3, |x, y| Pixel::new(x as u8, y as u8, 9)).unwrap();
        let bg = numbered_background(2, 2);
        let out = chroma_replace(&fg, &bg, Pixel::new(200, 200, 200), 0).unwrap();
        assert_eq!(out, fg);
    }

    #[test]
    fn test_tolerance_zero_exact_match_only() {
        let key = Pixel::new(1, 2, 3);
        let fg = Image::from_fn(3, 1, |x, _| if x == 1 { key } else { Pixel::WHITE }).unwrap();
        let bg = Image::from_fn(1, 1, |_, _| Pixel::BLACK).unwrap();
        let out = chroma_replace(&fg, &bg, key, 0).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(Pixel::WHITE));
        assert_eq!(out.get_pixel(1, 0), Some(Pixel::BLACK));
        assert_eq!(out.get_pixel(2, 0), Some(Pixel::WHITE));
    }

    #[test]
    fn test_empty_background_passes_through() {
        let fg = Image::from_fn(3, 3, |_, _| Pixel::new(32, 32, 32)).unwrap();
        let backgrounds = [(0, 0), (0, 4), (4, 0)].map(|(w, h)| Image::new(w, h).unwrap());
        for bg in backgrounds {
            let out = chroma_replace(&fg, &bg, Pixel::new(32, 32, 32), 255).unwrap();
            assert_eq!(out, fg);
        }
    }

    #[test]
    fn test_empty_foreground() {
        let bg = numbered_background(2, 2);
        let out = chroma_replace(&Image::empty(), &bg, Pixel::BLACK, 10).unwrap();
        assert!(out.is_empty());

        let fg = Image::new(0, 3).unwrap();
        let out = chroma_replace_par(&fg, &Image::empty(), Pixel::BLACK, 10).unwrap();
        assert_eq!(out.dimensions(), (0, 3));
    }

    #[test]
    fn test_replace_into_overwrites_and_checks_size() {
        let fg = Image::new(2, 2).unwrap();
        let bg = Image::from_fn(1, 1, |_, _| Pixel::WHITE).unwrap();
        let mut out = ImageMut::new(2, 2).unwrap();
        out.fill(Pixel::new(9, 9, 9));
        chroma_replace_into(&fg, &bg, Pixel::BLACK, 0, &mut out).unwrap();
        assert!(Image::from(out).pixels().all(|p| p == Pixel::WHITE));

        let mut wrong = ImageMut::new(3, 2).unwrap();
        assert!(chroma_replace_into(&fg, &bg, Pixel::BLACK, 0, &mut wrong).is_err());
    }

    #[test]
    fn test_par_matches_sequential() {
        let fg = PixelFn::new(123, 77, |x, y| {
            Pixel::new((x * 3) as u8, (y * 5) as u8, ((x + y) * 2) as u8)
        });
        let bg = numbered_background(17, 11);
        let key = Pixel::new(96, 96, 96);
        for tol in [0, 20, 64, 255] {
            let seq = chroma_replace(&fg, &bg, key, tol).unwrap();
            let par = chroma_replace_par(&fg, &bg, key, tol).unwrap();
            assert_eq!(seq, par, "tolerance {tol}");
        }
    }

    #[test]
    fn test_count_keyed() {
        let fg = Image::from_fn(4, 1, |x, _| Pixel::new(x as u8 * 10, 0, 0)).unwrap();
        assert_eq!(count_keyed(&fg, Pixel::BLACK, 0), 1);
        assert_eq!(count_keyed(&fg, Pixel::BLACK, 15), 2);
        assert_eq!(count_keyed(&fg, Pixel::BLACK, 30), 4);
    }
}
