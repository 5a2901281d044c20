//! Image container and accessor regression test
//!
//! Checks that the packed container, its mutable form and the
//! coordinate-mapped source all read the same pixels.

use chromakey_core::{Image, ImageMut, Pixel, PixelAccess, PixelFn};
use chromakey_test::RegParams;

fn create_color_gradient(w: u32, h: u32) -> Image {
    Image::from_fn(w, h, |x, y| {
        let r = ((x * 255) / w.max(1)) as u8;
        let g = ((y * 255) / h.max(1)) as u8;
        let b = (128 + (x + y) * 64 / (w + h).max(1)) as u8;
        Pixel::from_rgb(r, g, b)
    })
    .unwrap()
}

#[test]
fn image_access_reg() {
    let mut rp = RegParams::new("image_access");

    let image = create_color_gradient(37, 23);
    rp.compare_values(37.0, image.width() as f64, 0.0);
    rp.compare_values(23.0, image.height() as f64, 0.0);
    rp.compare_values((37 * 23 * 3) as f64, image.as_bgr_bytes().len() as f64, 0.0);

    // Mapping source and packed copy agree everywhere
    let mapped = PixelFn::new(37, 23, |x, y| image.pixel_unchecked(x, y));
    let copy = Image::from_access(&mapped).unwrap();
    rp.compare_images(&image, &copy);

    // Mutable copy edited in one place differs in exactly that place
    let mut edited: ImageMut = image.to_mut();
    edited.set_pixel(5, 7, Pixel::new(1, 2, 3)).unwrap();
    let edited: Image = edited.into();
    let mut diffs = 0;
    for y in 0..23 {
        for x in 0..37 {
            if edited.get_pixel(x, y) != image.get_pixel(x, y) {
                diffs += 1;
            }
        }
    }
    rp.compare_values(1.0, diffs as f64, 0.0);

    // RGB conversion round trip preserves pixels
    let rgb = image.to_rgb_bytes();
    let back = Image::from_rgb_bytes(37, 23, &rgb).unwrap();
    rp.compare_images(&image, &back);

    // Empty images report zero pixels through the trait
    let empty = Image::new(0, 9).unwrap();
    rp.compare_values(0.0, PixelAccess::pixel_count(&empty) as f64, 0.0);

    assert!(rp.cleanup(), "image_access regression test failed");
}
