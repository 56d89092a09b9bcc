//! Image compositing: padding to a common canvas and horizontal tiling.

use image::{imageops, DynamicImage, GenericImageView, RgbaImage};

/// Pad `image` onto a `width` x `height` canvas at the origin.
///
/// The remaining canvas area is transparent. Callers only pass bounds at
/// least as large as the image itself, so nothing is ever cropped.
pub fn pad_to(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(&mut canvas, image, 0, 0);
    DynamicImage::ImageRgba8(canvas)
}

/// Tile images left to right on one canvas.
///
/// Canvas width is the sum of the widths, canvas height the maximum
/// height. Each image keeps its own vertical origin (top-aligned).
pub fn combine_row(images: &[&DynamicImage]) -> DynamicImage {
    let width: u32 = images.iter().map(|img| img.width()).sum();
    let height: u32 = images.iter().map(|img| img.height()).max().unwrap_or(0);

    let mut canvas = RgbaImage::new(width, height);
    let mut offset_x: i64 = 0;
    for img in images {
        imageops::overlay(&mut canvas, *img, offset_x, 0);
        offset_x += i64::from(img.width());
    }
    DynamicImage::ImageRgba8(canvas)
}

/// A fully transparent image with the same dimensions as `image`.
///
/// Used as a stand-in diff panel when the external tool produced nothing.
pub fn blank_like(image: &DynamicImage) -> DynamicImage {
    DynamicImage::new_rgba8(image.width(), image.height())
}
