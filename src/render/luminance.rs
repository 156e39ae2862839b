//! RGB to luminance conversion.

use image::{GrayImage, Luma, RgbImage};

/// Perceptual luminance of one pixel (ITU-R 601 weights, 16-bit fixed point).
///
/// Pure white maps to 255 and pure black to 0.
#[inline]
pub fn luma([r, g, b]: [u8; 3]) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Luminance map aligned 1:1 with `image`.
pub fn luminance(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luma(image.get_pixel(x, y).0)])
    })
}
