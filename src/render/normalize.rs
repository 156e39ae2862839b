//! Geometric normalization: centre-crop to the card aspect ratio, then
//! resample to the exact print size.

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::error::{LayerError, Result};

/// Relative tolerance under which two aspect ratios count as equal.
const RATIO_EPSILON: f64 = 1e-9;

/// A crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centred rectangle of a `width` x `height` image with the given
/// width/height `ratio`.
///
/// Wider sources lose equal margins left and right, taller sources lose equal
/// margins top and bottom; a matching source is returned whole.
pub fn centre_crop(width: u32, height: u32, ratio: f64) -> CropRect {
    let current = width as f64 / height as f64;

    if (current - ratio).abs() <= ratio * RATIO_EPSILON {
        return CropRect {
            x: 0,
            y: 0,
            width,
            height,
        };
    }

    if current > ratio {
        let new_w = ((height as f64 * ratio) as u32).clamp(1, width);
        CropRect {
            x: (width - new_w) / 2,
            y: 0,
            width: new_w,
            height,
        }
    } else {
        let new_h = ((width as f64 / ratio) as u32).clamp(1, height);
        CropRect {
            x: 0,
            y: (height - new_h) / 2,
            width,
            height: new_h,
        }
    }
}

/// Crop `image` to `ratio` and resize it to exactly `target_w` x `target_h`
/// with a Lanczos3 filter.
pub fn normalize(image: &RgbImage, ratio: f64, target_w: u32, target_h: u32) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(LayerError::InvalidImage {
            message: format!("image has zero area ({}x{})", width, height),
        });
    }
    if target_w == 0 || target_h == 0 {
        return Err(LayerError::InvalidImage {
            message: format!("target size has zero area ({}x{})", target_w, target_h),
        });
    }

    let rect = centre_crop(width, height, ratio);
    debug!(?rect, from_w = width, from_h = height, "Centre crop");

    let cropped = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
    if cropped.dimensions() == (target_w, target_h) {
        return Ok(cropped);
    }

    Ok(imageops::resize(
        &cropped,
        target_w,
        target_h,
        FilterType::Lanczos3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const CARD_RATIO: f64 = 63.0 / 88.0;

    #[test]
    fn test_crop_wide_source() {
        let rect = centre_crop(3000, 2000, CARD_RATIO);
        assert_eq!(rect.height, 2000);
        assert_eq!(rect.width, 1431);
        assert_eq!(rect.x, (3000 - 1431) / 2);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_crop_tall_source() {
        let rect = centre_crop(700, 2000, CARD_RATIO);
        assert_eq!(rect.width, 700);
        assert_eq!(rect.height, 977);
        assert_eq!(rect.y, (2000 - 977) / 2);
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn test_crop_exact_ratio_is_identity() {
        let rect = centre_crop(630, 880, CARD_RATIO);
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 0,
                width: 630,
                height: 880
            }
        );
    }

    #[test]
    fn test_crop_degenerate_strip_keeps_one_pixel() {
        let rect = centre_crop(1, 1000, 10.0);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_normalize_hits_target_for_any_aspect() {
        for (w, h) in [(300, 200), (50, 400), (63, 88), (100, 100), (1, 1)] {
            let img = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
            let out = normalize(&img, CARD_RATIO, 63, 88).unwrap();
            assert_eq!(out.dimensions(), (63, 88), "source {}x{}", w, h);
        }
    }

    #[test]
    fn test_normalize_preserves_flat_colour() {
        let img = RgbImage::from_pixel(200, 100, Rgb([200, 100, 50]));
        let out = normalize(&img, CARD_RATIO, 30, 42).unwrap();
        for p in out.pixels() {
            for (got, want) in p.0.iter().zip([200u8, 100, 50]) {
                assert!(got.abs_diff(want) <= 1, "{:?}", p.0);
            }
        }
    }

    #[test]
    fn test_normalize_rejects_zero_area() {
        let img = RgbImage::new(0, 10);
        assert!(matches!(
            normalize(&img, CARD_RATIO, 63, 88),
            Err(LayerError::InvalidImage { .. })
        ));

        let img = RgbImage::new(10, 10);
        let err = normalize(&img, CARD_RATIO, 0, 88).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid image: target size has zero area (0x88)"
        );
    }
}
