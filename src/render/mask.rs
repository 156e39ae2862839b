//! Print mask generation: white ink, foil and spot UV.
//!
//! All masks are derived from the luminance map of the normalized artwork
//! and are binary (0 or 255).

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::gradients::sobel_gradients;
use imageproc::morphology::dilate;

/// Sobel response to a unit step edge (kernel weights 1 + 2 + 1).
const SOBEL_STEP_GAIN: u16 = 4;

const MARKED: Luma<u8> = Luma([255]);
const CLEAR: Luma<u8> = Luma([0]);

/// Threshold parameters for the three masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskConfig {
    pub white_threshold: u8,
    pub foil_threshold: u8,
    /// Dilation radius for spot UV edges (0 disables dilation).
    pub spot_uv_edge_size: u8,
    /// Minimum grey-level step counted as an edge.
    pub spot_uv_edge_threshold: u8,
}

/// Mark pixels strictly brighter than `threshold`.
pub fn threshold_mask(luma: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(luma.width(), luma.height(), |x, y| {
        if luma.get_pixel(x, y)[0] > threshold {
            MARKED
        } else {
            CLEAR
        }
    })
}

/// Regions that need a white underprint.
pub fn white_mask(luma: &GrayImage, config: &MaskConfig) -> GrayImage {
    threshold_mask(luma, config.white_threshold)
}

/// Brightest highlights, for metallic foil stamping.
pub fn foil_mask(luma: &GrayImage, config: &MaskConfig) -> GrayImage {
    threshold_mask(luma, config.foil_threshold)
}

/// Emboss regions: Sobel edges above the edge threshold, thickened by a
/// square dilation of radius `spot_uv_edge_size`.
pub fn spot_uv_mask(luma: &GrayImage, config: &MaskConfig) -> GrayImage {
    let gradients = sobel_gradients(luma);
    let cutoff = u16::from(config.spot_uv_edge_threshold) * SOBEL_STEP_GAIN;

    let edges = GrayImage::from_fn(luma.width(), luma.height(), |x, y| {
        if gradients.get_pixel(x, y)[0] > cutoff {
            MARKED
        } else {
            CLEAR
        }
    });

    if config.spot_uv_edge_size == 0 {
        return edges;
    }
    dilate(&edges, Norm::LInf, config.spot_uv_edge_size)
}

/// Number of marked (non-zero) pixels in a mask.
pub fn marked_pixels(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MaskConfig {
        MaskConfig {
            white_threshold: 140,
            foil_threshold: 200,
            spot_uv_edge_size: 2,
            spot_uv_edge_threshold: 40,
        }
    }

    fn ramp(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 255 / (width - 1)) as u8]))
    }

    /// Left half dark, right half bright.
    fn step(width: u32, height: u32, low: u8, high: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            Luma([if x < width / 2 { low } else { high }])
        })
    }

    #[test]
    fn test_threshold_is_strict() {
        let luma = GrayImage::from_fn(3, 1, |x, _| Luma([139 + x as u8]));
        let mask = white_mask(&luma, &config());
        assert_eq!(mask.as_raw(), &vec![0, 0, 255]);
    }

    #[test]
    fn test_masks_are_binary() {
        let luma = ramp(256, 4);
        for mask in [white_mask(&luma, &config()), foil_mask(&luma, &config())] {
            assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 255));
        }
    }

    #[test]
    fn test_foil_is_subset_of_white() {
        let luma = ramp(256, 4);
        let white = white_mask(&luma, &config());
        let foil = foil_mask(&luma, &config());
        for (f, w) in foil.pixels().zip(white.pixels()) {
            if f[0] == 255 {
                assert_eq!(w[0], 255);
            }
        }
        assert!(marked_pixels(&foil) < marked_pixels(&white));
    }

    #[test]
    fn test_threshold_monotonic() {
        let luma = GrayImage::from_fn(64, 64, |x, y| Luma([((x * 31 + y * 17) % 256) as u8]));
        let mut previous = usize::MAX;
        for threshold in (0..=255u8).step_by(5) {
            let count = marked_pixels(&threshold_mask(&luma, threshold));
            assert!(count <= previous, "threshold {threshold}");
            previous = count;
        }
    }

    #[test]
    fn test_spot_uv_flat_image_is_empty() {
        let luma = GrayImage::from_pixel(32, 32, Luma([180]));
        assert_eq!(marked_pixels(&spot_uv_mask(&luma, &config())), 0);
    }

    #[test]
    fn test_spot_uv_marks_strong_edge() {
        let luma = step(40, 10, 20, 220);
        let mask = spot_uv_mask(&luma, &config());

        assert_eq!(mask.dimensions(), (40, 10));
        assert_eq!(mask.get_pixel(20, 5)[0], 255);
        assert_eq!(mask.get_pixel(0, 5)[0], 0);
        assert_eq!(mask.get_pixel(39, 5)[0], 0);
        assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_spot_uv_ignores_weak_edge() {
        let luma = step(40, 10, 100, 130);
        assert_eq!(marked_pixels(&spot_uv_mask(&luma, &config())), 0);
    }

    #[test]
    fn test_spot_uv_dilation_thickens_edges() {
        let luma = step(40, 10, 20, 220);
        let thin = spot_uv_mask(
            &luma,
            &MaskConfig {
                spot_uv_edge_size: 0,
                ..config()
            },
        );
        let thick = spot_uv_mask(&luma, &config());

        // Sobel marks the two columns either side of the step.
        assert_eq!(marked_pixels(&thin), 2 * 10);
        // Radius 2 adds two columns on each side.
        assert_eq!(marked_pixels(&thick), 6 * 10);
    }
}
