//! Variant classification from border colour statistics.

use std::collections::HashSet;

use image::RgbImage;
use serde::Serialize;

use crate::config::DetectionConfig;
use crate::types::VariantKind;

/// Minimum border band width in pixels.
const MIN_BAND: u32 = 5;

/// Colour statistics of the outer border band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderStats {
    /// Band width in pixels.
    pub band: u32,
    /// Number of sampled pixels (corners are counted twice).
    pub pixels: usize,
    /// Mean of the per-channel variances.
    pub edge_variance: f64,
    /// Variance of the three channel means (how strongly tinted the border
    /// is overall). Reported only; it does not drive classification.
    pub channel_mean_variance: f64,
    /// Mean of `(max - min) / max` per pixel.
    pub mean_saturation: f64,
    /// Variance of per-pixel brightness (channel mean).
    pub brightness_variance: f64,
    /// Brightest minus darkest pixel brightness.
    pub contrast: f64,
    /// Distinct RGB triples in the band.
    pub unique_colors: usize,
}

/// Running sums for population mean and variance.
#[derive(Default)]
struct Moments {
    n: f64,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn push(&mut self, v: f64) {
        self.n += 1.0;
        self.sum += v;
        self.sum_sq += v * v;
    }

    fn mean(&self) -> f64 {
        if self.n == 0.0 {
            0.0
        } else {
            self.sum / self.n
        }
    }

    fn variance(&self) -> f64 {
        if self.n == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.n - mean * mean).max(0.0)
    }
}

/// Border band width for an image: `max(5, min(w, h) * fraction)`, never
/// wider than the shorter side.
pub fn band_width(width: u32, height: u32, fraction: f64) -> u32 {
    let short = width.min(height);
    let band = ((short as f64 * fraction) as u32).max(MIN_BAND);
    band.min(short)
}

impl BorderStats {
    /// Measure the top, bottom, left and right strips of `image`.
    pub fn measure(image: &RgbImage, fraction: f64) -> Self {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Self::default();
        }
        let band = band_width(width, height, fraction);

        let mut channels: [Moments; 3] = Default::default();
        let mut brightness = Moments::default();
        let mut saturation = 0.0;
        let mut min_brightness = f64::MAX;
        let mut max_brightness = f64::MIN;
        let mut unique = HashSet::new();
        let mut pixels = 0usize;

        let strips = [
            (0, 0, width, band),
            (0, height - band, width, height),
            (0, 0, band, height),
            (width - band, 0, width, height),
        ];

        for (x0, y0, x1, y1) in strips {
            for y in y0..y1 {
                for x in x0..x1 {
                    let rgb = image.get_pixel(x, y).0;
                    for (moments, &c) in channels.iter_mut().zip(rgb.iter()) {
                        moments.push(c as f64);
                    }

                    let max = *rgb.iter().max().unwrap_or(&0) as f64;
                    let min = *rgb.iter().min().unwrap_or(&0) as f64;
                    if max > 0.0 {
                        saturation += (max - min) / max;
                    }

                    let b = rgb.iter().map(|&c| c as f64).sum::<f64>() / 3.0;
                    brightness.push(b);
                    min_brightness = min_brightness.min(b);
                    max_brightness = max_brightness.max(b);

                    unique.insert(rgb);
                    pixels += 1;
                }
            }
        }

        let mut means = Moments::default();
        for moments in &channels {
            means.push(moments.mean());
        }

        Self {
            band,
            pixels,
            edge_variance: channels.iter().map(Moments::variance).sum::<f64>() / 3.0,
            channel_mean_variance: means.variance(),
            mean_saturation: saturation / pixels as f64,
            brightness_variance: brightness.variance(),
            contrast: max_brightness - min_brightness,
            unique_colors: unique.len(),
        }
    }

    /// Apply the decision chain. First match wins:
    /// rainbow, then holo, then shiny, otherwise normal.
    pub fn classify(&self, config: &DetectionConfig) -> VariantKind {
        if self.edge_variance > config.rainbow_variance
            && self.unique_colors > config.rainbow_unique_colors
        {
            return VariantKind::Rainbow;
        }

        if self.edge_variance > config.holo_variance {
            return VariantKind::Holo;
        }

        if (self.mean_saturation > config.shiny_saturation
            && self.brightness_variance > config.shiny_brightness_variance)
            || self.contrast > config.shiny_contrast
        {
            return VariantKind::Shiny;
        }

        VariantKind::Normal
    }
}

/// Classify the card variant from its border.
pub fn detect_variant(image: &RgbImage, config: &DetectionConfig) -> VariantKind {
    BorderStats::measure(image, config.border_fraction).classify(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Small deterministic generator for noisy borders.
    struct XorShift(u32);

    impl XorShift {
        fn next(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }
    }

    fn with_border(
        width: u32,
        height: u32,
        interior: [u8; 3],
        mut border: impl FnMut(u32, u32) -> [u8; 3],
    ) -> RgbImage {
        let band = band_width(width, height, DetectionConfig::default().border_fraction);
        RgbImage::from_fn(width, height, |x, y| {
            let on_border =
                x < band || y < band || x >= width - band || y >= height - band;
            Rgb(if on_border { border(x, y) } else { interior })
        })
    }

    fn noisy_border() -> RgbImage {
        let mut rng = XorShift(0x9E37_79B9);
        with_border(200, 280, [128, 128, 128], move |_, _| {
            let mut channel = || {
                let r = rng.next();
                let low = (r & 15) as u8;
                if r & 0x100 != 0 {
                    255 - low
                } else {
                    low
                }
            };
            [channel(), channel(), channel()]
        })
    }

    #[test]
    fn test_band_width() {
        assert_eq!(band_width(744, 1039, 0.06), 44);
        assert_eq!(band_width(40, 40, 0.06), 5);
        assert_eq!(band_width(3, 50, 0.06), 3);
    }

    #[test]
    fn test_uniform_border_is_normal() {
        let img = with_border(200, 280, [10, 200, 30], |_, _| [201, 55, 55]);
        let stats = BorderStats::measure(&img, 0.06);

        assert_eq!(stats.edge_variance, 0.0);
        assert_eq!(stats.contrast, 0.0);
        assert_eq!(stats.unique_colors, 1);
        assert_eq!(stats.classify(&DetectionConfig::default()), VariantKind::Normal);
    }

    #[test]
    fn test_noisy_border_is_rainbow() {
        let img = noisy_border();
        let config = DetectionConfig::default();
        let stats = BorderStats::measure(&img, config.border_fraction);

        assert!(stats.edge_variance > config.rainbow_variance);
        assert!(stats.unique_colors > config.rainbow_unique_colors);
        assert_eq!(detect_variant(&img, &config), VariantKind::Rainbow);
    }

    #[test]
    fn test_two_tone_stripes_are_holo() {
        // High variance but only two colours: not rainbow.
        let img = with_border(200, 280, [128, 128, 128], |x, _| {
            if x % 2 == 0 {
                [0, 0, 0]
            } else {
                [255, 255, 255]
            }
        });
        assert_eq!(
            detect_variant(&img, &DetectionConfig::default()),
            VariantKind::Holo
        );
    }

    #[test]
    fn test_sparse_highlights_are_shiny() {
        let img = with_border(200, 280, [128, 128, 128], |x, y| match (x + y) % 40 {
            0 => [0, 0, 0],
            20 => [255, 255, 255],
            _ => [128, 128, 128],
        });
        let config = DetectionConfig::default();
        let stats = BorderStats::measure(&img, config.border_fraction);

        assert!(stats.edge_variance < config.holo_variance);
        assert!(stats.contrast > config.shiny_contrast);
        assert_eq!(stats.classify(&config), VariantKind::Shiny);
    }

    #[test]
    fn test_precedence_order() {
        let config = DetectionConfig::default();
        let everything = BorderStats {
            edge_variance: 9000.0,
            channel_mean_variance: 5000.0,
            mean_saturation: 0.9,
            brightness_variance: 5000.0,
            contrast: 255.0,
            unique_colors: 5000,
            ..BorderStats::default()
        };
        assert_eq!(everything.classify(&config), VariantKind::Rainbow);

        let no_rainbow = BorderStats {
            unique_colors: 10,
            ..everything
        };
        assert_eq!(no_rainbow.classify(&config), VariantKind::Holo);

        let no_holo = BorderStats {
            edge_variance: 1000.0,
            channel_mean_variance: 100.0,
            ..no_rainbow
        };
        assert_eq!(no_holo.classify(&config), VariantKind::Shiny);

        let saturated_only = BorderStats {
            contrast: 100.0,
            brightness_variance: 100.0,
            ..no_holo
        };
        assert_eq!(saturated_only.classify(&config), VariantKind::Normal);
    }

    #[test]
    fn test_strongly_tinted_uniform_border_is_normal() {
        let img = with_border(200, 280, [128, 128, 128], |_, _| [255, 0, 0]);
        let stats = BorderStats::measure(&img, 0.06);

        assert!(stats.channel_mean_variance > 10_000.0);
        assert_eq!(stats.classify(&DetectionConfig::default()), VariantKind::Normal);
    }

    #[test]
    fn test_tiny_image_does_not_panic() {
        let img = RgbImage::from_pixel(2, 3, Rgb([50, 60, 70]));
        let stats = BorderStats::measure(&img, 0.06);
        assert_eq!(stats.band, 2);
        assert_eq!(stats.classify(&DetectionConfig::default()), VariantKind::Normal);
    }
}
