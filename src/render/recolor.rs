//! Luminance-preserving recolouring.
//!
//! The main colour layer is `colour * luma / 255` per channel, so white
//! artwork becomes the full theme colour and black stays black. Holo and
//! rainbow treatments vary the colour along the image diagonal.

use image::{GrayImage, Rgb, RgbImage};
use tracing::debug;

use crate::config::PrintConfig;
use crate::types::{Colour, VariantKind};

/// Reference stops of the rainbow gradient. The gradient is a closed cycle,
/// so the last stop blends back into the first.
pub const RAINBOW_STOPS: [Colour; 6] = [
    Colour::rgb(255, 0, 0),
    Colour::rgb(255, 220, 0),
    Colour::rgb(0, 200, 80),
    Colour::rgb(0, 110, 255),
    Colour::rgb(140, 60, 220),
    Colour::rgb(255, 100, 180),
];

/// How a theme colour is applied to the luminance map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Treatment {
    /// One colour everywhere (normal and shiny cards).
    Solid(Colour),
    /// Theme colour with its hue rotated by up to `hue_span` degrees across
    /// the diagonal. `base` is already lifted to the holo saturation floor.
    Holo { base: Colour, hue_span: f32 },
    /// Rainbow gradient; no theme colour.
    Rainbow,
}

impl Treatment {
    /// Resolve the treatment for `variant` applied to `theme`.
    ///
    /// Rainbow ignores `theme`.
    pub fn for_variant(variant: VariantKind, theme: Colour, config: &PrintConfig) -> Self {
        match variant {
            VariantKind::Normal => Treatment::Solid(theme),
            VariantKind::Shiny => Treatment::Solid(
                theme.boost(config.shiny.saturation_boost, config.shiny.brightness_boost),
            ),
            VariantKind::Holo => Treatment::Holo {
                base: theme.with_min_saturation(config.holo.min_saturation),
                hue_span: config.holo.hue_span_degrees,
            },
            VariantKind::Rainbow => Treatment::Rainbow,
        }
    }

    /// Colour for every diagonal index `x + y` of a `width` x `height` image.
    fn diagonal_colours(&self, width: u32, height: u32) -> Vec<Colour> {
        let count = (width + height).saturating_sub(1) as usize;
        (0..count)
            .map(|d| {
                let t = diagonal_position(d as u32, width, height);
                match *self {
                    Treatment::Solid(colour) => colour,
                    Treatment::Holo { base, hue_span } => base.rotate_hue(hue_span * t),
                    Treatment::Rainbow => rainbow_at(t),
                }
            })
            .collect()
    }
}

/// Normalized position of diagonal `d`: 0 at the top-left corner, 1 at the
/// bottom-right.
fn diagonal_position(d: u32, width: u32, height: u32) -> f32 {
    let last = (width + height).saturating_sub(2);
    if last == 0 {
        0.0
    } else {
        d as f32 / last as f32
    }
}

/// Colour of the closed rainbow cycle at `t` in [0, 1].
pub fn rainbow_at(t: f32) -> Colour {
    let n = RAINBOW_STOPS.len();
    let pos = t.clamp(0.0, 1.0) * n as f32;
    let segment = pos.floor();
    let i = segment as usize % n;
    RAINBOW_STOPS[i].mix(RAINBOW_STOPS[(i + 1) % n], pos - segment)
}

/// Apply `treatment` to a luminance map, producing the main colour layer.
pub fn recolor(luma: &GrayImage, treatment: &Treatment) -> RgbImage {
    let (width, height) = luma.dimensions();

    if let Treatment::Solid(colour) = *treatment {
        return RgbImage::from_fn(width, height, |x, y| {
            Rgb(colour.modulate(luma.get_pixel(x, y)[0]))
        });
    }

    let diagonal = treatment.diagonal_colours(width, height);
    debug!(steps = diagonal.len(), ?treatment, "Precomputed diagonal colours");

    RgbImage::from_fn(width, height, |x, y| {
        let colour = diagonal[(x + y) as usize];
        Rgb(colour.modulate(luma.get_pixel(x, y)[0]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn flat(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    #[test]
    fn test_white_yields_theme_colour() {
        let fire = Colour::rgb(201, 55, 55);
        let out = recolor(&flat(8, 6, 255), &Treatment::Solid(fire));
        assert!(out.pixels().all(|p| p.0 == [201, 55, 55]));
    }

    #[test]
    fn test_black_stays_black() {
        let config = PrintConfig::default();
        for variant in VariantKind::ALL {
            let treatment = Treatment::for_variant(variant, Colour::rgb(78, 159, 61), &config);
            let out = recolor(&flat(8, 6, 0), &treatment);
            assert!(out.pixels().all(|p| p.0 == [0, 0, 0]), "{variant}");
        }
    }

    #[test]
    fn test_midtones_interpolate() {
        let out = recolor(&flat(1, 1, 128), &Treatment::Solid(Colour::rgb(200, 100, 0)));
        assert_eq!(out.get_pixel(0, 0).0, [100, 50, 0]);
    }

    #[test]
    fn test_output_matches_input_dimensions() {
        let treatment = Treatment::for_variant(
            VariantKind::Holo,
            Colour::rgb(60, 120, 216),
            &PrintConfig::default(),
        );
        let out = recolor(&flat(13, 7, 200), &treatment);
        assert_eq!(out.dimensions(), (13, 7));
    }

    #[test]
    fn test_shiny_boosts_theme_colour() {
        let config = PrintConfig::default();
        let grass = Colour::rgb(78, 159, 61);
        match Treatment::for_variant(VariantKind::Shiny, grass, &config) {
            Treatment::Solid(c) => {
                assert_ne!(c, grass);
                assert!(c.g > grass.g);
            }
            other => panic!("unexpected treatment {other:?}"),
        }
    }

    #[test]
    fn test_rainbow_ignores_theme() {
        let config = PrintConfig::default();
        let luma = GrayImage::from_fn(20, 30, |x, y| Luma([(x * 7 + y * 3) as u8]));

        let fire = Treatment::for_variant(VariantKind::Rainbow, Colour::rgb(201, 55, 55), &config);
        let water = Treatment::for_variant(VariantKind::Rainbow, Colour::rgb(60, 120, 216), &config);

        assert_eq!(recolor(&luma, &fire), recolor(&luma, &water));
    }

    #[test]
    fn test_rainbow_cycle_endpoints() {
        assert_eq!(rainbow_at(0.0), RAINBOW_STOPS[0]);
        assert_eq!(rainbow_at(1.0), RAINBOW_STOPS[0]);
        assert_eq!(rainbow_at(1.0 / 6.0), RAINBOW_STOPS[1]);
        assert_eq!(rainbow_at(0.5), RAINBOW_STOPS[3]);
    }

    #[test]
    fn test_rainbow_spans_multiple_hues() {
        let out = recolor(&flat(60, 60, 255), &Treatment::Rainbow);
        let top_left = out.get_pixel(0, 0).0;
        let centre = out.get_pixel(30, 30).0;
        assert_eq!(top_left, [255, 0, 0]);
        assert_ne!(top_left, centre);
    }

    #[test]
    fn test_holo_gradient_is_smooth() {
        let treatment = Treatment::Holo {
            base: Colour::rgb(255, 0, 0),
            hue_span: 180.0,
        };
        let out = recolor(&flat(50, 50, 255), &treatment);

        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0]);
        // Opposite corner is the complementary hue.
        assert_eq!(out.get_pixel(49, 49).0, [0, 255, 255]);

        // Neighbouring pixels differ only slightly.
        for x in 1..50 {
            let a = Colour::from(out.get_pixel(x - 1, 0).0);
            let b = Colour::from(out.get_pixel(x, 0).0);
            assert!(a.distance(b) < 40.0, "jump at x={x}");
        }
    }

    #[test]
    fn test_holo_shifts_grey_themes() {
        let config = PrintConfig::default();
        let luma = flat(40, 40, 255);
        for grey in [
            Colour::rgb(180, 180, 180),
            Colour::rgb(210, 210, 210),
            Colour::rgb(40, 40, 40),
        ] {
            let holo = Treatment::for_variant(VariantKind::Holo, grey, &config);
            let normal = Treatment::for_variant(VariantKind::Normal, grey, &config);
            let (holo, normal) = (recolor(&luma, &holo), recolor(&luma, &normal));
            assert_ne!(holo, normal, "{grey}");
            assert_ne!(holo.get_pixel(0, 0), holo.get_pixel(39, 39), "{grey}");
        }
    }

    #[test]
    fn test_single_pixel_gradient() {
        let out = recolor(&flat(1, 1, 255), &Treatment::Rainbow);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0]);
    }
}
