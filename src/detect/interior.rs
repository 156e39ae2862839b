//! Type (theme) classification from the dominant interior colour.

use image::RgbImage;
use serde::Serialize;
use tracing::warn;

use crate::config::DetectionConfig;
use crate::types::{Colour, ThemeTable};

/// Outcome of matching the interior colour against the theme table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeMatch {
    pub theme: String,
    /// Closest theme to the average colour, kept even when it was too far
    /// away to be chosen.
    pub nearest: Option<String>,
    /// Distance from the average colour to `nearest`; `None` when there was
    /// no interior to measure.
    pub distance: Option<f64>,
    pub average: Option<Colour>,
    /// True when no theme was close enough and the default was used.
    pub fallback: bool,
}

/// Per-channel mean of the interior, excluding `min(w, h) * margin_fraction`
/// pixels on every side. Means are truncated to integers.
pub fn interior_average(image: &RgbImage, margin_fraction: f64) -> Option<Colour> {
    let (width, height) = image.dimensions();
    let margin = (width.min(height) as f64 * margin_fraction) as u32;
    if width <= margin * 2 || height <= margin * 2 {
        return None;
    }

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in margin..height - margin {
        for x in margin..width - margin {
            for (sum, &c) in sums.iter_mut().zip(image.get_pixel(x, y).0.iter()) {
                *sum += c as u64;
            }
            count += 1;
        }
    }

    let [r, g, b] = sums.map(|s| (s / count) as u8);
    Some(Colour::rgb(r, g, b))
}

/// Pick the theme whose colour is nearest the interior average.
///
/// Falls back to `default_theme` when the interior is empty or every theme
/// is further than `max_theme_distance`. Never fails. The default theme is
/// reported under its canonical name from `themes`.
pub fn detect_theme(
    image: &RgbImage,
    themes: &ThemeTable,
    config: &DetectionConfig,
    default_theme: &str,
) -> ThemeMatch {
    let default_name = themes
        .find(default_theme)
        .map_or_else(|| default_theme.to_string(), |t| t.name.clone());
    let fallback = |average: Option<Colour>, nearest: Option<(String, f64)>| {
        let (nearest, distance) = nearest.unzip();
        ThemeMatch {
            theme: default_name.clone(),
            nearest,
            distance,
            average,
            fallback: true,
        }
    };

    let Some(average) = interior_average(image, config.interior_margin_fraction) else {
        warn!(default_theme = %default_name, "No interior to sample, using default theme");
        return fallback(None, None);
    };

    match themes.nearest(average) {
        Some((theme, distance)) if distance <= config.max_theme_distance => ThemeMatch {
            theme: theme.name.clone(),
            nearest: Some(theme.name.clone()),
            distance: Some(distance),
            average: Some(average),
            fallback: false,
        },
        Some((theme, distance)) => {
            warn!(
                %average,
                nearest = %theme.name,
                distance,
                default_theme = %default_name,
                "No theme close to interior colour, using default theme"
            );
            fallback(Some(average), Some((theme.name.clone(), distance)))
        }
        None => fallback(Some(average), None),
    }
}
