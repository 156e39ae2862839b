//! Card front classification.
//!
//! The variant comes from colour statistics of the outer border band, the
//! theme from the average colour of the interior. Either can be overridden,
//! in which case the corresponding classifier is skipped entirely.

mod border;
mod interior;

pub use border::{band_width, detect_variant, BorderStats};
pub use interior::{detect_theme, interior_average, ThemeMatch};

use image::RgbImage;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::PrintConfig;
use crate::error::Result;
use crate::types::{ThemeTable, VariantKind};

/// User-supplied values that replace detection results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub theme: Option<String>,
    pub variant: Option<VariantKind>,
}

/// Classification of a card front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub variant: VariantKind,
    pub theme: String,
    /// Border measurements; absent when the variant was overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStats>,
    /// Interior match; absent when the theme was overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_match: Option<ThemeMatch>,
    pub variant_overridden: bool,
    pub theme_overridden: bool,
}

impl Detection {
    /// Output directory name for the detected front, under `fronts/`.
    pub fn dir_name(&self) -> String {
        self.variant.front_dir_name(&self.theme)
    }
}

/// Classify a normalized card front.
///
/// A theme override must name a theme in `themes`; it is stored in the
/// table's canonical (lowercase) form.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn detect(
    image: &RgbImage,
    themes: &ThemeTable,
    config: &PrintConfig,
    overrides: &Overrides,
) -> Result<Detection> {
    let (variant, border) = match overrides.variant {
        Some(variant) => (variant, None),
        None => {
            let stats = BorderStats::measure(image, config.detection.border_fraction);
            debug!(?stats, "Border measured");
            (stats.classify(&config.detection), Some(stats))
        }
    };

    let (theme, theme_match) = match &overrides.theme {
        Some(name) => (themes.theme(name)?.name.clone(), None),
        None => {
            let matched = detect_theme(image, themes, &config.detection, &config.default_theme);
            (matched.theme.clone(), Some(matched))
        }
    };

    debug!(variant = %variant, theme = %theme, "Card classified");

    Ok(Detection {
        variant,
        theme,
        border,
        theme_match,
        variant_overridden: overrides.variant.is_some(),
        theme_overridden: overrides.theme.is_some(),
    })
}
