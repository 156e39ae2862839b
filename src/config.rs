//! Print configuration (tcg-layers.yaml) parsing.
//!
//! The configuration holds card geometry, layer thresholds, variant tuning,
//! detection thresholds and the theme table. It is loaded once and passed by
//! reference into every stage; nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};
use crate::render::MaskConfig;
use crate::types::{Theme, ThemeTable};

/// Default configuration filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "tcg-layers.yaml";

const MM_PER_INCH: f64 = 25.4;

/// Print and processing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Physical card width in millimetres.
    pub card_width_mm: f64,

    /// Physical card height in millimetres.
    pub card_height_mm: f64,

    /// Print resolution in dots per inch.
    pub dpi: u32,

    /// Luminance above which white ink is laid down.
    pub white_threshold: u8,

    /// Luminance above which foil is stamped.
    pub foil_threshold: u8,

    /// Dilation radius applied to spot UV edges.
    pub spot_uv_edge_size: u8,

    /// Minimum step (in grey levels) counted as a spot UV edge.
    pub spot_uv_edge_threshold: u8,

    pub shiny: ShinyConfig,

    pub holo: HoloConfig,

    pub detection: DetectionConfig,

    /// Theme used when detection cannot find a close match.
    pub default_theme: String,

    pub paths: PathsConfig,

    /// Replaces the builtin theme table when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<Theme>>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            card_width_mm: 63.0,
            card_height_mm: 88.0,
            dpi: 300,
            white_threshold: 140,
            foil_threshold: 200,
            spot_uv_edge_size: 2,
            spot_uv_edge_threshold: 40,
            shiny: ShinyConfig::default(),
            holo: HoloConfig::default(),
            detection: DetectionConfig::default(),
            default_theme: "grass".to_string(),
            paths: PathsConfig::default(),
            themes: None,
        }
    }
}

/// Colour boost applied to the theme colour for shiny cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShinyConfig {
    pub saturation_boost: f32,
    pub brightness_boost: f32,
}

impl Default for ShinyConfig {
    fn default() -> Self {
        Self {
            saturation_boost: 1.3,
            brightness_boost: 1.2,
        }
    }
}

/// Hue sweep for holo cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoloConfig {
    /// Total hue rotation from the top-left to the bottom-right corner.
    pub hue_span_degrees: f32,
    /// Saturation given to greyer theme colours before the sweep, so grey
    /// themes still shift colour.
    pub min_saturation: f32,
}

impl Default for HoloConfig {
    fn default() -> Self {
        Self {
            hue_span_degrees: 180.0,
            min_saturation: 0.25,
        }
    }
}

/// Thresholds for variant and type detection on card fronts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Border band width as a fraction of the shorter side.
    pub border_fraction: f64,
    /// Interior margin excluded from type detection, as a fraction of the shorter side.
    pub interior_margin_fraction: f64,
    pub rainbow_variance: f64,
    pub rainbow_unique_colors: usize,
    pub holo_variance: f64,
    pub shiny_saturation: f64,
    pub shiny_brightness_variance: f64,
    pub shiny_contrast: f64,
    /// Matches further than this from every theme fall back to the default theme.
    pub max_theme_distance: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            border_fraction: 0.06,
            interior_margin_fraction: 0.10,
            rainbow_variance: 5000.0,
            rainbow_unique_colors: 100,
            holo_variance: 3500.0,
            shiny_saturation: 0.35,
            shiny_brightness_variance: 1200.0,
            shiny_contrast: 180.0,
            max_theme_distance: 120.0,
        }
    }
}

/// Default input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub backside_input: PathBuf,
    pub front_input: PathBuf,
    pub layers_dir: PathBuf,
    pub preview_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            backside_input: PathBuf::from("input/card_base.png"),
            front_input: PathBuf::from("input/card_front.png"),
            layers_dir: PathBuf::from("output/layers"),
            preview_dir: PathBuf::from("output/preview"),
        }
    }
}

impl PrintConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LayerError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read configuration: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| LayerError::Config {
            message: format!("Invalid configuration: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `tcg-layers.yaml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize to YAML (used by `init`).
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LayerError::Config {
            message: format!("Failed to serialize configuration: {}", e),
            help: None,
        })
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String, help: &str| LayerError::Config {
            message,
            help: Some(help.to_string()),
        };

        for (name, mm) in [
            ("card_width_mm", self.card_width_mm),
            ("card_height_mm", self.card_height_mm),
        ] {
            if !mm.is_finite() || mm <= 0.0 {
                return Err(invalid(
                    format!("{} must be a positive number, got {}", name, mm),
                    "Standard cards are 63 x 88 mm",
                ));
            }
        }

        if self.dpi == 0 {
            return Err(invalid("dpi must be positive".to_string(), "Use 300 for print"));
        }

        let (w, h) = self.target_size();
        if w == 0 || h == 0 {
            return Err(invalid(
                format!("Card size resolves to {}x{} px", w, h),
                "Increase the dpi or the card dimensions",
            ));
        }

        for (name, boost) in [
            ("shiny.saturation_boost", self.shiny.saturation_boost),
            ("shiny.brightness_boost", self.shiny.brightness_boost),
        ] {
            if !boost.is_finite() || boost < 0.0 {
                return Err(invalid(
                    format!("{} must be a non-negative number, got {}", name, boost),
                    "1.0 leaves the theme colour unchanged",
                ));
            }
        }

        if !self.holo.hue_span_degrees.is_finite() {
            return Err(invalid(
                "holo.hue_span_degrees must be finite".to_string(),
                "Use a value such as 180",
            ));
        }
        if !(0.0..=1.0).contains(&self.holo.min_saturation) {
            return Err(invalid(
                format!(
                    "holo.min_saturation must be between 0 and 1, got {}",
                    self.holo.min_saturation
                ),
                "0 disables the floor",
            ));
        }

        for (name, fraction) in [
            ("detection.border_fraction", self.detection.border_fraction),
            (
                "detection.interior_margin_fraction",
                self.detection.interior_margin_fraction,
            ),
        ] {
            if !(0.0..0.5).contains(&fraction) {
                return Err(invalid(
                    format!("{} must be in [0, 0.5), got {}", name, fraction),
                    "Fractions are relative to the shorter image side",
                ));
            }
        }

        let table = self.theme_table()?;
        table.resolve(&self.default_theme)?;

        Ok(())
    }

    /// Target pixel dimensions: `floor(mm / 25.4 * dpi)` per axis.
    pub fn target_size(&self) -> (u32, u32) {
        (
            mm_to_px(self.card_width_mm, self.dpi),
            mm_to_px(self.card_height_mm, self.dpi),
        )
    }

    /// Target width / height ratio from the physical card size.
    pub fn aspect_ratio(&self) -> f64 {
        self.card_width_mm / self.card_height_mm
    }

    /// Threshold parameters for the mask generators.
    pub fn mask_config(&self) -> MaskConfig {
        MaskConfig {
            white_threshold: self.white_threshold,
            foil_threshold: self.foil_threshold,
            spot_uv_edge_size: self.spot_uv_edge_size,
            spot_uv_edge_threshold: self.spot_uv_edge_threshold,
        }
    }

    /// The configured theme table, or the builtin one.
    pub fn theme_table(&self) -> Result<ThemeTable> {
        match &self.themes {
            Some(themes) => ThemeTable::new(themes.clone()),
            None => Ok(ThemeTable::builtin()),
        }
    }

    /// Point both output directories below `root` (`root/layers`, `root/preview`).
    pub fn with_output_root(mut self, root: &Path) -> Self {
        self.paths.layers_dir = root.join("layers");
        self.paths.preview_dir = root.join("preview");
        self
    }
}

/// Convert millimetres to pixels at the given DPI, truncating.
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64) as u32
}
