//! Layer set assembly and PNG output.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use tracing::{debug, instrument};

use crate::error::{LayerError, Result};

use super::mask::{foil_mask, spot_uv_mask, white_mask, MaskConfig};
use super::preview::compose_preview;
use super::recolor::{recolor, Treatment};
use super::CardBase;

pub const MAIN_COLOR_FILE: &str = "main_color.png";
pub const WHITE_LAYER_FILE: &str = "white_layer.png";
pub const FOIL_LAYER_FILE: &str = "foil_layer.png";
pub const SPOT_UV_LAYER_FILE: &str = "spot_uv_layer.png";
pub const PREVIEW_FILE: &str = "layer_preview.png";

/// The four print layers for one (theme, variant) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    pub main_color: RgbImage,
    pub white_mask: GrayImage,
    pub foil_mask: GrayImage,
    pub spot_uv_mask: GrayImage,
}

impl LayerSet {
    /// Derive all layers from a normalized card base.
    pub fn render(base: &CardBase, treatment: &Treatment, masks: &MaskConfig) -> Self {
        let luma = base.luma();
        Self {
            main_color: recolor(luma, treatment),
            white_mask: white_mask(luma, masks),
            foil_mask: foil_mask(luma, masks),
            spot_uv_mask: spot_uv_mask(luma, masks),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.main_color.dimensions()
    }

    /// Write the four layers into `output.layers_dir` and the preview grid
    /// into `output.preview_dir`, creating both directories.
    ///
    /// The preview is composed before anything touches the disk.
    #[instrument(skip_all, fields(layers = %output.layers_dir.display()))]
    pub fn write(&self, output: &LayerOutput) -> Result<WrittenLayers> {
        let preview = compose_preview(self);

        create_dir(&output.layers_dir)?;
        create_dir(&output.preview_dir)?;

        let written = WrittenLayers {
            main_color: output.layers_dir.join(MAIN_COLOR_FILE),
            white_layer: output.layers_dir.join(WHITE_LAYER_FILE),
            foil_layer: output.layers_dir.join(FOIL_LAYER_FILE),
            spot_uv_layer: output.layers_dir.join(SPOT_UV_LAYER_FILE),
            preview: output.preview_dir.join(PREVIEW_FILE),
        };

        saved(&written.main_color, self.main_color.save(&written.main_color))?;
        saved(&written.white_layer, self.white_mask.save(&written.white_layer))?;
        saved(&written.foil_layer, self.foil_mask.save(&written.foil_layer))?;
        saved(&written.spot_uv_layer, self.spot_uv_mask.save(&written.spot_uv_layer))?;
        saved(&written.preview, preview.save(&written.preview))?;

        debug!("Layers written");
        Ok(written)
    }
}

/// Destination directories for one layer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOutput {
    pub layers_dir: PathBuf,
    pub preview_dir: PathBuf,
}

impl LayerOutput {
    pub fn new(layers_dir: impl Into<PathBuf>, preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            layers_dir: layers_dir.into(),
            preview_dir: preview_dir.into(),
        }
    }

    /// Same roots, one subdirectory deeper.
    pub fn join(&self, subdir: impl AsRef<Path>) -> Self {
        Self {
            layers_dir: self.layers_dir.join(subdir.as_ref()),
            preview_dir: self.preview_dir.join(subdir.as_ref()),
        }
    }
}

/// Paths of the files produced by [`LayerSet::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLayers {
    pub main_color: PathBuf,
    pub white_layer: PathBuf,
    pub foil_layer: PathBuf,
    pub spot_uv_layer: PathBuf,
    pub preview: PathBuf,
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| LayerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })
}

fn saved(path: &Path, result: image::ImageResult<()>) -> Result<()> {
    result.map_err(|e| LayerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}
