//! Normalized card base shared by every layer job.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, info, instrument};

use crate::config::PrintConfig;
use crate::error::{LayerError, Result};

use super::luminance::luminance;
use super::normalize::normalize;

/// Artwork cropped and resized to print dimensions, plus its luminance map.
///
/// Immutable once built; jobs borrow it read-only, so it can be shared
/// across worker threads without locking.
#[derive(Debug, Clone)]
pub struct CardBase {
    image: RgbImage,
    luma: GrayImage,
}

impl CardBase {
    /// Load, normalize and measure an image file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, config: &PrintConfig) -> Result<Self> {
        let img = image::open(path).map_err(|e| LayerError::InvalidInput {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");

        Self::from_dynamic(img, config).map_err(|e| match e {
            LayerError::InvalidImage { message } => LayerError::InvalidInput {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Normalize an already-decoded image of any colour mode.
    pub fn from_dynamic(image: DynamicImage, config: &PrintConfig) -> Result<Self> {
        Self::from_rgb(&image.to_rgb8(), config)
    }

    /// Normalize an RGB image to the configured print size.
    pub fn from_rgb(image: &RgbImage, config: &PrintConfig) -> Result<Self> {
        let (target_w, target_h) = config.target_size();
        let image = normalize(image, config.aspect_ratio(), target_w, target_h)?;
        debug!(
            width = target_w,
            height = target_h,
            dpi = config.dpi,
            "Normalized to print size"
        );

        let luma = luminance(&image);
        Ok(Self { image, luma })
    }

    /// The normalized RGB artwork.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Luminance map of the normalized artwork.
    pub fn luma(&self) -> &GrayImage {
        &self.luma
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
