//! Layer rendering pipeline.
//!
//! raw image -> [`CardBase`] (normalized + luminance) -> [`LayerSet`]
//! (recoloured main layer and masks) -> PNG files and preview grid.

mod base;
mod layers;
mod luminance;
mod mask;
mod normalize;
mod preview;
mod recolor;

pub use base::CardBase;
pub use layers::{
    LayerOutput, LayerSet, WrittenLayers, FOIL_LAYER_FILE, MAIN_COLOR_FILE, PREVIEW_FILE,
    SPOT_UV_LAYER_FILE, WHITE_LAYER_FILE,
};
pub use luminance::{luma, luminance};
pub use mask::{foil_mask, marked_pixels, spot_uv_mask, threshold_mask, white_mask, MaskConfig};
pub use normalize::{centre_crop, normalize, CropRect};
pub use preview::{colorize, compose_preview};
pub use recolor::{rainbow_at, recolor, Treatment, RAINBOW_STOPS};
