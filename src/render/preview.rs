//! 2x2 preview grid of the four print layers.
//!
//! ```text
//! +------------+------------+
//! | main color | white ink  |
//! +------------+------------+
//! | foil (gold)| spot UV    |
//! |            | (cyan)     |
//! +------------+------------+
//! ```

use image::{imageops, GrayImage, Rgb, RgbImage};

use crate::types::Colour;

use super::LayerSet;

/// Map a mask onto a black-to-`tint` ramp.
pub fn colorize(mask: &GrayImage, tint: Colour) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        Rgb(tint.modulate(mask.get_pixel(x, y)[0]))
    })
}

/// Assemble the preview grid for a layer set.
pub fn compose_preview(layers: &LayerSet) -> RgbImage {
    let (width, height) = layers.dimensions();
    let mut canvas = RgbImage::new(width * 2, height * 2);

    let (w, h) = (i64::from(width), i64::from(height));
    imageops::replace(&mut canvas, &layers.main_color, 0, 0);
    imageops::replace(&mut canvas, &colorize(&layers.white_mask, Colour::WHITE), w, 0);
    imageops::replace(&mut canvas, &colorize(&layers.foil_mask, Colour::GOLD), 0, h);
    imageops::replace(&mut canvas, &colorize(&layers.spot_uv_mask, Colour::CYAN), w, h);

    canvas
}
