//! tcg-layers - Print layer generator for trading cards
//!
//! Turns one piece of card artwork into the separations a print shop needs:
//! a theme-recoloured main layer plus white-ink, foil and spot-UV masks.
//! Card fronts can be classified (theme and variant) from their colours.

pub mod batch;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod output;
pub mod render;
pub mod types;

pub use batch::{plan, run_batch, select_themes, BatchOptions, Job, VariantSelection};
pub use config::{mm_to_px, PrintConfig, CONFIG_FILENAME};
pub use detect::{detect, BorderStats, Detection, Overrides, ThemeMatch};
pub use error::{LayerError, Result};
pub use render::{CardBase, LayerOutput, LayerSet, MaskConfig, Treatment, WrittenLayers};
pub use types::{Colour, Theme, ThemeTable, VariantKind};
