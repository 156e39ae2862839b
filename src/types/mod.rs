//! Core domain types for tcg-layers.
//!
//! - `Colour` - opaque RGB colour values
//! - `ThemeTable` - ordered theme name to colour mapping
//! - `VariantKind` - Normal / Shiny / Holo / Rainbow treatments

mod colour;
mod theme;
mod variant;

pub use colour::Colour;
pub use theme::{Theme, ThemeTable};
pub use variant::VariantKind;
