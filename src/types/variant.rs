//! Card variant (visual treatment) type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};

/// Visual treatment applied to a theme colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    #[default]
    Normal,
    Shiny,
    Holo,
    /// Theme-agnostic: the theme colour is replaced by a hue gradient.
    Rainbow,
}

impl VariantKind {
    pub const ALL: [VariantKind; 4] = [
        VariantKind::Normal,
        VariantKind::Shiny,
        VariantKind::Holo,
        VariantKind::Rainbow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Normal => "normal",
            VariantKind::Shiny => "shiny",
            VariantKind::Holo => "holo",
            VariantKind::Rainbow => "rainbow",
        }
    }

    /// Whether this variant ignores the theme colour.
    pub fn is_theme_agnostic(self) -> bool {
        self == VariantKind::Rainbow
    }

    /// Output directory name for a theme rendered with this variant.
    ///
    /// `fire` + normal -> `fire`, `fire` + holo -> `fire_holo`, rainbow -> `rainbow`.
    pub fn dir_name(self, theme: &str) -> String {
        match self {
            VariantKind::Normal => theme.to_string(),
            VariantKind::Rainbow => "rainbow".to_string(),
            other => format!("{}_{}", theme, other.as_str()),
        }
    }

    /// Output directory name for a classified card front.
    ///
    /// Fronts always keep their theme, so `fire` + rainbow -> `fire_rainbow`.
    pub fn front_dir_name(self, theme: &str) -> String {
        match self {
            VariantKind::Normal => theme.to_string(),
            other => format!("{}_{}", theme, other.as_str()),
        }
    }
}

impl FromStr for VariantKind {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        VariantKind::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| LayerError::UnknownVariant {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
