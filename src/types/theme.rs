//! Theme table: named colour profiles used to recolour card artwork.

use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};

use super::Colour;

/// A named theme colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colour: Colour,
}

impl Theme {
    pub fn new(name: impl Into<String>, colour: Colour) -> Self {
        Self {
            name: name.into(),
            colour,
        }
    }
}

/// Ordered, read-only mapping of theme names to colours.
///
/// Order matters: it decides batch ordering and breaks ties when matching a
/// detected colour to the nearest theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTable {
    themes: Vec<Theme>,
}

impl ThemeTable {
    /// Build a table from explicit entries.
    ///
    /// Names are lowercased; duplicates and empty tables are rejected. Names
    /// become output directory names, so path separators and a leading `.`
    /// are rejected too.
    pub fn new(themes: Vec<Theme>) -> Result<Self> {
        if themes.is_empty() {
            return Err(LayerError::Config {
                message: "Theme table is empty".to_string(),
                help: Some("Define at least one theme or remove the themes key".to_string()),
            });
        }

        let mut table: Vec<Theme> = Vec::with_capacity(themes.len());
        for theme in themes {
            let name = theme.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(LayerError::Config {
                    message: "Theme with an empty name".to_string(),
                    help: None,
                });
            }
            if name == "all" || name == "rainbow" {
                return Err(LayerError::Config {
                    message: format!("'{}' is reserved and cannot be a theme name", name),
                    help: None,
                });
            }
            if name.contains(['/', '\\']) || name.starts_with('.') {
                return Err(LayerError::Config {
                    message: format!("Theme name '{}' is not a plain directory name", name),
                    help: Some(
                        "Theme names must not contain '/' or '\\' or start with '.'".to_string(),
                    ),
                });
            }
            if table.iter().any(|t| t.name == name) {
                return Err(LayerError::Config {
                    message: format!("Duplicate theme: {}", name),
                    help: None,
                });
            }
            table.push(Theme::new(name, theme.colour));
        }

        Ok(Self { themes: table })
    }

    /// The builtin trading-card energy types.
    pub fn builtin() -> Self {
        let themes = [
            ("grass", Colour::rgb(78, 159, 61)),
            ("fire", Colour::rgb(201, 55, 55)),
            ("water", Colour::rgb(60, 120, 216)),
            ("lightning", Colour::rgb(240, 200, 40)),
            ("psychic", Colour::rgb(170, 70, 180)),
            ("fighting", Colour::rgb(150, 80, 50)),
            ("darkness", Colour::rgb(40, 40, 40)),
            ("metal", Colour::rgb(180, 180, 180)),
            ("dragon", Colour::rgb(90, 140, 60)),
            ("fairy", Colour::rgb(240, 160, 200)),
            ("colorless", Colour::rgb(210, 210, 210)),
        ];

        Self {
            themes: themes
                .into_iter()
                .map(|(name, colour)| Theme::new(name, colour))
                .collect(),
        }
    }

    /// Look up a theme by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&Theme> {
        let name = name.trim();
        self.themes.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Look up a theme colour by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Colour> {
        self.find(name).map(|t| t.colour)
    }

    /// Look up a theme, failing with [`LayerError::UnknownTheme`].
    ///
    /// The returned entry carries the table's canonical name.
    pub fn theme(&self, name: &str) -> Result<&Theme> {
        self.find(name).ok_or_else(|| LayerError::UnknownTheme {
            name: name.to_string(),
            available: self.available(),
        })
    }

    /// Look up a theme colour, failing with [`LayerError::UnknownTheme`].
    pub fn resolve(&self, name: &str) -> Result<Colour> {
        self.theme(name).map(|t| t.colour)
    }

    /// Whether a theme with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Find the theme closest to `colour` by Euclidean RGB distance.
    ///
    /// Ties go to the theme listed first.
    pub fn nearest(&self, colour: Colour) -> Option<(&Theme, f64)> {
        let mut best: Option<(&Theme, f64)> = None;
        for theme in &self.themes {
            let distance = theme.colour.distance(colour);
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((theme, distance)),
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    /// Comma-separated theme names, for error help text.
    pub fn available(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
