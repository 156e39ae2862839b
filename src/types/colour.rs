//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use palette::{Hsv, IntoColor, ShiftHue, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};

/// An opaque RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Foil preview tint.
    pub const GOLD: Self = Self::rgb(255, 215, 0);

    /// Spot UV preview tint.
    pub const CYAN: Self = Self::rgb(0, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RRGGBB` (6 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid_hex(s));
        }

        match hex.len() {
            3 => {
                // #RGB -> #RRGGBB
                let mut digits = [0u8; 3];
                for (slot, c) in digits.iter_mut().zip(hex.chars()) {
                    *slot = parse_hex_digit(c)?;
                }
                let [r, g, b] = digits;
                Ok(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                Ok(Self::rgb(r, g, b))
            }
            _ => Err(invalid_hex(s)),
        }
    }

    /// Convert to an RGB array.
    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Colour) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Scale every channel by `luma / 255`, truncating.
    ///
    /// `luma == 255` returns the colour unchanged, `luma == 0` returns black.
    #[inline]
    pub fn modulate(self, luma: u8) -> [u8; 3] {
        let l = luma as u32;
        [
            (self.r as u32 * l / 255) as u8,
            (self.g as u32 * l / 255) as u8,
            (self.b as u32 * l / 255) as u8,
        ]
    }

    /// Multiply saturation and value in HSV space, clamping both to [0, 1].
    pub fn boost(self, saturation: f32, brightness: f32) -> Colour {
        let mut hsv: Hsv = self.to_srgb().into_color();
        hsv.saturation = (hsv.saturation * saturation).clamp(0.0, 1.0);
        hsv.value = (hsv.value * brightness).clamp(0.0, 1.0);
        Self::from_srgb(hsv.into_color())
    }

    /// Rotate the hue by `degrees`, keeping saturation and value.
    pub fn rotate_hue(self, degrees: f32) -> Colour {
        let hsv: Hsv = self.to_srgb().into_color();
        Self::from_srgb(hsv.shift_hue(degrees).into_color())
    }

    /// Raise the HSV saturation to at least `floor`, keeping hue and value.
    ///
    /// Greys have hue 0, so a lifted grey picks up a red tint.
    pub fn with_min_saturation(self, floor: f32) -> Colour {
        let mut hsv: Hsv = self.to_srgb().into_color();
        if hsv.saturation >= floor {
            return self;
        }
        hsv.saturation = floor.clamp(0.0, 1.0);
        Self::from_srgb(hsv.into_color())
    }

    /// Mix two colours by a factor (0.0 = this colour, 1.0 = `other`).
    pub fn mix(self, other: Colour, factor: f32) -> Colour {
        let factor = factor.clamp(0.0, 1.0);
        let inv = 1.0 - factor;
        let channel = |a: u8, b: u8| (a as f32 * inv + b as f32 * factor).round() as u8;

        Colour::rgb(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    fn to_srgb(self) -> Srgb<f32> {
        Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    fn from_srgb(rgb: Srgb<f32>) -> Colour {
        let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Colour::rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
    }
}

impl From<[u8; 3]> for Colour {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl FromStr for Colour {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = LayerError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn invalid_hex(s: &str) -> LayerError {
    LayerError::Config {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RGB or #RRGGBB format".to_string()),
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| LayerError::Config {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| LayerError::Config {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
