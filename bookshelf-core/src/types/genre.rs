//! Genre tags and their display colour

use super::GenreId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Used whenever a stored colour cannot be parsed
    pub const FALLBACK: Color = Color { r: 255, g: 0, b: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (alpha is ignored); `#` is optional
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let digits = hex_str.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };
        let bytes = hex::decode(expanded).ok()?;
        Some(Self::rgb(bytes[0], bytes[1], bytes[2]))
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parse a genre colour, falling back to [`Color::FALLBACK`]
pub fn genre_color(hex_str: &str) -> Color {
    Color::from_hex(hex_str).unwrap_or_else(|| {
        tracing::warn!("Invalid genre colour {:?}, using fallback", hex_str);
        Color::FALLBACK
    })
}

/// A tag that can be attached to any number of books
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: GenreId,

    /// Display name, unique by convention only
    pub name: String,

    /// Colour as stored; parsed on demand by [`Genre::color`]
    pub color_hex: String,
}

impl Genre {
    pub fn new(name: impl Into<String>, color_hex: impl Into<String>) -> Self {
        Self {
            id: GenreId::new(),
            name: name.into(),
            color_hex: color_hex.into(),
        }
    }

    pub fn color(&self) -> Color {
        genre_color(&self.color_hex)
    }
}
