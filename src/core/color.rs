//! RGBA colors
//!
//! Colors are stored as 8-bit channels and persisted as `#RRGGBBAA` hex strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned when a hex color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color `{0}`")]
pub struct ColorParseError(pub String);

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const GRAY: Self = Self::rgba(128, 128, 128, 255);
    pub const CLEAR: Self = Self::rgba(0, 0, 0, 0);

    /// Create a color from 8-bit channels
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from unit-range channels.
    ///
    /// Channels are clamped to `0.0..=1.0`.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), 255)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    ///
    /// The leading `#` is optional and digits are case-insensitive. A missing
    /// alpha channel means fully opaque.
    ///
    /// # Errors
    ///
    /// Returns an error if the string has the wrong length or non-hex digits
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(hex.to_string()));
        }

        let channel = |start: usize| {
            digits
                .get(start..start + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError(hex.to_string()))
        };

        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Format as uppercase `#RRGGBBAA`
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Channels as unit-range floats
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f32::from(c) / 255.0)
    }
}

fn unit_to_u8(value: f32) -> u8 {
    // Clamped to 0..=255 before the cast
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
