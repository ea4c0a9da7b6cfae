//! Colors and figure theming.

use std::str::FromStr;

use crate::error::PlotError;

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Pure blue, the default line color.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("blue", Color::BLUE),
    ("red", Color::new(1.0, 0.0, 0.0, 1.0)),
    ("green", Color::from_rgb8(0, 128, 0)),
    ("orange", Color::from_rgb8(255, 165, 0)),
    ("purple", Color::from_rgb8(128, 0, 128)),
    ("gray", Color::from_rgb8(128, 128, 128)),
    ("grey", Color::from_rgb8(128, 128, 128)),
    ("lightblue", Color::from_rgb8(173, 216, 230)),
    ("cyan", Color::new(0.0, 1.0, 1.0, 1.0)),
    ("magenta", Color::new(1.0, 0.0, 1.0, 1.0)),
    ("yellow", Color::new(1.0, 1.0, 0.0, 1.0)),
    ("none", Color::TRANSPARENT),
    ("transparent", Color::TRANSPARENT),
];

impl FromStr for Color {
    type Err = PlotError;

    /// Parse a named color or a `#rrggbb` / `#rrggbbaa` hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid_color(s));
        }
        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| invalid_color(s))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?).with_alpha(alpha as f32 / 255.0))
}

fn invalid_color(s: &str) -> PlotError {
    PlotError::InvalidArgument(format!("unrecognized color {s:?}"))
}

/// Visual theme for figures.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Figure background.
    pub background: Color,
    /// Plot-area background.
    pub axes_background: Color,
    /// Plot-area frame and tick color.
    pub frame: Color,
    /// Tick label color.
    pub text: Color,
    /// Zoom preview rectangle outline.
    pub zoom_rect: Color,
    /// Zoom preview rectangle fill.
    pub zoom_rect_fill: Color,
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme with a custom figure background.
    pub fn with_facecolor(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            axes_background: Color::WHITE,
            frame: Color::BLACK,
            text: Color::BLACK,
            zoom_rect: Color::BLACK,
            zoom_rect_fill: Color::new(0.0, 0.0, 0.0, 0.08),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!("blue".parse::<Color>().unwrap(), Color::BLUE);
        assert_eq!(" White ".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::new(1.0, 0.0, 0.0, 1.0));
        let translucent = "#00000080".parse::<Color>().unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!(matches!(
            "chartreuse-ish".parse::<Color>(),
            Err(PlotError::InvalidArgument(_))
        ));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }
}
