//! Color type used by particles and the scene graph.

use std::fmt;

use ratatui::style::Color;

/// A straight (non-premultiplied) RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from four channels in `0.0..=1.0`.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from 8-bit channels.
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::opaque(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Quantize the color channels to 8 bits, ignoring alpha.
    pub fn to_rgb8(self) -> [u8; 3] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// Linear interpolation between two colors, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Convert to a Ratatui color, dropping alpha.
    pub fn to_color(self) -> Color {
        let [r, g, b] = self.to_rgb8();
        Color::Rgb(r, g, b)
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Formats as a CSS `rgba()` value, the form SVG `fill` accepts.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }
}
