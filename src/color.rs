//! Linear-space RGBA color.
//!
//! All shading math happens on [`Color`] values in linear space with
//! components in `[0.0, 1.0]`. Conversion to 8-bit display values (and the
//! optional gamma encode) only happens in the compositor, at the very end of
//! the pipeline.

use std::ops::{Add, AddAssign, Mul};

/// Display gamma used by the encode pass (linear -> encoded).
pub const DISPLAY_GAMMA: f32 = 2.2;

/// An RGBA color in linear space, components nominally in `[0.0, 1.0]`.
///
/// Intermediate shading results may exceed 1.0; values are clamped when
/// converting to 8-bit output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert from 8-bit sRGB-style bytes into linear floats (no gamma
    /// decode; the renderer treats inputs as already linear).
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Clamp all components into `[0.0, 1.0]`.
    pub fn clamp(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Apply the display gamma transform (linear -> encoded) to the color
    /// channels. Alpha is left untouched.
    pub fn gamma_encode(self) -> Self {
        let inv = 1.0 / DISPLAY_GAMMA;
        Self {
            r: self.r.max(0.0).powf(inv),
            g: self.g.max(0.0).powf(inv),
            b: self.b.max(0.0).powf(inv),
            a: self.a,
        }
    }

    /// Convert to 8-bit RGBA, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.clamp();
        [
            (c.r * 255.0 + 0.5) as u8,
            (c.g * 255.0 + 0.5) as u8,
            (c.b * 255.0 + 0.5) as u8,
            (c.a * 255.0 + 0.5) as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    /// Scale the color channels, leaving alpha untouched.
    fn mul(self, s: f32) -> Color {
        Color::new(self.r * s, self.g * s, self.b * s, self.a)
    }
}

impl Mul<Color> for Color {
    type Output = Color;

    /// Component-wise modulation.
    fn mul(self, rhs: Color) -> Color {
        Color::new(
            self.r * rhs.r,
            self.g * rhs.g,
            self.b * rhs.b,
            self.a * rhs.a,
        )
    }
}
