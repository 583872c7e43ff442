//! Lighting types.
//!
//! Lights come in two capabilities: [`SourceLight`]s (point or directional)
//! contribute direct illumination and may cast shadows; [`AmbientLight`]s
//! only add an ambient term. The renderer classifies scene lights into these
//! two lists once per frame, in traversal order.

use glam::Vec3;

use crate::color::Color;

/// The positional flavor of a source light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceKind {
    /// Radiates from a world-space position.
    Point { position: Vec3 },
    /// Parallel rays along a direction (the direction the light travels).
    Directional { direction: Vec3 },
}

/// A direct-illumination light: point or directional, optionally a shadow
/// caster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceLight {
    pub kind: SourceKind,
    pub intensity: f32,
    pub color: Color,
    pub casts_shadow: bool,
}

impl SourceLight {
    pub fn point(position: Vec3, intensity: f32, color: Color) -> Self {
        Self {
            kind: SourceKind::Point { position },
            intensity,
            color,
            casts_shadow: false,
        }
    }

    pub fn directional(direction: Vec3, intensity: f32, color: Color) -> Self {
        Self {
            kind: SourceKind::Directional {
                direction: direction.normalize_or_zero(),
            },
            intensity,
            color,
            casts_shadow: false,
        }
    }

    pub fn with_shadow(mut self) -> Self {
        self.casts_shadow = true;
        self
    }

    /// Unit vector from `point` toward the light.
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        match self.kind {
            SourceKind::Point { position } => (position - point).normalize_or_zero(),
            SourceKind::Directional { direction } => -direction,
        }
    }
}

/// An environment light: ambient intensity and color only, no position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
    pub color: Color,
}

impl AmbientLight {
    pub fn new(intensity: f32, color: Color) -> Self {
        Self { intensity, color }
    }
}

/// A scene light, classified by capability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Source(SourceLight),
    Ambient(AmbientLight),
}

/// A source light paired with its shadow-map visibility at one fragment.
///
/// `visibility` is 1.0 for fully lit, 0.0 for fully occluded. Materials
/// scale the light's direct contribution by it.
#[derive(Clone, Copy, Debug)]
pub struct LightSample {
    pub light: SourceLight,
    pub visibility: f32,
}
