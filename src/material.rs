//! Material boundary.
//!
//! The renderer does not interpret BRDF math. Shading is dispatched through
//! the [`Material`] trait: given one surface sample and the frame's lights,
//! produce a color. Two implementations ship with the crate — a flat color
//! for tests and debug views, and a textured Blinn-Phong.

use glam::{Vec2, Vec3};

use crate::color::Color;
use crate::light::{AmbientLight, LightSample};
use crate::texture::Texture;

/// Everything a material gets to see for one fragment.
pub struct ShadePoint<'a> {
    /// Fallback/base color (the renderer's configured background).
    pub base: Color,
    /// World-space surface position.
    pub position: Vec3,
    /// World-space unit surface normal.
    pub normal: Vec3,
    /// Interpolated texture coordinate.
    pub uv: Vec2,
    /// World-space eye position, for the view direction.
    pub eye: Vec3,
    /// Source lights, already attenuated by shadow-map visibility.
    pub sources: &'a [LightSample],
    /// Environment lights.
    pub ambients: &'a [AmbientLight],
}

impl ShadePoint<'_> {
    /// Unit vector from the surface toward the eye.
    pub fn view_dir(&self) -> Vec3 {
        (self.eye - self.position).normalize_or_zero()
    }
}

/// Per-fragment shading callable. Implementations must be thread-safe: the
/// shading stage invokes them from many workers at once.
pub trait Material: Send + Sync {
    fn shade(&self, point: &ShadePoint<'_>) -> Color;
}

/// Constant-color material, ignoring all lights.
pub struct FlatColor {
    pub color: Color,
}

impl FlatColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Material for FlatColor {
    fn shade(&self, _point: &ShadePoint<'_>) -> Color {
        self.color
    }
}

/// Blinn-Phong material with optional texture.
///
/// The albedo comes from the texture when present, otherwise from `color`,
/// and otherwise falls back to the shade point's base color.
pub struct BlinnPhong {
    pub texture: Option<Texture>,
    pub color: Option<Color>,
    /// Ambient reflectance factor.
    pub ambient: f32,
    /// Diffuse reflectance factor.
    pub diffuse: f32,
    /// Specular reflectance factor.
    pub specular: f32,
    /// Specular exponent.
    pub shininess: f32,
}

impl BlinnPhong {
    pub fn new(ambient: f32, diffuse: f32, specular: f32, shininess: f32) -> Self {
        Self {
            texture: None,
            color: None,
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn albedo(&self, point: &ShadePoint<'_>) -> Color {
        if let Some(tex) = &self.texture {
            tex.sample(point.uv.x, point.uv.y)
        } else {
            self.color.unwrap_or(point.base)
        }
    }
}

impl Material for BlinnPhong {
    fn shade(&self, point: &ShadePoint<'_>) -> Color {
        let albedo = self.albedo(point);
        let n = point.normal;
        let v = point.view_dir();

        let mut out = Color::new(0.0, 0.0, 0.0, albedo.a);

        for amb in point.ambients {
            out += albedo * (amb.color * (amb.intensity * self.ambient));
        }

        for sample in point.sources {
            if sample.visibility <= 0.0 {
                continue;
            }
            let light = &sample.light;
            let l = light.direction_from(point.position);
            let n_dot_l = n.dot(l).max(0.0);
            if n_dot_l <= 0.0 {
                continue;
            }
            let h = (l + v).normalize_or_zero();
            let spec = n.dot(h).max(0.0).powf(self.shininess);

            let energy = light.intensity * sample.visibility;
            out += albedo * light.color * (self.diffuse * n_dot_l * energy);
            out += light.color * (self.specular * spec * energy);
        }

        out.clamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::SourceLight;
    use approx::assert_relative_eq;

    fn point_at_origin<'a>(
        sources: &'a [LightSample],
        ambients: &'a [AmbientLight],
    ) -> ShadePoint<'a> {
        ShadePoint {
            base: Color::WHITE,
            position: Vec3::ZERO,
            normal: Vec3::Y,
            uv: Vec2::ZERO,
            eye: Vec3::new(0.0, 2.0, 0.0),
            sources,
            ambients,
        }
    }

    #[test]
    fn flat_color_ignores_lights() {
        let mat = FlatColor::new(Color::rgb(0.2, 0.4, 0.6));
        let point = point_at_origin(&[], &[]);
        assert_eq!(mat.shade(&point), Color::rgb(0.2, 0.4, 0.6));
    }

    #[test]
    fn unlit_blinn_phong_is_black() {
        let mat = BlinnPhong::new(0.5, 1.0, 0.5, 32.0).with_color(Color::WHITE);
        let point = point_at_origin(&[], &[]);
        let c = mat.shade(&point);
        assert_relative_eq!(c.r, 0.0);
    }

    #[test]
    fn head_on_light_gives_full_diffuse() {
        let mat = BlinnPhong::new(0.0, 1.0, 0.0, 32.0).with_color(Color::WHITE);
        let sources = [LightSample {
            light: SourceLight::point(Vec3::new(0.0, 5.0, 0.0), 1.0, Color::WHITE),
            visibility: 1.0,
        }];
        let point = point_at_origin(&sources, &[]);
        let c = mat.shade(&point);
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn occluded_light_contributes_nothing() {
        let mat = BlinnPhong::new(0.0, 1.0, 1.0, 32.0).with_color(Color::WHITE);
        let sources = [LightSample {
            light: SourceLight::point(Vec3::new(0.0, 5.0, 0.0), 1.0, Color::WHITE),
            visibility: 0.0,
        }];
        let point = point_at_origin(&sources, &[]);
        assert_relative_eq!(mat.shade(&point).r, 0.0);
    }

    #[test]
    fn half_visibility_halves_diffuse() {
        let mat = BlinnPhong::new(0.0, 1.0, 0.0, 32.0).with_color(Color::WHITE);
        let sources = [LightSample {
            light: SourceLight::point(Vec3::new(0.0, 5.0, 0.0), 1.0, Color::WHITE),
            visibility: 0.5,
        }];
        let point = point_at_origin(&sources, &[]);
        assert_relative_eq!(mat.shade(&point).r, 0.5, epsilon = 1e-5);
    }
}
