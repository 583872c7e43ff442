//! Transform component for scene objects.
//!
//! [`Transform`] composes scale, rotation, and translation into a model
//! matrix. The matrix is a cache: every mutator recomputes it, so reads are
//! always cheap and never mutate.

use glam::{Mat4, Quat, Vec3};

/// Scale / rotation / translation with a cached model matrix.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```
/// use prysm::Transform;
/// use glam::Vec3;
///
/// let mut t = Transform::new();
/// t.set_translation(Vec3::new(0.0, 1.0, 0.0))
///     .rotate_y(0.3)
///     .set_scale(Vec3::splat(2.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    /// The composed model matrix (scale, then rotation, then translation).
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self.recompute()
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.translation += delta;
        self.recompute()
    }

    pub fn set_rotation(&mut self, rotation: Quat) -> &mut Self {
        self.rotation = rotation;
        self.recompute()
    }

    /// Rotate by `angle` radians around an arbitrary axis.
    pub fn rotate_axis(&mut self, axis: Vec3, angle: f32) -> &mut Self {
        self.rotation = Quat::from_axis_angle(axis.normalize(), angle) * self.rotation;
        self.recompute()
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotate_axis(Vec3::X, angle)
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotate_axis(Vec3::Y, angle)
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotate_axis(Vec3::Z, angle)
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self.recompute()
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.set_scale(Vec3::splat(s))
    }

    fn recompute(&mut self) -> &mut Self {
        self.matrix =
            Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);
        self
    }
}
