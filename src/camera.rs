//! Perspective camera.
//!
//! # Coordinate System
//!
//! The renderer uses a **right-handed** world with the camera looking down
//! its local -Z axis. Projection maps view-space depth into NDC `[0, 1]`
//! where **smaller values are nearer**; the depth test everywhere in the
//! pipeline is "strictly smaller wins".

use glam::{Mat4, Vec3};

/// A perspective camera defined by position, look-at target, and up vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width / height of the output image.
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Create a perspective camera.
    ///
    /// # Arguments
    /// * `position` - Eye position in world space
    /// * `target` - Point the camera looks at
    /// * `up` - Approximate up direction (must not be parallel to the view)
    /// * `fov_y` - Vertical field of view in **degrees**
    /// * `aspect` - Width divided by height
    /// * `near`, `far` - Clip plane distances, `0 < near < far`
    pub fn perspective(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov_y: fov_y.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio, typically after an output resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// The world-to-view matrix, or `None` when the camera is degenerate
    /// (eye coincident with target, or view direction parallel to up).
    /// A degenerate camera makes the whole projection step singular, so the
    /// renderer reports it instead of producing garbage.
    pub fn view_matrix(&self) -> Option<Mat4> {
        let forward = self.target - self.position;
        if forward.length_squared() < f32::EPSILON {
            return None;
        }
        if forward.cross(self.up).length_squared() < f32::EPSILON {
            return None;
        }
        Some(Mat4::look_at_rh(self.position, self.target, self.up))
    }

    /// The view-to-clip matrix (depth mapped to `[0, 1]`, near = 0).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(position: Vec3) -> Camera {
        Camera::perspective(position, Vec3::ZERO, Vec3::Y, 45.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let view = cam.view_matrix().unwrap();
        let eye = view.transform_point3(cam.position());
        assert_relative_eq!(eye.length(), 0.0, epsilon = 1e-6);
        // Target ends up straight ahead on -Z.
        let target = view.transform_point3(Vec3::ZERO);
        assert_relative_eq!(target.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn coincident_eye_and_target_is_singular() {
        let cam = camera_at(Vec3::ZERO);
        assert!(cam.view_matrix().is_none());
    }

    #[test]
    fn up_parallel_to_view_is_singular() {
        let cam = Camera::perspective(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::ZERO,
            Vec3::Y,
            45.0,
            1.0,
            0.1,
            100.0,
        );
        assert!(cam.view_matrix().is_none());
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let clip = cam.projection_matrix() * glam::Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert_relative_eq!(clip.z / clip.w, 0.0, epsilon = 1e-5);
    }
}
