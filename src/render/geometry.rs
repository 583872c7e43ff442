//! Geometry pipeline: object space to supersampled screen space.
//!
//! Each input triangle is transformed object -> world -> camera -> clip,
//! frustum-culled, perspective-divided, and viewport-mapped. The stage only
//! reads shared state and emits screen triangles, so it runs in parallel per
//! triangle with no synchronization.
//!
//! # Clipping policy
//!
//! Clipping is approximate: a triangle entirely outside the frustum (or with
//! any vertex at or behind the eye plane) is dropped, and partially visible
//! triangles are accepted as-is, relying on the rasterizer's per-pixel
//! bounds and depth checks. This is not pixel-exact near-plane polygon
//! clipping.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use log::trace;

use crate::primitive::Triangle;

/// Vertices with clip `w` this small (or behind the eye) drop the triangle.
const MIN_CLIP_W: f32 = 1e-6;

/// A vertex after projection and viewport mapping.
#[derive(Clone, Copy, Debug)]
pub struct ScreenVertex {
    /// x, y in supersampled pixel coordinates; z is NDC depth in `[0, 1]`,
    /// smaller = nearer.
    pub screen: Vec3,
    /// Reciprocal clip-space w, for perspective-correct interpolation.
    pub inv_w: f32,
    pub world_pos: Vec3,
    /// World-space unit normal.
    pub normal: Vec3,
    pub uv: Vec2,
}

/// A triangle ready for the fragment stage.
#[derive(Clone, Copy, Debug)]
pub struct ScreenTriangle {
    pub vertices: [ScreenVertex; 3],
    /// Index into the frame's material table.
    pub material: u32,
}

/// One mesh's contribution to the frame: its world transform, triangle
/// slice, and material-table index. Borrowed from the scene for the
/// duration of the frame.
#[derive(Clone, Copy)]
pub struct DrawItem<'a> {
    pub model: Mat4,
    pub triangles: &'a [Triangle],
    pub material: u32,
}

/// Per-draw-call transforms shared by every triangle of one mesh.
#[derive(Clone, Copy, Debug)]
pub struct DrawContext {
    pub model: Mat4,
    /// Inverse-transpose of the model's upper 3x3, for normals.
    pub normal_matrix: Mat3,
    pub view_proj: Mat4,
    /// Supersampled target dimensions.
    pub width: f32,
    pub height: f32,
    pub material: u32,
}

impl DrawContext {
    pub fn new(model: Mat4, view_proj: Mat4, width: u32, height: u32, material: u32) -> Self {
        let upper = Mat3::from_mat4(model);
        // A non-invertible model matrix (zero scale axis) flattens the mesh;
        // normals of whatever survives fall back to the un-corrected matrix.
        let normal_matrix = if upper.determinant().abs() > f32::EPSILON {
            upper.inverse().transpose()
        } else {
            upper
        };
        Self {
            model,
            normal_matrix,
            view_proj,
            width: width as f32,
            height: height as f32,
            material,
        }
    }
}

/// Transform one triangle to screen space, or `None` when it is culled or
/// degenerate (NaN vertices, zero clip w).
pub fn project_triangle(tri: &Triangle, ctx: &DrawContext) -> Option<ScreenTriangle> {
    let mvp = ctx.view_proj * ctx.model;

    let mut clip = [Vec4::ZERO; 3];
    for (out, v) in clip.iter_mut().zip(&tri.vertices) {
        *out = mvp * v.position;
        if !out.is_finite() {
            trace!("skipping triangle with non-finite clip coordinates");
            return None;
        }
    }

    // Near-plane approximation: any vertex at or behind the eye drops the
    // whole triangle rather than clipping the polygon.
    if clip.iter().any(|c| c.w < MIN_CLIP_W) {
        return None;
    }
    if outside_frustum(&clip) {
        return None;
    }

    let mut vertices = [ScreenVertex {
        screen: Vec3::ZERO,
        inv_w: 0.0,
        world_pos: Vec3::ZERO,
        normal: Vec3::ZERO,
        uv: Vec2::ZERO,
    }; 3];

    for i in 0..3 {
        let c = clip[i];
        let ndc = c.truncate() / c.w;
        vertices[i] = ScreenVertex {
            screen: Vec3::new(
                (ndc.x + 1.0) * 0.5 * ctx.width,
                (1.0 - ndc.y) * 0.5 * ctx.height,
                ndc.z,
            ),
            inv_w: 1.0 / c.w,
            world_pos: ctx.model.transform_point3(tri.vertices[i].position.truncate()),
            normal: (ctx.normal_matrix * tri.vertices[i].normal).normalize_or_zero(),
            uv: tri.vertices[i].uv,
        };
    }

    Some(ScreenTriangle {
        vertices,
        material: ctx.material,
    })
}

/// True when all three clip-space vertices lie outside the same frustum
/// plane (depth range `[0, w]`). A conservative cull: partially visible
/// triangles always pass.
fn outside_frustum(clip: &[Vec4; 3]) -> bool {
    clip.iter().all(|c| c.x < -c.w)
        || clip.iter().all(|c| c.x > c.w)
        || clip.iter().all(|c| c.y < -c.w)
        || clip.iter().all(|c| c.y > c.w)
        || clip.iter().all(|c| c.z < 0.0)
        || clip.iter().all(|c| c.z > c.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use approx::assert_relative_eq;

    fn context(width: u32, height: u32) -> DrawContext {
        let cam = Camera::perspective(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            90.0,
            width as f32 / height as f32,
            0.1,
            100.0,
        );
        let view_proj = cam.projection_matrix() * cam.view_matrix().unwrap();
        DrawContext::new(Mat4::IDENTITY, view_proj, width, height, 0)
    }

    #[test]
    fn centered_triangle_projects_to_screen_center() {
        let ctx = context(100, 100);
        let tri = Triangle::from_positions(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let out = project_triangle(&tri, &ctx).unwrap();
        // Apex at world (0, 1, 0): x maps to the horizontal center.
        assert_relative_eq!(out.vertices[2].screen.x, 50.0, epsilon = 1e-3);
        assert!(out.vertices[2].screen.y < 50.0);
    }

    #[test]
    fn triangle_behind_camera_is_dropped() {
        let ctx = context(100, 100);
        let tri = Triangle::from_positions(
            Vec3::new(-1.0, -1.0, 20.0),
            Vec3::new(1.0, -1.0, 20.0),
            Vec3::new(0.0, 1.0, 20.0),
        );
        assert!(project_triangle(&tri, &ctx).is_none());
    }

    #[test]
    fn triangle_outside_side_plane_is_dropped() {
        let ctx = context(100, 100);
        let tri = Triangle::from_positions(
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(102.0, 0.0, 0.0),
            Vec3::new(101.0, 1.0, 0.0),
        );
        assert!(project_triangle(&tri, &ctx).is_none());
    }

    #[test]
    fn nan_vertex_is_dropped() {
        let ctx = context(100, 100);
        let tri = Triangle::from_positions(
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!(project_triangle(&tri, &ctx).is_none());
    }

    #[test]
    fn nearer_geometry_has_smaller_depth() {
        let ctx = context(100, 100);
        let near = Triangle::from_positions(
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(1.0, -1.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
        );
        let far = Triangle::from_positions(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
        );
        let near = project_triangle(&near, &ctx).unwrap();
        let far = project_triangle(&far, &ctx).unwrap();
        assert!(near.vertices[0].screen.z < far.vertices[0].screen.z);
    }
}
