//! Depth-only shadow maps.
//!
//! One map per shadow-casting source light, rebuilt every frame. The map is
//! rasterized from the light's viewpoint with the same projection and scan
//! conversion as the main pass, but keeps only the minimum depth per texel.
//! Each map is written single-threaded (no per-texel locks); different
//! lights build their maps concurrently, each owning its buffer.

use glam::{Mat4, Vec2, Vec3};

use crate::light::{SourceKind, SourceLight};
use crate::primitive::Aabb;
use crate::render::geometry::{project_triangle, DrawContext, DrawItem};
use crate::render::raster::{pixel_bounds, Coverage};

/// Shadow map texel resolution (square).
const SHADOW_MAP_SIZE: u32 = 1024;

/// Offset subtracted from the occluder comparison to avoid surfaces
/// shadowing themselves through depth quantization.
const DEPTH_BIAS: f32 = 5e-3;

/// A depth-only image rendered from a light's viewpoint, plus the transform
/// that produced it.
pub struct ShadowMap {
    depth: Vec<f32>,
    size: u32,
    /// World -> light clip space.
    light_matrix: Mat4,
    /// A physically-null map: nothing occludes anything.
    null: bool,
}

impl ShadowMap {
    /// A valid map under which every fragment is fully lit. Produced for
    /// degenerate lights (zero intensity, light coincident with the scene)
    /// and empty scenes; never an error.
    pub fn null() -> Self {
        Self {
            depth: Vec::new(),
            size: 0,
            light_matrix: Mat4::IDENTITY,
            null: true,
        }
    }

    /// Render the scene's depth from `light`'s viewpoint, framed around the
    /// world-space `bounds` of the scene.
    pub fn build(light: &SourceLight, bounds: &Aabb, items: &[DrawItem<'_>]) -> Self {
        if light.intensity <= 0.0 || bounds.is_empty() {
            return Self::null();
        }
        let Some(light_matrix) = light_camera(light, bounds) else {
            return Self::null();
        };

        let size = SHADOW_MAP_SIZE;
        let mut map = Self {
            depth: vec![f32::INFINITY; (size * size) as usize],
            size,
            light_matrix,
            null: false,
        };

        for item in items {
            let ctx = DrawContext::new(item.model, light_matrix, size, size, item.material);
            for tri in item.triangles {
                let Some(screen) = project_triangle(tri, &ctx) else {
                    continue;
                };
                map.rasterize_depth(&screen.vertices.map(|v| v.screen));
            }
        }
        map
    }

    /// Minimum-depth scan conversion of one light-space triangle.
    fn rasterize_depth(&mut self, screen: &[Vec3; 3]) {
        let points = [
            screen[0].truncate(),
            screen[1].truncate(),
            screen[2].truncate(),
        ];
        let Some(cov) = Coverage::new(points) else {
            return;
        };
        let Some((x0, x1, y0, y1)) = pixel_bounds(&points, self.size, self.size) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(l) = cov.barycentric(center) else {
                    continue;
                };
                let depth = l[0] * screen[0].z + l[1] * screen[1].z + l[2] * screen[2].z;
                let texel = &mut self.depth[(y * self.size + x) as usize];
                if depth < *texel {
                    *texel = depth;
                }
            }
        }
    }

    /// Visibility of a world-space point to this map's light: 1.0 lit,
    /// 0.0 occluded. Points outside the map's frustum count as lit.
    pub fn visibility(&self, world_pos: Vec3) -> f32 {
        if self.null {
            return 1.0;
        }
        let clip = self.light_matrix * world_pos.extend(1.0);
        if clip.w <= 0.0 {
            return 1.0;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * self.size as f32;
        let y = (1.0 - ndc.y) * 0.5 * self.size as f32;
        if x < 0.0 || y < 0.0 || x >= self.size as f32 || y >= self.size as f32 {
            return 1.0;
        }
        let stored = self.depth[(y as u32 * self.size + x as u32) as usize];
        if ndc.z - DEPTH_BIAS > stored {
            0.0
        } else {
            1.0
        }
    }
}

/// View-projection looking from the light at the scene bounds, or `None`
/// when the light's pose is degenerate.
fn light_camera(light: &SourceLight, bounds: &Aabb) -> Option<Mat4> {
    let center = bounds.center();
    let radius = bounds.radius().max(1e-4);

    match light.kind {
        SourceKind::Point { position } => {
            let to_center = center - position;
            let dist = to_center.length();
            if dist < 1e-6 {
                return None; // light coincident with the scene center
            }
            let up = stable_up(to_center / dist);
            let view = Mat4::look_at_rh(position, center, up);
            // Frame the bounding sphere; clamp when the light sits inside it.
            let fov = if dist > radius {
                (2.0 * (radius / dist).asin()).min(2.8)
            } else {
                2.8
            };
            let near = (dist - radius).max(radius * 1e-3);
            let far = dist + radius;
            Some(Mat4::perspective_rh(fov, 1.0, near, far) * view)
        }
        SourceKind::Directional { direction } => {
            let dir = direction.try_normalize()?;
            let eye = center - dir * radius * 2.0;
            let view = Mat4::look_at_rh(eye, center, stable_up(dir));
            let proj = Mat4::orthographic_rh(
                -radius,
                radius,
                -radius,
                radius,
                radius * 0.5,
                radius * 3.5,
            );
            Some(proj * view)
        }
    }
}

/// An up vector not parallel to the view direction.
fn stable_up(dir: Vec3) -> Vec3 {
    if dir.y.abs() > 0.99 {
        Vec3::X
    } else {
        Vec3::Y
    }
}
