//! Scan conversion and the fragment stage.
//!
//! [`Coverage`] is the shared scan-conversion core: edge functions over a
//! screen triangle, boundary tie-breaking, and barycentric weights. The main
//! pass drives it to commit depth-tested fragments into the [`GBuffer`]; the
//! shadow pass drives the same core into a plain depth grid.
//!
//! # Edge rule
//!
//! A pixel center exactly on a triangle edge is owned by exactly one of the
//! two triangles sharing that edge: the one for which the edge, in its
//! positive-winding direction, heads down the screen, or heads left when
//! horizontal. The predicate flips with edge direction, and a shared edge is
//! traversed in opposite directions by its two triangles, so there is never
//! a double-shaded or gap pixel on the seam.

use glam::Vec2;
use log::trace;

use crate::render::buffer::{Fragment, GBuffer};
use crate::render::geometry::ScreenTriangle;

/// Twice the signed area of (a, b, p); positive when p is left of a -> b
/// with y growing downward.
#[inline]
fn orient2d(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Whether the directed edge a -> b owns pixels landing exactly on it.
#[inline]
fn edge_owns_boundary(a: Vec2, b: Vec2) -> bool {
    if a.y == b.y {
        b.x < a.x
    } else {
        b.y > a.y
    }
}

/// Scan-conversion state for one screen triangle.
pub struct Coverage {
    points: [Vec2; 3],
    /// +1 or -1, normalizing either winding to positive area.
    sign: f32,
    inv_area: f32,
    /// Boundary ownership for the edges opposite vertices 0, 1, 2.
    owns: [bool; 3],
}

impl Coverage {
    /// Precompute edge data, or `None` for a degenerate (zero-area or
    /// non-finite) triangle.
    pub fn new(points: [Vec2; 3]) -> Option<Self> {
        let area = orient2d(points[0], points[1], points[2]);
        if !area.is_finite() || area == 0.0 {
            return None;
        }
        let sign = if area > 0.0 { 1.0 } else { -1.0 };

        let mut owns = [false; 3];
        for i in 0..3 {
            let a = points[(i + 1) % 3];
            let b = points[(i + 2) % 3];
            owns[i] = if sign > 0.0 {
                edge_owns_boundary(a, b)
            } else {
                edge_owns_boundary(b, a)
            };
        }

        Some(Self {
            points,
            sign,
            inv_area: 1.0 / (area * sign),
            owns,
        })
    }

    /// Barycentric weights of `p` in original vertex order, or `None` when
    /// the point is not covered. Weights are non-negative and sum to 1.
    #[inline]
    pub fn barycentric(&self, p: Vec2) -> Option<[f32; 3]> {
        let [p0, p1, p2] = self.points;
        let w = [
            orient2d(p1, p2, p) * self.sign,
            orient2d(p2, p0, p) * self.sign,
            orient2d(p0, p1, p) * self.sign,
        ];
        for i in 0..3 {
            if w[i] < 0.0 || (w[i] == 0.0 && !self.owns[i]) {
                return None;
            }
        }
        Some([
            w[0] * self.inv_area,
            w[1] * self.inv_area,
            w[2] * self.inv_area,
        ])
    }
}

/// Integer pixel bounding box of a triangle, clipped to `width` x `height`.
/// `None` when the triangle lies entirely off the target.
pub fn pixel_bounds(points: &[Vec2; 3], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

    if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
        return None;
    }

    let x0 = (min_x.floor() as i64).max(0) as u32;
    let y0 = (min_y.floor() as i64).max(0) as u32;
    let x1 = (max_x.ceil() as i64).min(width as i64 - 1) as u32;
    let y1 = (max_y.ceil() as i64).min(height as i64 - 1) as u32;
    Some((x0, x1, y0, y1))
}

/// Rasterize one screen triangle into the G-buffer.
///
/// Depth is interpolated with plain screen-space barycentrics (NDC depth is
/// affine in screen space); position, normal, and UV are perspective-correct
/// via the interpolated reciprocal w.
pub fn rasterize(tri: &ScreenTriangle, gbuf: &GBuffer) {
    let [v0, v1, v2] = &tri.vertices;
    let points = [
        v0.screen.truncate(),
        v1.screen.truncate(),
        v2.screen.truncate(),
    ];

    let Some(cov) = Coverage::new(points) else {
        trace!("skipping zero-area screen triangle");
        return;
    };
    let Some((x0, x1, y0, y1)) = pixel_bounds(&points, gbuf.width(), gbuf.height()) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(l) = cov.barycentric(center) else {
                continue;
            };

            let depth = l[0] * v0.screen.z + l[1] * v1.screen.z + l[2] * v2.screen.z;
            if !(0.0..=1.0).contains(&depth) {
                continue; // partially visible triangle poking out of the depth range
            }

            let inv_w = l[0] * v0.inv_w + l[1] * v1.inv_w + l[2] * v2.inv_w;
            let w = 1.0 / inv_w;
            let world_pos = (v0.world_pos * (l[0] * v0.inv_w)
                + v1.world_pos * (l[1] * v1.inv_w)
                + v2.world_pos * (l[2] * v2.inv_w))
                * w;
            let normal = (v0.normal * (l[0] * v0.inv_w)
                + v1.normal * (l[1] * v1.inv_w)
                + v2.normal * (l[2] * v2.inv_w))
                * w;
            let uv = (v0.uv * (l[0] * v0.inv_w)
                + v1.uv * (l[1] * v1.inv_w)
                + v2.uv * (l[2] * v2.inv_w))
                * w;

            gbuf.commit(
                x,
                y,
                Fragment {
                    depth,
                    world_pos,
                    normal: normal.normalize_or_zero(),
                    uv,
                    material: tri.material,
                    written: true,
                },
            );
        }
    }
}
