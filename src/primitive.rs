//! Geometric primitives shared across the pipeline.
//!
//! A [`Triangle`] is immutable once constructed: the geometry pipeline reads
//! it, transforms a copy, and never writes back. The [`Aabb`] is the bound
//! the shadow pass frames its light cameras around.

use glam::{Vec2, Vec3, Vec4};

/// A single mesh vertex: homogeneous position plus shading attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Object-space position with `w = 1`.
    pub position: Vec4,
    /// Object-space normal, expected unit length.
    pub normal: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.extend(1.0),
            normal,
            uv,
        }
    }
}

/// Three vertices in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Build a triangle with a face normal computed from the winding
    /// (counter-clockwise positions seen from the front) and zero UVs.
    pub fn from_positions(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let n = (b - a).cross(c - a).normalize_or_zero();
        Self::new(
            Vertex::new(a, n, Vec2::ZERO),
            Vertex::new(b, n, Vec2::ZERO),
            Vertex::new(c, n, Vec2::ZERO),
        )
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box that unions as the identity.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every vertex of `triangles`.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut aabb = Self::EMPTY;
        for tri in triangles {
            for v in &tri.vertices {
                aabb.grow(v.position.truncate());
            }
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around [`Self::center`].
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }

    /// The box with `matrix` applied to all eight corners.
    pub fn transformed(&self, matrix: glam::Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.grow(matrix.transform_point3(corner));
        }
        out
    }
}
