//! Triangle mesh with a bound material and cached bounds.
//!
//! The renderer consumes a mesh as an iterator of triangles plus its AABB;
//! how the triangle soup was produced (OBJ loading, procedural generation)
//! is outside this crate. The AABB is cached lazily: geometry mutators only
//! set a dirty flag, the next [`Mesh::aabb`] call recomputes.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::material::Material;
use crate::primitive::{Aabb, Triangle, Vertex};
use crate::transform::Transform;

pub struct Mesh {
    triangles: Vec<Triangle>,
    material: Arc<dyn Material>,
    pub transform: Transform,
    aabb: Aabb,
    aabb_dirty: bool,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>, material: Arc<dyn Material>) -> Self {
        Self {
            triangles,
            material,
            transform: Transform::new(),
            aabb: Aabb::EMPTY,
            aabb_dirty: true,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    /// Object-space bounding box, recomputed now if geometry changed since
    /// the last call.
    pub fn aabb(&mut self) -> Aabb {
        if self.aabb_dirty {
            self.aabb = Aabb::from_triangles(&self.triangles);
            self.aabb_dirty = false;
        }
        self.aabb
    }

    /// Rescale and center the geometry into the unit cube at the origin.
    /// Leaves the transform untouched; invalidates the cached AABB.
    pub fn normalize(&mut self) {
        let aabb = self.aabb();
        if aabb.is_empty() {
            return;
        }
        let center = aabb.center();
        let extent = (aabb.max - aabb.min).max_element();
        if extent < f32::EPSILON {
            return;
        }
        let scale = 1.0 / extent;
        for tri in &mut self.triangles {
            for v in &mut tri.vertices {
                let p = (v.position.truncate() - center) * scale;
                v.position = p.extend(1.0);
            }
        }
        self.aabb_dirty = true;
    }

    /// An axis-aligned unit plane in the XZ plane (y = 0), made of two
    /// triangles, normals up, UVs spanning `[0, 1]`.
    pub fn unit_plane(material: Arc<dyn Material>) -> Self {
        let corner = |x: f32, z: f32, u: f32, v: f32| {
            Vertex::new(Vec3::new(x, 0.0, z), Vec3::Y, Vec2::new(u, v))
        };
        let a = corner(-0.5, -0.5, 0.0, 0.0);
        let b = corner(0.5, -0.5, 1.0, 0.0);
        let c = corner(0.5, 0.5, 1.0, 1.0);
        let d = corner(-0.5, 0.5, 0.0, 1.0);
        Self::new(
            vec![Triangle::new(a, b, c), Triangle::new(a, c, d)],
            material,
        )
    }

    /// An axis-aligned cube centered at the origin with the given edge
    /// length, face normals, per-face UVs.
    pub fn cube(size: f32, material: Arc<dyn Material>) -> Self {
        let h = size * 0.5;
        let mut triangles = Vec::with_capacity(12);
        // One quad per face: (normal, two in-plane axes).
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        for (n, u_axis, v_axis) in faces {
            let origin = n * h;
            let corner = |u: f32, v: f32| {
                Vertex::new(
                    origin + u_axis * (u * h) + v_axis * (v * h),
                    n,
                    Vec2::new((u + 1.0) * 0.5, (v + 1.0) * 0.5),
                )
            };
            let a = corner(-1.0, -1.0);
            let b = corner(1.0, -1.0);
            let c = corner(1.0, 1.0);
            let d = corner(-1.0, 1.0);
            triangles.push(Triangle::new(a, b, c));
            triangles.push(Triangle::new(a, c, d));
        }
        Self::new(triangles, material)
    }
}
