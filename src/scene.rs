//! Scene boundary.
//!
//! The renderer consumes a scene as an iterator of (object, world transform)
//! pairs in traversal order. Objects form a closed set of kinds behind one
//! enum; light- or mesh-specific behavior is reached by matching on the
//! discriminant, never by downcasting.

use glam::Mat4;

use crate::light::Light;
use crate::mesh::Mesh;
use crate::primitive::Aabb;

/// One scene object.
pub enum SceneNode {
    Mesh(Mesh),
    Light(Light),
}

/// A flat collection of scene objects, iterated in insertion order.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> &mut Self {
        self.nodes.push(SceneNode::Mesh(mesh));
        self
    }

    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.nodes.push(SceneNode::Light(light));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate objects with their world transforms, in traversal order.
    /// Lights are specified in world space already, so their transform is
    /// the identity.
    pub fn iter(&self) -> impl Iterator<Item = (&SceneNode, Mat4)> {
        self.nodes.iter().map(|node| {
            let world = match node {
                SceneNode::Mesh(mesh) => mesh.transform.matrix(),
                SceneNode::Light(_) => Mat4::IDENTITY,
            };
            (node, world)
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Mesh(mesh) => Some(mesh),
            _ => None,
        })
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.nodes.iter_mut().filter_map(|n| match n {
            SceneNode::Mesh(mesh) => Some(mesh),
            _ => None,
        })
    }

    /// World-space bounds of all mesh geometry. Takes `&mut self` because
    /// mesh AABB caches may need recomputing.
    pub fn world_bounds(&mut self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for node in &mut self.nodes {
            if let SceneNode::Mesh(mesh) = node {
                let world = mesh.transform.matrix();
                bounds = bounds.union(&mesh.aabb().transformed(world));
            }
        }
        bounds
    }
}
