//! A CPU-based software rasterization renderer.
//!
//! Turns an in-memory scene of triangle meshes, lights, and a camera into a
//! 2D RGBA image entirely on the CPU: geometry transformation, parallel
//! depth-tested rasterization into a G-buffer, shadow mapping, per-fragment
//! material shading, MSAA resolve, and gamma correction.
//!
//! # Quick Start
//!
//! ```
//! use prysm::prelude::*;
//! use glam::Vec3;
//! use std::sync::Arc;
//!
//! let mut scene = Scene::new();
//! scene.add_mesh(Mesh::cube(1.0, Arc::new(FlatColor::new(Color::WHITE))));
//! scene.add_light(Light::Ambient(AmbientLight::new(1.0, Color::WHITE)));
//!
//! let mut renderer = Renderer::new(RenderConfig {
//!     width: 64,
//!     height: 64,
//!     ..Default::default()
//! })?;
//! renderer.set_scene(scene);
//! renderer.set_camera(Camera::perspective(
//!     Vec3::new(2.0, 2.0, 2.0),
//!     Vec3::ZERO,
//!     Vec3::Y,
//!     45.0,
//!     1.0,
//!     0.1,
//!     100.0,
//! ));
//! let image = renderer.render()?;
//! # Ok::<(), prysm::RenderError>(())
//! ```

pub mod camera;
pub mod color;
pub mod light;
pub mod material;
pub mod mesh;
pub mod primitive;
pub mod render;
pub mod scene;
pub mod texture;
pub mod transform;

// Re-export commonly needed types at crate root for convenience.
pub use camera::Camera;
pub use color::Color;
pub use mesh::Mesh;
pub use render::{BlendMode, RenderConfig, RenderError, Renderer};
pub use scene::Scene;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use prysm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::color::Color;
    pub use crate::light::{AmbientLight, Light, SourceLight};
    pub use crate::material::{BlinnPhong, FlatColor, Material};
    pub use crate::mesh::Mesh;
    pub use crate::render::{BlendMode, FrameProfile, RenderConfig, RenderError, Renderer};
    pub use crate::scene::{Scene, SceneNode};
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;
}
