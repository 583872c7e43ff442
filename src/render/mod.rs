//! The rendering pipeline: buffers, passes, configuration, and the
//! [`Renderer`] that drives them.

pub mod buffer;
pub mod compose;
pub mod config;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod renderer;
pub mod shadow;

pub use buffer::{Fragment, FrameBuffer, GBuffer};
pub use compose::BlendMode;
pub use config::RenderConfig;
pub use error::RenderError;
pub use renderer::{FrameProfile, Renderer};
pub use shadow::ShadowMap;
