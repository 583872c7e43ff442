//! Renderer configuration.
//!
//! All knobs live in one explicit struct with documented defaults, validated
//! once when handed to the renderer rather than scattered through setters.

use crate::color::Color;
use crate::render::compose::BlendMode;
use crate::render::error::RenderError;

/// Renderer settings, validated by [`RenderConfig::validate`].
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Output image width in pixels. Default 800.
    pub width: u32,
    /// Output image height in pixels. Default 600.
    pub height: u32,
    /// Linear supersampling factor; internal buffers are `width * msaa` by
    /// `height * msaa`. 1 disables anti-aliasing. Default 2.
    pub msaa: u32,
    /// Render depth-only shadow maps for shadow-casting lights. Default true.
    pub shadow_maps: bool,
    /// Apply the display gamma transform to the final image. Default true.
    pub gamma_correction: bool,
    /// Color of pixels no geometry covers. Default opaque black.
    pub background: Color,
    /// How shaded colors combine with existing frame content. Default
    /// [`BlendMode::Overwrite`].
    pub blend: BlendMode,
    /// Maximum worker threads for the parallel stages. Defaults to the
    /// machine's available parallelism.
    pub workers: usize,
    /// Collect per-pass timings into a [`super::FrameProfile`]. Default
    /// false.
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            msaa: 2,
            shadow_maps: true,
            gamma_correction: true,
            background: Color::BLACK,
            blend: BlendMode::default(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            debug: false,
        }
    }
}

impl RenderConfig {
    /// Check every field once, up front.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.msaa == 0 {
            return Err(RenderError::InvalidMsaa(self.msaa));
        }
        if self.workers == 0 {
            return Err(RenderError::InvalidWorkers);
        }
        Ok(())
    }

    /// Supersampled buffer dimensions.
    pub fn sample_dimensions(&self) -> (u32, u32) {
        (self.width * self.msaa, self.height * self.msaa)
    }
}
