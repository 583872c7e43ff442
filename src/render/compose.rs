//! Compositor: blending, MSAA downsample, gamma encode.
//!
//! The blend policy combines a freshly shaded color with whatever the frame
//! buffer already holds for that sample. The resolve step averages each
//! `msaa` x `msaa` sample block into one output pixel (a box filter; with
//! `msaa == 1` it is a straight copy) and optionally gamma-encodes.

use image::RgbaImage;

use crate::color::Color;
use crate::render::buffer::FrameBuffer;

/// How a shaded color combines with existing frame content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Replace the destination outright.
    #[default]
    Overwrite,
    /// Standard source-over alpha compositing.
    AlphaOver,
    /// Add source to destination.
    Additive,
}

impl BlendMode {
    #[inline]
    pub fn apply(&self, dst: Color, src: Color) -> Color {
        match self {
            BlendMode::Overwrite => src,
            BlendMode::AlphaOver => {
                let a = src.a;
                let out_a = a + dst.a * (1.0 - a);
                Color::new(
                    src.r * a + dst.r * (1.0 - a),
                    src.g * a + dst.g * (1.0 - a),
                    src.b * a + dst.b * (1.0 - a),
                    out_a,
                )
            }
            BlendMode::Additive => Color::new(
                dst.r + src.r,
                dst.g + src.g,
                dst.b + src.b,
                (dst.a + src.a).min(1.0),
            ),
        }
    }
}

/// Downsample the supersampled frame to the output resolution and convert
/// to 8-bit RGBA, applying the gamma encode last when enabled.
pub fn resolve(frame: &FrameBuffer, msaa: u32, gamma: bool) -> RgbaImage {
    let out_w = frame.width() / msaa;
    let out_h = frame.height() / msaa;
    let samples = frame.samples();
    let inv_count = 1.0 / (msaa * msaa) as f32;

    let mut image = RgbaImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let mut acc = Color::TRANSPARENT;
            for sy in 0..msaa {
                for sx in 0..msaa {
                    let idx = ((y * msaa + sy) * frame.width() + x * msaa + sx) as usize;
                    let s = samples[idx];
                    acc.r += s.r;
                    acc.g += s.g;
                    acc.b += s.b;
                    acc.a += s.a;
                }
            }
            let mut px = Color::new(
                acc.r * inv_count,
                acc.g * inv_count,
                acc.b * inv_count,
                acc.a * inv_count,
            );
            if gamma {
                px = px.gamma_encode();
            }
            image.put_pixel(x, y, image::Rgba(px.to_rgba8()));
        }
    }
    image
}
