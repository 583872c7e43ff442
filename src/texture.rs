//! Opaque 2D sampled-color source.
//!
//! The renderer never decodes image files or builds mip chains itself; a
//! [`Texture`] is constructed from an already-decoded `image` buffer and only
//! answers UV sample queries.

use image::RgbaImage;

use crate::color::Color;

/// A 2D texture sampled by materials.
pub struct Texture {
    data: Vec<Color>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Wrap a decoded RGBA image.
    pub fn from_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let data = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Color::from_rgba8(r, g, b, a)
            })
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// A 1x1 texture of a single color, handy in tests.
    pub fn solid(color: Color) -> Self {
        Self {
            data: vec![color],
            width: 1,
            height: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at UV coordinates with nearest-neighbor filtering.
    ///
    /// UVs outside `[0, 1]` repeat (`rem_euclid`, so negatives wrap
    /// correctly). V is flipped: UV origin is bottom-left, image storage is
    /// top-left.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = u.rem_euclid(1.0);
        let v = (1.0 - v).rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }
}
