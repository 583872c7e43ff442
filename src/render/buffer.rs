//! Per-frame pixel buffers.
//!
//! The [`GBuffer`] holds the nearest surface seen at each supersampled pixel.
//! Each entry sits behind its own mutex so the fragment stage can depth-test
//! and commit from many workers without a global lock; hold time is one
//! compare plus a conditional overwrite. The [`FrameBuffer`] holds shaded
//! color samples and needs no locking: the shading stage writes disjoint
//! cells.

use std::sync::Mutex;

use glam::{Vec2, Vec3};

use crate::color::Color;

/// One G-buffer entry: the nearest fragment committed this frame.
#[derive(Clone, Copy, Debug)]
pub struct Fragment {
    /// NDC depth; smaller is nearer. `+INFINITY` until a fragment lands.
    pub depth: f32,
    pub world_pos: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    /// Index into the frame's material table.
    pub material: u32,
    /// Whether any fragment was committed to this pixel this frame.
    pub written: bool,
}

impl Fragment {
    const EMPTY: Fragment = Fragment {
        depth: f32::INFINITY,
        world_pos: Vec3::ZERO,
        normal: Vec3::ZERO,
        uv: Vec2::ZERO,
        material: 0,
        written: false,
    };
}

impl Default for Fragment {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Geometry buffer at supersampled resolution, one lock per pixel.
pub struct GBuffer {
    entries: Vec<Mutex<Fragment>>,
    width: u32,
    height: u32,
}

impl GBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            entries: (0..size).map(|_| Mutex::new(Fragment::EMPTY)).collect(),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every entry for a new frame. Exclusive access, no locking.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            *entry.get_mut().unwrap() = Fragment::EMPTY;
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Depth-test and commit a fragment under the pixel's lock.
    ///
    /// The fragment wins only if it is **strictly** nearer than the stored
    /// depth; an equal depth keeps the incumbent. This makes the final
    /// buffer independent of triangle processing order. Returns whether the
    /// fragment was committed.
    #[inline]
    pub fn commit(&self, x: u32, y: u32, frag: Fragment) -> bool {
        debug_assert!(x < self.width && y < self.height);
        let mut entry = self.entries[self.index(x, y)].lock().unwrap();
        if frag.depth < entry.depth {
            *entry = frag;
            true
        } else {
            false
        }
    }

    /// Copy out the entry at (x, y). Taken once per pixel by the shading
    /// stage, after the fragment stage has fully finished.
    #[inline]
    pub fn fragment(&self, x: u32, y: u32) -> Fragment {
        *self.entries[self.index(x, y)].lock().unwrap()
    }

    /// Copy out the entry at a flat pixel offset.
    #[inline]
    pub fn fragment_at(&self, index: usize) -> Fragment {
        *self.entries[index].lock().unwrap()
    }
}

/// Supersampled color samples, row-major.
pub struct FrameBuffer {
    samples: Vec<Color>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            samples: vec![Color::TRANSPARENT; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        self.samples.fill(color);
    }

    pub fn samples(&self) -> &[Color] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [Color] {
        &mut self.samples
    }
}
