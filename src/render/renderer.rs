//! The renderer: lifecycle, pass orchestration, shading stage.
//!
//! A frame runs as four strictly ordered passes over shared, pre-allocated
//! buffers:
//!
//! 1. shadow pass — one depth map per shadow-casting light, lights in
//!    parallel, all complete before anything else starts;
//! 2. geometry + fragment stage — triangles in parallel, depth-tested
//!    commits into the G-buffer under per-pixel locks;
//! 3. shading stage — pixels in parallel, disjoint writes, no locks;
//! 4. compositor — blend already applied per sample, then MSAA resolve and
//!    gamma.
//!
//! `render` and `update_config` both take `&mut self`: the exclusive borrow
//! is the frame barrier, so configuration can never change buffers while a
//! frame is in flight, and buffers are only reallocated between frames.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use log::debug;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::light::{Light, LightSample};
use crate::material::{Material, ShadePoint};
use crate::render::buffer::{FrameBuffer, GBuffer};
use crate::render::compose;
use crate::render::config::RenderConfig;
use crate::render::error::RenderError;
use crate::render::geometry::{project_triangle, DrawContext, DrawItem};
use crate::render::raster;
use crate::render::shadow::ShadowMap;
use crate::scene::{Scene, SceneNode};

/// Wall-clock time spent in each pass of the last frame, collected when the
/// debug flag is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameProfile {
    pub shadow_pass: Duration,
    pub fragment_pass: Duration,
    pub shading_pass: Duration,
    pub compose_pass: Duration,
}

/// CPU rasterization renderer. Owns the scene, camera, and all per-frame
/// buffers.
pub struct Renderer {
    config: RenderConfig,
    scene: Option<Scene>,
    camera: Option<Camera>,
    gbuf: GBuffer,
    frame: FrameBuffer,
    pool: rayon::ThreadPool,
    profile: Option<FrameProfile>,
}

impl Renderer {
    /// Create a renderer from a validated configuration.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let (w, h) = config.sample_dimensions();
        let pool = build_pool(config.workers)?;
        Ok(Self {
            config,
            scene: None,
            camera: None,
            gbuf: GBuffer::new(w, h),
            frame: FrameBuffer::new(w, h),
            pool,
            profile: None,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the configuration between frames. Validates first; on
    /// success the G-buffer (with its per-pixel locks) and the frame buffer
    /// are reallocated together, so their pixel counts can never disagree.
    pub fn update_config(&mut self, config: RenderConfig) -> Result<(), RenderError> {
        config.validate()?;
        if config.workers != self.config.workers {
            self.pool = build_pool(config.workers)?;
        }
        let dims = config.sample_dimensions();
        if dims != self.config.sample_dimensions() {
            self.gbuf = GBuffer::new(dims.0, dims.1);
            self.frame = FrameBuffer::new(dims.0, dims.1);
        }
        self.config = config;
        Ok(())
    }

    pub fn set_scene(&mut self, scene: Scene) {
        self.scene = Some(scene);
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// Dimensions of the supersampled internal buffers.
    pub fn sample_dimensions(&self) -> (u32, u32) {
        (self.gbuf.width(), self.gbuf.height())
    }

    /// Pass timings of the last frame, when the debug flag was set.
    pub fn profile(&self) -> Option<&FrameProfile> {
        self.profile.as_ref()
    }

    /// Render one frame.
    ///
    /// Fails fast on a missing scene or camera and on a singular camera
    /// transform; degenerate triangles are skipped, never fatal. Rendering
    /// is a pure function of (scene, camera, configuration) and safe to
    /// invoke again after any error.
    pub fn render(&mut self) -> Result<RgbaImage, RenderError> {
        if self.scene.is_none() {
            return Err(RenderError::MissingScene);
        }
        let camera = *self.camera.as_ref().ok_or(RenderError::MissingCamera)?;
        let view = camera.view_matrix().ok_or(RenderError::SingularProjection)?;
        let view_proj = camera.projection_matrix() * view;

        let bounds = self.scene.as_mut().unwrap().world_bounds();
        let scene = self.scene.as_ref().unwrap();
        let config = self.config.clone();

        // Light collector: classify by capability, traversal order.
        let mut sources = Vec::new();
        let mut ambients = Vec::new();
        for (node, _world) in scene.iter() {
            if let SceneNode::Light(light) = node {
                match light {
                    Light::Source(s) => sources.push(*s),
                    Light::Ambient(a) => ambients.push(*a),
                }
            }
        }

        // Draw list and material table, traversal order.
        let mut materials: Vec<&Arc<dyn Material>> = Vec::new();
        let mut items: Vec<DrawItem<'_>> = Vec::new();
        for mesh in scene.meshes() {
            items.push(DrawItem {
                model: mesh.transform.matrix(),
                triangles: mesh.triangles(),
                material: materials.len() as u32,
            });
            materials.push(mesh.material());
        }

        // Shadow pass. `install` returns only when every map is built,
        // which is the barrier the fragment stage depends on.
        let start = Instant::now();
        let shadow_maps: Vec<Option<ShadowMap>> = if config.shadow_maps {
            self.pool.install(|| {
                sources
                    .par_iter()
                    .map(|light| {
                        light
                            .casts_shadow
                            .then(|| ShadowMap::build(light, &bounds, &items))
                    })
                    .collect()
            })
        } else {
            sources.iter().map(|_| None).collect()
        };
        let shadow_pass = start.elapsed();

        self.gbuf.reset();
        self.frame.clear(config.background);

        // Geometry pipeline + fragment stage, parallel over triangles.
        let start = Instant::now();
        let gbuf = &self.gbuf;
        let (sw, sh) = (gbuf.width(), gbuf.height());
        self.pool.install(|| {
            items.par_iter().for_each(|item| {
                let ctx = DrawContext::new(item.model, view_proj, sw, sh, item.material);
                item.triangles.par_iter().for_each(|tri| {
                    if let Some(screen) = project_triangle(tri, &ctx) {
                        raster::rasterize(&screen, gbuf);
                    }
                });
            });
        });
        let fragment_pass = start.elapsed();

        // Shading stage: disjoint per-pixel writes, no locks. The blend
        // policy combines with whatever the sample already holds.
        let start = Instant::now();
        let eye = camera.position();
        let background = config.background;
        let blend = config.blend;
        let samples = self.frame.samples_mut();
        self.pool.install(|| {
            samples.par_iter_mut().enumerate().for_each_init(
                Vec::new,
                |scratch: &mut Vec<LightSample>, (i, sample)| {
                    let frag = gbuf.fragment_at(i);
                    if !frag.written {
                        return; // keeps the background fill
                    }
                    scratch.clear();
                    for (li, light) in sources.iter().enumerate() {
                        let visibility = match &shadow_maps[li] {
                            Some(map) => map.visibility(frag.world_pos),
                            None => 1.0,
                        };
                        scratch.push(LightSample {
                            light: *light,
                            visibility,
                        });
                    }
                    let color = materials[frag.material as usize].shade(&ShadePoint {
                        base: background,
                        position: frag.world_pos,
                        normal: frag.normal,
                        uv: frag.uv,
                        eye,
                        sources: scratch,
                        ambients: &ambients,
                    });
                    *sample = blend.apply(*sample, color);
                },
            );
        });
        let shading_pass = start.elapsed();

        let start = Instant::now();
        let image = compose::resolve(&self.frame, config.msaa, config.gamma_correction);
        let compose_pass = start.elapsed();

        debug!(
            "frame {}x{} msaa={}: shadow {:?}, fragment {:?}, shading {:?}, compose {:?}",
            config.width, config.height, config.msaa, shadow_pass, fragment_pass, shading_pass,
            compose_pass
        );
        self.profile = config.debug.then_some(FrameProfile {
            shadow_pass,
            fragment_pass,
            shading_pass,
            compose_pass,
        });

        Ok(image)
    }
}

fn build_pool(workers: usize) -> Result<rayon::ThreadPool, RenderError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| RenderError::WorkerPool(e.to_string()))
}
