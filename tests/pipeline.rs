//! End-to-end pipeline properties: depth ordering, coverage, background
//! fallback, MSAA resolve, resize safety.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use image::RgbaImage;
use prysm::prelude::*;
use prysm::primitive::Triangle;

fn flat(r: f32, g: f32, b: f32) -> Arc<dyn Material> {
    Arc::new(FlatColor::new(Color::rgb(r, g, b)))
}

fn test_config(width: u32, height: u32) -> RenderConfig {
    RenderConfig {
        width,
        height,
        msaa: 1,
        shadow_maps: false,
        gamma_correction: false,
        background: Color::BLACK,
        workers: 4,
        ..Default::default()
    }
}

fn camera_for(width: u32, height: u32) -> Camera {
    Camera::perspective(
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::ZERO,
        Vec3::Y,
        90.0,
        width as f32 / height as f32,
        0.1,
        100.0,
    )
}

/// A triangle at depth `z` guaranteed to cover the whole 90-degree frustum
/// cross-section at that depth (the frame spans roughly +-(5 - z) world
/// units there).
fn full_frame_triangle(z: f32) -> Triangle {
    Triangle::from_positions(
        Vec3::new(-30.0, -10.0, z),
        Vec3::new(30.0, -10.0, z),
        Vec3::new(0.0, 30.0, z),
    )
}

fn render_scene(scene: Scene, config: RenderConfig, camera: Camera) -> RgbaImage {
    let mut renderer = Renderer::new(config).unwrap();
    renderer.set_scene(scene);
    renderer.set_camera(camera);
    renderer.render().unwrap()
}

#[test]
fn depth_test_is_order_independent() {
    // A red triangle in front of a blue one; submitting them in either
    // order must produce the identical image.
    let near = full_frame_triangle(1.0);
    let far = full_frame_triangle(-1.0);

    let build = |front_first: bool| {
        let mut scene = Scene::new();
        let meshes = [
            Mesh::new(vec![near], flat(1.0, 0.0, 0.0)),
            Mesh::new(vec![far], flat(0.0, 0.0, 1.0)),
        ];
        let mut meshes: Vec<_> = meshes.into_iter().collect();
        if !front_first {
            meshes.reverse();
        }
        for m in meshes {
            scene.add_mesh(m);
        }
        render_scene(scene, test_config(64, 64), camera_for(64, 64))
    };

    let a = build(true);
    let b = build(false);
    assert_eq!(a.as_raw(), b.as_raw());
    // And the nearer triangle won everywhere it covers.
    assert_eq!(a.get_pixel(32, 32).0, [255, 0, 0, 255]);
}

#[test]
fn full_frame_triangle_shades_every_pixel_exactly_once() {
    // Additive blending turns double-shading into an observable error: a
    // pixel rasterized twice would come out at twice the material color.
    let mut scene = Scene::new();
    scene.add_mesh(Mesh::new(
        vec![full_frame_triangle(0.0)],
        flat(0.25, 0.5, 0.25),
    ));

    let config = RenderConfig {
        blend: BlendMode::Additive,
        ..test_config(64, 64)
    };
    let img = render_scene(scene, config, camera_for(64, 64));

    let expected = Color::rgb(0.25, 0.5, 0.25).to_rgba8();
    for (x, y, p) in img.enumerate_pixels() {
        assert_eq!(p.0, expected, "pixel ({x}, {y})");
    }
}

#[test]
fn uncovered_pixels_equal_background_exactly() {
    let mut scene = Scene::new();
    // A tiny triangle near the center; corners stay uncovered.
    scene.add_mesh(Mesh::new(
        vec![Triangle::from_positions(
            Vec3::new(-0.2, -0.2, 0.0),
            Vec3::new(0.2, -0.2, 0.0),
            Vec3::new(0.0, 0.2, 0.0),
        )],
        flat(1.0, 1.0, 1.0),
    ));

    let config = RenderConfig {
        background: Color::rgb(0.1, 0.2, 0.3),
        ..test_config(64, 64)
    };
    let img = render_scene(scene, config, camera_for(64, 64));

    let background = Color::rgb(0.1, 0.2, 0.3).to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, background);
    assert_eq!(img.get_pixel(63, 0).0, background);
    assert_eq!(img.get_pixel(0, 63).0, background);
    assert_eq!(img.get_pixel(63, 63).0, background);
    // Center is covered.
    assert_ne!(img.get_pixel(32, 32).0, background);
}

#[test]
fn msaa_resolve_of_uniform_coverage_matches_msaa_one() {
    // With geometry that covers every sample in a uniform color, the box
    // filter must reproduce the MSAA=1 image exactly.
    let build = |msaa: u32| {
        let mut scene = Scene::new();
        scene.add_mesh(Mesh::new(
            vec![full_frame_triangle(0.0)],
            flat(0.25, 0.5, 0.75),
        ));
        let config = RenderConfig {
            msaa,
            ..test_config(32, 32)
        };
        render_scene(scene, config, camera_for(32, 32))
    };

    let single = build(1);
    let multi = build(2);
    assert_eq!(single.dimensions(), multi.dimensions());
    assert_eq!(single.as_raw(), multi.as_raw());
}

#[test]
fn resize_between_frames_uses_new_dimensions() {
    let mut renderer = Renderer::new(test_config(64, 64)).unwrap();
    renderer.set_camera(camera_for(64, 64));
    let mut scene = Scene::new();
    scene.add_mesh(Mesh::new(
        vec![full_frame_triangle(0.0)],
        flat(1.0, 0.0, 0.0),
    ));
    renderer.set_scene(scene);
    assert_eq!(renderer.render().unwrap().dimensions(), (64, 64));

    let config = RenderConfig {
        msaa: 2,
        ..test_config(40, 30)
    };
    renderer.update_config(config).unwrap();
    assert_eq!(renderer.sample_dimensions(), (80, 60));

    let img = renderer.render().unwrap();
    assert_eq!(img.dimensions(), (40, 30));
    assert_eq!(img.get_pixel(20, 15).0, [255, 0, 0, 255]);
}

/// The §-style end-to-end scenario: a unit plane viewed from (2, 2, 2),
/// flat material, 500x500, MSAA 1, no shadows. The covered pixel count must
/// match the analytically projected quad, and every covered pixel must be
/// exactly the flat shading result.
#[test]
fn end_to_end_unit_plane() {
    let width = 500u32;
    let height = 500u32;
    let camera = Camera::perspective(
        Vec3::new(2.0, 2.0, 2.0),
        Vec3::ZERO,
        Vec3::Y,
        45.0,
        1.0,
        0.1,
        100.0,
    );

    let material_color = Color::rgb(0.8, 0.4, 0.1);
    let mut scene = Scene::new();
    scene.add_mesh(Mesh::unit_plane(Arc::new(FlatColor::new(material_color))));
    scene.add_light(Light::Source(SourceLight::point(
        Vec3::new(0.0, 5.0, 0.0),
        1.0,
        Color::WHITE,
    )));

    let img = render_scene(scene, test_config(width, height), camera);

    // Project the plane's corners with the same transforms the renderer
    // uses and count pixel centers inside the resulting convex quad.
    let view_proj = camera.projection_matrix() * camera.view_matrix().unwrap();
    let corners = [
        Vec3::new(-0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(-0.5, 0.0, 0.5),
    ];
    let screen: Vec<Vec2> = corners
        .iter()
        .map(|&c| {
            let clip = view_proj * c.extend(1.0);
            let ndc = clip.truncate() / clip.w;
            Vec2::new(
                (ndc.x + 1.0) * 0.5 * width as f32,
                (1.0 - ndc.y) * 0.5 * height as f32,
            )
        })
        .collect();

    // Signed distance (in pixels) from p to each quad edge, positive inside.
    let orientation = {
        let e0 = screen[1] - screen[0];
        let e1 = screen[2] - screen[1];
        (e0.x * e1.y - e0.y * e1.x).signum()
    };
    let inside_margin = |p: Vec2| -> f32 {
        let mut margin = f32::INFINITY;
        for i in 0..4 {
            let a = screen[i];
            let b = screen[(i + 1) % 4];
            let e = b - a;
            let d = (e.x * (p.y - a.y) - e.y * (p.x - a.x)) * orientation / e.length();
            margin = margin.min(d);
        }
        margin
    };

    let expected = material_color.to_rgba8();
    let background = Color::BLACK.to_rgba8();
    let mut covered = 0u32;
    let mut lower = 0u32;
    let mut upper = 0u32;
    for (x, y, p) in img.enumerate_pixels() {
        let margin = inside_margin(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
        if margin > 0.05 {
            lower += 1;
        }
        if margin > -0.05 {
            upper += 1;
        }
        if p.0 != background {
            covered += 1;
            assert_eq!(p.0, expected, "covered pixel ({x}, {y})");
        } else {
            assert!(
                margin < 0.05,
                "pixel ({x}, {y}) inside the projected quad is background"
            );
        }
    }

    assert!(lower > 0, "projected quad should cover some pixels");
    assert!(
        (lower..=upper).contains(&covered),
        "covered {covered} outside analytic bounds [{lower}, {upper}]"
    );
}

#[test]
fn shadow_maps_darken_the_occluded_floor() {
    // A lit floor with a small blocker above it. The image center looks at
    // the world origin, which sits directly under the blocker: with shadow
    // maps enabled that pixel loses the direct term and keeps only ambient,
    // so it must be strictly darker than the same pixel rendered with
    // shadows disabled.
    let build = |shadow_maps: bool| {
        let mut scene = Scene::new();

        let mut floor = Mesh::unit_plane(Arc::new(
            BlinnPhong::new(0.3, 1.0, 0.0, 16.0).with_color(Color::WHITE),
        ));
        floor.transform.set_scale_uniform(8.0);
        scene.add_mesh(floor);

        let mut blocker = Mesh::unit_plane(Arc::new(
            BlinnPhong::new(0.3, 1.0, 0.0, 16.0).with_color(Color::WHITE),
        ));
        blocker
            .transform
            .set_scale_uniform(0.8)
            .set_translation(Vec3::new(0.0, 1.5, 0.0));
        scene.add_mesh(blocker);

        scene.add_light(Light::Source(
            SourceLight::point(Vec3::new(0.0, 8.0, 0.0), 1.0, Color::WHITE).with_shadow(),
        ));
        scene.add_light(Light::Ambient(AmbientLight::new(0.4, Color::WHITE)));

        let camera = Camera::perspective(
            Vec3::new(2.5, 3.0, 2.5),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            1.0,
            0.1,
            100.0,
        );
        let config = RenderConfig {
            shadow_maps,
            ..test_config(200, 200)
        };
        render_scene(scene, config, camera)
    };

    let with_shadows = build(true).get_pixel(100, 100).0;
    let without = build(false).get_pixel(100, 100).0;
    let brightness = |p: [u8; 4]| p[0] as u32 + p[1] as u32 + p[2] as u32;
    assert!(
        brightness(with_shadows) < brightness(without),
        "shadowed {with_shadows:?} not darker than unshadowed {without:?}"
    );
}
