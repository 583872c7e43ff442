//! Demo binary: renders a small procedural scene to `render.png`.
//!
//! Run with `RUST_LOG=debug` to see per-pass timings.

use std::sync::Arc;

use glam::Vec3;
use prysm::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut scene = Scene::new();

    let mut floor = Mesh::unit_plane(Arc::new(BlinnPhong::new(0.3, 0.9, 0.1, 16.0).with_color(
        Color::rgb(0.7, 0.7, 0.75),
    )));
    floor.transform.set_scale_uniform(6.0);
    scene.add_mesh(floor);

    let mut cube = Mesh::cube(
        1.0,
        Arc::new(BlinnPhong::new(0.3, 0.8, 0.5, 64.0).with_color(Color::rgb(0.85, 0.3, 0.2))),
    );
    cube.transform
        .set_translation(Vec3::new(0.0, 0.5, 0.0))
        .rotate_y(0.6);
    scene.add_mesh(cube);

    scene.add_light(Light::Source(
        SourceLight::point(Vec3::new(3.0, 5.0, 2.0), 1.2, Color::WHITE).with_shadow(),
    ));
    scene.add_light(Light::Ambient(AmbientLight::new(
        0.6,
        Color::rgb(0.9, 0.9, 1.0),
    )));

    let config = RenderConfig {
        width: 800,
        height: 600,
        msaa: 2,
        background: Color::rgb(0.05, 0.05, 0.08),
        debug: true,
        ..Default::default()
    };
    let mut renderer = Renderer::new(config)?;
    renderer.set_scene(scene);
    renderer.set_camera(Camera::perspective(
        Vec3::new(3.0, 2.5, 3.5),
        Vec3::new(0.0, 0.3, 0.0),
        Vec3::Y,
        45.0,
        800.0 / 600.0,
        0.1,
        100.0,
    ));

    let image = renderer.render()?;
    image.save("render.png")?;

    if let Some(profile) = renderer.profile() {
        println!(
            "shadow {:?}, fragment {:?}, shading {:?}, compose {:?}",
            profile.shadow_pass,
            profile.fragment_pass,
            profile.shading_pass,
            profile.compose_pass
        );
    }
    println!("wrote render.png");
    Ok(())
}
