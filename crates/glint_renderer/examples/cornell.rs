//! Cornell-box style demo scene.
//!
//! Builds a small room out of quads, renders it synchronously and saves
//! the framebuffer as a PNG.

use glint_renderer::{
    Light, Material, Mesh, RenderConfig, RenderContext, Renderer, Vec3,
};

const WIDTH: usize = 400;
const HEIGHT: usize = 400;

fn main() {
    env_logger::init();

    println!("Glint raytracer - Cornell box example");
    println!("=====================================");

    let meshes = build_room();

    let mut ctx = RenderContext::default();
    ctx.lights = vec![Light::area(
        Vec3::new(0.0, 0.9, 2.0),
        Vec3::splat(0.9),
        0.1,
    )];
    ctx.reflection = true;
    ctx.shadows = true;

    let renderer = Renderer::new(WIDTH, HEIGHT, RenderConfig::default());

    println!("Rendering {WIDTH}x{HEIGHT}...");
    let start = std::time::Instant::now();
    renderer.render_blocking(&meshes, &ctx);
    println!("Rendered in {:?}", start.elapsed());

    let framebuffer = renderer.framebuffer();
    let bytes = framebuffer
        .lock()
        .expect("framebuffer lock poisoned")
        .to_bytes();

    let image = image::RgbaImage::from_raw(WIDTH as u32, HEIGHT as u32, bytes)
        .expect("framebuffer size mismatch");
    image.save("cornell.png").expect("failed to save image");
    println!("Saved to cornell.png");
}

/// A quad facing `normal`, built from a center and two edge vectors.
fn quad(center: Vec3, right: Vec3, up: Vec3, normal: Vec3, material: Material) -> Mesh {
    Mesh::from_shared_indices(
        vec![
            center - right - up,
            center + right - up,
            center + right + up,
            center - right + up,
        ],
        vec![normal; 4],
        vec![vec![0, 1, 2, 3]],
    )
    .with_material(material)
}

fn build_room() -> Vec<Mesh> {
    let white = Material::diffuse(Vec3::splat(0.8));
    let red = Material::diffuse(Vec3::new(0.75, 0.15, 0.15));
    let green = Material::diffuse(Vec3::new(0.15, 0.75, 0.15));
    let mirror = Material {
        ambient: Vec3::ZERO,
        diffuse: Vec3::splat(0.1),
        specular: Vec3::splat(0.8),
        shininess: 64.0,
        reflectivity: 0.85,
        ..Default::default()
    };

    let x = Vec3::X;
    let y = Vec3::Y;
    let z = Vec3::Z;

    vec![
        // Back wall, floor, ceiling, side walls
        quad(Vec3::new(0.0, 0.0, 3.0), x, y, -z, white.clone()),
        quad(Vec3::new(0.0, -1.0, 2.0), x, z, y, white.clone()),
        quad(Vec3::new(0.0, 1.0, 2.0), x, z, -y, white),
        quad(Vec3::new(-1.0, 0.0, 2.0), z, y, x, red),
        quad(Vec3::new(1.0, 0.0, 2.0), z, y, -x, green),
        // A leaning mirror panel
        quad(
            Vec3::new(0.3, -0.5, 2.6),
            Vec3::new(0.35, 0.0, -0.1),
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(-0.27, 0.0, -0.96),
            mirror,
        ),
        // The light fixture itself, visible as bright geometry
        quad(
            Vec3::new(0.0, 0.98, 2.0),
            x * 0.25,
            z * 0.25,
            -y,
            Material::emissive(Vec3::splat(1.0)),
        ),
    ]
}
