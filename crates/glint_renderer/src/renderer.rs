//! Frame orchestrator: owns the framebuffer and the render lifecycle.
//!
//! Each render request is one background task. Within a frame the row
//! loop is sequential and the per-row pixel loop is data-parallel via
//! rayon; finished rows are published into the shared framebuffer under
//! a lock, so a display pass never observes a torn row.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use glint_core::{Mesh, RenderContext};
use glint_math::Vec4;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::camera;
use crate::framebuffer::{self, Framebuffer, BLACK};
use crate::integrator::Integrator;
use crate::scene::Scene;

/// Per-frame quality settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Recursion budget per primary ray
    pub max_bounces: i32,
    /// Anti-aliasing samples per pixel
    pub aa_samples: u32,
    /// Hemisphere samples per hit for indirect light
    pub gi_samples: u32,
    /// Base seed for the per-pixel random streams; a fixed seed makes
    /// renders bit-for-bit reproducible
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_bounces: 10,
            aa_samples: 1,
            gi_samples: 1,
            seed: 0x67a3_9fd1,
        }
    }
}

/// How long `stop` sleeps between polls of the running flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The concurrent render lifecycle exposed to the host application.
///
/// `render` cancels any in-flight frame, rebuilds the scene and spawns a
/// new render task; the host polls [`Renderer::is_running`] (or just
/// keeps displaying the framebuffer) to observe completion.
pub struct Renderer {
    framebuffer: Arc<Mutex<Framebuffer>>,
    running: Arc<AtomicBool>,
    restart: Arc<AtomicBool>,
    config: RenderConfig,
}

impl Renderer {
    pub fn new(width: usize, height: usize, config: RenderConfig) -> Self {
        Self {
            framebuffer: Arc::new(Mutex::new(Framebuffer::new(width, height))),
            running: Arc::new(AtomicBool::new(false)),
            restart: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Shared handle to the output buffer; the display pass locks it,
    /// uploads, and unlocks.
    pub fn framebuffer(&self) -> Arc<Mutex<Framebuffer>> {
        Arc::clone(&self.framebuffer)
    }

    /// Whether a render task is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Resize the output buffer, destroying its contents.
    ///
    /// Drains any in-flight render before touching the buffer.
    pub fn resize(&self, width: usize, height: usize) {
        self.stop();
        self.framebuffer
            .lock()
            .expect("framebuffer lock poisoned")
            .resize(width, height);
    }

    /// Cancel any in-flight render and block until it has drained.
    ///
    /// Sets the restart flag and polls the running flag with a short
    /// sleep. The render task notices the flag at row granularity and
    /// bails out early, so this returns within roughly one row's worth
    /// of work rather than a full frame.
    pub fn stop(&self) {
        self.restart.store(true, Ordering::SeqCst);
        while self.running.load(Ordering::SeqCst) {
            thread::sleep(STOP_POLL_INTERVAL);
        }
        self.restart.store(false, Ordering::SeqCst);
    }

    /// Start rendering a frame on a background thread.
    ///
    /// Blocks until any previous frame has drained, rebuilds the
    /// triangle soup synchronously, clears the framebuffer to opaque
    /// black, snapshots the render context and returns once the render
    /// task is launched.
    pub fn render(&self, meshes: &[Mesh], ctx: &RenderContext) {
        self.stop();

        let scene = Scene::build(meshes, ctx);
        self.framebuffer
            .lock()
            .expect("framebuffer lock poisoned")
            .clear(BLACK);

        let ctx = ctx.clone();
        let config = self.config;
        let framebuffer = Arc::clone(&self.framebuffer);
        let running = Arc::clone(&self.running);
        let restart = Arc::clone(&self.restart);

        running.store(true, Ordering::SeqCst);
        thread::spawn(move || {
            render_frame(&scene, &ctx, &config, &framebuffer, &restart);
            running.store(false, Ordering::SeqCst);
        });
    }

    /// Render a frame synchronously on the calling thread.
    ///
    /// Same pipeline as [`Renderer::render`] without the background
    /// task; used by tests and offline rendering.
    pub fn render_blocking(&self, meshes: &[Mesh], ctx: &RenderContext) {
        self.stop();

        let scene = Scene::build(meshes, ctx);
        self.framebuffer
            .lock()
            .expect("framebuffer lock poisoned")
            .clear(BLACK);

        render_frame(&scene, ctx, &self.config, &self.framebuffer, &self.restart);
    }
}

/// Render every row of the frame.
///
/// Rows are computed into a local buffer by a parallel column loop and
/// only then copied into the shared framebuffer, keeping worker writes
/// on disjoint memory and the published buffer row-consistent. Each
/// pixel owns a deterministic RNG stream derived from the config seed
/// and its coordinates, so a re-render of the same scene is
/// bit-identical regardless of thread scheduling.
fn render_frame(
    scene: &Scene,
    ctx: &RenderContext,
    config: &RenderConfig,
    framebuffer: &Mutex<Framebuffer>,
    restart: &AtomicBool,
) {
    let (width, height) = {
        let fb = framebuffer.lock().expect("framebuffer lock poisoned");
        (fb.width(), fb.height())
    };

    let integrator = Integrator::new(scene, ctx, config);
    let samples = config.aa_samples.max(1);
    let start = Instant::now();

    for y in 0..height {
        // Cooperative cancellation at row granularity
        if restart.load(Ordering::SeqCst) {
            log::debug!("render cancelled at row {y}/{height}");
            return;
        }

        let row: Vec<[u8; 4]> = (0..width)
            .into_par_iter()
            .map(|x| {
                let mut rng = SmallRng::seed_from_u64(pixel_seed(config.seed, x as u64, y as u64));

                let mut color = Vec4::ZERO;
                for _ in 0..samples {
                    let ray = camera::primary_ray(
                        x as u32,
                        y as u32,
                        width as u32,
                        height as u32,
                        ctx,
                        &mut rng,
                    );
                    color += integrator.trace(&ray, config.max_bounces, 1.0, false, &mut rng);
                }
                color /= samples as f32;

                framebuffer::encode(color)
            })
            .collect();

        framebuffer
            .lock()
            .expect("framebuffer lock poisoned")
            .write_row(y, &row);
    }

    log::info!(
        "rendered {}x{} ({} triangles) in {:.2?}",
        width,
        height,
        scene.triangle_count(),
        start.elapsed()
    );
}

/// Mix the frame seed and pixel coordinates into one RNG seed
/// (splitmix64 finalizer).
fn pixel_seed(seed: u64, x: u64, y: u64) -> u64 {
    let mut z = seed ^ (y << 32 | x).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Light, Material};
    use glint_math::Vec3;

    fn test_scene() -> (Vec<Mesh>, RenderContext) {
        // A large diffuse wall ahead of the camera with one light at
        // the origin; direct shading only.
        let mesh = Mesh::from_shared_indices(
            vec![
                Vec3::new(-10.0, -10.0, 3.0),
                Vec3::new(10.0, -10.0, 3.0),
                Vec3::new(10.0, 10.0, 3.0),
                Vec3::new(-10.0, 10.0, 3.0),
            ],
            vec![Vec3::NEG_Z; 4],
            vec![vec![0, 1, 2, 3]],
        )
        .with_material(Material {
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.7),
            specular: Vec3::ZERO,
            ..Default::default()
        });

        let mut ctx = RenderContext::default();
        ctx.shadows = false;
        ctx.lights = vec![Light::point(Vec3::ZERO, Vec3::ONE)];

        (vec![mesh], ctx)
    }

    #[test]
    fn test_pixel_seed_varies_per_pixel() {
        let a = pixel_seed(1, 0, 0);
        let b = pixel_seed(1, 1, 0);
        let c = pixel_seed(1, 0, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);

        // And is stable
        assert_eq!(pixel_seed(1, 3, 5), pixel_seed(1, 3, 5));
    }

    #[test]
    fn test_stop_on_idle_renderer_returns() {
        let renderer = Renderer::new(8, 8, RenderConfig::default());
        renderer.stop();
        assert!(!renderer.is_running());
    }

    #[test]
    fn test_blocking_render_lights_center() {
        let (meshes, ctx) = test_scene();
        let renderer = Renderer::new(16, 16, RenderConfig::default());

        renderer.render_blocking(&meshes, &ctx);

        let fb = renderer.framebuffer();
        let fb = fb.lock().unwrap();
        let center = fb.get(8, 8);
        assert!(center[0] > 0, "center pixel should be lit, got {center:?}");
        assert_eq!(center[3], 255);
    }

    #[test]
    fn test_rerender_is_bit_identical() {
        let (meshes, mut ctx) = test_scene();
        // Stochastic features on: determinism must come from seeding
        ctx.global_illumination = true;
        let renderer = Renderer::new(12, 12, RenderConfig::default());

        renderer.render_blocking(&meshes, &ctx);
        let first = renderer.framebuffer().lock().unwrap().clone();

        renderer.render_blocking(&meshes, &ctx);
        let second = renderer.framebuffer().lock().unwrap().clone();

        assert_eq!(first, second);
    }

    #[test]
    fn test_background_render_completes() {
        let (meshes, ctx) = test_scene();
        let renderer = Renderer::new(16, 16, RenderConfig::default());

        renderer.render(&meshes, &ctx);

        // Poll until the task drains, with a generous timeout
        let deadline = Instant::now() + Duration::from_secs(30);
        while renderer.is_running() {
            assert!(Instant::now() < deadline, "render did not complete");
            thread::sleep(Duration::from_millis(5));
        }

        let background = renderer.framebuffer().lock().unwrap().clone();

        // Matches a blocking render of the same inputs
        renderer.render_blocking(&meshes, &ctx);
        let blocking = renderer.framebuffer().lock().unwrap().clone();
        assert_eq!(background, blocking);
    }

    #[test]
    fn test_render_restarts_cleanly() {
        let (meshes, ctx) = test_scene();
        let renderer = Renderer::new(16, 16, RenderConfig::default());

        // Back-to-back requests: each must drain the previous one
        renderer.render(&meshes, &ctx);
        renderer.render(&meshes, &ctx);
        renderer.stop();

        assert!(!renderer.is_running());
    }

    #[test]
    fn test_resize_clears_buffer() {
        let renderer = Renderer::new(8, 8, RenderConfig::default());
        renderer.resize(4, 6);

        let fb = renderer.framebuffer();
        let fb = fb.lock().unwrap();
        assert_eq!(fb.width(), 4);
        assert_eq!(fb.height(), 6);
        assert!(fb.as_raw().iter().all(|t| *t == BLACK));
    }
}
