//! Primary ray generation.
//!
//! The camera sits at the view-space origin looking down +Z; geometry has
//! already been transformed into that frame by the scene builder, so ray
//! generation needs only the projection settings.

use glint_core::RenderContext;
use glint_math::{Ray, RayKind, Vec3};
use rand::Rng;

/// Generate the primary ray for pixel `(x, y)`.
///
/// With stochastic GI enabled the sample point is jittered inside the
/// pixel (anti-aliasing falls out of averaging); otherwise it is the
/// pixel center, which keeps renders fully deterministic.
///
/// Perspective rays originate at the origin with a field-of-view-scaled,
/// aspect-corrected direction; orthographic rays start on the image plane
/// and all travel along +Z.
pub fn primary_ray<R: Rng + ?Sized>(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    ctx: &RenderContext,
    rng: &mut R,
) -> Ray {
    let (dx, dy) = if ctx.global_illumination {
        (rng.gen::<f32>(), rng.gen::<f32>())
    } else {
        (0.5, 0.5)
    };

    // NDC in [-1, 1]
    let u = ((x as f32 + dx) / width as f32 - 0.5) * 2.0;
    let v = ((y as f32 + dy) / height as f32 - 0.5) * 2.0;

    let aspect = width as f32 / height as f32;

    if !ctx.orthographic {
        let tan_half = (ctx.fov / 2.0).tan();
        let px = u * tan_half * aspect;
        let py = v * tan_half;

        Ray::new(
            Vec3::ZERO,
            Vec3::new(px, py, 1.0).normalize(),
            RayKind::Primary,
        )
    } else {
        let mut px = u;
        let mut py = v;
        if aspect > 1.0 {
            px *= aspect;
        } else {
            py /= aspect;
        }

        Ray::new(Vec3::new(px, py, 0.0), Vec3::Z, RayKind::Primary)
    }
}
