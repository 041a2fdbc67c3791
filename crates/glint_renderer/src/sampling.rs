//! Stochastic hemisphere sampling for indirect illumination.

use std::f32::consts::PI;

use glint_math::Vec3;
use rand::Rng;

/// Draw a uniform-solid-angle direction in the hemisphere about `normal`.
///
/// Inverse-CDF sampling: `theta = acos(1 - x)`, `phi = 2pi * y` with two
/// uniform draws, rotated into the normal's frame through a basis built
/// from one arbitrary tangent. The tangent is not unitized, so the
/// result is only near-unit; callers normalize at the use site.
pub fn hemisphere_sample<R: Rng + ?Sized>(normal: Vec3, rng: &mut R) -> Vec3 {
    let x: f32 = rng.gen();
    let y: f32 = rng.gen();

    let theta = (1.0 - x).acos();
    let phi = 2.0 * PI * y;

    // Local frame puts the normal along +Y
    let local = Vec3::new(
        theta.sin() * phi.cos(),
        theta.cos(),
        theta.sin() * phi.sin(),
    );

    let mut tangent = Vec3::new(normal.z, 0.0, -normal.x);
    // Degenerate for normals along +-Y
    if tangent.length() < 1e-10 {
        tangent = Vec3::X;
    }
    let bitangent = normal.cross(tangent);

    tangent * local.x + normal * local.y + bitangent * local.z
}
