//! Glint Renderer - recursive Monte Carlo CPU raytracing.
//!
//! A Whitted-style raytracer over a flat triangle soup with:
//! - Recursive reflection and refraction with Fresnel blending
//! - Per-light Phong shading with shadow rays
//! - Single-bounce hemisphere-sampled indirect illumination
//! - Row-parallel rendering on a background thread with a
//!   stop/restart lifecycle for interactive hosts
//!
//! The scene is flattened into view space before any ray is cast; the
//! integrator never touches a transform mid-trace.

mod camera;
mod framebuffer;
mod integrator;
mod renderer;
mod sampling;
mod scene;
mod triangle;

pub use camera::primary_ray;
pub use framebuffer::{linear_to_srgb, srgb_to_linear, Framebuffer};
pub use integrator::{fresnel, reflect_ray, refract_ray, Integrator, TERMINATION_FACTOR};
pub use renderer::{RenderConfig, Renderer};
pub use sampling::hemisphere_sample;
pub use scene::{Collision, MaterialId, Scene};
pub use triangle::Triangle;

/// Re-export the math and scene-data types used in this crate's API
pub use glint_core::{Light, Material, Mesh, RenderContext};
pub use glint_math::{Mat4, Ray, RayKind, Vec2, Vec3, Vec4};
