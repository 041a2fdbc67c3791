//! Render context: transforms, lights and feature toggles.
//!
//! The host owns and mutates a [`RenderContext`] (camera controls, UI
//! toggles); the renderer snapshots it at the start of a frame and only
//! reads it while tracing.

use glint_math::{Mat4, Vec3, Vec4};
use rand::Rng;

/// A point/area light.
///
/// The position is a point sample at the light's center; for stochastic
/// rendering [`Light::sample_position`] jitters it within the light's
/// physical extent so soft shadows emerge from averaging.
#[derive(Clone, Debug)]
pub struct Light {
    /// Center of the light (world space, pre-view-transform)
    pub position: Vec3,
    /// Emitted color
    pub color: Vec3,
    /// Physical extent; 0 makes it a pure point light
    pub radius: f32,
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            radius: 0.0,
        }
    }

    /// Create an area light with the given extent.
    pub fn area(position: Vec3, color: Vec3, radius: f32) -> Self {
        Self {
            position,
            color,
            radius,
        }
    }

    /// The fixed center position as a homogeneous point.
    #[inline]
    pub fn position_center(&self) -> Vec4 {
        self.position.extend(1.0)
    }

    /// A position jittered uniformly within the light's extent.
    pub fn sample_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec4 {
        if self.radius <= 0.0 {
            return self.position_center();
        }
        // Rejection-sample the unit ball
        let offset = loop {
            let p = Vec3::new(
                rng.gen::<f32>() * 2.0 - 1.0,
                rng.gen::<f32>() * 2.0 - 1.0,
                rng.gen::<f32>() * 2.0 - 1.0,
            );
            if p.length_squared() <= 1.0 {
                break p;
            }
        };
        (self.position + offset * self.radius).extend(1.0)
    }
}

/// Feature toggles, transforms and lights for one render.
///
/// All geometry handed to the integrator is pre-transformed by
/// `view * model` into a single view-space frame; the integrator never
/// performs transform lookups mid-trace.
#[derive(Clone, Debug)]
pub struct RenderContext {
    /// Camera (view) transform
    pub view: Mat4,
    /// Model (object) transform
    pub model: Mat4,
    /// Vertical field of view in radians (perspective projection)
    pub fov: f32,
    /// Orthographic instead of perspective projection
    pub orthographic: bool,
    /// Active lights
    pub lights: Vec<Light>,

    /// Per-light Phong shading
    pub direct_lighting: bool,
    /// Shadow rays
    pub shadows: bool,
    /// Mirror reflection
    pub reflection: bool,
    /// Refraction through transparent materials
    pub refraction: bool,
    /// Fresnel blending of reflection and refraction
    pub fresnel: bool,
    /// Stochastic global illumination (jittered sampling, Russian
    /// roulette, hemisphere-sampled indirect light)
    pub global_illumination: bool,
    /// Debug view: shade with the absolute interpolated normal
    pub show_normals: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            fov: std::f32::consts::FRAC_PI_2,
            orthographic: false,
            lights: Vec::new(),
            direct_lighting: true,
            shadows: true,
            reflection: false,
            refraction: false,
            fresnel: false,
            global_illumination: false,
            show_normals: false,
        }
    }
}

impl RenderContext {
    /// Combined view-model transform applied to scene geometry and light
    /// positions.
    #[inline]
    pub fn modelview(&self) -> Mat4 {
        self.view * self.model
    }
}
