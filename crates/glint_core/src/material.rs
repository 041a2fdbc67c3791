//! Phong material definition.

use glint_math::Vec3;

/// Emissive energy above this counts as a light source.
const LIGHT_THRESHOLD: f32 = 1e-6;

/// A classic Phong material with reflection/refraction extensions.
///
/// Materials are owned by the mesh collection (or interned into the
/// renderer's material arena); triangles reference them by index so
/// triangle copies stay cheap.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Ambient color (added once per hit by the integrator)
    pub ambient: Vec3,
    /// Diffuse (Lambertian) color
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Emissive color (non-zero makes this a light)
    pub emissive: Vec3,
    /// Specular exponent
    pub shininess: f32,
    /// Mirror reflectivity in [0, 1]
    pub reflectivity: f32,
    /// Transparency in [0, 1]
    pub transparency: f32,
    /// Index of refraction
    pub index_of_refraction: f32,
}

impl Default for Material {
    /// The process-wide fallback used when a mesh carries no material:
    /// flat grey, no emission, shininess 1.
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.5),
            diffuse: Vec3::splat(0.5),
            specular: Vec3::splat(0.5),
            emissive: Vec3::ZERO,
            shininess: 1.0,
            reflectivity: 0.0,
            transparency: 0.0,
            index_of_refraction: 1.0,
        }
    }
}

impl Material {
    /// Create a diffuse-only material.
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            ambient: color * 0.2,
            diffuse: color,
            specular: Vec3::ZERO,
            ..Default::default()
        }
    }

    /// Create an emissive (light) material.
    pub fn emissive(color: Vec3) -> Self {
        Self {
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            emissive: color,
            ..Default::default()
        }
    }

    /// Set the mirror reflectivity.
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    /// Set transparency and index of refraction.
    pub fn with_transparency(mut self, transparency: f32, ior: f32) -> Self {
        self.transparency = transparency;
        self.index_of_refraction = ior;
        self
    }

    /// Whether this material emits enough energy to count as a light.
    ///
    /// Shadow rays skip triangles whose material is a light, and the
    /// integrator short-circuits on the first light hit of a path.
    #[inline]
    pub fn is_light(&self) -> bool {
        self.emissive.length_squared() > LIGHT_THRESHOLD
    }
}
