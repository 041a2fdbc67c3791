//! The recursive shading/tracing integrator.
//!
//! Each `trace` call is pure given its inputs: the state machine runs
//! over recursion depth, not over persistent objects. The mutually
//! exclusive shading branches (reflection, refraction, Fresnel) are
//! evaluated in strict priority order with early returns; at most one
//! fires per call.

use std::f32::consts::PI;

use glint_core::RenderContext;
use glint_math::{Ray, RayKind, Vec3, Vec4};
use rand::Rng;

use crate::renderer::RenderConfig;
use crate::sampling::hemisphere_sample;
use crate::scene::Scene;

/// Russian-roulette termination probability for non-primary rays.
pub const TERMINATION_FACTOR: f32 = 0.35;

/// Offset along the normal for reflection and shadow ray origins.
const SURFACE_BIAS: f32 = 1e-3;

/// Offset along the sample direction for indirect ray origins.
const GI_ORIGIN_BIAS: f32 = 1e-4;

/// Keeps the IOR ratio finite for a zero refraction index.
const IOR_EPSILON: f32 = 1e-4;

/// Mirror-reflect a ray about the surface normal at the hit point.
///
/// The returned direction is unit length; the origin is biased along the
/// normal to escape the surface it reflected from.
pub fn reflect_ray(ray: &Ray, normal: Vec3, hit_point: Vec3) -> Ray {
    let direction = (ray.direction - 2.0 * normal.dot(ray.direction) * normal).normalize();
    Ray::new(hit_point + normal * SURFACE_BIAS, direction, RayKind::Secondary)
}

/// Refract a ray through the surface at the hit point.
///
/// When the incident cosine is non-negative the ray approaches from
/// inside: the normal is flipped and the index pair swapped. A negative
/// discriminant signals total internal reflection, which falls back to a
/// mirror reflection about the adjusted normal. The refracted origin is
/// biased along the incident direction, through the surface.
pub fn refract_ray(
    ray: &Ray,
    normal: Vec3,
    hit_point: Vec3,
    surface_ior: f32,
    current_ior: f32,
) -> Ray {
    let incident = ray.direction.normalize();

    let mut cos_i = incident.dot(normal);
    let mut n1 = current_ior;
    let mut n2 = surface_ior;
    let mut n = normal;

    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut n1, &mut n2);
        n = -normal;
    }

    let ratio = n1 / (n2 + IOR_EPSILON);
    let k = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);

    // Total internal reflection
    if k < 0.0 {
        return reflect_ray(ray, n, hit_point);
    }

    let direction = (ratio * incident + (ratio * cos_i - k.sqrt()) * n).normalize();
    Ray::new(
        hit_point + incident * SURFACE_BIAS,
        direction,
        RayKind::Secondary,
    )
}

/// Schlick's approximation of the Fresnel reflectance.
///
/// `R0 = ((n1 - n2) / (n1 + n2))^2`, then
/// `F = R0 + (1 - R0) * (1 - |cos(theta)|)^5`.
pub fn fresnel(current_ior: f32, surface_ior: f32, ray: &Ray, normal: Vec3) -> f32 {
    let incident = ray.direction.normalize();

    let r = (current_ior - surface_ior) / (current_ior + surface_ior);
    let r0 = r * r;

    let x = 1.0 - incident.dot(normal).abs();
    r0 + (1.0 - r0) * x.powi(5)
}

/// Recursive integrator over one immutable scene and context snapshot.
pub struct Integrator<'a> {
    scene: &'a Scene,
    ctx: &'a RenderContext,
    config: &'a RenderConfig,
}

impl<'a> Integrator<'a> {
    pub fn new(scene: &'a Scene, ctx: &'a RenderContext, config: &'a RenderConfig) -> Self {
        Self { scene, ctx, config }
    }

    /// Trace a ray and return its linear-light RGBA contribution.
    ///
    /// `bounces` is the remaining recursion budget, `current_ior` the
    /// refraction index of the medium the ray travels in, and
    /// `hit_light` whether an emitter was already recorded on this path
    /// (the first light hit short-circuits with its emissive color).
    pub fn trace<R: Rng + ?Sized>(
        &self,
        ray: &Ray,
        bounces: i32,
        current_ior: f32,
        hit_light: bool,
        rng: &mut R,
    ) -> Vec4 {
        // Out of recursion budget
        if bounces <= 0 {
            return Vec4::ZERO;
        }

        // Russian roulette, secondary rays only so primary visibility
        // keeps full detail. Survival is deliberately not compensated by
        // 1/(1-p); the resulting energy loss is a documented bias.
        if self.ctx.global_illumination
            && ray.kind != RayKind::Primary
            && rng.gen::<f32>() < TERMINATION_FACTOR
        {
            return Vec4::ZERO;
        }

        let Some(hit) = self.scene.closest_triangle(ray) else {
            // No environment contribution
            return Vec4::ZERO;
        };

        let hit_point = ray.at(hit.t);
        let bary = hit.triangle.barycentric(hit_point);
        let normal = (bary.x * hit.triangle.normals[0].truncate()
            + bary.y * hit.triangle.normals[1].truncate()
            + bary.z * hit.triangle.normals[2].truncate())
        .normalize();

        let material = self.scene.material(hit.triangle.material);
        let reflectivity = material.reflectivity;
        let transparency = material.transparency;

        // A surface whose IOR matches the medium we are in is almost
        // certainly the far side of the object we entered: treat it as
        // an exit back to vacuum instead of tracking a medium stack.
        let ior = if current_ior == material.index_of_refraction {
            1.0
        } else {
            material.index_of_refraction
        };

        // Next-event shortcut: the first emitter on a path returns its
        // emissive color directly and stops recursing.
        if material.is_light() && !hit_light {
            return material.emissive.extend(1.0);
        }

        if self.ctx.show_normals {
            return normal.abs().extend(1.0);
        }

        if !self.ctx.direct_lighting {
            return Vec4::ZERO;
        }

        let mut color = Vec4::ZERO;

        for light in &self.ctx.lights {
            // Lights are specified in world space like the meshes, so
            // they ride through the same modelview transform. Stochastic
            // rendering jitters the sample across the light's extent.
            let light_pos = self.ctx.modelview()
                * if self.ctx.global_illumination {
                    light.sample_position(rng)
                } else {
                    light.position_center()
                };

            let mut in_shadow = false;
            if self.ctx.shadows {
                let to_light = (light_pos.truncate() - hit_point).normalize();
                let biased_origin = hit_point + normal * SURFACE_BIAS;
                let shadow_ray = Ray::new(biased_origin, to_light, RayKind::Shadow);

                if let Some(occluder) = self.scene.closest_triangle(&shadow_ray) {
                    // Occluders beyond the light do not cast a shadow
                    if occluder.t < (light_pos.truncate() - biased_origin).length() {
                        in_shadow = true;
                    }
                }
            }

            color += hit
                .triangle
                .phong(material, light_pos, light.color, bary, in_shadow);
        }

        // Exactly one of the following branches may fire per call, in
        // priority order, each returning immediately.

        if !self.ctx.fresnel && self.ctx.reflection && reflectivity > 0.0 {
            let reflected = reflect_ray(ray, normal, hit_point);
            let bounced = self.trace(&reflected, bounces - 1, current_ior, hit_light, rng);
            return reflectivity * bounced + (1.0 - reflectivity) * color;
        }

        if !self.ctx.fresnel && self.ctx.refraction && transparency > 0.0 {
            let refracted = refract_ray(ray, normal, hit_point, ior, current_ior);
            let bounced = self.trace(&refracted, bounces - 1, ior, hit_light, rng);
            return transparency * bounced + (1.0 - transparency) * color;
        }

        if self.ctx.fresnel && (reflectivity > 0.0 || transparency > 0.0) {
            let f = fresnel(current_ior, ior, ray, normal);

            let reflected = reflect_ray(ray, normal, hit_point);
            let refracted = refract_ray(ray, normal, hit_point, ior, current_ior);

            // The direct term computed above is discarded on this
            // branch: the surface response is entirely the Fresnel
            // split between the two recursive rays.
            return reflectivity
                * f
                * self.trace(&reflected, bounces - 1, current_ior, hit_light, rng)
                + transparency
                    * (1.0 - f)
                    * self.trace(&refracted, bounces - 1, ior, hit_light, rng);
        }

        if self.ctx.global_illumination {
            let mut indirect = Vec4::new(0.0, 0.0, 0.0, 1.0);

            for _ in 0..self.config.gi_samples {
                let direction = hemisphere_sample(normal, rng).normalize();
                let gi_ray = Ray::new(
                    hit_point + direction * GI_ORIGIN_BIAS,
                    direction,
                    RayKind::Secondary,
                );

                let gathered = self.trace(&gi_ray, bounces - 1, current_ior, hit_light, rng);

                if let Some(second) = self.scene.closest_triangle(&gi_ray) {
                    // Treat the secondary hit as a light source with the
                    // gathered color, shaded through this triangle's
                    // Phong response and tinted by its ambient color.
                    let second_point = gi_ray.at(second.t).extend(1.0);
                    let response = hit.triangle.phong(
                        material,
                        second_point,
                        gathered.truncate(),
                        bary,
                        false,
                    );
                    indirect += response * material.ambient.extend(1.0);
                }
            }

            // Uniform-hemisphere sampling density
            let pdf = self.config.gi_samples as f32 / (2.0 * PI);
            color += indirect / pdf;
        } else {
            // Flat ambient stands in for indirect light
            color += material.ambient.extend(1.0);
        }

        color
    }
}
