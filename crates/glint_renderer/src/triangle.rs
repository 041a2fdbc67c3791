//! Triangle primitive: intersection, barycentrics and local shading.
//!
//! Triangles live entirely in view space; positions and normals are
//! homogeneous (`Vec4`) so the scene builder can push them through one
//! combined transform.

use std::f32::consts::PI;

use glint_core::Material;
use glint_math::{Ray, Vec2, Vec3, Vec4};

use crate::scene::MaterialId;

/// A view-space triangle with per-vertex attributes.
///
/// The id is assigned sequentially at scene-build time; `-1` marks a
/// triangle that has not been finalized. Identity is informational only
/// and takes no part in equality. Triangles are value-copied freely; the
/// material is a cheap arena index, never an owning reference.
#[derive(Clone, Debug)]
pub struct Triangle {
    pub id: i32,
    /// Homogeneous vertex positions (w = 1)
    pub verts: [Vec4; 3],
    /// Homogeneous vertex normals (w = 0)
    pub normals: [Vec4; 3],
    /// Per-vertex display colors
    pub colors: [Vec3; 3],
    /// Per-vertex texture coordinates
    pub uvs: [Vec2; 3],
    /// Index into the scene's material arena
    pub material: MaterialId,
}

impl Default for Triangle {
    fn default() -> Self {
        Self {
            id: -1,
            verts: [Vec4::ZERO; 3],
            normals: [Vec4::ZERO; 3],
            colors: [Vec3::ZERO; 3],
            uvs: [Vec2::ZERO; 3],
            material: MaterialId::DEFAULT,
        }
    }
}

impl Triangle {
    /// Whether the scene builder has finalized this triangle.
    pub fn is_valid(&self) -> bool {
        self.id != -1
    }

    /// Ray/triangle intersection via the plane equation plus three
    /// half-plane tests against the unnormalized face normal.
    ///
    /// Returns the ray parameter `t`, or `-1.0` for a miss. Hits exactly
    /// on an edge are accepted (the half-plane tests use `>= 0` with no
    /// epsilon). A ray parallel to the plane divides by zero; the
    /// resulting inf/NaN fails the tests below and falls out as a miss.
    pub fn intersect(&self, ray: &Ray) -> f32 {
        let a = self.verts[0].truncate();
        let b = self.verts[1].truncate();
        let c = self.verts[2].truncate();

        let normal = (b - a).cross(c - a);

        let t = (a - ray.origin).dot(normal) / ray.direction.dot(normal);

        // Behind the origin
        if t < 0.0 {
            return -1.0;
        }

        let p = ray.at(t);

        let n1 = (b - a).cross(p - a);
        let n2 = (c - b).cross(p - b);
        let n3 = (a - c).cross(p - c);

        if n1.dot(normal) >= 0.0 && n2.dot(normal) >= 0.0 && n3.dot(normal) >= 0.0 {
            t
        } else {
            -1.0
        }
    }

    /// Barycentric coordinates of an in-plane point inside the triangle,
    /// from unsigned sub-triangle areas.
    ///
    /// The areas are magnitudes, so this is not a signed decomposition:
    /// it is only valid for points already known to lie inside, and must
    /// not be used for extrapolation.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        let a = self.verts[0].truncate();
        let b = self.verts[1].truncate();
        let c = self.verts[2].truncate();

        let area = (b - a).cross(c - a).length();
        let area_pab = (p - a).cross(p - b).length();
        let area_pbc = (p - b).cross(p - c).length();
        let area_pca = (p - c).cross(p - a).length();

        Vec3::new(area_pbc / area, area_pca / area, area_pab / area)
    }

    /// Direct Phong contribution of one light at the barycentric point.
    ///
    /// Returns transparent black when shadowed. Diffuse is a clamped
    /// Lambertian cosine; specular is normalized Blinn: the half-vector
    /// cosine raised to the shininess exponent, clamped, then scaled by
    /// the diffuse cosine and `(shininess + 2) / 2pi`. The eye sits at
    /// the view-space origin. Ambient is deliberately absent here; the
    /// integrator adds it exactly once per hit, not per light.
    pub fn phong(
        &self,
        material: &Material,
        light_pos: Vec4,
        light_color: Vec3,
        bary: Vec3,
        in_shadow: bool,
    ) -> Vec4 {
        if in_shadow {
            return Vec4::ZERO;
        }

        let normal = (bary.x * self.normals[0].truncate()
            + bary.y * self.normals[1].truncate()
            + bary.z * self.normals[2].truncate())
        .normalize();
        let hit = bary.x * self.verts[0].truncate()
            + bary.y * self.verts[1].truncate()
            + bary.z * self.verts[2].truncate();

        let l = (light_pos.truncate() - hit).normalize();
        let e = (-hit).normalize();

        // Diffuse
        let cos_theta = normal.dot(l).clamp(0.0, 1.0);
        let diffuse = material.diffuse * light_color * cos_theta;

        // Specular (normalized Blinn, half-vector)
        let h = (l + e).normalize();
        let mut cos_h = normal.dot(h).clamp(0.0, 1.0);
        cos_h = cos_h.powf(material.shininess).clamp(0.0, 1.0);
        cos_h = cos_h * cos_theta * (material.shininess + 2.0) / (2.0 * PI);
        let specular = material.specular * light_color * cos_h;

        (diffuse + specular).extend(1.0)
    }
}
