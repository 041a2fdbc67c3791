use crate::Vec3;

/// What a ray is being traced for.
///
/// The kind is a query hint, not ownership: shadow rays must skip emissive
/// (light) geometry during the closest-hit search so that a light's own
/// triangles never occlude the surface they are illuminating.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RayKind {
    /// Generated at the camera, one (or more, with anti-aliasing) per pixel.
    Primary,
    /// Spawned at a surface: reflection, refraction, or hemisphere sample.
    Secondary,
    /// Occlusion probe from a hit point towards a light.
    Shadow,
}

/// A ray in 3D space with origin, direction, and kind.
///
/// The direction is stored as given and is *not* renormalized on
/// construction; callers that need a unit direction normalize at the
/// call site.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub kind: RayKind,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction,
            kind,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether this is a shadow (occlusion) ray.
    #[inline]
    pub fn is_shadow(&self) -> bool {
        self.kind == RayKind::Shadow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction, RayKind::Primary);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.kind, RayKind::Primary);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, RayKind::Secondary);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_direction_not_normalized() {
        // Construction must leave a non-unit direction untouched
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0), RayKind::Primary);
        assert_eq!(ray.direction.length(), 3.0);
        assert_eq!(ray.at(1.0), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_ray_kind() {
        let shadow = Ray::new(Vec3::ZERO, Vec3::Y, RayKind::Shadow);
        let primary = Ray::new(Vec3::ZERO, Vec3::Y, RayKind::Primary);

        assert!(shadow.is_shadow());
        assert!(!primary.is_shadow());
    }
}
