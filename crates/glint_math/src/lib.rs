// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod ray;
pub use ray::{Ray, RayKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_mat4_point_transform() {
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(1.0, 0.0, 0.0, 1.0));

        // Directions (w = 0) ignore translation
        let d = m * Vec4::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(d, Vec4::new(0.0, 0.0, 1.0, 0.0));
    }
}
