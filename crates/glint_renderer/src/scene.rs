//! Scene builder: flattens meshes into a view-space triangle soup.
//!
//! The soup is rebuilt from scratch at the start of every render request,
//! so stale triangles from a prior frame can never be traced against a
//! newer render context. Materials live in an arena on the scene; slot 0
//! is always the default material, and triangles carry arena indices so
//! copies stay cheap and lifetimes stay explicit.

use glint_core::{Material, Mesh, RenderContext};
use glint_math::{Ray, Vec3};

use crate::triangle::Triangle;

/// Index into the scene's material arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// The default (fallback) material, always present at slot 0.
    pub const DEFAULT: MaterialId = MaterialId(0);
}

/// Result of a closest-hit query: the winning triangle (copied out) and
/// its ray parameter.
#[derive(Clone, Debug)]
pub struct Collision {
    pub triangle: Triangle,
    pub t: f32,
}

/// Placeholder per-vertex display color assigned at build time.
const FLAT_COLOR: Vec3 = Vec3::new(0.7, 0.7, 0.7);

/// The flattened, view-space scene the integrator traces against.
pub struct Scene {
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
}

impl Scene {
    /// An empty scene holding only the default material.
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            materials: vec![Material::default()],
        }
    }

    /// Build a scene from a mesh collection and the current context.
    pub fn build(meshes: &[Mesh], ctx: &RenderContext) -> Self {
        let mut scene = Self::new();
        scene.rebuild(meshes, ctx);
        scene
    }

    /// Rebuild the triangle soup.
    ///
    /// Every polygon face is fan-triangulated from its first vertex, and
    /// every vertex position (w = 1) and normal (w = 0) is pushed through
    /// the combined `view * model` transform, so all geometry the
    /// integrator sees is in one consistent view-space frame. Must run
    /// synchronously before tracing starts; the mesh collection must not
    /// be mutated concurrently.
    pub fn rebuild(&mut self, meshes: &[Mesh], ctx: &RenderContext) {
        self.triangles.clear();
        self.materials.truncate(1);

        let modelview = ctx.modelview();
        let mut id = 0;

        for mesh in meshes {
            let material = match &mesh.material {
                Some(mat) => {
                    self.materials.push(mat.clone());
                    MaterialId(self.materials.len() - 1)
                }
                None => MaterialId::DEFAULT,
            };

            for (face, (face_normals, face_uvs)) in mesh
                .face_vertices
                .iter()
                .zip(mesh.face_normals.iter().zip(mesh.face_uvs.iter()))
            {
                if !face_indices_valid(mesh, face, face_normals, face_uvs) {
                    log::warn!("skipping face with invalid indices");
                    continue;
                }

                // Fan-triangulate: every triangle reuses the face's first vertex
                for tri in 0..face.len().saturating_sub(2) {
                    let mut triangle = Triangle::default();
                    for vertex in 0..3 {
                        let face_vertex = if vertex == 0 { 0 } else { tri + vertex };

                        let position = mesh.positions[face[face_vertex] as usize];
                        triangle.verts[vertex] = modelview * position.extend(1.0);

                        let normal = mesh.normals[face_normals[face_vertex] as usize];
                        triangle.normals[vertex] = modelview * normal.extend(0.0);

                        triangle.uvs[vertex] = mesh.uvs[face_uvs[face_vertex] as usize];
                        triangle.colors[vertex] = FLAT_COLOR;
                    }
                    triangle.id = id;
                    id += 1;
                    triangle.material = material;
                    self.triangles.push(triangle);
                }
            }
        }

        log::debug!(
            "scene rebuilt: {} triangles, {} materials",
            self.triangles.len(),
            self.materials.len()
        );
    }

    /// Closest-hit query: linear scan over every triangle.
    ///
    /// Shadow rays skip triangles whose material is a light, so light
    /// geometry never occludes the surface it illuminates. Ties keep the
    /// first triangle encountered (strict less-than), which makes
    /// repeated queries on an unmodified scene deterministic.
    pub fn closest_triangle(&self, ray: &Ray) -> Option<Collision> {
        let mut closest: Option<Collision> = None;

        for triangle in &self.triangles {
            if ray.is_shadow() && self.material(triangle.material).is_light() {
                continue;
            }

            let t = triangle.intersect(ray);
            if t > 0.0 && closest.as_ref().map_or(true, |c| t < c.t) {
                closest = Some(Collision {
                    triangle: triangle.clone(),
                    t,
                });
            }
        }

        closest
    }

    /// Look up a material; an out-of-range id falls back to the default.
    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        self.materials.get(id.0).unwrap_or(&self.materials[0])
    }

    /// Number of triangles in the soup.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// The flattened triangles (mainly for tests and debugging).
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn face_indices_valid(mesh: &Mesh, face: &[u32], normals: &[u32], uvs: &[u32]) -> bool {
    face.len() == normals.len()
        && face.len() == uvs.len()
        && face.iter().all(|&i| (i as usize) < mesh.positions.len())
        && normals.iter().all(|&i| (i as usize) < mesh.normals.len())
        && uvs.iter().all(|&i| (i as usize) < mesh.uvs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::{RayKind, Vec4};

    /// A unit quad facing -Z at z = 2 (two triangles after fanning).
    fn quad_mesh() -> Mesh {
        Mesh::from_shared_indices(
            vec![
                Vec3::new(-1.0, -1.0, 2.0),
                Vec3::new(1.0, -1.0, 2.0),
                Vec3::new(1.0, 1.0, 2.0),
                Vec3::new(-1.0, 1.0, 2.0),
            ],
            vec![Vec3::NEG_Z; 4],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn test_rebuild_fan_triangulates() {
        let scene = Scene::build(&[quad_mesh()], &RenderContext::default());

        assert_eq!(scene.triangle_count(), 2);
        // Sequential ids starting at zero
        assert_eq!(scene.triangles()[0].id, 0);
        assert_eq!(scene.triangles()[1].id, 1);
        // Both share the fan's first vertex
        assert_eq!(
            scene.triangles()[0].verts[0],
            scene.triangles()[1].verts[0]
        );
    }

    #[test]
    fn test_missing_material_uses_default() {
        let scene = Scene::build(&[quad_mesh()], &RenderContext::default());

        let tri = &scene.triangles()[0];
        assert_eq!(tri.material, MaterialId::DEFAULT);
        assert_eq!(scene.material(tri.material), &Material::default());
    }

    #[test]
    fn test_mesh_material_is_interned() {
        let mesh = quad_mesh().with_material(Material::diffuse(Vec3::X));
        let scene = Scene::build(&[mesh], &RenderContext::default());

        let tri = &scene.triangles()[0];
        assert_ne!(tri.material, MaterialId::DEFAULT);
        assert_eq!(scene.material(tri.material).diffuse, Vec3::X);
    }

    #[test]
    fn test_rebuild_applies_modelview() {
        let mut ctx = RenderContext::default();
        ctx.view = glint_math::Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0));

        let scene = Scene::build(&[quad_mesh()], &ctx);
        assert_eq!(
            scene.triangles()[0].verts[0],
            Vec4::new(-1.0, -1.0, 3.0, 1.0)
        );
        // Normals transform as directions: translation leaves them alone
        assert_eq!(
            scene.triangles()[0].normals[0],
            Vec4::new(0.0, 0.0, -1.0, 0.0)
        );
    }

    #[test]
    fn test_invalid_face_skipped() {
        let mut mesh = quad_mesh();
        mesh.face_vertices.push(vec![0, 1, 99]);
        mesh.face_normals.push(vec![0, 1, 2]);
        mesh.face_uvs.push(vec![0, 1, 2]);

        let scene = Scene::build(&[mesh], &RenderContext::default());
        assert_eq!(scene.triangle_count(), 2);
    }

    #[test]
    fn test_closest_triangle_picks_nearest() {
        let near = quad_mesh();
        let mut far = quad_mesh();
        for p in &mut far.positions {
            p.z = 5.0;
        }

        let scene = Scene::build(&[far, near], &RenderContext::default());
        let ray = Ray::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::Z, RayKind::Primary);

        let hit = scene.closest_triangle(&ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_triangle_deterministic() {
        let scene = Scene::build(&[quad_mesh()], &RenderContext::default());
        let ray = Ray::new(Vec3::new(0.1, -0.2, 0.0), Vec3::Z, RayKind::Primary);

        let first = scene.closest_triangle(&ray).unwrap();
        for _ in 0..10 {
            let again = scene.closest_triangle(&ray).unwrap();
            assert_eq!(again.t, first.t);
            assert_eq!(again.triangle.id, first.triangle.id);
        }
    }

    #[test]
    fn test_coincident_hit_keeps_first_triangle() {
        // Two identical quads: the earlier-built triangle must win ties
        let scene = Scene::build(&[quad_mesh(), quad_mesh()], &RenderContext::default());
        let ray = Ray::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::Z, RayKind::Primary);

        let hit = scene.closest_triangle(&ray).unwrap();
        assert_eq!(hit.triangle.id, 0);
    }

    #[test]
    fn test_shadow_ray_skips_lights() {
        let mut light_quad = quad_mesh();
        light_quad.material = Some(Material::emissive(Vec3::ONE));

        let scene = Scene::build(&[light_quad], &RenderContext::default());
        let origin = Vec3::new(-0.5, -0.5, 0.0);

        let shadow = Ray::new(origin, Vec3::Z, RayKind::Shadow);
        assert!(scene.closest_triangle(&shadow).is_none());

        // The same ray as a primary ray still hits
        let primary = Ray::new(origin, Vec3::Z, RayKind::Primary);
        assert!(scene.closest_triangle(&primary).is_some());
    }

    #[test]
    fn test_miss_returns_none() {
        let scene = Scene::build(&[quad_mesh()], &RenderContext::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, RayKind::Primary);
        assert!(scene.closest_triangle(&ray).is_none());
    }
}
