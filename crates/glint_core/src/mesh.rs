//! Mesh geometry representation.
//!
//! This module provides a renderer-agnostic mesh representation that an
//! external loader (OBJ/MTL or similar) populates and the scene builder
//! flattens into a triangle soup. Faces are index lists into the vertex
//! arrays and may be arbitrary polygons, not just triangles.

use glint_math::{Vec2, Vec3};

use crate::material::Material;

/// A polygonal mesh with per-face index lists.
///
/// `face_vertices`, `face_normals` and `face_uvs` run in parallel: entry
/// `i` of each describes face `i`, and within a face the three lists have
/// the same length. The scene builder fan-triangulates each face from its
/// first vertex.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (world space, pre-view-transform)
    pub positions: Vec<Vec3>,

    /// Vertex normals
    pub normals: Vec<Vec3>,

    /// UV coordinates
    pub uvs: Vec<Vec2>,

    /// Per-face vertex indices (polygons of 3 or more vertices)
    pub face_vertices: Vec<Vec<u32>>,

    /// Per-face normal indices, parallel to `face_vertices`
    pub face_normals: Vec<Vec<u32>>,

    /// Per-face UV indices, parallel to `face_vertices`
    pub face_uvs: Vec<Vec<u32>>,

    /// Material for the whole mesh; `None` falls back to the default
    /// material at scene-build time
    pub material: Option<Material>,
}

impl Mesh {
    /// Create a mesh from positions, normals and faces that share one
    /// index list per face (the common case for generated geometry).
    ///
    /// UVs default to (0, 0) for every vertex.
    pub fn from_shared_indices(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        faces: Vec<Vec<u32>>,
    ) -> Self {
        let uvs = vec![Vec2::ZERO; positions.len()];
        Self {
            positions,
            normals,
            uvs,
            face_normals: faces.clone(),
            face_uvs: faces.clone(),
            face_vertices: faces,
            material: None,
        }
    }

    /// Attach a material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Number of polygon faces.
    pub fn face_count(&self) -> usize {
        self.face_vertices.len()
    }

    /// Number of triangles a fan-triangulation of all faces produces.
    pub fn triangle_count(&self) -> usize {
        self.face_vertices
            .iter()
            .map(|face| face.len().saturating_sub(2))
            .sum()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
