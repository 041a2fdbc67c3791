//! Glint Core - host-facing scene data for the raytracer.
//!
//! This crate provides:
//!
//! - **Geometry**: [`Mesh`] - polygonal meshes with positions, normals,
//!   UVs and an optional material, as produced by an external loader
//! - **Shading data**: [`Material`] - Phong material with reflectivity,
//!   transparency and index of refraction
//! - **Render state**: [`RenderContext`] - transforms, lights and feature
//!   toggles, owned and mutated by the host, read by the renderer
//!
//! The renderer crate consumes these types; nothing here performs any
//! tracing or I/O.

pub mod context;
pub mod material;
pub mod mesh;

// Re-export commonly used types
pub use context::{Light, RenderContext};
pub use material::Material;
pub use mesh::Mesh;
