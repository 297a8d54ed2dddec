//! # Procedural Geometry
//!
//! Mesh data consumed read-only by the physics core. The renderer owns the GPU side of
//! these meshes; the simulation only ever asks a mesh for its local bounding box.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box centered at the origin
//! - **Sphere**: UV sphere with configurable resolution
//! - **Cylinder**: Y-aligned cylinder (or cone frustum) centered at the origin
//!
//! ## Usage
//!
//! ```rust
//! use contraption::gfx::geometry::{generate_box, generate_sphere};
//!
//! let mut domino = generate_box(0.5, 10.0, 5.0);
//! domino.compute_bounding_box();
//! assert!(domino.bounds().is_some());
//!
//! let ball = generate_sphere(1.0, 32, 32);
//! assert!(ball.bounds().is_none()); // not computed yet
//! ```

pub mod primitives;

pub use primitives::*;

use crate::physics::aabb::Aabb;
use cgmath::Vector3;

/// Triangle mesh data plus an optional cached bounding box
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            bounds: None,
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Computes and caches the local-space bounding box.
    ///
    /// Leaves the cache empty for a mesh without vertices.
    pub fn compute_bounding_box(&mut self) -> Option<Aabb> {
        let points: Vec<Vector3<f32>> = self
            .vertices
            .iter()
            .map(|v| Vector3::new(v[0], v[1], v[2]))
            .collect();
        self.bounds = Aabb::from_points(&points);
        self.bounds
    }

    /// Cached local-space bounding box, `None` until [`compute_bounding_box`] ran
    ///
    /// [`compute_bounding_box`]: GeometryData::compute_bounding_box
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
