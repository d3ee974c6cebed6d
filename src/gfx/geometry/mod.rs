//! # Procedural Geometry Generation
//!
//! This module builds every mesh in the table scene procedurally, so the
//! renderer never reads model files.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: ring/segment sphere with pole fans and an index buffer
//! - **Torus**: main/tube segment torus emitted as a raw triangle list
//! - **Plane**, **Cube**, **Prism**, **Pyramid**: flat-shaded hardcoded shapes
//!
//! ## Usage
//!
//! ```rust
//! use tabletop::gfx::geometry::{build_sphere, build_torus, SphereConfig, TorusConfig};
//!
//! let sphere = build_sphere(SphereConfig::default()).unwrap();
//! assert_eq!(sphere.vertex_count(), 242);
//!
//! let torus = build_torus(TorusConfig::new(4, 4, 1.0, 0.1)).unwrap();
//! assert_eq!(torus.triangle_count(), 32);
//! ```

pub mod attributes;
pub mod primitives;
pub mod sphere;
pub mod torus;

pub use primitives::*;
pub use sphere::{build_sphere, SphereConfig};
pub use torus::{build_torus, TorusConfig};

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry ready for GPU upload
///
/// Vertices are interleaved (`position`, `normal`, `tex_coords`). When
/// `indices` is `None` the vertex list is read as a raw triangle list,
/// three consecutive vertices per triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<Vertex3D>,
    /// Triangle indices (counter-clockwise winding seen from outside)
    pub indices: Option<Vec<u32>>,
}

impl GeometryData {
    /// Create geometry drawn as a raw triangle list
    pub fn triangle_list(vertices: Vec<Vertex3D>) -> Self {
        debug_assert_eq!(vertices.len() % 3, 0, "raw triangle list must be a multiple of 3");
        Self {
            vertices,
            indices: None,
        }
    }

    /// Create indexed geometry
    pub fn indexed(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    /// Number of interleaved vertex records
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices, zero for raw triangle lists
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of triangles this geometry draws
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertices.len() / 3,
        }
    }

    /// Triangles as vertex index triples, for either representation
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
            None => (0..self.vertices.len() as u32 / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }

    /// The flat attribute buffer: 8 floats per vertex
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns true if every index refers to an existing vertex
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.indices
            .as_ref()
            .map_or(true, |indices| indices.iter().all(|&i| i < count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_triangle_list_counts() {
        let vertex = Vertex3D::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]);
        let data = GeometryData::triangle_list(vec![vertex; 6]);

        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.index_count(), 0);
        assert_eq!(data.triangles(), vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(data.as_floats().len(), 6 * 8);
    }

    #[test]
    fn test_out_of_range_index_detected() {
        let vertex = Vertex3D::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]);
        let data = GeometryData::indexed(vec![vertex; 3], vec![0, 1, 3]);
        assert!(!data.indices_in_bounds());
    }
}
