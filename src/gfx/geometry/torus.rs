//! # Main/Tube Segment Torus
//!
//! The torus lies around the Z axis: the main circle of radius `main_radius`
//! is in the XY plane and the tube of radius `tube_radius` sweeps around it.
//! The grid is `main_segments x tube_segments` points with wraparound on
//! both axes and no duplicated boundary row. Output is a raw triangle list,
//! six vertices per grid cell.

use std::f32::consts::PI;

use cgmath::Vector3;

use super::GeometryData;
use crate::{error::GeometryError, gfx::scene::vertex::Vertex3D};

/// Torus tessellation and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusConfig {
    pub main_segments: u32,
    pub tube_segments: u32,
    pub main_radius: f32,
    pub tube_radius: f32,
}

impl Default for TorusConfig {
    /// The sauce bowl rim: 30x30 segments, radius 1.0, tube 0.1.
    fn default() -> Self {
        Self {
            main_segments: 30,
            tube_segments: 30,
            main_radius: 1.0,
            tube_radius: 0.1,
        }
    }
}

/// A grid sample, `(main index, tube index)`.
pub type GridPoint = (u32, u32);

impl TorusConfig {
    pub const MIN_SEGMENTS: u32 = 3;

    pub fn new(main_segments: u32, tube_segments: u32, main_radius: f32, tube_radius: f32) -> Self {
        Self {
            main_segments,
            tube_segments,
            main_radius,
            tube_radius,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        for (axis, count) in [("main ring", self.main_segments), ("tube", self.tube_segments)] {
            if count < Self::MIN_SEGMENTS {
                return Err(GeometryError::TooFewSegments {
                    shape: "torus",
                    axis,
                    count,
                });
            }
        }
        for (which, value) in [("main", self.main_radius), ("tube", self.tube_radius)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::InvalidRadius { which, value });
            }
        }
        if self.main_radius <= self.tube_radius {
            return Err(GeometryError::SelfIntersectingTorus {
                main: self.main_radius,
                tube: self.tube_radius,
            });
        }
        // Six unindexed vertices per grid cell
        let vertex_count = self
            .main_segments
            .checked_mul(self.tube_segments)
            .and_then(|cells| cells.checked_mul(6));
        if vertex_count.is_none() {
            return Err(GeometryError::TooLarge {
                shape: "torus",
                first: self.main_segments,
                second: self.tube_segments,
            });
        }
        Ok(())
    }

    /// Only meaningful once validated.
    pub fn grid_point_count(&self) -> u32 {
        self.main_segments * self.tube_segments
    }

    pub fn triangle_count(&self) -> u32 {
        2 * self.grid_point_count()
    }

    fn angles(&self, (i, j): GridPoint) -> (f32, f32) {
        let alpha = 2.0 * PI * i as f32 / self.main_segments as f32;
        let beta = 2.0 * PI * j as f32 / self.tube_segments as f32;
        (alpha, beta)
    }
}

/// Position of grid sample `(i, j)`; indices are reduced modulo the
/// segment counts so both seams evaluate to the same bits.
pub fn torus_position(config: &TorusConfig, (i, j): GridPoint) -> Vector3<f32> {
    let (alpha, beta) = config.angles((i % config.main_segments, j % config.tube_segments));
    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_b, cos_b) = beta.sin_cos();
    let ring = config.main_radius + config.tube_radius * cos_b;

    Vector3::new(ring * cos_a, ring * sin_a, config.tube_radius * sin_b)
}

/// Unit direction from the tube's center circle to grid sample `(i, j)`.
pub fn torus_normal(config: &TorusConfig, (i, j): GridPoint) -> Vector3<f32> {
    let (alpha, beta) = config.angles((i % config.main_segments, j % config.tube_segments));
    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_b, cos_b) = beta.sin_cos();

    Vector3::new(cos_b * cos_a, cos_b * sin_a, sin_b)
}

/// The two triangles of grid cell `(i, j)` as unreduced grid points.
///
/// Corners `(i+1, _)` and `(_, j+1)` may equal the segment count on the
/// closing row/column; reduce with `%` to get the stored sample.
pub fn cell_triangles((i, j): GridPoint) -> [[GridPoint; 3]; 2] {
    let corner = (i, j);
    let main_next = (i + 1, j);
    let both_next = (i + 1, j + 1);
    let tube_next = (i, j + 1);

    [
        [corner, main_next, both_next],
        [corner, both_next, tube_next],
    ]
}

/// Generate a torus as a raw triangle list.
///
/// # Errors
/// Returns [`GeometryError`] for fewer than 3 segments on either axis,
/// non-positive radii, a tube at least as wide as the main radius, or more
/// vertices than fit in `u32`.
pub fn build_torus(config: TorusConfig) -> Result<GeometryData, GeometryError> {
    config.validate()?;

    let mut vertices = Vec::with_capacity(config.triangle_count() as usize * 3);
    for i in 0..config.main_segments {
        for j in 0..config.tube_segments {
            for triangle in cell_triangles((i, j)) {
                for point in triangle {
                    vertices.push(torus_vertex(&config, point));
                }
            }
        }
    }

    Ok(GeometryData::triangle_list(vertices))
}

fn torus_vertex(config: &TorusConfig, (i, j): GridPoint) -> Vertex3D {
    // UVs use the unreduced index so the closing row maps to 1.0
    let tex_coords = [
        i as f32 / config.main_segments as f32,
        j as f32 / config.tube_segments as f32,
    ];
    Vertex3D::new(
        torus_position(config, (i, j)).into(),
        torus_normal(config, (i, j)).into(),
        tex_coords,
    )
}
