//! # Ring/Segment Sphere
//!
//! A unit sphere sampled as `ring_count` latitude rings of `segment_count`
//! points each, plus one vertex per pole. Rings are stitched to each other
//! with quads and to the poles with triangle fans; the longitude seam is
//! closed by wrapping the segment index.
//!
//! Vertex order in the generated buffer:
//!
//! ```text
//! 0                      north pole (0, 1, 0)
//! 1 + (r-1)*N + s        ring r (1-based), segment s
//! 1 + R*N                south pole (0, -1, 0)
//! ```

use std::f32::consts::PI;

use cgmath::{Vector3, Zero};

use super::{attributes::spherical_vertex, GeometryData};
use crate::error::GeometryError;

/// Sphere tessellation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereConfig {
    /// Latitude rings between the two poles (at least 2)
    pub ring_count: u32,
    /// Points per ring (at least 3)
    pub segment_count: u32,
}

impl Default for SphereConfig {
    /// 15 rings of 16 segments, 242 vertices.
    fn default() -> Self {
        Self {
            ring_count: 15,
            segment_count: 16,
        }
    }
}

impl SphereConfig {
    pub const MIN_RINGS: u32 = 2;
    pub const MIN_SEGMENTS: u32 = 3;

    pub fn new(ring_count: u32, segment_count: u32) -> Self {
        Self {
            ring_count,
            segment_count,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.ring_count < Self::MIN_RINGS {
            return Err(GeometryError::TooFewRings(self.ring_count));
        }
        if self.segment_count < Self::MIN_SEGMENTS {
            return Err(GeometryError::TooFewSegments {
                shape: "sphere",
                axis: "ring",
                count: self.segment_count,
            });
        }
        // The index list is the largest buffer: 6 per ring point
        let index_count = self
            .ring_count
            .checked_mul(self.segment_count)
            .and_then(|points| points.checked_mul(6));
        if index_count.is_none() {
            return Err(GeometryError::TooLarge {
                shape: "sphere",
                first: self.ring_count,
                second: self.segment_count,
            });
        }
        Ok(())
    }

    /// `2 + ring_count * segment_count`; only meaningful once validated.
    pub fn vertex_count(&self) -> u32 {
        2 + self.ring_count * self.segment_count
    }

    /// Two pole fans plus `ring_count - 1` bands of two triangles per segment.
    pub fn triangle_count(&self) -> u32 {
        2 * self.segment_count * self.ring_count
    }

    fn south_pole(&self) -> u32 {
        self.vertex_count() - 1
    }

    /// Buffer index of `(ring, segment)`; `ring` is 1-based, `segment` wraps.
    fn ring_vertex(&self, ring: u32, segment: u32) -> u32 {
        1 + (ring - 1) * self.segment_count + segment % self.segment_count
    }
}

/// Position of grid sample `(ring, segment)` on the unit sphere.
///
/// `ring` runs `1..=ring_count` from north to south. `segment` is not
/// reduced, so `segment == segment_count` evaluates the seam from the far
/// side at angle 2π.
pub fn sphere_position(config: &SphereConfig, ring: u32, segment: u32) -> Vector3<f32> {
    let phi = PI * ring as f32 / (config.ring_count + 1) as f32;
    let theta = 2.0 * PI * segment as f32 / config.segment_count as f32;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vector3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
}

/// Generate an indexed unit sphere.
///
/// # Errors
/// Returns [`GeometryError`] if the configuration has fewer than 2 rings or
/// 3 segments, or needs more indices than fit in `u32`. Nothing is generated
/// in that case.
pub fn build_sphere(config: SphereConfig) -> Result<GeometryData, GeometryError> {
    config.validate()?;

    let center = Vector3::zero();
    let mut vertices = Vec::with_capacity(config.vertex_count() as usize);

    vertices.push(spherical_vertex(Vector3::unit_y(), center));
    for ring in 1..=config.ring_count {
        for segment in 0..config.segment_count {
            vertices.push(spherical_vertex(
                sphere_position(&config, ring, segment),
                center,
            ));
        }
    }
    vertices.push(spherical_vertex(Vector3::new(0.0, -1.0, 0.0), center));

    Ok(GeometryData::indexed(vertices, stitch_sphere(&config)))
}

/// Connect the sphere grid into counter-clockwise, outward-facing triangles.
fn stitch_sphere(config: &SphereConfig) -> Vec<u32> {
    let segments = config.segment_count;
    let last_ring = config.ring_count;
    let mut indices = Vec::with_capacity(config.triangle_count() as usize * 3);

    // North fan
    for s in 0..segments {
        indices.extend_from_slice(&[0, config.ring_vertex(1, s), config.ring_vertex(1, s + 1)]);
    }

    // Bands between neighbouring rings
    for ring in 1..last_ring {
        for s in 0..segments {
            let upper = config.ring_vertex(ring, s);
            let upper_next = config.ring_vertex(ring, s + 1);
            let lower = config.ring_vertex(ring + 1, s);
            let lower_next = config.ring_vertex(ring + 1, s + 1);

            indices.extend_from_slice(&[upper, lower_next, upper_next]);
            indices.extend_from_slice(&[upper, lower, lower_next]);
        }
    }

    // South fan
    let south = config.south_pole();
    for s in 0..segments {
        indices.extend_from_slice(&[
            south,
            config.ring_vertex(last_ring, s + 1),
            config.ring_vertex(last_ring, s),
        ]);
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::attributes::spherical_uv;
    use cgmath::InnerSpace;
    use rand::Rng;
    use std::collections::HashMap;

    fn assert_valid_sphere(config: SphereConfig) {
        let sphere = build_sphere(config).unwrap();
        let expected = 2 + config.ring_count * config.segment_count;

        assert_eq!(sphere.vertex_count() as u32, expected, "{:?}", config);
        assert_eq!(sphere.triangle_count() as u32, config.triangle_count());
        assert!(sphere.indices_in_bounds(), "{:?}", config);
    }

    /// Every directed edge appears once and its reverse appears once.
    fn assert_closed_and_oriented(triangles: &[[u32; 3]]) {
        let mut edges: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in triangles {
            for k in 0..3 {
                *edges.entry((tri[k], tri[(k + 1) % 3])).or_default() += 1;
            }
        }
        for (&(a, b), &count) in &edges {
            assert_eq!(count, 1, "edge {a}->{b} used {count} times");
            assert_eq!(edges.get(&(b, a)), Some(&1), "edge {a}->{b} has no twin");
        }
    }

    #[test]
    fn test_default_tessellation() {
        let sphere = build_sphere(SphereConfig::new(15, 16)).unwrap();
        assert_eq!(sphere.vertex_count(), 242);
        assert_eq!(sphere.index_count(), 2 * 16 * 15 * 3);
        assert_eq!(SphereConfig::default(), SphereConfig::new(15, 16));
    }

    #[test]
    fn test_minimal_sphere() {
        let sphere = build_sphere(SphereConfig::new(2, 3)).unwrap();
        assert_eq!(sphere.vertex_count(), 8);
        // 2 fans of 3 plus one band of 6
        assert_eq!(sphere.triangle_count(), 12);
        assert_closed_and_oriented(&sphere.triangles());
    }

    #[test]
    fn test_counts_across_configurations() {
        for rings in 2..12 {
            for segments in 3..20 {
                assert_valid_sphere(SphereConfig::new(rings, segments));
            }
        }
    }

    #[test]
    fn test_random_configurations() {
        let mut rng = rand::rng();
        for _ in 0..25 {
            let config = SphereConfig::new(rng.random_range(2..64), rng.random_range(3..64));
            assert_valid_sphere(config);
        }
    }

    #[test]
    fn test_normals_are_unit_and_radial() {
        let sphere = build_sphere(SphereConfig::default()).unwrap();
        for vertex in &sphere.vertices {
            let normal = Vector3::from(vertex.normal);
            let position = Vector3::from(vertex.position);
            assert!((normal.magnitude() - 1.0).abs() < 1e-5);
            assert!((position.magnitude() - 1.0).abs() < 1e-5);
            assert!((normal - position).magnitude() < 1e-5);
        }
    }

    #[test]
    fn test_first_ring_matches_reference_tessellation() {
        let config = SphereConfig::default();
        let first = sphere_position(&config, 1, 0);
        assert!((first.y - 0.9808).abs() < 1e-4);
        assert!((first.z - 0.1951).abs() < 1e-4);
        assert!(first.x.abs() < 1e-6);
    }

    #[test]
    fn test_poles_are_first_and_last() {
        let sphere = build_sphere(SphereConfig::new(4, 6)).unwrap();
        assert_eq!(sphere.vertices[0].position, [0.0, 1.0, 0.0]);
        assert_eq!(sphere.vertices[25].position, [0.0, -1.0, 0.0]);
        assert_eq!(sphere.vertices[0].tex_coords, [0.5, 1.0]);
        assert_eq!(sphere.vertices[25].tex_coords, [0.5, 0.0]);
    }

    #[test]
    fn test_seam_u_matches_wraparound_segment() {
        for config in [SphereConfig::default(), SphereConfig::new(3, 7)] {
            for ring in 1..=config.ring_count {
                let start = spherical_uv(sphere_position(&config, ring, 0).normalize());
                let wrap = spherical_uv(
                    sphere_position(&config, ring, config.segment_count).normalize(),
                );
                assert!((start[0] - wrap[0]).abs() < 1e-5, "ring {ring}");
                assert!((start[1] - wrap[1]).abs() < 1e-5, "ring {ring}");
            }
        }
    }

    #[test]
    fn test_wraparound_closes_each_band() {
        let config = SphereConfig::new(3, 5);
        let sphere = build_sphere(config).unwrap();
        let last_segment = config.ring_vertex(1, 4);
        let first_segment = config.ring_vertex(1, 0);

        assert!(sphere
            .triangles()
            .iter()
            .any(|tri| tri.contains(&last_segment) && tri.contains(&first_segment)));
    }

    #[test]
    fn test_watertight_manifold() {
        for config in [
            SphereConfig::default(),
            SphereConfig::new(2, 3),
            SphereConfig::new(7, 9),
        ] {
            assert_closed_and_oriented(&build_sphere(config).unwrap().triangles());
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let sphere = build_sphere(SphereConfig::default()).unwrap();
        for [a, b, c] in sphere.triangles() {
            let pa = Vector3::from(sphere.vertices[a as usize].position);
            let pb = Vector3::from(sphere.vertices[b as usize].position);
            let pc = Vector3::from(sphere.vertices[c as usize].position);
            let normal = (pb - pa).cross(pc - pa);
            let centroid = (pa + pb + pc) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = SphereConfig::new(9, 13);
        let first = build_sphere(config).unwrap();
        let second = build_sphere(config).unwrap();

        let bits = |data: &GeometryData| -> Vec<u32> {
            data.as_floats().iter().map(|f| f.to_bits()).collect()
        };
        assert_eq!(bits(&first), bits(&second));
        assert_eq!(first.indices, second.indices);
    }

    #[test]
    fn test_rejects_degenerate_configuration() {
        assert_eq!(
            build_sphere(SphereConfig::new(1, 16)),
            Err(GeometryError::TooFewRings(1))
        );
        assert_eq!(
            build_sphere(SphereConfig::new(15, 2)),
            Err(GeometryError::TooFewSegments {
                shape: "sphere",
                axis: "ring",
                count: 2,
            })
        );
        assert!(build_sphere(SphereConfig::new(0, 0)).is_err());
    }

    #[test]
    fn test_rejects_tessellation_beyond_u32_indices() {
        // Ring points alone overflow
        assert_eq!(
            build_sphere(SphereConfig::new(65536, 65536)),
            Err(GeometryError::TooLarge {
                shape: "sphere",
                first: 65536,
                second: 65536,
            })
        );
        // Ring points fit, the index list does not
        assert!(matches!(
            SphereConfig::new(50000, 50000).validate(),
            Err(GeometryError::TooLarge { shape: "sphere", .. })
        ));
        assert!(SphereConfig::new(20000, 20000).validate().is_ok());
        assert_eq!(SphereConfig::new(20000, 20000).triangle_count(), 800_000_000);
    }
}
