//! Derived vertex attributes.
//!
//! Generated surfaces store only positions; normals and texture
//! coordinates are computed from them here.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use crate::gfx::scene::vertex::Vertex3D;

/// Spherical projection of a unit direction.
///
/// `u` wraps around the Y axis and jumps from 1 back to 0 where `atan2`
/// is discontinuous (behind the sphere, at -Z). `v` pinches at the poles.
/// Both artifacts are part of the look and are left in.
pub fn spherical_uv(normal: Vector3<f32>) -> [f32; 2] {
    let u = normal.x.atan2(normal.z) / (2.0 * PI) + 0.5;
    let v = normal.y * 0.5 + 0.5;
    [u, v]
}

/// Compose a vertex on a sphere-like surface around `center`.
///
/// The normal is the radial direction, which is exact for any surface with
/// uniform radius.
pub fn spherical_vertex(position: Vector3<f32>, center: Vector3<f32>) -> Vertex3D {
    let normal = (position - center).normalize();
    Vertex3D::new(position.into(), normal.into(), spherical_uv(normal))
}

/// Geometric normal of a triangle, counter-clockwise front face.
pub fn face_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Vector3<f32> {
    (b - a).cross(c - a).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    #[test]
    fn test_pole_uv() {
        assert_eq!(spherical_uv(Vector3::unit_y()), [0.5, 1.0]);
        assert_eq!(spherical_uv(Vector3::new(0.0, -1.0, 0.0)), [0.5, 0.0]);
    }

    #[test]
    fn test_front_and_side_uv() {
        let [u_front, v_front] = spherical_uv(Vector3::unit_z());
        assert!((u_front - 0.5).abs() < 1e-6);
        assert!((v_front - 0.5).abs() < 1e-6);

        let [u_right, _] = spherical_uv(Vector3::unit_x());
        assert!((u_right - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_radial_normal_ignores_radius() {
        let center = Vector3::new(1.0, 2.0, 3.0);
        let vertex = spherical_vertex(center + Vector3::new(0.0, 4.0, 0.0), center);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertex.position, [1.0, 6.0, 3.0]);

        let origin = spherical_vertex(Vector3::new(0.0, 0.0, 2.0), Vector3::zero());
        assert_eq!(origin.normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_face_normal_is_ccw() {
        let n = face_normal(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(n, Vector3::unit_z());
    }
}
