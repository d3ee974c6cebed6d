//! # Primitive Shape Generation
//!
//! Hardcoded shapes of the table scene: the table plane, a unit cube, the
//! tapered prism used for the carving fork, a textured pyramid and the small
//! pyramid that marks a light source. All faces are flat shaded.

use cgmath::{InnerSpace, Vector3};

use super::{attributes::face_normal, GeometryData};
use crate::gfx::scene::vertex::Vertex3D;

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Collects flat-shaded faces into an indexed vertex list.
#[derive(Default)]
struct FaceBuilder {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
}

impl FaceBuilder {
    /// Add a quad whose corners run counter-clockwise seen from the front.
    fn quad(&mut self, corners: [Vector3<f32>; 4], uvs: [[f32; 2]; 4]) {
        let normal = face_normal(corners[0], corners[1], corners[2]);
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex3D::new(corner.into(), normal.into(), uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    fn indexed(self) -> GeometryData {
        GeometryData::indexed(self.vertices, self.indices)
    }

    fn triangle_list(self) -> GeometryData {
        let vertices = self
            .indices
            .iter()
            .map(|&i| self.vertices[i as usize])
            .collect();
        GeometryData::triangle_list(vertices)
    }
}

/// Generate a flat plane in XZ centered at the origin, facing +Y.
///
/// Emitted as a raw list of two triangles. `v` runs from the +Z edge
/// (`v = 0`) to the -Z edge (`v = 1`).
pub fn generate_plane(width: f32, depth: f32) -> GeometryData {
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let mut faces = FaceBuilder::default();
    faces.quad(
        [
            Vector3::new(-hw, 0.0, -hd),
            Vector3::new(-hw, 0.0, hd),
            Vector3::new(hw, 0.0, hd),
            Vector3::new(hw, 0.0, -hd),
        ],
        [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
    );
    faces.triangle_list()
}

/// The table top: a 2x2 plane spanning -1..1 on X and Z.
pub fn generate_table_plane() -> GeometryData {
    generate_plane(2.0, 2.0)
}

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes, 4 vertices per
/// face so every face has its own outward normal and a full 0..1 UV square.
pub fn generate_cube() -> GeometryData {
    // (outward normal, u axis, v axis) with u x v = normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut builder = FaceBuilder::default();
    for (normal, u, v) in faces {
        let center = Vector3::from(normal) * 0.5;
        let (u, v) = (Vector3::from(u) * 0.5, Vector3::from(v) * 0.5);
        builder.quad(
            [center - u - v, center + u - v, center + u + v, center - u + v],
            QUAD_UVS,
        );
    }
    builder.indexed()
}

/// Corners of the tapered handle prism: a thick end at x = 0.33 and a
/// narrower end at x = 0.15.
const PRISM_CORNERS: [[f32; 3]; 8] = [
    [0.33, -1.0, -0.85],
    [0.33, -1.0, -0.6],
    [0.33, -0.83, -0.85],
    [0.33, -0.83, -0.6],
    [0.15, -0.85, -0.85],
    [0.15, -0.85, -0.6],
    [0.15, -0.98, -0.85],
    [0.15, -0.98, -0.6],
];

const PRISM_FACES: [[usize; 4]; 6] = [
    [4, 5, 7, 6],
    [0, 1, 3, 2],
    [4, 5, 3, 2],
    [6, 7, 1, 0],
    [5, 3, 1, 7],
    [4, 2, 0, 6],
];

/// Generate the tapered hexahedron used for the fork handle and prongs.
///
/// The shape sits off-origin; scene transforms place it. Each face is
/// wound so its normal points away from the prism centroid.
pub fn generate_prism() -> GeometryData {
    let corners = PRISM_CORNERS.map(Vector3::from);
    let centroid = corners.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, c| acc + *c) / 8.0;

    let mut builder = FaceBuilder::default();
    for face in PRISM_FACES {
        let mut quad = face.map(|i| corners[i]);
        let face_center = (quad[0] + quad[1] + quad[2] + quad[3]) / 4.0;
        if face_normal(quad[0], quad[1], quad[2]).dot(face_center - centroid) < 0.0 {
            quad.reverse();
        }
        builder.quad(quad, QUAD_UVS);
    }
    builder.indexed()
}

/// Generate a textured square pyramid: base -1..1 on XZ at y = 0, apex at
/// (0, 1, 0). Raw triangle list, 4 sides plus a two-triangle base.
pub fn generate_pyramid() -> GeometryData {
    let base = [
        Vector3::new(-1.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, -1.0),
        Vector3::new(-1.0, 0.0, -1.0),
    ];
    let apex = Vector3::new(0.0, 1.0, 0.0);

    let mut vertices = Vec::with_capacity(18);
    let mut push = |a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>, uvs: [[f32; 2]; 3]| {
        let normal = face_normal(a, b, c);
        for (p, uv) in [a, b, c].into_iter().zip(uvs) {
            vertices.push(Vertex3D::new(p.into(), normal.into(), uv));
        }
    };

    for k in 0..4 {
        push(
            base[k],
            base[(k + 1) % 4],
            apex,
            [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]],
        );
    }

    let base_uv = |p: Vector3<f32>| [(p.x + 1.0) * 0.5, (p.z + 1.0) * 0.5];
    push(base[0], base[2], base[1], [base_uv(base[0]), base_uv(base[2]), base_uv(base[1])]);
    push(base[0], base[3], base[2], [base_uv(base[0]), base_uv(base[3]), base_uv(base[2])]);

    GeometryData::triangle_list(vertices)
}

/// Generate the small indexed pyramid drawn at each light position.
///
/// Five shared vertices, so normals are only approximate; the light shader
/// ignores them.
pub fn generate_light_pyramid() -> GeometryData {
    let positions: [[f32; 3]; 5] = [
        [-0.125, 0.0, 0.125],
        [0.0, 0.25, 0.0],
        [0.125, 0.0, 0.125],
        [0.125, 0.0, -0.125],
        [-0.125, 0.0, -0.125],
    ];
    let vertices = positions
        .iter()
        .map(|&p| {
            let normal = Vector3::from(p).normalize();
            Vertex3D::new(p, normal.into(), [0.0, 0.0])
        })
        .collect();
    let indices = vec![0, 1, 2, 2, 1, 3, 3, 1, 4, 4, 1, 0, 0, 2, 3, 3, 4, 0];

    GeometryData::indexed(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(data: &GeometryData, index: u32) -> Vector3<f32> {
        Vector3::from(data.vertices[index as usize].position)
    }

    fn centroid(data: &GeometryData) -> Vector3<f32> {
        let sum = data
            .vertices
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, v| acc + Vector3::from(v.position));
        sum / data.vertices.len() as f32
    }

    /// Each triangle's winding normal matches its stored normal and points
    /// away from the shape's center.
    fn assert_convex_outward(data: &GeometryData) {
        let center = centroid(data);
        for [a, b, c] in data.triangles() {
            let (pa, pb, pc) = (position(data, a), position(data, b), position(data, c));
            let winding = face_normal(pa, pb, pc);
            let stored = Vector3::from(data.vertices[a as usize].normal);

            assert!((winding - stored).magnitude() < 1e-5, "{a} {b} {c}");
            assert!(winding.dot((pa + pb + pc) / 3.0 - center) > 0.0);
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.index_count(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices_in_bounds());
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
        assert_convex_outward(&cube);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_table_plane();
        assert!(!plane.is_indexed());
        assert_eq!(plane.vertex_count(), 6);
        for v in &plane.vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            assert_eq!(v.position[1], 0.0);
            assert_eq!(v.position[0].abs(), 1.0);
        }
        for [a, b, c] in plane.triangles() {
            let n = face_normal(position(&plane, a), position(&plane, b), position(&plane, c));
            assert!(n.y > 0.99);
        }
    }

    #[test]
    fn test_prism_faces_point_outward() {
        let prism = generate_prism();
        assert_eq!(prism.vertex_count(), 24);
        assert_eq!(prism.triangle_count(), 12);
        assert_convex_outward(&prism);
    }

    #[test]
    fn test_pyramid_generation() {
        let pyramid = generate_pyramid();
        assert_eq!(pyramid.triangle_count(), 6);
        assert_convex_outward(&pyramid);

        let base: Vec<_> = pyramid.vertices[12..]
            .iter()
            .map(|v| v.normal)
            .collect();
        assert!(base.iter().all(|n| *n == [0.0, -1.0, 0.0]));
    }

    #[test]
    fn test_light_pyramid_is_closed() {
        let marker = generate_light_pyramid();
        assert_eq!(marker.vertex_count(), 5);
        assert_eq!(marker.index_count(), 18);
        assert!(marker.indices_in_bounds());
        assert_eq!(marker.vertices[1].position, [0.0, 0.25, 0.0]);

        // every undirected edge is shared by two triangles
        let mut edges = std::collections::HashMap::new();
        for tri in marker.triangles() {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        assert!(edges.values().all(|&n| n == 2));
    }
}
