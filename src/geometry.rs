//! Procedural primitive meshes.
//!
//! Geometry presets are assembled from two primitives: axis-aligned cuboids
//! (card slab, cube, frame bars) and a three-sided prism. Builders produce
//! CPU-side [`MeshData`] so the preset layer stays testable without a GPU;
//! buffer upload happens in the artifact layer.
//!
//! Conventions: counter-clockwise winding viewed from outside (back faces are
//! culled), flat per-face normals, and every rectangular face carries the full
//! [0,1]x[0,1] texture rectangle.

use crate::data_structures::model::ModelVertex;

/// Faces of a cuboid, used to split one solid into differently-slotted meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    /// The two large faces of a card slab.
    pub const FRONT_BACK: [Face; 2] = [Face::PosZ, Face::NegZ];
    /// The four narrow rim faces of a card slab.
    pub const RIM: [Face; 4] = [Face::PosX, Face::NegX, Face::PosY, Face::NegY];
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];
}

/// CPU-side mesh: vertices and triangle indices, ready for buffer upload.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append one rectangular face given as bottom-left, bottom-right,
    /// top-right, top-left corners (viewed from outside).
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (position, tex_coords) in corners.into_iter().zip(uvs) {
            self.vertices.push(ModelVertex {
                position,
                tex_coords,
                normal,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_triangle(&mut self, positions: [[f32; 3]; 3], uvs: [[f32; 2]; 3], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        for (position, tex_coords) in positions.into_iter().zip(uvs) {
            self.vertices.push(ModelVertex {
                position,
                tex_coords,
                normal,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// A cuboid of the given full extents, restricted to a subset of its faces.
pub fn cuboid_faces(width: f32, height: f32, depth: f32, faces: &[Face]) -> MeshData {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut mesh = MeshData::default();
    for face in faces {
        match face {
            Face::PosZ => mesh.push_quad(
                [
                    [-hx, -hy, hz],
                    [hx, -hy, hz],
                    [hx, hy, hz],
                    [-hx, hy, hz],
                ],
                [0.0, 0.0, 1.0],
            ),
            Face::NegZ => mesh.push_quad(
                [
                    [hx, -hy, -hz],
                    [-hx, -hy, -hz],
                    [-hx, hy, -hz],
                    [hx, hy, -hz],
                ],
                [0.0, 0.0, -1.0],
            ),
            Face::PosX => mesh.push_quad(
                [
                    [hx, -hy, hz],
                    [hx, -hy, -hz],
                    [hx, hy, -hz],
                    [hx, hy, hz],
                ],
                [1.0, 0.0, 0.0],
            ),
            Face::NegX => mesh.push_quad(
                [
                    [-hx, -hy, -hz],
                    [-hx, -hy, hz],
                    [-hx, hy, hz],
                    [-hx, hy, -hz],
                ],
                [-1.0, 0.0, 0.0],
            ),
            Face::PosY => mesh.push_quad(
                [
                    [-hx, hy, hz],
                    [hx, hy, hz],
                    [hx, hy, -hz],
                    [-hx, hy, -hz],
                ],
                [0.0, 1.0, 0.0],
            ),
            Face::NegY => mesh.push_quad(
                [
                    [-hx, -hy, -hz],
                    [hx, -hy, -hz],
                    [hx, -hy, hz],
                    [-hx, -hy, hz],
                ],
                [0.0, -1.0, 0.0],
            ),
        }
    }
    mesh
}

/// A cuboid with all six faces.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    cuboid_faces(width, height, depth, &Face::ALL)
}

/// A three-sided prism (a cylinder with a radial segment count of 3).
///
/// The three rectangular side faces each carry the full texture; the
/// triangular caps are textured with a planar projection.
pub fn prism(radius: f32, height: f32) -> MeshData {
    const SIDES: usize = 3;
    let hy = height / 2.0;

    // Corner columns, starting at +z and walking towards +x.
    let corners: Vec<[f32; 2]> = (0..SIDES)
        .map(|i| {
            let theta = i as f32 / SIDES as f32 * std::f32::consts::TAU;
            [radius * theta.sin(), radius * theta.cos()]
        })
        .collect();

    let mut mesh = MeshData::default();
    for i in 0..SIDES {
        let [x0, z0] = corners[i];
        let [x1, z1] = corners[(i + 1) % SIDES];
        // Flat side normal: the outward direction of the edge midpoint.
        let (mx, mz) = ((x0 + x1) / 2.0, (z0 + z1) / 2.0);
        let len = (mx * mx + mz * mz).sqrt();
        let normal = [mx / len, 0.0, mz / len];
        mesh.push_quad(
            [
                [x0, -hy, z0],
                [x1, -hy, z1],
                [x1, hy, z1],
                [x0, hy, z0],
            ],
            normal,
        );
    }

    let cap_uv = |x: f32, z: f32| [0.5 + x / (2.0 * radius), 0.5 + z / (2.0 * radius)];
    let [x0, z0] = corners[0];
    let [x1, z1] = corners[1];
    let [x2, z2] = corners[2];
    mesh.push_triangle(
        [[x0, hy, z0], [x1, hy, z1], [x2, hy, z2]],
        [cap_uv(x0, z0), cap_uv(x1, z1), cap_uv(x2, z2)],
        [0.0, 1.0, 0.0],
    );
    mesh.push_triangle(
        [[x0, -hy, z0], [x2, -hy, z2], [x1, -hy, z1]],
        [cap_uv(x0, z0), cap_uv(x2, z2), cap_uv(x1, z1)],
        [0.0, -1.0, 0.0],
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        for &index in &mesh.indices {
            assert!((index as usize) < mesh.vertices.len(), "dangling index");
        }
        for vertex in &mesh.vertices {
            assert!(vertex.tex_coords.iter().all(|uv| (0.0..=1.0).contains(uv)));
        }
    }

    #[test]
    fn cuboid_has_six_faces() {
        let mesh = cuboid(5.0, 5.0, 5.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_valid(&mesh);
    }

    #[test]
    fn face_subsets_partition_the_cuboid() {
        let faces = cuboid_faces(6.0, 9.0, 0.1, &Face::FRONT_BACK);
        let rim = cuboid_faces(6.0, 9.0, 0.1, &Face::RIM);
        assert_eq!(faces.vertices.len(), 8);
        assert_eq!(rim.vertices.len(), 16);
        assert_valid(&faces);
        assert_valid(&rim);
    }

    #[test]
    fn prism_has_three_sides_and_two_caps() {
        let mesh = prism(5.0, 6.0);
        // 3 quads (4 vertices each) + 2 triangles (3 each)
        assert_eq!(mesh.vertices.len(), 18);
        assert_eq!(mesh.indices.len(), 3 * 6 + 2 * 3);
        assert_valid(&mesh);
    }

    #[test]
    fn prism_side_normals_point_away_from_the_axis() {
        let mesh = prism(5.0, 6.0);
        // Side vertices come first: 3 quads of 4 vertices.
        for vertex in &mesh.vertices[..12] {
            let [x, _, z] = vertex.position;
            let [nx, ny, nz] = vertex.normal;
            assert_eq!(ny, 0.0);
            // The normal must have a positive component along the corner offset.
            assert!(nx * x + nz * z >= -1e-5);
        }
    }

    #[test]
    fn every_rect_face_carries_the_full_texture() {
        let mesh = cuboid(5.0, 5.0, 5.0);
        for quad in mesh.vertices.chunks(4) {
            let us: Vec<f32> = quad.iter().map(|v| v.tex_coords[0]).collect();
            let vs: Vec<f32> = quad.iter().map(|v| v.tex_coords[1]).collect();
            assert!(us.contains(&0.0) && us.contains(&1.0));
            assert!(vs.contains(&0.0) && vs.contains(&1.0));
        }
    }
}
