//! Small meshes shared by the unit tests

use meshcollapse_core::TriangleMesh;
use nalgebra::Point3;

/// Six coplanar triangles at height `h` fanned around the interior edge
/// P(0)-Q(1).
pub fn make_flat_patch(h: f64) -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3::new(0.0, 0.0, h),  // P
            Point3::new(1.0, 0.0, h),  // Q
            Point3::new(0.5, 1.0, h),  // A
            Point3::new(-1.0, 0.0, h), // C
            Point3::new(0.5, -1.0, h), // B
            Point3::new(2.0, 0.0, h),  // D
        ],
        vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1], [1, 4, 5], [1, 5, 2]],
    )
}

pub fn make_tetrahedron() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
}

/// `size` x `size` vertices on the plane `z = h`, vertex `y * size + x` at
/// `(x, y, h)`.
pub fn make_plane_grid(size: usize, h: f64) -> TriangleMesh {
    let mut vertices = Vec::new();
    for y in 0..size {
        for x in 0..size {
            vertices.push(Point3::new(x as f64, y as f64, h));
        }
    }
    let mut faces = Vec::new();
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push([tl, tr, bl]);
            faces.push([tr, br, bl]);
        }
    }
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}
