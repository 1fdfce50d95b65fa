//! Local neighborhood of a collapsing edge
//!
//! Walks the triangle fans around both endpoints of an edge P-Q and collects
//! what the placement objectives need: the triangles in the star of the edge
//! (each as a normal and a triple-product scalar), the link of vertices that
//! will surround the merged vertex and, for border edges, the 3-edge boundary
//! chain O->P->Q->R.

use meshcollapse_core::{point_cross_product, triple_product, HalfedgeGraph, Point3d, Vector3d};

/// One face of the edge star.
///
/// For a triangle `(p0, p1, p2)` and a candidate point `v`,
/// `normal_v . v - normal_l` is six times the signed volume of the
/// tetrahedron `(p0, p1, p2, v)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// `(p1 - p0) x (p2 - p0)`
    pub normal_v: Vector3d,
    /// `(p0 x p1) . p2`
    pub normal_l: f64,
}

impl Triangle {
    pub fn new(p0: &Point3d, p1: &Point3d, p2: &Point3d) -> Self {
        Self {
            normal_v: (p1 - p0).cross(&(p2 - p0)),
            normal_l: triple_product(p0, p1, p2),
        }
    }
}

/// A directed boundary edge `s -> t`, cached as `t - s` and `t x s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEdge {
    pub vector: Vector3d,
    pub normal: Vector3d,
}

impl BoundaryEdge {
    pub fn new(s: &Point3d, t: &Point3d) -> Self {
        Self {
            vector: t - s,
            normal: point_cross_product(t, s),
        }
    }
}

/// The local boundary `o -> p -> q -> r` around a border edge `p -> q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub edges: [BoundaryEdge; 3],
}

impl Boundary {
    pub fn from_chain(o: &Point3d, p: &Point3d, q: &Point3d, r: &Point3d) -> Self {
        let chain = [o, p, q, r];
        Self {
            edges: std::array::from_fn(|i| BoundaryEdge::new(chain[i], chain[i + 1])),
        }
    }

    /// Sum of the edge vectors, `r - o`
    pub fn vector_sum(&self) -> Vector3d {
        self.edges.iter().map(|e| e.vector).sum()
    }

    /// Sum of the edge normals
    pub fn normal_sum(&self) -> Vector3d {
        self.edges.iter().map(|e| e.normal).sum()
    }
}

/// Everything the placement objectives read from the mesh around an edge.
#[derive(Debug, Clone)]
pub struct Neighborhood<V> {
    /// Every face incident to P or Q, each once
    pub triangles: Vec<Triangle>,
    /// Vertices adjacent to P or Q, excluding P and Q, each once. They form
    /// the ring around the merged vertex, counter-clockwise, starting after Q
    /// in the rotation around P.
    pub link: Vec<V>,
    pub boundary: Option<Boundary>,
}

/// Direction a fan is walked in; decides on which side of the rotation edge
/// the face lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotation {
    Ccw,
    Cw,
}

/// Extract triangles, link and (for border edges) the local boundary of the
/// edge `p -> q`. `p_q` and `q_p` are the two half-edges joining `p` and `q`.
pub fn extract_neighborhood<M: HalfedgeGraph>(
    mesh: &M,
    p: M::Vertex,
    q: M::Vertex,
    p_q: M::Halfedge,
    q_p: M::Halfedge,
) -> Neighborhood<M::Vertex> {
    let mut triangles = Vec::with_capacity(16);
    let mut link = Vec::with_capacity(16);

    extract_triangles_and_link(mesh, p, q, p_q, q_p, &mut triangles, &mut link);

    let boundary = if mesh.is_undirected_border(p_q) {
        Some(extract_boundary(mesh, p, q, p_q, q_p))
    } else {
        None
    };

    Neighborhood {
        triangles,
        link,
        boundary,
    }
}

fn extract_triangles_and_link<M: HalfedgeGraph>(
    mesh: &M,
    p: M::Vertex,
    q: M::Vertex,
    p_q: M::Halfedge,
    q_p: M::Halfedge,
    triangles: &mut Vec<Triangle>,
    link: &mut Vec<M::Vertex>,
) {
    // Around P, counter-clockwise, back to P->Q. Covers every face of P,
    // including the two on the edge itself.
    let mut v1 = q;
    let mut e02 = p_q;
    loop {
        e02 = mesh.next_edge_ccw(e02);
        let v2 = mesh.target(e02);

        if v2 != q {
            link.push(v2);
        }
        extract_triangle(mesh, p, v1, v2, e02, Rotation::Ccw, triangles);

        v1 = v2;
        if e02 == p_q {
            break;
        }
    }

    // Around Q, clockwise, from the face after Q-P-a up to the face before
    // Q-b-P. The first and last link vertices found around P are the pivots
    // shared by both fans.
    let first = link.first().copied();
    let last = link.last().copied();
    let is_pivot = |v: M::Vertex| Some(v) == first || Some(v) == last;

    let q_part = link.len();
    let start = mesh.next_edge_cw(q_p);
    let mut v1 = mesh.target(start);
    if !is_pivot(v1) {
        link.push(v1);
    }

    let mut e02 = mesh.next_edge_cw(start);
    while e02 != q_p {
        let v2 = mesh.target(e02);

        if !is_pivot(v2) {
            link.push(v2);
        }
        extract_triangle(mesh, q, v1, v2, e02, Rotation::Cw, triangles);

        v1 = v2;
        e02 = mesh.next_edge_cw(e02);
    }

    // Q's fan was walked clockwise
    link[q_part..].reverse();
}

/// Push the face between `v0 -> v1` and `e02 = v0 -> v2`, consecutive in the
/// rotation around `v0`, if there is one. Walking counter-clockwise the face
/// is the one of `v2 -> v0`, oriented `v0 -> v1 -> v2`; walking clockwise it
/// is the one of `e02`, oriented `v0 -> v2 -> v1`. A border half-edge on that
/// side means the rotation crosses a hole.
fn extract_triangle<M: HalfedgeGraph>(
    mesh: &M,
    v0: M::Vertex,
    v1: M::Vertex,
    v2: M::Vertex,
    e02: M::Halfedge,
    rotation: Rotation,
    triangles: &mut Vec<Triangle>,
) {
    let p0 = mesh.position(v0);
    let p1 = mesh.position(v1);
    let p2 = mesh.position(v2);

    match rotation {
        Rotation::Ccw if !mesh.is_border(mesh.opposite(e02)) => {
            triangles.push(Triangle::new(&p0, &p1, &p2));
        }
        Rotation::Cw if !mesh.is_border(e02) => {
            triangles.push(Triangle::new(&p0, &p2, &p1));
        }
        _ => {}
    }
}

/// Cache the border edges `o -> p`, `p -> q`, `q -> r` around a border edge.
fn extract_boundary<M: HalfedgeGraph>(
    mesh: &M,
    p: M::Vertex,
    q: M::Vertex,
    p_q: M::Halfedge,
    q_p: M::Halfedge,
) -> Boundary {
    // One of the two rotations away from P->Q is the previous border edge,
    // and likewise around Q for the next one.
    let p_pt = mesh.next_edge_ccw(p_q);
    let p_pb = mesh.next_edge_cw(p_q);
    let q_qt = mesh.next_edge_cw(q_p);
    let q_qb = mesh.next_edge_ccw(q_p);

    let border_0 = if mesh.is_undirected_border(p_pt) { p_pt } else { p_pb };
    let border_2 = if mesh.is_undirected_border(q_qt) { q_qt } else { q_qb };

    debug_assert!(mesh.is_undirected_border(border_0));
    debug_assert!(mesh.is_undirected_border(border_2));

    let o = mesh.position(mesh.target(border_0));
    let r = mesh.position(mesh.target(border_2));

    Boundary::from_chain(&o, &mesh.position(p), &mesh.position(q), &r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::test_meshes::*;
    use meshcollapse_core::{HalfEdgeMesh, TriangleMesh};
    use nalgebra::Point3;

    fn neighborhood_of(hem: &HalfEdgeMesh, p: usize, q: usize) -> Neighborhood<usize> {
        let p_q = hem.halfedge_between(p, q).unwrap();
        extract_neighborhood(hem, p, q, p_q, hem.opposite(p_q))
    }

    #[test]
    fn test_flat_patch_interior_edge() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_flat_patch(0.0)).unwrap();
        let nb = neighborhood_of(&hem, 0, 1);

        assert_eq!(nb.triangles.len(), 6);
        assert_eq!(nb.link, vec![2, 3, 4, 5]);
        assert!(nb.boundary.is_none());
        for t in &nb.triangles {
            // Every face of the patch keeps its +z orientation
            assert_relative_eq!(t.normal_v, Vector3d::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_flat_patch_reversed_edge() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_flat_patch(0.0)).unwrap();
        let nb = neighborhood_of(&hem, 1, 0);

        assert_eq!(nb.triangles.len(), 6);
        assert_eq!(nb.link, vec![4, 5, 2, 3]);
    }

    #[test]
    fn test_closed_star_normals_cancel() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_tetrahedron()).unwrap();
        let nb = neighborhood_of(&hem, 0, 1);

        // Every face of the tetrahedron touches vertex 0 or 1
        assert_eq!(nb.triangles.len(), 4);
        assert_eq!(nb.link.len(), 2);

        let sum_v: Vector3d = nb.triangles.iter().map(|t| t.normal_v).sum();
        let sum_l: f64 = nb.triangles.iter().map(|t| t.normal_l).sum();
        assert_relative_eq!(sum_v, Vector3d::zeros(), epsilon = 1e-12);
        // Six times the enclosed volume of 1/6
        assert_relative_eq!(sum_l, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_border_edge_chain() {
        let h = 2.0;
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_plane_grid(4, h)).unwrap();
        let nb = neighborhood_of(&hem, 1, 2);

        // Faces [1,2,5], [1,5,4], [0,1,4] around P and [2,6,5], [2,3,6] around Q
        assert_eq!(nb.triangles.len(), 5);
        assert_eq!(nb.link, vec![5, 4, 0, 3, 6]);

        let bdry = nb.boundary.expect("bottom row edge is a border edge");
        let x = Vector3d::new(1.0, 0.0, 0.0);
        for e in &bdry.edges {
            assert_relative_eq!(e.vector, x);
        }
        assert_relative_eq!(bdry.vector_sum(), Vector3d::new(3.0, 0.0, 0.0));
        // t x s for points on the line y = 0, z = h
        assert_relative_eq!(bdry.normal_sum(), Vector3d::new(0.0, -3.0 * h, 0.0));
    }

    #[test]
    fn test_border_edge_from_border_side() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_plane_grid(4, 0.0)).unwrap();
        // 2 -> 1 is the border half-edge of the bottom row
        let nb = neighborhood_of(&hem, 2, 1);

        assert_eq!(nb.triangles.len(), 5);
        let mut link = nb.link.clone();
        link.sort_unstable();
        assert_eq!(link, vec![0, 3, 4, 5, 6]);
        assert!(nb.boundary.is_some());
    }

    #[test]
    fn test_corner_chain() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_plane_grid(4, 0.0)).unwrap();
        let nb = neighborhood_of(&hem, 2, 3);
        let bdry = nb.boundary.unwrap();

        // o = (1,0), p = (2,0), q = (3,0), r = (3,1)
        assert_relative_eq!(bdry.edges[2].vector, Vector3d::new(0.0, 1.0, 0.0));
        assert_relative_eq!(bdry.vector_sum(), Vector3d::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_ear_face_on_strip() {
        // 3 x 2 strip; [0,1,3] is an ear at P, bounded by border edges on
        // both sides of the rotation around 1
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
            ],
            vec![[0, 1, 3], [1, 4, 3], [1, 2, 4], [2, 5, 4]],
        );
        let hem = HalfEdgeMesh::from_triangle_mesh(&mesh).unwrap();

        for (p, q) in [(1, 2), (2, 1)] {
            let nb = neighborhood_of(&hem, p, q);
            assert_eq!(nb.triangles.len(), 4);
            let mut link = nb.link.clone();
            link.sort_unstable();
            assert_eq!(link, vec![0, 3, 4, 5]);
        }

        let nb = neighborhood_of(&hem, 1, 2);
        assert_eq!(nb.link, vec![4, 3, 0, 5]);
        let ear = Triangle::new(&hem.position(0), &hem.position(1), &hem.position(3));
        assert!(nb.triangles.contains(&ear));
    }

    #[test]
    fn test_every_edge_extracts_its_star() {
        let size = 5;
        let grid = make_plane_grid(size, 1.5);
        let hem = HalfEdgeMesh::from_triangle_mesh(&grid).unwrap();

        for h in 0..hem.halfedge_count() {
            let (p, q) = (hem.source(h), hem.target(h));
            let nb = extract_neighborhood(&hem, p, q, h, hem.opposite(h));

            let star: Vec<Triangle> = grid
                .faces
                .iter()
                .filter(|f| f.contains(&p) || f.contains(&q))
                .map(|f| Triangle::new(&grid.vertices[f[0]], &grid.vertices[f[1]], &grid.vertices[f[2]]))
                .collect();
            assert_eq!(nb.triangles.len(), star.len(), "edge {} -> {}", p, q);
            for t in &star {
                assert!(nb.triangles.contains(t), "edge {} -> {}", p, q);
            }

            // Link is a counter-clockwise ring around the edge midpoint
            let mid = nalgebra::center(&hem.position(p), &hem.position(q));
            let angles: Vec<f64> = nb
                .link
                .iter()
                .map(|&v| {
                    let d = hem.position(v) - mid;
                    d.y.atan2(d.x)
                })
                .collect();
            let wraps = (0..angles.len())
                .filter(|&i| angles[(i + 1) % angles.len()] < angles[i])
                .count();
            assert_eq!(wraps, 1, "edge {} -> {}: {:?}", p, q, nb.link);
        }
    }

    #[test]
    fn test_triangle_volume_identity() {
        let p0 = Point3::new(0.2, 0.1, 1.0);
        let p1 = Point3::new(1.3, -0.4, 0.7);
        let p2 = Point3::new(0.4, 1.1, 1.5);
        let v = Point3::new(-0.3, 0.8, 2.0);

        let t = Triangle::new(&p0, &p1, &p2);
        let six_volume = (p1 - v).cross(&(p2 - v)).dot(&(p0 - v));
        assert_relative_eq!(t.normal_v.dot(&v.coords) - t.normal_l, -six_volume, epsilon = 1e-12);
    }
}
