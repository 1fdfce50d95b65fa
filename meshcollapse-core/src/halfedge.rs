//! Half-edge mesh
//!
//! Builds a half-edge representation of a [`TriangleMesh`] and exposes it
//! through [`HalfedgeGraph`]. Every face edge without a twin gets an explicit
//! border half-edge, and the border half-edges are linked into boundary loops,
//! so rotating around any vertex is a closed cycle.

use crate::{Error, HalfedgeGraph, Point3d, Result, TriangleMesh};
use std::collections::HashMap;

const INVALID: usize = usize::MAX;

#[derive(Debug, Clone)]
struct HalfEdge {
    target: usize,
    twin: usize,
    next: usize,
    prev: usize,
    /// `None` for border half-edges
    face: Option<usize>,
}

/// Read-only half-edge mesh with explicit border half-edges.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    half_edges: Vec<HalfEdge>,
    /// One outgoing half-edge per vertex (INVALID if isolated)
    vertex_edge: Vec<usize>,
    positions: Vec<Point3d>,
    face_count: usize,
}

impl HalfEdgeMesh {
    /// Build the half-edge structure of an oriented, edge-manifold triangle mesh.
    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Result<Self> {
        let nv = mesh.vertex_count();
        let nf = mesh.face_count();

        let mut half_edges = Vec::with_capacity(nf * 3);
        let mut vertex_edge = vec![INVALID; nv];

        for (fi, face) in mesh.faces.iter().enumerate() {
            if let Some(&v) = face.iter().find(|&&v| v >= nv) {
                return Err(Error::InvalidData(format!(
                    "Face {} references vertex {} but the mesh has {} vertices",
                    fi, v, nv
                )));
            }
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                return Err(Error::InvalidData(format!(
                    "Face {} repeats a vertex: {:?}",
                    fi, face
                )));
            }

            let base = fi * 3;
            for j in 0..3usize {
                half_edges.push(HalfEdge {
                    target: face[(j + 1) % 3],
                    twin: INVALID,
                    next: base + (j + 1) % 3,
                    prev: base + (j + 2) % 3,
                    face: Some(fi),
                });
                if vertex_edge[face[j]] == INVALID {
                    vertex_edge[face[j]] = base + j;
                }
            }
        }

        // Build twin pointers
        let mut edge_map: HashMap<(usize, usize), usize> = HashMap::with_capacity(nf * 3);
        for (he_idx, he) in half_edges.iter().enumerate() {
            let src = half_edges[he.prev].target;
            if edge_map.insert((src, he.target), he_idx).is_some() {
                return Err(Error::Topology(format!(
                    "Directed edge {} -> {} is used by more than one face",
                    src, he.target
                )));
            }
        }
        for he_idx in 0..half_edges.len() {
            if half_edges[he_idx].twin != INVALID {
                continue;
            }
            let src = half_edges[half_edges[he_idx].prev].target;
            let tgt = half_edges[he_idx].target;
            if let Some(&twin_idx) = edge_map.get(&(tgt, src)) {
                half_edges[he_idx].twin = twin_idx;
                half_edges[twin_idx].twin = he_idx;
            }
        }

        // Border half-edges, keyed by their source vertex
        let mut border_from: HashMap<usize, usize> = HashMap::new();
        let face_half_edges = half_edges.len();
        for he_idx in 0..face_half_edges {
            if half_edges[he_idx].twin != INVALID {
                continue;
            }
            let src = half_edges[he_idx].target;
            let tgt = half_edges[half_edges[he_idx].prev].target;
            let border_idx = half_edges.len();
            half_edges.push(HalfEdge {
                target: tgt,
                twin: he_idx,
                next: INVALID,
                prev: INVALID,
                face: None,
            });
            half_edges[he_idx].twin = border_idx;

            if border_from.insert(src, border_idx).is_some() {
                return Err(Error::Topology(format!(
                    "Vertex {} is pinched between two boundary loops",
                    src
                )));
            }
        }

        // Link border half-edges into boundary loops
        for border_idx in face_half_edges..half_edges.len() {
            let tgt = half_edges[border_idx].target;
            let next = *border_from.get(&tgt).ok_or_else(|| {
                Error::Topology(format!("Boundary loop is open at vertex {}", tgt))
            })?;
            half_edges[border_idx].next = next;
            half_edges[next].prev = border_idx;
        }

        let isolated = vertex_edge.iter().filter(|&&e| e == INVALID).count();
        if isolated > 0 {
            log::warn!("Half-edge mesh has {} isolated vertices", isolated);
        }

        Ok(HalfEdgeMesh {
            half_edges,
            vertex_edge,
            positions: mesh.vertices.clone(),
            face_count: nf,
        })
    }

    /// Number of vertices, including isolated ones
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangular faces
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Number of half-edges, border half-edges included
    pub fn halfedge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// All outgoing half-edges of `v`, in counter-clockwise order. Empty for
    /// isolated or out-of-range vertices.
    pub fn outgoing_half_edges(&self, v: usize) -> Vec<usize> {
        if v >= self.vertex_count() {
            return vec![];
        }
        let start = self.vertex_edge[v];
        if start == INVALID {
            return vec![];
        }

        let mut result = Vec::new();
        let mut current = start;
        loop {
            result.push(current);
            current = self.next_edge_ccw(current);
            if current == start {
                break;
            }
        }
        result
    }

    /// Vertices adjacent to `v`, in counter-clockwise order.
    pub fn vertices_around(&self, v: usize) -> Vec<usize> {
        self.outgoing_half_edges(v)
            .into_iter()
            .map(|he| self.half_edges[he].target)
            .collect()
    }

    /// The half-edge running from `from` to `to`, if the vertices are adjacent.
    pub fn halfedge_between(&self, from: usize, to: usize) -> Option<usize> {
        self.outgoing_half_edges(from)
            .into_iter()
            .find(|&he| self.half_edges[he].target == to)
    }

    /// One half-edge per undirected edge.
    pub fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.half_edges.len()).filter(move |&he| he < self.half_edges[he].twin)
    }

    /// True if any outgoing half-edge of `v` touches a boundary loop.
    pub fn is_boundary_vertex(&self, v: usize) -> bool {
        self.outgoing_half_edges(v)
            .iter()
            .any(|&he| self.is_undirected_border(he))
    }
}

impl HalfedgeGraph for HalfEdgeMesh {
    type Vertex = usize;
    type Halfedge = usize;

    #[inline]
    fn target(&self, h: usize) -> usize {
        self.half_edges[h].target
    }

    #[inline]
    fn opposite(&self, h: usize) -> usize {
        self.half_edges[h].twin
    }

    #[inline]
    fn next(&self, h: usize) -> usize {
        self.half_edges[h].next
    }

    #[inline]
    fn prev(&self, h: usize) -> usize {
        self.half_edges[h].prev
    }

    #[inline]
    fn is_border(&self, h: usize) -> bool {
        self.half_edges[h].face.is_none()
    }

    #[inline]
    fn position(&self, v: usize) -> Point3d {
        self.positions[v]
    }
}
