//! Core traits for meshcollapse

use crate::point::Point3d;
use std::fmt::Debug;

/// Read-only navigation over a half-edge mesh.
///
/// Border half-edges (half-edges without an incident face) are part of the
/// graph: they are linked into their boundary loop through `next`/`prev`, so
/// rotating around a boundary vertex passes through the hole like any other
/// face.
pub trait HalfedgeGraph {
    type Vertex: Copy + Eq + Debug;
    type Halfedge: Copy + Eq + Debug;

    /// Vertex the half-edge points to
    fn target(&self, h: Self::Halfedge) -> Self::Vertex;

    /// The twin half-edge, running in the opposite direction
    fn opposite(&self, h: Self::Halfedge) -> Self::Halfedge;

    /// Next half-edge around the face (or boundary loop) of `h`
    fn next(&self, h: Self::Halfedge) -> Self::Halfedge;

    /// Previous half-edge around the face (or boundary loop) of `h`
    fn prev(&self, h: Self::Halfedge) -> Self::Halfedge;

    /// True if `h` has no incident face
    fn is_border(&self, h: Self::Halfedge) -> bool;

    /// Position of a vertex
    fn position(&self, v: Self::Vertex) -> Point3d;

    /// Vertex the half-edge starts from
    fn source(&self, h: Self::Halfedge) -> Self::Vertex {
        self.target(self.opposite(h))
    }

    /// Next outgoing half-edge counter-clockwise around `source(h)`
    fn next_edge_ccw(&self, h: Self::Halfedge) -> Self::Halfedge {
        self.opposite(self.prev(h))
    }

    /// Next outgoing half-edge clockwise around `source(h)`
    fn next_edge_cw(&self, h: Self::Halfedge) -> Self::Halfedge {
        self.next(self.opposite(h))
    }

    /// True if either `h` or its twin is a border half-edge
    fn is_undirected_border(&self, h: Self::Halfedge) -> bool {
        self.is_border(h) || self.is_border(self.opposite(h))
    }
}
