//! Vertex placement for edge-collapse mesh simplification
//!
//! This crate decides where the vertex replacing a collapsed edge should go:
//! - Lindstrom-Turk placement (volume, boundary and shape preserving)
//! - Collapse cost from the same objectives
//! - Midpoint placement
//! - Parallel evaluation of every edge of a mesh
//!
//! The mesh is only read, through [`HalfedgeGraph`]; performing the collapse
//! and ordering collapses are left to the caller.

pub mod params;
pub mod neighborhood;
pub mod constraints;
pub mod cost;
pub mod lindstrom_turk;
pub mod midpoint;
pub mod parallel;

#[cfg(test)]
mod test_meshes;

pub use params::*;
pub use neighborhood::*;
pub use constraints::*;
pub use cost::*;
pub use lindstrom_turk::*;
pub use midpoint::*;
pub use parallel::*;

use meshcollapse_core::{HalfedgeGraph, Point3d};

/// Choose the position of the vertex that replaces a collapsed edge
pub trait PlacementPolicy {
    /// New vertex position for collapsing `p_q`, or `None` if the edge should
    /// not be collapsed
    fn placement<M: HalfedgeGraph>(&self, mesh: &M, p_q: M::Halfedge) -> Option<Point3d>;
}
