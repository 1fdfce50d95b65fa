//! Midpoint placement

use crate::PlacementPolicy;
use meshcollapse_core::{HalfedgeGraph, Point3d};

/// Places the new vertex halfway between the endpoints of the edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Midpoint;

impl PlacementPolicy for Midpoint {
    fn placement<M: HalfedgeGraph>(&self, mesh: &M, p_q: M::Halfedge) -> Option<Point3d> {
        let p = mesh.position(mesh.source(p_q));
        let q = mesh.position(mesh.target(p_q));
        Some(nalgebra::center(&p, &q))
    }
}
