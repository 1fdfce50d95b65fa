//! Collapse cost
//!
//! Evaluates, at a candidate position, the same three objectives the placement
//! minimizes: volume change, boundary area change and shape quality.

use crate::neighborhood::Neighborhood;
use crate::params::LindstromTurkParams;
use meshcollapse_core::{HalfedgeGraph, Point3d};

/// Cost of replacing the edge with a vertex at `v`.
///
/// `squared_length` is `|P - Q|^2` of the collapsing edge; the boundary and
/// shape terms are scaled by it so the cost is in units of volume squared.
pub fn compute_cost<M: HalfedgeGraph>(
    mesh: &M,
    neighborhood: &Neighborhood<M::Vertex>,
    squared_length: f64,
    v: &Point3d,
    params: &LindstromTurkParams,
) -> f64 {
    let volume = volume_cost(neighborhood, v);
    let boundary = boundary_cost(neighborhood, v);
    let shape = shape_cost(mesh, neighborhood, v);

    params.volume_weight * volume
        + params.boundary_weight * squared_length * boundary
        + params.shape_weight * squared_length * squared_length * shape
}

/// Sum of squared volumes of the tetrahedra swept by each triangle
fn volume_cost<V>(neighborhood: &Neighborhood<V>, v: &Point3d) -> f64 {
    neighborhood
        .triangles
        .iter()
        .map(|t| {
            let six_volume = t.normal_v.dot(&v.coords) - t.normal_l;
            six_volume * six_volume
        })
        .sum::<f64>()
        / 36.0
}

/// Sum of squared areas of the triangles between `v` and each boundary edge
fn boundary_cost<V>(neighborhood: &Neighborhood<V>, v: &Point3d) -> f64 {
    let Some(boundary) = &neighborhood.boundary else {
        return 0.0;
    };

    boundary
        .edges
        .iter()
        .map(|e| (e.vector.cross(&v.coords) - e.normal).norm_squared())
        .sum::<f64>()
        / 4.0
}

fn shape_cost<M: HalfedgeGraph>(mesh: &M, neighborhood: &Neighborhood<M::Vertex>, v: &Point3d) -> f64 {
    neighborhood
        .link
        .iter()
        .map(|&l| (v - mesh.position(l)).norm_squared())
        .sum()
}
