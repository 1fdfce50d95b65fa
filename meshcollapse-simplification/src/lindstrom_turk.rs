//! Lindstrom-Turk vertex placement
//!
//! Computes the position of the vertex that replaces a collapsed edge by
//! stacking up to three linear constraints, each family tried in priority
//! order until the system is full:
//!
//! 1. boundary preservation (border edges only)
//! 2. volume preservation
//! 3. combined boundary and volume optimization
//! 4. shape optimization
//!
//! Based on P. Lindstrom and G. Turk, "Fast and Memory Efficient Polygonal
//! Simplification" (1998).

use crate::constraints::ConstraintSystem;
use crate::cost::compute_cost;
use crate::neighborhood::{extract_neighborhood, Boundary, Neighborhood, Triangle};
use crate::params::LindstromTurkParams;
use crate::PlacementPolicy;
use meshcollapse_core::{
    direct_product, lt_product, Error, HalfEdgeMesh, HalfedgeGraph, Matrix3d, Point3d, Result,
    Vector3d,
};
use serde::{Deserialize, Serialize};

/// Origin of an accepted constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintFamily {
    BoundaryPreservation,
    VolumePreservation,
    BoundaryAndVolumeOptimization,
    ShapeOptimization,
}

/// Outcome of evaluating one edge collapse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LindstromTurkCollapse {
    /// Position of the replacement vertex, `None` if the constraints could
    /// not be completed
    pub placement: Option<Point3d>,
    /// Weighted objective at the placement
    pub cost: Option<f64>,
    /// True if the edge lies on a mesh boundary
    pub is_boundary: bool,
    /// The family each accepted constraint row came from, in row order
    pub origins: Vec<ConstraintFamily>,
}

/// Placement of the vertex replacing the edge `p -> q`.
///
/// `p_q` and `q_p` are the two half-edges joining `p` and `q`. Returns `None`
/// when fewer than three independent constraints could be found, which callers
/// should treat as "do not collapse this edge".
pub fn evaluate_placement<M: HalfedgeGraph>(
    p: M::Vertex,
    q: M::Vertex,
    p_q: M::Halfedge,
    q_p: M::Halfedge,
    mesh: &M,
    params: &LindstromTurkParams,
) -> Option<Point3d> {
    let neighborhood = extract_neighborhood(mesh, p, q, p_q, q_p);
    let squared_length = (mesh.position(q) - mesh.position(p)).norm_squared();
    let (system, _) = build_constraints(mesh, &neighborhood, squared_length, params);
    system.solve()
}

/// Placement, cost and constraint provenance of the collapse of `p -> q`.
pub fn evaluate_collapse<M: HalfedgeGraph>(
    p: M::Vertex,
    q: M::Vertex,
    p_q: M::Halfedge,
    q_p: M::Halfedge,
    mesh: &M,
    params: &LindstromTurkParams,
) -> LindstromTurkCollapse {
    let neighborhood = extract_neighborhood(mesh, p, q, p_q, q_p);
    let squared_length = (mesh.position(q) - mesh.position(p)).norm_squared();
    let (system, origins) = build_constraints(mesh, &neighborhood, squared_length, params);

    let placement = system.solve();
    if placement.is_none() {
        log::debug!(
            "No placement for edge {:?} -> {:?}: {} independent constraint(s)",
            p,
            q,
            system.len()
        );
    }
    let cost = placement.map(|v| compute_cost(mesh, &neighborhood, squared_length, &v, params));

    LindstromTurkCollapse {
        placement,
        cost,
        is_boundary: neighborhood.boundary.is_some(),
        origins,
    }
}

/// Evaluate the collapse of the edge between vertices `p` and `q` of a
/// [`HalfEdgeMesh`].
pub fn evaluate_edge_between(
    mesh: &HalfEdgeMesh,
    p: usize,
    q: usize,
    params: &LindstromTurkParams,
) -> Result<LindstromTurkCollapse> {
    params.validate()?;
    let p_q = mesh
        .halfedge_between(p, q)
        .ok_or_else(|| Error::Topology(format!("No edge between vertices {} and {}", p, q)))?;
    Ok(evaluate_collapse(p, q, p_q, mesh.opposite(p_q), mesh, params))
}

fn build_constraints<M: HalfedgeGraph>(
    mesh: &M,
    neighborhood: &Neighborhood<M::Vertex>,
    squared_length: f64,
    params: &LindstromTurkParams,
) -> (ConstraintSystem, Vec<ConstraintFamily>) {
    let mut system = ConstraintSystem::from_params(params);
    let mut origins = Vec::with_capacity(3);

    if let Some(boundary) = &neighborhood.boundary {
        add_boundary_preservation_constraints(&mut system, boundary);
        record(&system, &mut origins, ConstraintFamily::BoundaryPreservation);
    }

    if !system.is_full() {
        add_volume_preservation_constraints(&mut system, &neighborhood.triangles);
        record(&system, &mut origins, ConstraintFamily::VolumePreservation);
    }

    if !system.is_full() {
        add_boundary_and_volume_optimization_constraints(
            &mut system,
            neighborhood,
            squared_length,
            params,
        );
        record(&system, &mut origins, ConstraintFamily::BoundaryAndVolumeOptimization);
    }

    if !system.is_full() {
        add_shape_optimization_constraints(mesh, &mut system, &neighborhood.link);
        record(&system, &mut origins, ConstraintFamily::ShapeOptimization);
    }

    (system, origins)
}

/// Attribute rows accepted since the last call to `family`
fn record(system: &ConstraintSystem, origins: &mut Vec<ConstraintFamily>, family: ConstraintFamily) {
    let added = system.len() - origins.len();
    log::trace!("{:?}: {} row(s) accepted", family, added);
    origins.resize(system.len(), family);
}

fn add_boundary_preservation_constraints(system: &mut ConstraintSystem, boundary: &Boundary) {
    let e1 = boundary.vector_sum();
    let e3 = boundary.normal_sum();

    let h = lt_product(&e1);
    let c = e1.cross(&e3);

    system.add_from_gradient(&h, &c);
}

fn add_volume_preservation_constraints(system: &mut ConstraintSystem, triangles: &[Triangle]) {
    let mut sum_v = Vector3d::zeros();
    let mut sum_l = 0.0;

    for t in triangles {
        sum_v += t.normal_v;
        sum_l += t.normal_l;
    }

    system.add_if_alpha_compatible(sum_v, sum_l);
}

fn add_boundary_and_volume_optimization_constraints<V>(
    system: &mut ConstraintSystem,
    neighborhood: &Neighborhood<V>,
    squared_length: f64,
    params: &LindstromTurkParams,
) {
    let mut h = Matrix3d::zeros();
    let mut c = Vector3d::zeros();

    // Volume
    for t in &neighborhood.triangles {
        h += direct_product(&t.normal_v, &t.normal_v);
        c -= t.normal_v * t.normal_l;
    }
    h *= params.volume_weight;
    c *= params.volume_weight;

    // Boundary
    if let Some(boundary) = &neighborhood.boundary {
        let mut bh = Matrix3d::zeros();
        let mut bc = Vector3d::zeros();
        for e in &boundary.edges {
            bh += lt_product(&e.vector);
            bc += e.vector.cross(&e.normal);
        }

        let w = 9.0 * params.boundary_weight * squared_length / 10.0;
        h += bh * w;
        c += bc * w;
    }

    system.add_from_gradient(&h, &c);
}

fn add_shape_optimization_constraints<M: HalfedgeGraph>(
    mesh: &M,
    system: &mut ConstraintSystem,
    link: &[M::Vertex],
) {
    let s = link.len() as f64;
    let h = Matrix3d::from_diagonal_element(s);
    let c = -link
        .iter()
        .map(|&v| mesh.position(v).coords)
        .sum::<Vector3d>();

    system.add_from_gradient(&h, &c);
}

/// [`PlacementPolicy`] placing the new vertex with [`evaluate_placement`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LindstromTurkPlacement {
    params: LindstromTurkParams,
}

impl LindstromTurkPlacement {
    pub fn new(params: LindstromTurkParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LindstromTurkParams {
        &self.params
    }

    /// Full evaluation of the collapse of `p_q`
    pub fn evaluate<M: HalfedgeGraph>(&self, mesh: &M, p_q: M::Halfedge) -> LindstromTurkCollapse {
        let q_p = mesh.opposite(p_q);
        evaluate_collapse(mesh.source(p_q), mesh.target(p_q), p_q, q_p, mesh, &self.params)
    }
}

impl PlacementPolicy for LindstromTurkPlacement {
    fn placement<M: HalfedgeGraph>(&self, mesh: &M, p_q: M::Halfedge) -> Option<Point3d> {
        let q_p = mesh.opposite(p_q);
        evaluate_placement(mesh.source(p_q), mesh.target(p_q), p_q, q_p, mesh, &self.params)
    }
}
