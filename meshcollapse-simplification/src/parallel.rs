//! Parallel batch evaluation
//!
//! Placement only reads the mesh, so independent edges can be evaluated
//! concurrently over a shared [`HalfEdgeMesh`].

use crate::lindstrom_turk::{evaluate_collapse, LindstromTurkCollapse};
use crate::params::LindstromTurkParams;
use meshcollapse_core::{Error, HalfEdgeMesh, HalfedgeGraph, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

/// How a batch of edges is spread over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Evaluate in parallel (disable for debugging)
    pub enabled: bool,
    /// Batches smaller than this run sequentially
    pub min_parallel_len: usize,
    /// Size of a dedicated thread pool; `None` uses the global rayon pool
    pub num_threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_parallel_len: 256,
            num_threads: None,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }
}

/// Result of evaluating one undirected edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePlacement {
    /// Half-edge `source -> target` the collapse was evaluated on
    pub halfedge: usize,
    pub source: usize,
    pub target: usize,
    pub collapse: LindstromTurkCollapse,
}

/// Evaluate every undirected edge of `mesh` with the default [`BatchConfig`].
///
/// Results follow the order of [`HalfEdgeMesh::edges`].
pub fn evaluate_all_edges(
    mesh: &HalfEdgeMesh,
    params: &LindstromTurkParams,
) -> Result<Vec<EdgePlacement>> {
    let edges: Vec<usize> = mesh.edges().collect();
    evaluate_edges(mesh, &edges, params, &BatchConfig::default())
}

/// Evaluate the collapse of each half-edge in `halfedges`, in order.
pub fn evaluate_edges(
    mesh: &HalfEdgeMesh,
    halfedges: &[usize],
    params: &LindstromTurkParams,
    config: &BatchConfig,
) -> Result<Vec<EdgePlacement>> {
    params.validate()?;
    if let Some(&bad) = halfedges.iter().find(|&&h| h >= mesh.halfedge_count()) {
        return Err(Error::InvalidData(format!(
            "Half-edge index {} out of range ({} half-edges)",
            bad,
            mesh.halfedge_count()
        )));
    }

    let evaluate = |&h: &usize| {
        let (p, q) = (mesh.source(h), mesh.target(h));
        EdgePlacement {
            halfedge: h,
            source: p,
            target: q,
            collapse: evaluate_collapse(p, q, h, mesh.opposite(h), mesh, params),
        }
    };

    let results: Vec<EdgePlacement> =
        if !config.enabled || halfedges.len() < config.min_parallel_len {
            halfedges.iter().map(evaluate).collect()
        } else if let Some(num_threads) = config.num_threads {
            let pool = ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|index| format!("meshcollapse-{}", index))
                .build()
                .map_err(|e| Error::Algorithm(format!("Failed to create thread pool: {}", e)))?;
            pool.install(|| halfedges.par_iter().map(evaluate).collect())
        } else {
            halfedges.par_iter().map(evaluate).collect()
        };

    let rejected = results.iter().filter(|r| r.collapse.placement.is_none()).count();
    log::debug!(
        "Evaluated {} edge collapse(s), {} without placement",
        results.len(),
        rejected
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes::*;

    #[test]
    fn test_every_edge_evaluated_once() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_plane_grid(6, 0.0)).unwrap();
        let results = evaluate_all_edges(&hem, &LindstromTurkParams::default()).unwrap();

        let edges: Vec<usize> = hem.edges().collect();
        assert_eq!(results.len(), edges.len());
        for (r, &h) in results.iter().zip(&edges) {
            assert_eq!(r.halfedge, h);
            assert_eq!(hem.halfedge_between(r.source, r.target), Some(h));
            assert!(r.collapse.placement.is_some());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_plane_grid(12, 0.5)).unwrap();
        let edges: Vec<usize> = hem.edges().collect();
        let params = LindstromTurkParams::with_weights(0.5, 0.5, 0.1);

        let sequential =
            evaluate_edges(&hem, &edges, &params, &BatchConfig::new().with_enabled(false)).unwrap();
        let parallel = evaluate_edges(
            &hem,
            &edges,
            &params,
            &BatchConfig::new().with_min_parallel_len(1).with_threads(3),
        )
        .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_out_of_range_halfedge() {
        let hem = HalfEdgeMesh::from_triangle_mesh(&make_tetrahedron()).unwrap();
        let result = evaluate_edges(
            &hem,
            &[0, hem.halfedge_count()],
            &LindstromTurkParams::default(),
            &BatchConfig::default(),
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}
