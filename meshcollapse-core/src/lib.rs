//! Core data structures and traits for meshcollapse
//!
//! This crate provides the geometry kernel, the indexed triangle mesh, the
//! read-only half-edge navigation interface used by placement policies and a
//! half-edge mesh implementing it.

pub mod point;
pub mod kernel;
pub mod mesh;
pub mod halfedge;
pub mod traits;
pub mod error;

pub use point::*;
pub use kernel::*;
pub use mesh::*;
pub use halfedge::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Point3, Vector3};
