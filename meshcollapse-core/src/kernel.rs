//! Geometry kernel
//!
//! Small numeric helpers on top of nalgebra used by the placement engine:
//! products measured against the origin, the Lindstrom-Turk cross-product
//! matrix and a 3x3 inverse that reports singularity as `None`.

use crate::point::*;

/// Cross product of two points taken as vectors from the origin.
#[inline]
pub fn point_cross_product(p: &Point3d, q: &Point3d) -> Vector3d {
    p.coords.cross(&q.coords)
}

/// Triple product `(p0 x p1) . p2`, six times the signed volume of the
/// tetrahedron `(origin, p0, p1, p2)`.
#[inline]
pub fn triple_product(p0: &Point3d, p1: &Point3d, p2: &Point3d) -> f64 {
    point_cross_product(p0, p1).dot(&p2.coords)
}

/// Outer product `u * v^T`.
#[inline]
pub fn direct_product(u: &Vector3d, v: &Vector3d) -> Matrix3d {
    u * v.transpose()
}

/// The matrix `M` with `v^T M v = |u x v|^2`, i.e. `|u|^2 I - u u^T`.
pub fn lt_product(u: &Vector3d) -> Matrix3d {
    let (x, y, z) = (u.x, u.y, u.z);

    let a01 = -x * y;
    let a02 = -x * z;
    let a12 = -y * z;

    Matrix3d::new(
        y * y + z * z, a01, a02,
        a01, x * x + z * z, a12,
        a02, a12, x * x + y * y,
    )
}

/// Inverse of `m`, or `None` when the determinant is exactly zero.
#[inline]
pub fn inverse_matrix(m: &Matrix3d) -> Option<Matrix3d> {
    m.try_inverse()
}

/// Index of the largest component of `v`.
///
/// Components are compared with a strict `<` in x, y, z order, so ties go to
/// the lowest index.
pub fn index_of_max_component(v: &Vector3d) -> usize {
    let mut i = 0;
    let mut max = v.x;
    if max < v.y {
        max = v.y;
        i = 1;
    }
    if max < v.z {
        i = 2;
    }
    i
}
