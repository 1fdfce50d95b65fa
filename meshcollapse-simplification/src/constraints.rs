//! Alpha-compatible linear constraint system
//!
//! Collects up to three equations `Ai . v = bi` for the replacement vertex.
//! A candidate is only accepted when it is sufficiently independent from the
//! ones already accepted (the alpha-compatibility test), which keeps the final
//! 3x3 system well conditioned. Once three rows are in, the system is solved
//! directly.

use crate::params::LindstromTurkParams;
use meshcollapse_core::{index_of_max_component, inverse_matrix, Matrix3d, Point3d, Vector3d};

/// Number of accepted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintState {
    Empty,
    One,
    Two,
    Full,
}

/// Up to three accepted constraint rows and their right-hand sides.
///
/// Rows can only be added through [`add_if_alpha_compatible`] and
/// [`add_from_gradient`]; accepted rows never change.
///
/// [`add_if_alpha_compatible`]: ConstraintSystem::add_if_alpha_compatible
/// [`add_from_gradient`]: ConstraintSystem::add_from_gradient
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    a: Matrix3d,
    b: Vector3d,
    n: usize,
    squared_cos_alpha: f64,
    squared_sin_alpha: f64,
}

impl ConstraintSystem {
    pub fn new(squared_cos_alpha: f64, squared_sin_alpha: f64) -> Self {
        Self {
            a: Matrix3d::zeros(),
            b: Vector3d::zeros(),
            n: 0,
            squared_cos_alpha,
            squared_sin_alpha,
        }
    }

    pub fn from_params(params: &LindstromTurkParams) -> Self {
        Self::new(params.squared_cos_alpha(), params.squared_sin_alpha())
    }

    pub fn state(&self) -> ConstraintState {
        match self.n {
            0 => ConstraintState::Empty,
            1 => ConstraintState::One,
            2 => ConstraintState::Two,
            _ => ConstraintState::Full,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn is_full(&self) -> bool {
        self.n == 3
    }

    /// Accepted row `i` and its right-hand side
    pub fn row(&self, i: usize) -> Option<(Vector3d, f64)> {
        (i < self.n).then(|| (self.r(i), self.b[i]))
    }

    #[inline]
    fn r(&self, i: usize) -> Vector3d {
        self.a.row(i).transpose()
    }

    /// Add `row . v = scalar` if `row` is non-zero and alpha-compatible with
    /// the rows already accepted. Returns whether the row was accepted.
    pub fn add_if_alpha_compatible(&mut self, row: Vector3d, scalar: f64) -> bool {
        let slai = row.norm_squared();
        if !(slai > 0.0) {
            return false;
        }

        let accept = match self.state() {
            ConstraintState::Empty => true,
            ConstraintState::One => {
                // Angle between the row and r0 is at least alpha
                let a0 = self.r(0);
                let d01 = a0.dot(&row);
                d01 * d01 <= a0.norm_squared() * slai * self.squared_cos_alpha
            }
            ConstraintState::Two => {
                // Angle between the row and the plane of r0, r1 is at least alpha
                let n = self.r(0).cross(&self.r(1));
                let dc012 = n.dot(&row);
                dc012 * dc012 > n.norm_squared() * slai * self.squared_sin_alpha
            }
            ConstraintState::Full => false,
        };

        if accept {
            self.a.set_row(self.n, &row.transpose());
            self.b[self.n] = scalar;
            self.n += 1;
        }
        accept
    }

    /// Offer the rows implied by minimizing `v^T H v + 2 c^T v` within the
    /// subspace the accepted rows leave free.
    ///
    /// # Panics
    ///
    /// Panics if the system is already full.
    pub fn add_from_gradient(&mut self, h: &Matrix3d, c: &Vector3d) {
        match self.state() {
            ConstraintState::Empty => {
                for i in 0..3 {
                    self.add_if_alpha_compatible(h.row(i).transpose(), -c[i]);
                }
            }
            ConstraintState::One => {
                let a0 = self.r(0);
                let a02 = a0.component_mul(&a0);

                // Two directions orthogonal to a0 and to each other
                let q0 = match index_of_max_component(&a02) {
                    0 => Vector3d::new(-a0.z / a0.x, 0.0, 1.0),
                    1 => Vector3d::new(0.0, -a0.z / a0.y, 1.0),
                    _ => Vector3d::new(1.0, 0.0, -a0.x / a0.z),
                };
                let q1 = a0.cross(&q0);

                self.add_if_alpha_compatible(h * q0, -q0.dot(c));
                self.add_if_alpha_compatible(h * q1, -q1.dot(c));
            }
            ConstraintState::Two => {
                let q = self.r(0).cross(&self.r(1));
                self.add_if_alpha_compatible(h * q, -q.dot(c));
            }
            ConstraintState::Full => {
                panic!("add_from_gradient called on a full constraint system")
            }
        }
    }

    /// The unique point satisfying all three rows, if the system is full and
    /// its matrix is invertible.
    pub fn solve(&self) -> Option<Point3d> {
        if !self.is_full() {
            return None;
        }
        let ai = inverse_matrix(&self.a)?;
        Some(Point3d::from(ai * self.b))
    }
}
