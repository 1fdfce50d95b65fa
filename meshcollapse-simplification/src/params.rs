//! Parameters of the Lindstrom-Turk placement and cost

use meshcollapse_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Weights and conditioning threshold for Lindstrom-Turk placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LindstromTurkParams {
    /// Weight of the volume objective in the combined optimization and the cost
    pub volume_weight: f64,
    /// Weight of the boundary objective in the combined optimization and the cost
    pub boundary_weight: f64,
    /// Weight of the shape objective in the cost
    pub shape_weight: f64,
    /// Minimum angle, in degrees, between accepted constraints
    pub alpha_degrees: f64,
}

impl Default for LindstromTurkParams {
    fn default() -> Self {
        Self {
            volume_weight: 0.5,
            boundary_weight: 0.5,
            shape_weight: 0.0,
            alpha_degrees: 1.0,
        }
    }
}

impl LindstromTurkParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(volume_weight: f64, boundary_weight: f64, shape_weight: f64) -> Self {
        Self {
            volume_weight,
            boundary_weight,
            shape_weight,
            ..Self::default()
        }
    }

    /// Set the alpha-compatibility angle in degrees
    pub fn with_alpha_degrees(mut self, alpha_degrees: f64) -> Self {
        self.alpha_degrees = alpha_degrees;
        self
    }

    pub fn squared_cos_alpha(&self) -> f64 {
        let c = self.alpha_degrees.to_radians().cos();
        c * c
    }

    pub fn squared_sin_alpha(&self) -> f64 {
        let s = self.alpha_degrees.to_radians().sin();
        s * s
    }

    /// Check that weights are finite and non-negative and alpha lies in (0, 90).
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("volume_weight", self.volume_weight),
            ("boundary_weight", self.boundary_weight),
            ("shape_weight", self.shape_weight),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidData(format!(
                    "{} must be finite and non-negative, got {}",
                    name, w
                )));
            }
        }
        if !(self.alpha_degrees > 0.0 && self.alpha_degrees < 90.0) {
            return Err(Error::InvalidData(format!(
                "alpha_degrees must be between 0 and 90, got {}",
                self.alpha_degrees
            )));
        }
        Ok(())
    }
}
