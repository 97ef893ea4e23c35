pub mod geometry;
pub mod topology;
pub mod traits;

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use geometry::point::{Point2d, Point3d};
use geometry::vector::Vec3;

// Re-export key traits at crate root for convenience.
pub use traits::{Annotated, Tagged};

/// Tolerance configuration for geometric comparisons.
///
/// Each field is used at a different granularity and can be tuned
/// independently. Point tests must stay tighter than face-center tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Points closer than this (per coordinate) are considered coincident.
    pub coincidence: f64,
    /// Coarse filter for matching projected face centers to sketch faces.
    pub face_center: f64,
    /// Curve parameter equality (arc angles, in radians).
    pub parametric: f64,
    /// Directions whose cosine is within this of 1 are considered aligned.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 0.005,
            face_center: 0.035,
            parametric: 1e-6,
            angular: 1e-6,
        }
    }
}

/// Invalid tolerance configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    #[error("tolerance `{field}` must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("point tolerance {coincidence} must not exceed face-center tolerance {face_center}")]
    Inverted { coincidence: f64, face_center: f64 },

    #[error("malformed tolerance document: {0}")]
    Parse(String),
}

impl Tolerance {
    /// Load a tolerance override document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ToleranceError> {
        let tol: Tolerance =
            serde_json::from_str(json).map_err(|e| ToleranceError::Parse(e.to_string()))?;
        tol.validate()?;
        Ok(tol)
    }

    pub fn validate(&self) -> Result<(), ToleranceError> {
        for (field, value) in [
            ("coincidence", self.coincidence),
            ("face_center", self.face_center),
            ("parametric", self.parametric),
            ("angular", self.angular),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ToleranceError::NotPositive { field, value });
            }
        }
        if self.coincidence > self.face_center {
            return Err(ToleranceError::Inverted {
                coincidence: self.coincidence,
                face_center: self.face_center,
            });
        }
        Ok(())
    }

    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.abs_diff_eq(b, self.coincidence)
    }

    pub fn points_coincident_2d(&self, a: &Point2d, b: &Point2d) -> bool {
        a.abs_diff_eq(b, self.coincidence)
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }

    pub fn params_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.parametric
    }

    /// Same direction (not merely parallel).
    pub fn directions_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        match (a.normalized(), b.normalized()) {
            (Some(a), Some(b)) => 1.0 - a.dot(&b) <= self.angular,
            _ => false,
        }
    }

    /// Parallel or anti-parallel.
    pub fn directions_parallel(&self, a: &Vec3, b: &Vec3) -> bool {
        match (a.normalized(), b.normalized()) {
            (Some(a), Some(b)) => 1.0 - a.dot(&b).abs() <= self.angular,
            _ => false,
        }
    }
}
