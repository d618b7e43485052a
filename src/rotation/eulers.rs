use std::f64::consts::PI;

use crate::error::{ensure_finite, DomainError, Result};
use crate::math::{angle_difference, wrap_angle};

use super::{Quaternion, Rotation};

/// Bunge Euler angles `(θ1, θ2, θ3)` in radians, composed as
/// `Rz(θ1) · Rx(θ2) · Rz(θ3)`.
///
/// Ranges: `θ1, θ3 ∈ (-π, π]` and `θ2 ∈ [0, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eulers {
    theta1: f64,
    theta2: f64,
    theta3: f64,
}

impl Eulers {
    /// Creates a set of Euler angles, wrapping `θ1` and `θ3` into `(-π, π]`.
    ///
    /// `θ2` is never wrapped: bringing it back into range would also change
    /// `θ1` and `θ3`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] for NaN or infinite angles and
    /// [`DomainError::ParameterOutOfRange`] if `θ2` is outside `[0, π]`.
    pub fn new(theta1: f64, theta2: f64, theta3: f64) -> Result<Self> {
        ensure_finite("euler angle", &[theta1, theta2, theta3])?;
        if !(0.0..=PI).contains(&theta2) {
            return Err(DomainError::ParameterOutOfRange {
                parameter: "theta2",
                value: theta2,
                min: 0.0,
                max: PI,
            }
            .into());
        }
        Ok(Self::from_wrapped(theta1, theta2, theta3))
    }

    /// Creates a set of Euler angles from values in degrees, as found in
    /// vendor map headers.
    ///
    /// # Errors
    ///
    /// Same as [`Eulers::new`].
    pub fn from_degrees(theta1: f64, theta2: f64, theta3: f64) -> Result<Self> {
        Self::new(theta1.to_radians(), theta2.to_radians(), theta3.to_radians())
    }

    /// `θ2` must already lie in `[0, π]`.
    pub(crate) fn from_wrapped(theta1: f64, theta2: f64, theta3: f64) -> Self {
        Self {
            theta1: wrap_angle(theta1),
            theta2,
            theta3: wrap_angle(theta3),
        }
    }

    #[must_use]
    pub fn theta1(&self) -> f64 {
        self.theta1
    }

    #[must_use]
    pub fn theta2(&self) -> f64 {
        self.theta2
    }

    #[must_use]
    pub fn theta3(&self) -> f64 {
        self.theta3
    }

    /// The three angles in degrees.
    #[must_use]
    pub fn to_degrees(&self) -> [f64; 3] {
        [
            self.theta1.to_degrees(),
            self.theta2.to_degrees(),
            self.theta3.to_degrees(),
        ]
    }

    #[must_use]
    pub fn from_quaternion(q: &Quaternion) -> Self {
        q.to_eulers()
    }

    /// Angle-wise comparison, treating `-π` and `π` as the same angle.
    ///
    /// Gimbal-locked sets describing the same rotation with a different split
    /// between `θ1` and `θ3` are not considered equal; compare quaternions for
    /// that.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        angle_difference(self.theta1, other.theta1).abs() <= tolerance
            && (self.theta2 - other.theta2).abs() <= tolerance
            && angle_difference(self.theta3, other.theta3).abs() <= tolerance
    }
}

impl Rotation for Eulers {
    fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_eulers(self)
    }
}
