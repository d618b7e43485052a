use std::f64::consts::TAU;

use crate::error::{ensure_finite, DomainError, Result};
use crate::math::Vector3;

use super::{Quaternion, Rotation};

/// A rotation of `angle` radians about a unit `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    angle: f64,
    axis: Vector3,
}

impl AxisAngle {
    /// Creates an axis-angle rotation; the axis is normalized.
    ///
    /// A zero angle accepts any axis, including the null vector, which is then
    /// replaced by `(1, 0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ParameterOutOfRange`] if `angle` is outside
    /// `[0, 2π)`, [`DomainError::NonFinite`] if it is NaN or infinite, and
    /// [`DomainError::ZeroVector`] for a null axis with a non-zero angle.
    pub fn new(angle: f64, axis: &Vector3) -> Result<Self> {
        ensure_finite("rotation angle", &[angle])?;
        if !(0.0..TAU).contains(&angle) {
            return Err(DomainError::ParameterOutOfRange {
                parameter: "angle",
                value: angle,
                min: 0.0,
                max: TAU,
            }
            .into());
        }
        if angle == 0.0 {
            let axis = axis.normalize().unwrap_or_else(|_| Vector3::x_axis());
            return Ok(Self::from_parts(0.0, axis));
        }
        Ok(Self::from_parts(angle, axis.normalize()?))
    }

    /// `axis` must be unit-length and `angle` within `[0, 2π)`.
    pub(crate) fn from_parts(angle: f64, axis: Vector3) -> Self {
        Self { angle, axis }
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Unit rotation axis.
    #[must_use]
    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    #[must_use]
    pub fn from_quaternion(q: &Quaternion) -> Self {
        q.to_axis_angle()
    }

    /// Whether both values describe the same rotation within `tolerance`,
    /// so `(ω, n)` matches `(2π - ω, -n)` and all zero angles match.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.to_quaternion()
            .approx_eq(&other.to_quaternion(), tolerance)
    }
}

impl Rotation for AxisAngle {
    fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_axis_angle(self)
    }
}
