//! Rotation representations and the conversions between them.
//!
//! [`Quaternion`] is the canonical representation: every other form converts
//! through it. Angles are in radians and rotations are active, so rotating a
//! vector by `q` yields `q · v · q⁻¹`. Bunge Euler angles `(θ1, θ2, θ3)`
//! compose as `Rz(θ1) · Rx(θ2) · Rz(θ3)`.

mod axis_angle;
mod eulers;
mod quaternion;
mod rotation_matrix;

pub use axis_angle::AxisAngle;
pub use eulers::Eulers;
pub use quaternion::Quaternion;
pub use rotation_matrix::RotationMatrix;

use crate::math::{Matrix3, Vector3};

/// Common interface for every rotation representation.
///
/// Consumers that only need to apply or store an orientation take
/// `&impl Rotation` and never care which form the input arrived in.
pub trait Rotation {
    /// Converts to the canonical (positive) unit quaternion.
    fn to_quaternion(&self) -> Quaternion;

    /// Converts to a special-orthogonal matrix.
    fn to_matrix(&self) -> Matrix3 {
        self.to_quaternion().to_matrix()
    }

    /// Rotates a vector.
    fn rotate(&self, v: &Vector3) -> Vector3 {
        self.to_quaternion().rotate(v)
    }
}
