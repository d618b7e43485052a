use crate::error::{DomainError, Result};
use crate::math::{Matrix3, Vector3, ROTATION_TOLERANCE};

use super::{Quaternion, Rotation};

/// A [`Matrix3`] admitted as a rotation (special orthogonal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    matrix: Matrix3,
}

impl RotationMatrix {
    /// Admits `matrix` with [`ROTATION_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotSpecialOrthogonal`] if `matrix` is not a
    /// rotation.
    pub fn new(matrix: Matrix3) -> Result<Self> {
        Self::with_tolerance(matrix, ROTATION_TOLERANCE)
    }

    /// Admits `matrix` with a caller-chosen tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotSpecialOrthogonal`] if `matrix` is not a
    /// rotation.
    pub fn with_tolerance(matrix: Matrix3, tolerance: f64) -> Result<Self> {
        if !matrix.is_special_orthogonal(tolerance) {
            return Err(DomainError::NotSpecialOrthogonal { det: matrix.det() }.into());
        }
        Ok(Self { matrix })
    }

    #[must_use]
    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Inverse rotation, the transpose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }
}

impl From<Quaternion> for RotationMatrix {
    fn from(q: Quaternion) -> Self {
        Self {
            matrix: q.to_matrix(),
        }
    }
}

impl Rotation for RotationMatrix {
    fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_rotation_matrix(&self.matrix)
    }

    fn to_matrix(&self) -> Matrix3 {
        self.matrix
    }

    fn rotate(&self, v: &Vector3) -> Vector3 {
        self.matrix.multiply_vector(v)
    }
}
