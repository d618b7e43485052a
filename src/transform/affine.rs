use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use crate::error::{ensure_finite, DomainError, Result};
use crate::math::{Matrix3, Matrix4, Vector3, ROTATION_TOLERANCE, TOLERANCE};
use crate::rotation::Rotation;

/// A rigid transform: rotation followed by translation.
///
/// As a homogeneous matrix this is `[[R, t], [0, 0, 0, 1]]`; `R` is always
/// special orthogonal. Points are moved by `R·p + t`, directions by `R·v`
/// only. The two are separate operations on purpose: calling the wrong one
/// silently adds or drops the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform3 {
    rotation: Matrix3,
    translation: Vector3,
}

impl AffineTransform3 {
    /// Creates a transform from a rotation block and a translation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotSpecialOrthogonal`] if `rotation` is not a
    /// rotation within [`ROTATION_TOLERANCE`].
    pub fn new(rotation: Matrix3, translation: Vector3) -> Result<Self> {
        if !rotation.is_special_orthogonal(ROTATION_TOLERANCE) {
            return Err(DomainError::NotSpecialOrthogonal {
                det: rotation.det(),
            }
            .into());
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zero(),
        }
    }

    /// A pure translation.
    #[must_use]
    pub fn translation_only(translation: Vector3) -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation,
        }
    }

    /// A transform rotating by any rotation representation, then translating.
    #[must_use]
    pub fn from_rotation<R: Rotation + ?Sized>(rotation: &R, translation: Vector3) -> Self {
        Self {
            rotation: rotation.to_matrix(),
            translation,
        }
    }

    /// Reads a homogeneous 4x4 matrix.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] for NaN or infinite coefficients,
    /// [`DomainError::NotRigid`] if the bottom row is not `[0, 0, 0, 1]` and
    /// [`DomainError::NotSpecialOrthogonal`] if the upper-left block is not a
    /// rotation.
    pub fn from_matrix4(m: &Matrix4) -> Result<Self> {
        ensure_finite("homogeneous matrix coefficient", m.as_slice())?;
        let bottom = [m[(3, 0)], m[(3, 1)], m[(3, 2)], m[(3, 3)] - 1.0];
        if bottom.iter().any(|c| c.abs() > TOLERANCE) {
            return Err(DomainError::NotRigid.into());
        }
        let rotation = Matrix3::from_inner(m.fixed_view::<3, 3>(0, 0).into_owned());
        let translation = Vector3::raw(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        Self::new(rotation, translation)
    }

    /// The rotation block `R`.
    #[must_use]
    pub fn rotation(&self) -> &Matrix3 {
        &self.rotation
    }

    /// The translation column `t`.
    #[must_use]
    pub fn translation(&self) -> &Vector3 {
        &self.translation
    }

    /// The homogeneous 4x4 matrix.
    #[must_use]
    pub fn to_matrix4(&self) -> Matrix4 {
        let mut m = self.rotation.inner().to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(self.translation.inner());
        m
    }

    /// Coefficient of the homogeneous matrix at row `r`, column `c`, or
    /// `None` outside the 4x4 range.
    #[must_use]
    pub fn m(&self, r: usize, c: usize) -> Option<f64> {
        match (r, c) {
            (0..=2, 0..=2) => Some(self.rotation.inner()[(r, c)]),
            (0..=2, 3) => Some(self.translation.inner()[r]),
            (3, 0..=2) => Some(0.0),
            (3, 3) => Some(1.0),
            _ => None,
        }
    }

    /// Composition `self · other`: `other` is applied first.
    ///
    /// Block form `[R1·R2, R1·t2 + t1]`, so the bottom row stays exact.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation.multiply(&other.rotation),
            translation: Vector3::from_inner(
                self.rotation.inner() * other.translation.inner() + self.translation.inner(),
            ),
        }
    }

    /// Closed-form rigid inverse: `R' = Rᵗ`, `t' = -R'·t`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.transpose();
        let translation = -rotation.multiply_vector(&self.translation);
        Self {
            rotation,
            translation,
        }
    }

    /// Moves a position: `R·p + t`.
    #[must_use]
    pub fn transform_point(&self, p: &Vector3) -> Vector3 {
        Vector3::from_inner(self.rotation.inner() * p.inner() + self.translation.inner())
    }

    /// Turns a direction: `R·v`, translation ignored.
    #[must_use]
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        self.rotation.multiply_vector(v)
    }

    /// Coefficient-wise comparison within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.abs_diff_eq(other, tolerance)
    }
}

impl Default for AffineTransform3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for AffineTransform3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl AbsDiffEq for AffineTransform3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rotation.abs_diff_eq(&other.rotation, epsilon)
            && self.translation.abs_diff_eq(&other.translation, epsilon)
    }
}

impl RelativeEq for AffineTransform3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.rotation.relative_eq(&other.rotation, epsilon, max_relative)
            && self
                .translation
                .relative_eq(&other.translation, epsilon, max_relative)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::GeomError;
    use crate::rotation::{AxisAngle, Eulers};

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    fn quarter_turn_z(translation: Vector3) -> AffineTransform3 {
        let r = AxisAngle::new(FRAC_PI_2, &Vector3::z_axis()).unwrap();
        AffineTransform3::from_rotation(&r, translation)
    }

    #[test]
    fn point_and_vector_differ_by_translation() {
        let t = quarter_turn_z(v(1.0, 2.0, 3.0));
        assert_abs_diff_eq!(t.transform_point(&Vector3::x_axis()), v(1.0, 3.0, 3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(t.transform_vector(&Vector3::x_axis()), Vector3::y_axis(), epsilon = 1e-12);
    }

    #[test]
    fn composition_applies_right_operand_first() {
        let rotate = quarter_turn_z(Vector3::zero());
        let shift = AffineTransform3::translation_only(v(5.0, 0.0, 0.0));
        let p = Vector3::x_axis();
        assert_abs_diff_eq!((rotate * shift).transform_point(&p), v(0.0, 6.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!((shift * rotate).transform_point(&p), v(5.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn inverse_undoes_transform() {
        let e = Eulers::new(0.3, 2.0, -1.0).unwrap();
        let t = AffineTransform3::from_rotation(&e, v(-4.0, 0.5, 7.0));
        assert_abs_diff_eq!(t * t.inverse(), AffineTransform3::identity(), epsilon = 1e-12);
        assert_abs_diff_eq!(t.inverse() * t, AffineTransform3::identity(), epsilon = 1e-12);

        let p = v(1.0, 2.0, 3.0);
        assert_abs_diff_eq!(t.inverse().transform_point(&t.transform_point(&p)), p, epsilon = 1e-12);
    }

    #[test]
    fn inverse_matches_general_matrix_inverse() {
        let t = quarter_turn_z(v(1.0, -2.0, 0.5));
        let general = t.to_matrix4().try_inverse().unwrap();
        assert!(t.inverse().to_matrix4().abs_diff_eq(&general, 1e-12));
    }

    #[test]
    fn homogeneous_matrix_round_trip() {
        let t = quarter_turn_z(v(1.0, 2.0, 3.0));
        let m = t.to_matrix4();
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(t.m(2, 3), Some(3.0));
        assert_eq!(t.m(3, 1), Some(0.0));
        assert_eq!(t.m(3, 3), Some(1.0));
        assert_eq!(t.m(4, 0), None);
        assert_eq!(t.m(0, 4), None);
        assert_eq!(AffineTransform3::from_matrix4(&m).unwrap(), t);
    }

    #[test]
    fn block_product_matches_matrix_product() {
        let a = quarter_turn_z(v(1.0, 2.0, 3.0));
        let b = AffineTransform3::from_rotation(&Eulers::new(1.0, 0.5, 0.2).unwrap(), v(0.0, -1.0, 4.0));
        assert!((a * b).to_matrix4().abs_diff_eq(&(a.to_matrix4() * b.to_matrix4()), 1e-12));
    }

    #[test]
    fn rejects_non_rigid_input() {
        let scaled = Matrix3::new(2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert!(matches!(
            AffineTransform3::new(scaled, Vector3::zero()),
            Err(GeomError::Domain(DomainError::NotSpecialOrthogonal { .. }))
        ));

        let mut projective = Matrix4::identity();
        projective[(3, 0)] = 0.5;
        assert!(matches!(
            AffineTransform3::from_matrix4(&projective),
            Err(GeomError::Domain(DomainError::NotRigid))
        ));
    }
}
