use std::ops::Neg;

use approx::{AbsDiffEq, RelativeEq};

use crate::error::{ensure_finite, DomainError, Result};

/// An immutable 3D vector with finite components.
///
/// Arithmetic that can overflow returns a [`Result`] instead of producing
/// an infinite component.
///
/// Used both for directions and for positions; callers pick the matching
/// transform operation (see [`AffineTransform3`](crate::transform::AffineTransform3)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    inner: nalgebra::Vector3<f64>,
}

impl Vector3 {
    /// Creates a vector from its components.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if any component is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        ensure_finite("vector component", &[x, y, z])?;
        Ok(Self::raw(x, y, z))
    }

    /// Creates a vector from an `[x, y, z]` array.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if any component is NaN or infinite.
    pub fn from_array(xyz: [f64; 3]) -> Result<Self> {
        Self::new(xyz[0], xyz[1], xyz[2])
    }

    /// Builds a vector from components already known to be finite.
    pub(crate) const fn raw(x: f64, y: f64, z: f64) -> Self {
        Self {
            inner: nalgebra::Vector3::new(x, y, z),
        }
    }

    pub(crate) fn from_inner(inner: nalgebra::Vector3<f64>) -> Self {
        Self { inner }
    }

    fn checked(inner: nalgebra::Vector3<f64>) -> Result<Self> {
        ensure_finite("vector component", inner.as_slice())?;
        Ok(Self { inner })
    }

    pub(crate) fn inner(&self) -> &nalgebra::Vector3<f64> {
        &self.inner
    }

    /// The null vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::raw(0.0, 0.0, 0.0)
    }

    /// Unit vector along X.
    #[must_use]
    pub const fn x_axis() -> Self {
        Self::raw(1.0, 0.0, 0.0)
    }

    /// Unit vector along Y.
    #[must_use]
    pub const fn y_axis() -> Self {
        Self::raw(0.0, 1.0, 0.0)
    }

    /// Unit vector along Z.
    #[must_use]
    pub const fn z_axis() -> Self {
        Self::raw(0.0, 0.0, 1.0)
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.inner.z
    }

    /// Returns the components as `[x, y, z]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.inner.x, self.inner.y, self.inner.z]
    }

    /// Component-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if a component overflows.
    pub fn add(&self, other: &Self) -> Result<Self> {
        Self::checked(self.inner + other.inner)
    }

    /// Component-wise difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if a component overflows.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        Self::checked(self.inner - other.inner)
    }

    /// Multiplies every component by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if `factor` is NaN or infinite, or
    /// if a component overflows.
    pub fn scale(&self, factor: f64) -> Result<Self> {
        ensure_finite("scale factor", &[factor])?;
        Self::checked(self.inner * factor)
    }

    /// Divides every component by `divisor`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DivisionByZero`] if `divisor` is zero, or
    /// [`DomainError::NonFinite`] if it is NaN or infinite or a component
    /// overflows.
    pub fn div_scale(&self, divisor: f64) -> Result<Self> {
        ensure_finite("divisor", &[divisor])?;
        if divisor == 0.0 {
            return Err(DomainError::DivisionByZero.into());
        }
        Self::checked(self.inner / divisor)
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.inner.dot(&other.inner)
    }

    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self::from_inner(self.inner.cross(&other.inner))
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.inner.norm()
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// Components are divided by the largest one first, so very long and very
    /// short vectors normalize without overflow or underflow.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroVector`] if the vector is null.
    pub fn normalize(&self) -> Result<Self> {
        let largest = self.inner.amax();
        if largest == 0.0 {
            return Err(DomainError::ZeroVector.into());
        }
        let scaled = self.inner / largest;
        Ok(Self::from_inner(scaled / scaled.norm()))
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        Self::from_inner(-self.inner)
    }

    /// Canonical sign: the first non-zero component (x, then y, then z) is
    /// made positive by negating the whole vector if needed.
    #[must_use]
    pub fn positive(&self) -> Self {
        let first = self.to_array().into_iter().find(|c| *c != 0.0);
        match first {
            Some(c) if c < 0.0 => self.negate(),
            _ => *self,
        }
    }

    /// Sum of every vector yielded by `vectors`; the null vector when empty.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if a partial sum overflows.
    pub fn sum<I>(vectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        vectors
            .into_iter()
            .try_fold(Self::zero(), |total, v| total.add(&v))
    }

    /// Angle between two vectors, in `[0, π]`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroVector`] if either vector is null.
    pub fn angle(&self, other: &Self) -> Result<f64> {
        if self.norm() == 0.0 || other.norm() == 0.0 {
            return Err(DomainError::ZeroVector.into());
        }
        // atan2 keeps precision for nearly (anti-)parallel vectors.
        Ok(self.cross(other).norm().atan2(self.dot(other)))
    }

    /// Component-wise comparison within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.abs_diff_eq(other, tolerance)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::GeomError;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    #[test]
    fn rejects_non_finite_components() {
        assert!(Vector3::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Vector3::new(0.0, f64::INFINITY, 0.0).is_err());
        assert!(Vector3::from_array([0.0, 0.0, f64::NEG_INFINITY]).is_err());
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vector3::x_axis().cross(&Vector3::y_axis()), Vector3::z_axis());
        assert_eq!(Vector3::y_axis().cross(&Vector3::x_axis()), -Vector3::z_axis());
    }

    #[test]
    fn dot_and_norm() {
        let a = v(1.0, 2.0, 2.0);
        assert!((a.norm() - 3.0).abs() < 1e-15);
        assert!((a.dot(&v(2.0, 0.0, -1.0))).abs() < 1e-15);
    }

    #[test]
    fn normalize_null_vector_fails() {
        let err = Vector3::zero().normalize().unwrap_err();
        assert!(matches!(err, GeomError::Domain(DomainError::ZeroVector)));
    }

    #[test]
    fn normalize_gives_unit_length() {
        let n = v(3.0, 0.0, 4.0).normalize().unwrap();
        assert_abs_diff_eq!(n, v(0.6, 0.0, 0.8), epsilon = 1e-15);
    }

    #[test]
    fn div_scale_by_zero_fails() {
        assert!(matches!(
            v(1.0, 1.0, 1.0).div_scale(0.0),
            Err(GeomError::Domain(DomainError::DivisionByZero))
        ));
        assert_eq!(v(2.0, 4.0, 6.0).div_scale(2.0).unwrap(), v(1.0, 2.0, 3.0));
    }

    #[test]
    fn positive_flips_on_first_non_zero_component() {
        assert_eq!(v(-1.0, 2.0, 3.0).positive(), v(1.0, -2.0, -3.0));
        assert_eq!(v(0.0, -2.0, 3.0).positive(), v(0.0, 2.0, -3.0));
        assert_eq!(v(0.0, 0.0, -3.0).positive(), v(0.0, 0.0, 3.0));
        assert_eq!(v(1.0, -2.0, -3.0).positive(), v(1.0, -2.0, -3.0));
        assert_eq!(Vector3::zero().positive(), Vector3::zero());
    }

    #[test]
    fn sum_of_vectors() {
        let total = Vector3::sum([v(1.0, 0.0, 0.0), v(0.0, 2.0, 0.0), v(0.0, 0.0, 3.0)]).unwrap();
        assert_eq!(total, v(1.0, 2.0, 3.0));
        assert_eq!(Vector3::sum(Vec::new()).unwrap(), Vector3::zero());
        assert!(Vector3::sum([v(1e308, 0.0, 0.0), v(1e308, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn angle_between_axes() {
        let a = Vector3::x_axis().angle(&Vector3::y_axis()).unwrap();
        assert!((a - FRAC_PI_2).abs() < 1e-15);
        assert!(Vector3::x_axis().angle(&Vector3::zero()).is_err());
    }

    #[test]
    fn arithmetic() {
        let a = v(1.0, 2.0, 3.0);
        let b = v(-1.0, 0.5, 2.0);
        assert_eq!(a.add(&b).unwrap(), v(0.0, 2.5, 5.0));
        assert_eq!(a.sub(&b).unwrap(), v(2.0, 1.5, 1.0));
        assert_eq!(a.scale(2.0).unwrap(), v(2.0, 4.0, 6.0));
        assert_eq!(-a, a.negate());
    }

    #[test]
    fn arithmetic_never_yields_non_finite_components() {
        let non_finite = |r: Result<Vector3>| matches!(r, Err(GeomError::Domain(DomainError::NonFinite { .. })));

        assert!(non_finite(Vector3::x_axis().scale(f64::NAN)));
        assert!(non_finite(Vector3::x_axis().scale(f64::INFINITY)));

        let big = v(1e308, 0.0, 0.0);
        assert!(non_finite(big.scale(10.0)));
        assert!(non_finite(big.add(&big)));
        assert!(non_finite(big.sub(&-big)));
        assert!(non_finite(big.div_scale(1e-10)));
    }

    #[test]
    fn normalize_extreme_magnitudes() {
        for len in [1e300, 1e-300, f64::MAX] {
            let n = v(0.0, len, len).normalize().unwrap();
            assert_abs_diff_eq!(n, v(0.0, 1.0, 1.0).normalize().unwrap(), epsilon = 1e-15);
        }
    }
}
