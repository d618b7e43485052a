use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use crate::error::{ensure_finite, DomainError, Result};

use super::Vector3;

/// An immutable 3x3 real matrix with finite coefficients.
///
/// Coefficients are addressed row-major: `mRC` is row `R`, column `C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    inner: nalgebra::Matrix3<f64>,
}

macro_rules! coefficient_accessors {
    ($($name:ident => ($r:literal, $c:literal)),* $(,)?) => {
        $(
            #[must_use]
            pub fn $name(&self) -> f64 {
                self.inner[($r, $c)]
            }
        )*
    };
}

impl Matrix3 {
    /// Creates a matrix from its nine coefficients, given row by row.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if any coefficient is NaN or infinite.
    #[rustfmt::skip]
    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    pub fn new(
        m00: f64, m01: f64, m02: f64,
        m10: f64, m11: f64, m12: f64,
        m20: f64, m21: f64, m22: f64,
    ) -> Result<Self> {
        Self::from_rows([[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]])
    }

    /// Creates a matrix from an array of rows.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if any coefficient is NaN or infinite.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self> {
        ensure_finite("matrix coefficient", &rows.concat())?;
        Ok(Self::from_inner(nalgebra::Matrix3::from_fn(|r, c| rows[r][c])))
    }

    /// Creates a matrix whose columns are `c0`, `c1` and `c2`.
    #[must_use]
    pub fn from_columns(c0: &Vector3, c1: &Vector3, c2: &Vector3) -> Self {
        Self::from_inner(nalgebra::Matrix3::from_columns(&[
            *c0.inner(),
            *c1.inner(),
            *c2.inner(),
        ]))
    }

    pub(crate) fn from_inner(inner: nalgebra::Matrix3<f64>) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &nalgebra::Matrix3<f64> {
        &self.inner
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::from_inner(nalgebra::Matrix3::identity())
    }

    coefficient_accessors!(
        m00 => (0, 0), m01 => (0, 1), m02 => (0, 2),
        m10 => (1, 0), m11 => (1, 1), m12 => (1, 2),
        m20 => (2, 0), m21 => (2, 1), m22 => (2, 2),
    );

    /// Returns row `i` as a vector.
    ///
    /// # Panics
    ///
    /// Panics if `i > 2`.
    #[must_use]
    pub fn row(&self, i: usize) -> Vector3 {
        Vector3::raw(self.inner[(i, 0)], self.inner[(i, 1)], self.inner[(i, 2)])
    }

    /// Returns column `j` as a vector.
    ///
    /// # Panics
    ///
    /// Panics if `j > 2`.
    #[must_use]
    pub fn column(&self, j: usize) -> Vector3 {
        Vector3::raw(self.inner[(0, j)], self.inner[(1, j)], self.inner[(2, j)])
    }

    /// Returns the coefficients as an array of rows.
    #[must_use]
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        [self.row(0).to_array(), self.row(1).to_array(), self.row(2).to_array()]
    }

    fn checked(inner: nalgebra::Matrix3<f64>) -> Result<Self> {
        ensure_finite("matrix coefficient", inner.as_slice())?;
        Ok(Self { inner })
    }

    /// Coefficient-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if a coefficient overflows.
    pub fn add(&self, other: &Self) -> Result<Self> {
        Self::checked(self.inner + other.inner)
    }

    /// Coefficient-wise difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if a coefficient overflows.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        Self::checked(self.inner - other.inner)
    }

    /// Multiplies every coefficient by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if `factor` is NaN or infinite, or
    /// if a coefficient overflows.
    pub fn scale(&self, factor: f64) -> Result<Self> {
        ensure_finite("scale factor", &[factor])?;
        Self::checked(self.inner * factor)
    }

    /// Matrix product `self · other`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self::from_inner(self.inner * other.inner)
    }

    /// Matrix times column vector, `self · v`.
    #[must_use]
    pub fn multiply_vector(&self, v: &Vector3) -> Vector3 {
        Vector3::from_inner(self.inner * v.inner())
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_inner(self.inner.transpose())
    }

    #[must_use]
    pub fn trace(&self) -> f64 {
        self.inner.trace()
    }

    #[must_use]
    pub fn det(&self) -> f64 {
        let c = self.cofactors();
        self.m00() * c[0][0] + self.m01() * c[0][1] + self.m02() * c[0][2]
    }

    /// Inverse through the adjugate: `M⁻¹ = adj(M) / det(M)`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::SingularMatrix`] if the determinant is zero.
    pub fn inverse(&self) -> Result<Self> {
        let c = self.cofactors();
        let det = self.m00() * c[0][0] + self.m01() * c[0][1] + self.m02() * c[0][2];
        if det == 0.0 {
            return Err(DomainError::SingularMatrix { det }.into());
        }
        // adj(M) is the transposed cofactor matrix.
        Ok(Self::from_inner(nalgebra::Matrix3::from_fn(|r, col| {
            c[col][r] / det
        })))
    }

    /// `M · Mᵗ` equals the identity within `tolerance`, coefficient-wise.
    #[must_use]
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        let product = self.inner * self.inner.transpose();
        product.abs_diff_eq(&nalgebra::Matrix3::identity(), tolerance)
    }

    /// Rotation admissibility: orthogonal with `|det - 1| < tolerance`.
    #[must_use]
    pub fn is_special_orthogonal(&self, tolerance: f64) -> bool {
        (self.det() - 1.0).abs() < tolerance && self.is_orthogonal(tolerance)
    }

    /// Coefficient-wise comparison within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.abs_diff_eq(other, tolerance)
    }

    #[allow(clippy::similar_names)]
    fn cofactors(&self) -> [[f64; 3]; 3] {
        let (m00, m01, m02) = (self.m00(), self.m01(), self.m02());
        let (m10, m11, m12) = (self.m10(), self.m11(), self.m12());
        let (m20, m21, m22) = (self.m20(), self.m21(), self.m22());
        [
            [
                m11 * m22 - m12 * m21,
                -(m10 * m22 - m12 * m20),
                m10 * m21 - m11 * m20,
            ],
            [
                -(m01 * m22 - m02 * m21),
                m00 * m22 - m02 * m20,
                -(m00 * m21 - m01 * m20),
            ],
            [
                m01 * m12 - m02 * m11,
                -(m00 * m12 - m02 * m10),
                m00 * m11 - m01 * m10,
            ],
        ]
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.multiply_vector(&rhs)
    }
}

impl AbsDiffEq for Matrix3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

impl RelativeEq for Matrix3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}
