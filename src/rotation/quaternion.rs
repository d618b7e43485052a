use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};
use tracing::{debug, trace};

use crate::error::{ensure_finite, DomainError, Result};
use crate::math::{Matrix3, Vector3, DEGENERACY_TOLERANCE, ROTATION_TOLERANCE};

use super::{AxisAngle, Eulers, Rotation};

/// A rotation quaternion `q0 + q1·i + q2·j + q3·k`.
///
/// Every externally visible value is in positive form: `q` and `-q` encode
/// the same rotation, and the stored one has its first non-zero coefficient
/// (in `q0, q1, q2, q3` order) positive. Every stored value is unit-norm:
/// [`Quaternion::new`] normalizes its input.
///
/// Multiplication is the Hamilton product and is **not commutative**:
/// `a.multiply(&b)` applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    inner: nalgebra::Quaternion<f64>,
}

impl Quaternion {
    /// Creates a unit quaternion from its scalar part `q0` and vector part
    /// `(q1, q2, q3)`, in positive form.
    ///
    /// Any finite non-zero quadruple is accepted and normalized, whatever its
    /// magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] for NaN or infinite coefficients and
    /// [`DomainError::ZeroVector`] for the null quaternion, which encodes no
    /// rotation.
    pub fn new(q0: f64, q1: f64, q2: f64, q3: f64) -> Result<Self> {
        ensure_finite("quaternion coefficient", &[q0, q1, q2, q3])?;
        if q0 == 0.0 && q1 == 0.0 && q2 == 0.0 && q3 == 0.0 {
            return Err(DomainError::ZeroVector.into());
        }
        Ok(Self::canonical(unit(nalgebra::Quaternion::new(q0, q1, q2, q3))))
    }

    /// Creates a quaternion from a scalar and a vector part.
    ///
    /// # Errors
    ///
    /// Same as [`Quaternion::new`].
    pub fn from_scalar_vector(q0: f64, v: &Vector3) -> Result<Self> {
        Self::new(q0, v.x(), v.y(), v.z())
    }

    /// The identity rotation `(1, 0, 0, 0)`.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            inner: nalgebra::Quaternion::identity(),
        }
    }

    fn canonical(inner: nalgebra::Quaternion<f64>) -> Self {
        let first = [inner.w, inner.i, inner.j, inner.k]
            .into_iter()
            .find(|c| *c != 0.0);
        match first {
            Some(c) if c < 0.0 => Self { inner: -inner },
            _ => Self { inner },
        }
    }

    /// `q0 = cos(ω/2)`, `(q1, q2, q3) = n·sin(ω/2)`.
    #[must_use]
    pub fn from_axis_angle(axis_angle: &AxisAngle) -> Self {
        let (s, c) = (0.5 * axis_angle.angle()).sin_cos();
        let n = axis_angle.axis();
        Self::canonical(nalgebra::Quaternion::new(c, n.x() * s, n.y() * s, n.z() * s))
    }

    /// Bunge (ZXZ) half-angle formulas, equal to `qz(θ1) · qx(θ2) · qz(θ3)`.
    #[must_use]
    pub fn from_eulers(eulers: &Eulers) -> Self {
        let (s2, c2) = (0.5 * eulers.theta2()).sin_cos();
        let sum = 0.5 * (eulers.theta1() + eulers.theta3());
        let diff = 0.5 * (eulers.theta1() - eulers.theta3());
        Self::canonical(nalgebra::Quaternion::new(
            c2 * sum.cos(),
            s2 * diff.cos(),
            s2 * diff.sin(),
            c2 * sum.sin(),
        ))
    }

    /// Extracts the rotation of a special-orthogonal matrix, admitted with
    /// [`ROTATION_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotSpecialOrthogonal`] if `m` is not a rotation.
    pub fn from_matrix(m: &Matrix3) -> Result<Self> {
        Self::from_matrix_with_tolerance(m, ROTATION_TOLERANCE)
    }

    /// Like [`Quaternion::from_matrix`] with a caller-chosen admissibility
    /// tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotSpecialOrthogonal`] if `m` is not a rotation.
    pub fn from_matrix_with_tolerance(m: &Matrix3, tolerance: f64) -> Result<Self> {
        if !m.is_special_orthogonal(tolerance) {
            return Err(DomainError::NotSpecialOrthogonal { det: m.det() }.into());
        }
        Ok(Self::from_rotation_matrix(m))
    }

    /// Matrix to quaternion for an already admitted rotation matrix.
    ///
    /// The trace formula divides by `4·q0`, so it is only used while `q0` is
    /// the dominant coefficient. Otherwise the largest diagonal term selects
    /// which of `q1, q2, q3` to extract first; the others follow from the
    /// off-diagonal sums and differences.
    pub(crate) fn from_rotation_matrix(m: &Matrix3) -> Self {
        let trace = m.trace();
        let diagonal = [m.m00(), m.m11(), m.m22()];
        let (dominant, largest) = diagonal
            .into_iter()
            .enumerate()
            .fold((0, diagonal[0]), |best, (i, d)| if d > best.1 { (i, d) } else { best });

        let raw = if trace > largest {
            let s = 2.0 * (1.0 + trace).sqrt();
            nalgebra::Quaternion::new(
                0.25 * s,
                (m.m21() - m.m12()) / s,
                (m.m02() - m.m20()) / s,
                (m.m10() - m.m01()) / s,
            )
        } else {
            trace!(dominant, trace, "small q0: extracting from dominant diagonal term");
            match dominant {
                0 => {
                    let s = 2.0 * (1.0 + m.m00() - m.m11() - m.m22()).sqrt();
                    nalgebra::Quaternion::new(
                        (m.m21() - m.m12()) / s,
                        0.25 * s,
                        (m.m01() + m.m10()) / s,
                        (m.m02() + m.m20()) / s,
                    )
                }
                1 => {
                    let s = 2.0 * (1.0 - m.m00() + m.m11() - m.m22()).sqrt();
                    nalgebra::Quaternion::new(
                        (m.m02() - m.m20()) / s,
                        (m.m01() + m.m10()) / s,
                        0.25 * s,
                        (m.m12() + m.m21()) / s,
                    )
                }
                _ => {
                    let s = 2.0 * (1.0 - m.m00() - m.m11() + m.m22()).sqrt();
                    nalgebra::Quaternion::new(
                        (m.m10() - m.m01()) / s,
                        (m.m02() + m.m20()) / s,
                        (m.m12() + m.m21()) / s,
                        0.25 * s,
                    )
                }
            }
        };
        Self::canonical(raw.normalize())
    }

    #[must_use]
    pub fn q0(&self) -> f64 {
        self.inner.w
    }

    #[must_use]
    pub fn q1(&self) -> f64 {
        self.inner.i
    }

    #[must_use]
    pub fn q2(&self) -> f64 {
        self.inner.j
    }

    #[must_use]
    pub fn q3(&self) -> f64 {
        self.inner.k
    }

    /// Scalar part, `q0`.
    #[must_use]
    pub fn scalar(&self) -> f64 {
        self.inner.w
    }

    /// Vector part, `(q1, q2, q3)`.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        Vector3::from_inner(self.inner.imag())
    }

    /// Coefficients as `[q0, q1, q2, q3]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.inner.w, self.inner.i, self.inner.j, self.inner.k]
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.inner.norm()
    }

    #[must_use]
    pub fn normalize(&self) -> Self {
        Self::canonical(self.inner.normalize())
    }

    /// Negates the vector part.
    #[must_use]
    pub fn conjugate(&self) -> Self {
        Self::canonical(self.inner.conjugate())
    }

    /// Multiplicative inverse, `q* / |q|²`.
    #[must_use]
    pub fn invert(&self) -> Self {
        Self::canonical(self.raw_inverse())
    }

    fn raw_inverse(&self) -> nalgebra::Quaternion<f64> {
        let norm_squared = self.inner.norm_squared();
        if (norm_squared - 1.0).abs() < f64::EPSILON {
            self.inner.conjugate()
        } else {
            self.inner.conjugate() / norm_squared
        }
    }

    /// Hamilton product `self · other`, in positive form.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self::canonical(self.inner * other.inner)
    }

    /// Four-dimensional dot product of the coefficients.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.inner.dot(&other.inner)
    }

    /// Rotates `v` with the sandwich product `q · v · q⁻¹`.
    ///
    /// The intermediate products are kept raw: forcing positive form on the
    /// inverse of a half-turn (`q0 = 0`) would turn it back into `q` and
    /// rotate the wrong way.
    #[must_use]
    pub fn rotate(&self, v: &Vector3) -> Vector3 {
        let p = nalgebra::Quaternion::from_imag(*v.inner());
        let rotated = self.inner * p * self.raw_inverse();
        Vector3::from_inner(rotated.imag())
    }

    /// Rotation taking orientation `a` to orientation `b`: `a* · b`.
    #[must_use]
    pub fn misorientation(a: &Self, b: &Self) -> Self {
        a.conjugate().multiply(b)
    }

    /// Rotation angle in `[0, π]`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        2.0 * self.inner.imag().norm().atan2(self.inner.w.abs())
    }

    /// Misorientation angle between two orientations, in `[0, π]`.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> f64 {
        Self::misorientation(self, other).angle()
    }

    /// Whether the first non-zero coefficient is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.to_array()
            .into_iter()
            .find(|c| *c != 0.0)
            .is_some_and(|c| c > 0.0)
    }

    /// Equality up to sign: `q` matches both `q` and `-q` within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.inner.abs_diff_eq(&other.inner, tolerance)
            || self.inner.abs_diff_eq(&-other.inner, tolerance)
    }

    /// Axis and angle of the rotation.
    ///
    /// The identity has no defined axis; `(1, 0, 0)` is returned with a zero
    /// angle.
    #[must_use]
    pub fn to_axis_angle(&self) -> AxisAngle {
        let q = self.inner.normalize();
        let v = q.imag();
        let sin_half = v.norm();
        if sin_half < DEGENERACY_TOLERANCE {
            trace!("identity rotation: axis defaults to x");
            return AxisAngle::from_parts(0.0, Vector3::x_axis());
        }
        // q0 >= 0 in positive form, so the angle lands in [0, π].
        let angle = 2.0 * sin_half.atan2(q.w);
        AxisAngle::from_parts(angle, Vector3::from_inner(v / sin_half))
    }

    /// Bunge Euler angles of the rotation.
    ///
    /// At gimbal lock (`θ2 = 0` or `θ2 = π`) only `θ1 + θ3` (resp. `θ1 - θ3`)
    /// is defined; the whole angle is reported in `θ1` and `θ3 = 0`.
    #[must_use]
    pub fn to_eulers(&self) -> Eulers {
        let q = self.inner.normalize();
        let (q0, q1, q2, q3) = (q.w, q.i, q.j, q.k);
        let cos_sq = q0 * q0 + q3 * q3;
        let sin_sq = q1 * q1 + q2 * q2;
        let x = cos_sq * sin_sq;

        if x.sqrt() < DEGENERACY_TOLERANCE {
            if sin_sq <= cos_sq {
                debug!(q0, q3, "gimbal lock at theta2 = 0");
                return Eulers::from_wrapped(2.0 * q3.atan2(q0), 0.0, 0.0);
            }
            debug!(q1, q2, "gimbal lock at theta2 = pi");
            return Eulers::from_wrapped(2.0 * q2.atan2(q1), std::f64::consts::PI, 0.0);
        }

        let theta2 = 2.0 * sin_sq.sqrt().atan2(cos_sq.sqrt());
        let half_sum = q3.atan2(q0);
        let half_diff = q2.atan2(q1);
        Eulers::from_wrapped(half_sum + half_diff, theta2, half_sum - half_diff)
    }

    /// Closed-form rotation matrix of the normalized quaternion.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3 {
        let q = self.inner.normalize();
        let (q0, q1, q2, q3) = (q.w, q.i, q.j, q.k);
        #[rustfmt::skip]
        let m = nalgebra::Matrix3::new(
            q0 * q0 + q1 * q1 - q2 * q2 - q3 * q3, 2.0 * (q1 * q2 - q0 * q3),             2.0 * (q1 * q3 + q0 * q2),
            2.0 * (q1 * q2 + q0 * q3),             q0 * q0 - q1 * q1 + q2 * q2 - q3 * q3, 2.0 * (q2 * q3 - q0 * q1),
            2.0 * (q1 * q3 - q0 * q2),             2.0 * (q2 * q3 + q0 * q1),             q0 * q0 - q1 * q1 - q2 * q2 + q3 * q3,
        );
        Matrix3::from_inner(m)
    }
}

/// Normalizes `raw`, dividing by its largest coefficient first so squaring
/// neither overflows nor underflows. Already-unit input is returned as is.
fn unit(raw: nalgebra::Quaternion<f64>) -> nalgebra::Quaternion<f64> {
    if (raw.norm_squared() - 1.0).abs() < f64::EPSILON {
        return raw;
    }
    let largest = raw.coords.amax();
    (raw / largest).normalize()
}

impl Rotation for Quaternion {
    fn to_quaternion(&self) -> Quaternion {
        *self
    }

    fn to_matrix(&self) -> Matrix3 {
        Quaternion::to_matrix(self)
    }

    fn rotate(&self, v: &Vector3) -> Vector3 {
        Quaternion::rotate(self, v)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}
