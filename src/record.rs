//! Plain coefficient records for persistence layers.
//!
//! Serializers outside the crate read and write these flat structs; the
//! core types never carry persistence concerns. Rebuilding a core value
//! always goes through its validating constructor.

use std::collections::HashMap;

use crate::error::{GeomError, RecordError, Result};
use crate::math::Matrix3;
use crate::rotation::{Eulers, Quaternion};

/// The four quaternion coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuaternionRecord {
    pub q0: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// The three Bunge angles, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulersRecord {
    pub theta1: f64,
    pub theta2: f64,
    pub theta3: f64,
}

/// The nine matrix coefficients, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_field_names)]
pub struct MatrixRecord {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
    pub m20: f64,
    pub m21: f64,
    pub m22: f64,
}

impl From<&Quaternion> for QuaternionRecord {
    fn from(q: &Quaternion) -> Self {
        Self {
            q0: q.q0(),
            q1: q.q1(),
            q2: q.q2(),
            q3: q.q3(),
        }
    }
}

impl TryFrom<QuaternionRecord> for Quaternion {
    type Error = GeomError;

    fn try_from(r: QuaternionRecord) -> Result<Self> {
        Quaternion::new(r.q0, r.q1, r.q2, r.q3)
    }
}

impl From<&Eulers> for EulersRecord {
    fn from(e: &Eulers) -> Self {
        Self {
            theta1: e.theta1(),
            theta2: e.theta2(),
            theta3: e.theta3(),
        }
    }
}

impl TryFrom<EulersRecord> for Eulers {
    type Error = GeomError;

    fn try_from(r: EulersRecord) -> Result<Self> {
        Eulers::new(r.theta1, r.theta2, r.theta3)
    }
}

impl From<&Matrix3> for MatrixRecord {
    fn from(m: &Matrix3) -> Self {
        Self {
            m00: m.m00(),
            m01: m.m01(),
            m02: m.m02(),
            m10: m.m10(),
            m11: m.m11(),
            m12: m.m12(),
            m20: m.m20(),
            m21: m.m21(),
            m22: m.m22(),
        }
    }
}

impl TryFrom<MatrixRecord> for Matrix3 {
    type Error = GeomError;

    fn try_from(r: MatrixRecord) -> Result<Self> {
        Matrix3::new(
            r.m00, r.m01, r.m02, r.m10, r.m11, r.m12, r.m20, r.m21, r.m22,
        )
    }
}

/// A persisted orientation in any of the supported forms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum RotationRecord {
    Quaternion(QuaternionRecord),
    Eulers(EulersRecord),
    Matrix(MatrixRecord),
}

impl RotationRecord {
    /// Registry tag of this record kind.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Quaternion(_) => QUATERNION_TAG,
            Self::Eulers(_) => EULERS_TAG,
            Self::Matrix(_) => MATRIX_TAG,
        }
    }

    /// Coefficients in declaration order.
    #[must_use]
    pub fn coefficients(&self) -> Vec<f64> {
        match self {
            Self::Quaternion(r) => vec![r.q0, r.q1, r.q2, r.q3],
            Self::Eulers(r) => vec![r.theta1, r.theta2, r.theta3],
            Self::Matrix(r) => vec![
                r.m00, r.m01, r.m02, r.m10, r.m11, r.m12, r.m20, r.m21, r.m22,
            ],
        }
    }

    /// Rebuilds the orientation as a canonical unit quaternion.
    ///
    /// # Errors
    ///
    /// Returns the constructor error of the stored form, e.g.
    /// [`DomainError::NotSpecialOrthogonal`](crate::error::DomainError::NotSpecialOrthogonal)
    /// for a matrix that is not a rotation.
    pub fn to_quaternion(&self) -> Result<Quaternion> {
        match *self {
            Self::Quaternion(r) => Quaternion::try_from(r),
            Self::Eulers(r) => Ok(Quaternion::from_eulers(&Eulers::try_from(r)?)),
            Self::Matrix(r) => Quaternion::from_matrix(&Matrix3::try_from(r)?),
        }
    }
}

pub const QUATERNION_TAG: &str = "quaternion";
pub const EULERS_TAG: &str = "eulers";
pub const MATRIX_TAG: &str = "matrix";

/// Builds an orientation from the flat coefficients stored under a tag.
pub type RecordFactory = fn(&[f64]) -> Result<Quaternion>;

/// Explicit mapping from type tag to factory.
///
/// Loaders look up the tag they read from a file instead of resolving a type
/// by name at runtime.
#[derive(Debug, Clone, Default)]
pub struct RecordRegistry {
    factories: HashMap<String, RecordFactory>,
}

impl RecordRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the quaternion, Euler and matrix factories.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(QUATERNION_TAG, quaternion_factory);
        registry.register(EULERS_TAG, eulers_factory);
        registry.register(MATRIX_TAG, matrix_factory);
        registry
    }

    /// Registers `factory` under `tag`, returning the factory it replaces.
    pub fn register(&mut self, tag: impl Into<String>, factory: RecordFactory) -> Option<RecordFactory> {
        self.factories.insert(tag.into(), factory)
    }

    /// Whether a factory is registered under `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Builds an orientation from the coefficients stored under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownTag`] for an unregistered tag, otherwise
    /// whatever the factory returns.
    pub fn build(&self, tag: &str, values: &[f64]) -> Result<Quaternion> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| RecordError::UnknownTag(tag.to_owned()))?;
        factory(values)
    }

    /// Builds an orientation from a typed record.
    ///
    /// # Errors
    ///
    /// Same as [`RecordRegistry::build`].
    pub fn build_record(&self, record: &RotationRecord) -> Result<Quaternion> {
        self.build(record.tag(), &record.coefficients())
    }
}

fn expect_len<const N: usize>(tag: &str, values: &[f64]) -> Result<[f64; N]> {
    <[f64; N]>::try_from(values).map_err(|_| {
        RecordError::WrongLength {
            tag: tag.to_owned(),
            expected: N,
            found: values.len(),
        }
        .into()
    })
}

fn quaternion_factory(values: &[f64]) -> Result<Quaternion> {
    let [q0, q1, q2, q3] = expect_len::<4>(QUATERNION_TAG, values)?;
    RotationRecord::Quaternion(QuaternionRecord { q0, q1, q2, q3 }).to_quaternion()
}

fn eulers_factory(values: &[f64]) -> Result<Quaternion> {
    let [theta1, theta2, theta3] = expect_len::<3>(EULERS_TAG, values)?;
    RotationRecord::Eulers(EulersRecord {
        theta1,
        theta2,
        theta3,
    })
    .to_quaternion()
}

fn matrix_factory(values: &[f64]) -> Result<Quaternion> {
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = expect_len::<9>(MATRIX_TAG, values)?;
    RotationRecord::Matrix(MatrixRecord {
        m00,
        m01,
        m02,
        m10,
        m11,
        m12,
        m20,
        m21,
        m22,
    })
    .to_quaternion()
}
