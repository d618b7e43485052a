use thiserror::Error;

/// Top-level error type for the orientation and frame algebra.
#[derive(Debug, Error)]
pub enum GeomError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// An input violates a mathematical precondition.
///
/// These are always caller-input problems: they are raised immediately and
/// never retried or defaulted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("cannot normalize a null vector")]
    ZeroVector,

    #[error("division by zero")]
    DivisionByZero,

    #[error("matrix is singular (det = {det})")]
    SingularMatrix { det: f64 },

    #[error("matrix is not a rotation (det = {det})")]
    NotSpecialOrthogonal { det: f64 },

    #[error("homogeneous matrix is not a rigid transform: bottom row must be [0, 0, 0, 1]")]
    NotRigid,

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("basis vectors are not a right-handed frame (triple product = {triple_product})")]
    DegenerateBasis { triple_product: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("parallel geometry: {0}")]
    Parallel(String),

    #[error("indeterminate geometry: {0}")]
    Indeterminate(String),
}

/// Errors raised while rebuilding core values from persisted coefficients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("no factory registered for tag {0:?}")]
    UnknownTag(String),

    #[error("{tag} record expects {expected} coefficients, found {found}")]
    WrongLength {
        tag: String,
        expected: usize,
        found: usize,
    },
}

/// Convenience type alias for results using [`GeomError`].
pub type Result<T> = std::result::Result<T, GeomError>;

/// Fails with [`DomainError::NonFinite`] when any value is NaN or infinite.
pub(crate) fn ensure_finite(what: &'static str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DomainError::NonFinite { what }.into())
    }
}
