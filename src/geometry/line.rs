use crate::error::{ensure_finite, DomainError, Result};
use crate::math::{Vector2, Vector3, TOLERANCE};
use crate::transform::AffineTransform3;

/// An infinite 3D line `P(t) = point + t·direction`, with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    point: Vector3,
    direction: Vector3,
}

impl Line3 {
    /// Creates a new line from a point and a direction.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroVector`] if the direction is zero-length.
    pub fn new(point: Vector3, direction: &Vector3) -> Result<Self> {
        if direction.norm() < TOLERANCE {
            return Err(DomainError::ZeroVector.into());
        }
        Ok(Self {
            point,
            direction: direction.normalize()?,
        })
    }

    /// The line through `a` and `b`, oriented from `a` to `b`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroVector`] if the points coincide.
    pub fn from_points(a: &Vector3, b: &Vector3) -> Result<Self> {
        Self::new(*a, &b.sub(a)?)
    }

    #[must_use]
    pub fn point(&self) -> &Vector3 {
        &self.point
    }

    /// Unit direction.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// The point at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if `t` is NaN or infinite, or if the
    /// point lies outside the `f64` range.
    pub fn point_at(&self, t: f64) -> Result<Vector3> {
        self.point.add(&self.direction.scale(t)?)
    }

    /// The line moved by a rigid transform.
    #[must_use]
    pub fn transformed(&self, t: &AffineTransform3) -> Self {
        Self {
            point: t.transform_point(&self.point),
            direction: t.transform_vector(&self.direction),
        }
    }
}

/// An infinite 2D line `P(t) = point + t·direction`, with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    point: Vector2,
    direction: Vector2,
}

impl Line2 {
    /// Creates a new 2D line.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] for NaN or infinite coordinates and
    /// [`DomainError::ZeroVector`] if the direction is zero-length.
    pub fn new(point: Vector2, direction: Vector2) -> Result<Self> {
        ensure_finite("line coordinate", &[point.x, point.y, direction.x, direction.y])?;
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(DomainError::ZeroVector.into());
        }
        Ok(Self {
            point,
            direction: direction / len,
        })
    }

    #[must_use]
    pub fn point(&self) -> &Vector2 {
        &self.point
    }

    /// Unit direction.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Vector2 {
        self.point + self.direction * t
    }

    /// Intersection point of two 2D lines.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Parallel`] if the lines are parallel or
    /// coincident.
    pub fn intersection(&self, other: &Self) -> Result<Vector2> {
        let d1 = self.direction;
        let d2 = other.direction;
        let denom = d1.perp(&d2);
        if denom.abs() < TOLERANCE {
            return Err(DomainError::Parallel("2D lines do not cross".into()).into());
        }
        let t = (other.point - self.point).perp(&d2) / denom;
        Ok(self.point_at(t))
    }
}
