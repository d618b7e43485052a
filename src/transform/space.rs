use tracing::trace;

use crate::error::{DomainError, Result};
use crate::math::{Matrix3, Vector3, TOLERANCE};

use super::AffineTransform3;

/// A coordinate frame: an orthonormal right-handed basis `(i, j, k)` and an
/// origin, both expressed in a common parent frame.
///
/// The frame's [`transform`](Self::transform) maps local coordinates to
/// parent coordinates, `p_parent = [i j k]·p_local + origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuclideanSpace {
    i: Vector3,
    j: Vector3,
    k: Vector3,
    origin: Vector3,
    transform: AffineTransform3,
}

impl EuclideanSpace {
    /// The parent frame itself.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_transform(AffineTransform3::identity())
    }

    /// A frame sharing the parent's origin.
    ///
    /// # Errors
    ///
    /// Same as [`EuclideanSpace::with_origin`].
    pub fn new(i: &Vector3, j: &Vector3, k: &Vector3) -> Result<Self> {
        Self::with_origin(i, j, k, Vector3::zero())
    }

    /// Builds a frame from three basis vectors, normalized here, and an origin.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroVector`] for a null basis vector,
    /// [`DomainError::DegenerateBasis`] when the scalar triple product is not
    /// positive (coplanar or left-handed basis) and
    /// [`DomainError::NotSpecialOrthogonal`] when the vectors are not
    /// mutually orthogonal.
    pub fn with_origin(i: &Vector3, j: &Vector3, k: &Vector3, origin: Vector3) -> Result<Self> {
        let i = i.normalize()?;
        let j = j.normalize()?;
        let k = k.normalize()?;

        let triple_product = i.dot(&j.cross(&k));
        trace!(triple_product, "building euclidean space");
        if triple_product < TOLERANCE {
            return Err(DomainError::DegenerateBasis { triple_product }.into());
        }

        let basis = Matrix3::from_columns(&i, &j, &k);
        let transform = AffineTransform3::new(basis, origin)?;
        Ok(Self {
            i,
            j,
            k,
            origin,
            transform,
        })
    }

    /// The frame whose local-to-parent transform is `transform`.
    #[must_use]
    pub fn from_transform(transform: AffineTransform3) -> Self {
        let rotation = transform.rotation();
        Self {
            i: rotation.column(0),
            j: rotation.column(1),
            k: rotation.column(2),
            origin: *transform.translation(),
            transform,
        }
    }

    #[must_use]
    pub fn i(&self) -> &Vector3 {
        &self.i
    }

    #[must_use]
    pub fn j(&self) -> &Vector3 {
        &self.j
    }

    #[must_use]
    pub fn k(&self) -> &Vector3 {
        &self.k
    }

    #[must_use]
    pub fn origin(&self) -> &Vector3 {
        &self.origin
    }

    /// Local-to-parent transform of this frame.
    #[must_use]
    pub fn transform(&self) -> &AffineTransform3 {
        &self.transform
    }

    /// Maps coordinates expressed in `other` to coordinates expressed in
    /// `self`: `inverse(self) · other`.
    #[must_use]
    pub fn transformation_from(&self, other: &Self) -> AffineTransform3 {
        self.transform.inverse().multiply(&other.transform)
    }

    /// Maps coordinates expressed in `self` to coordinates expressed in
    /// `other`: `inverse(other) · self`.
    #[must_use]
    pub fn transformation_to(&self, other: &Self) -> AffineTransform3 {
        other.transform.inverse().multiply(&self.transform)
    }

    /// Parent coordinates of a point given in this frame.
    #[must_use]
    pub fn point_from_local(&self, p: &Vector3) -> Vector3 {
        self.transform.transform_point(p)
    }

    /// Coordinates in this frame of a point given in the parent frame.
    #[must_use]
    pub fn point_to_local(&self, p: &Vector3) -> Vector3 {
        self.transform.inverse().transform_point(p)
    }
}

impl Default for EuclideanSpace {
    fn default() -> Self {
        Self::standard()
    }
}
