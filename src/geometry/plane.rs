use crate::error::{DomainError, Result};
use crate::math::{Vector2, Vector3, TOLERANCE};
use crate::transform::AffineTransform3;

/// An infinite plane through `point` with unit `normal`.
///
/// Two in-plane unit directions `u_dir` and `v_dir` complete the normal to a
/// right-handed frame (`u_dir × v_dir = normal`); they give the 2D
/// coordinates used by [`project_line`](super::project_line).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Vector3,
    normal: Vector3,
    u_dir: Vector3,
    v_dir: Vector3,
}

impl Plane {
    /// Creates a plane from a point and a normal vector.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroVector`] if the normal is zero-length.
    pub fn new(point: Vector3, normal: &Vector3) -> Result<Self> {
        if normal.norm() < TOLERANCE {
            return Err(DomainError::ZeroVector.into());
        }
        let normal = normal.normalize()?;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x().abs() < 0.9 {
            Vector3::x_axis()
        } else {
            Vector3::y_axis()
        };
        let v_dir = normal.cross(&reference).normalize()?;
        let u_dir = v_dir.cross(&normal);

        Ok(Self {
            point,
            normal,
            u_dir,
            v_dir,
        })
    }

    /// Creates the plane through three points, with normal `(b - a) × (c - a)`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Degenerate`] if the points are collinear.
    pub fn from_points(a: &Vector3, b: &Vector3, c: &Vector3) -> Result<Self> {
        let normal = b.sub(a)?.cross(&c.sub(a)?);
        if normal.norm() < TOLERANCE {
            return Err(DomainError::Degenerate("plane points are collinear".into()).into());
        }
        Self::new(*a, &normal)
    }

    /// A point of the plane.
    #[must_use]
    pub fn point(&self) -> &Vector3 {
        &self.point
    }

    /// Unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// First in-plane direction.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Second in-plane direction.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Signed distance from `p`; positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, p: &Vector3) -> f64 {
        self.normal.dot(p) - self.normal.dot(&self.point)
    }

    /// Orthogonal projection of `p` onto the plane.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFinite`] if the projection lies outside the
    /// `f64` range.
    pub fn project_point(&self, p: &Vector3) -> Result<Vector3> {
        p.sub(&self.normal.scale(self.signed_distance(p))?)
    }

    /// Whether `p` lies within `tolerance` of the plane.
    #[must_use]
    pub fn contains(&self, p: &Vector3, tolerance: f64) -> bool {
        self.signed_distance(p).abs() <= tolerance
    }

    /// In-plane `(u, v)` coordinates of the projection of `p`.
    #[must_use]
    pub fn to_local(&self, p: &Vector3) -> Vector2 {
        Vector2::new(
            self.u_dir.dot(p) - self.u_dir.dot(&self.point),
            self.v_dir.dot(p) - self.v_dir.dot(&self.point),
        )
    }

    /// The plane moved by a rigid transform.
    #[must_use]
    pub fn transformed(&self, t: &AffineTransform3) -> Self {
        Self {
            point: t.transform_point(&self.point),
            normal: t.transform_vector(&self.normal),
            u_dir: t.transform_vector(&self.u_dir),
            v_dir: t.transform_vector(&self.v_dir),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::GeomError;
    use crate::rotation::AxisAngle;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(matches!(
            Plane::new(Vector3::zero(), &Vector3::zero()),
            Err(GeomError::Domain(DomainError::ZeroVector))
        ));
    }

    #[test]
    fn in_plane_directions_complete_a_right_handed_frame() {
        for n in [v(0.0, 0.0, 2.0), v(1.0, 0.0, 0.0), v(1.0, -2.0, 0.5)] {
            let plane = Plane::new(Vector3::zero(), &n).unwrap();
            assert!(plane.u_dir().dot(plane.normal()).abs() < 1e-12);
            assert!(plane.v_dir().dot(plane.normal()).abs() < 1e-12);
            assert_abs_diff_eq!(plane.u_dir().cross(plane.v_dir()), *plane.normal(), epsilon = 1e-12);
        }
    }

    #[test]
    fn from_points_follows_winding() {
        let plane = Plane::from_points(&Vector3::zero(), &Vector3::x_axis(), &Vector3::y_axis()).unwrap();
        assert_abs_diff_eq!(*plane.normal(), Vector3::z_axis(), epsilon = 1e-15);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let result = Plane::from_points(&Vector3::zero(), &v(1.0, 1.0, 1.0), &v(2.0, 2.0, 2.0));
        assert!(matches!(result, Err(GeomError::Domain(DomainError::Degenerate(_)))));
    }

    #[test]
    fn signed_distance_and_projection() {
        let plane = Plane::new(v(0.0, 0.0, 5.0), &Vector3::z_axis()).unwrap();
        let p = v(1.0, 2.0, 8.0);
        assert!((plane.signed_distance(&p) - 3.0).abs() < 1e-12);
        assert!((plane.signed_distance(&v(0.0, 0.0, 1.0)) + 4.0).abs() < 1e-12);
        let projected = plane.project_point(&p).unwrap();
        assert_abs_diff_eq!(projected, v(1.0, 2.0, 5.0), epsilon = 1e-12);
        assert!(plane.contains(&projected, 1e-12));
        assert!(!plane.contains(&p, 1e-12));
    }

    #[test]
    fn transformed_plane_keeps_points_on_it() {
        let plane = Plane::new(v(0.0, 0.0, 1.0), &Vector3::z_axis()).unwrap();
        let r = AxisAngle::new(FRAC_PI_2, &Vector3::x_axis()).unwrap();
        let t = AffineTransform3::from_rotation(&r, v(0.0, 0.0, 2.0));
        let moved = plane.transformed(&t);
        let p = v(3.0, -1.0, 1.0);
        assert!(moved.contains(&t.transform_point(&p), 1e-12));
        assert_abs_diff_eq!(*moved.normal(), v(0.0, -1.0, 0.0), epsilon = 1e-12);
    }
}
