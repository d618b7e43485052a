use crate::error::{DomainError, Result};
use crate::math::{Vector2, Vector3, TOLERANCE};

use super::{Line2, Line3, Plane};

/// Computes the line along which two planes cross.
///
/// The returned line point is the point of the intersection closest to the
/// origin of coordinates.
///
/// # Errors
///
/// Returns [`DomainError::Parallel`] if the planes are parallel or
/// coincident (the cross product of the normals is near zero).
pub fn planes_intersection(p0: &Plane, p1: &Plane) -> Result<Line3> {
    let n0 = p0.normal();
    let n1 = p1.normal();

    let direction = n0.cross(n1);
    let denom = direction.dot(&direction);
    if direction.norm() < TOLERANCE {
        return Err(DomainError::Parallel("planes do not cross".into()).into());
    }

    // Solve n0·p = d0 and n1·p = d1 with p = c0·n0 + c1·n1.
    let d0 = n0.dot(p0.point());
    let d1 = n1.dot(p1.point());
    let k = n0.dot(n1);
    let c0 = (d0 - k * d1) / denom;
    let c1 = (d1 - k * d0) / denom;

    let point = n0.scale(c0)?.add(&n1.scale(c1)?)?;
    Line3::new(point, &direction)
}

/// Computes the point where a line pierces a plane.
///
/// # Errors
///
/// Returns [`DomainError::Parallel`] if the line runs parallel to the plane
/// without touching it, and [`DomainError::Indeterminate`] if the line lies in
/// the plane.
pub fn line_plane_intersection(line: &Line3, plane: &Plane) -> Result<Vector3> {
    let normal = plane.normal();
    let denom = normal.dot(line.direction());
    let numer = normal.dot(&plane.point().sub(line.point())?);

    if denom.abs() < TOLERANCE {
        if numer.abs() < TOLERANCE {
            return Err(DomainError::Indeterminate("line lies in the plane".into()).into());
        }
        return Err(DomainError::Parallel("line is parallel to the plane".into()).into());
    }
    line.point_at(numer / denom)
}

/// Orthogonal projection of a 3D line onto a plane, in the plane's in-plane
/// `(u, v)` coordinates.
///
/// # Errors
///
/// Returns [`DomainError::Parallel`] if the line is perpendicular to the
/// plane, whose projection collapses to a point.
pub fn project_line(line: &Line3, plane: &Plane) -> Result<Line2> {
    let d = line.direction();
    let in_plane = d.sub(&plane.normal().scale(plane.normal().dot(d))?)?;
    if in_plane.norm() < TOLERANCE {
        return Err(DomainError::Parallel("line is perpendicular to the plane".into()).into());
    }
    let point = plane.to_local(line.point());
    let direction = Vector2::new(plane.u_dir().dot(&in_plane), plane.v_dir().dot(&in_plane));
    Line2::new(point, direction)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::GeomError;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    fn plane(point: Vector3, normal: Vector3) -> Plane {
        Plane::new(point, &normal).unwrap()
    }

    // ── planes_intersection ──

    #[test]
    fn perpendicular_planes_intersect() {
        // XY-plane and XZ-plane should intersect along the X-axis
        let xy = plane(Vector3::zero(), Vector3::z_axis());
        let xz = plane(Vector3::zero(), Vector3::y_axis());

        let line = planes_intersection(&xy, &xz).unwrap();
        assert!(line.direction().x().abs() > 0.99, "got {line:?}");
        assert_abs_diff_eq!(*line.point(), Vector3::zero(), epsilon = 1e-12);
    }

    #[test]
    fn intersection_point_lies_on_both_planes() {
        let a = plane(v(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let b = plane(v(0.0, 2.0, 0.0), v(0.0, 1.0, 1.0));

        let line = planes_intersection(&a, &b).unwrap();
        for t in [0.0, 1.0, -3.5] {
            let p = line.point_at(t).unwrap();
            assert!(a.contains(&p, 1e-12), "not on plane A: {p:?}");
            assert!(b.contains(&p, 1e-12), "not on plane B: {p:?}");
        }
    }

    #[test]
    fn parallel_planes_fail() {
        let a = plane(Vector3::zero(), Vector3::z_axis());
        let b = plane(v(0.0, 0.0, 5.0), v(0.0, 0.0, -1.0));
        assert!(matches!(
            planes_intersection(&a, &b),
            Err(GeomError::Domain(DomainError::Parallel(_)))
        ));
        assert!(planes_intersection(&a, &a).is_err());
    }

    // ── line_plane_intersection ──

    #[test]
    fn line_hits_plane() {
        let p = plane(v(0.0, 0.0, 5.0), Vector3::z_axis());
        let line = Line3::new(v(1.0, 1.0, 0.0), &v(0.0, 1.0, 1.0)).unwrap();
        let hit = line_plane_intersection(&line, &p).unwrap();
        assert_abs_diff_eq!(hit, v(1.0, 6.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn line_parallel_to_plane_fails() {
        let p = plane(v(0.0, 0.0, 5.0), Vector3::z_axis());
        let line = Line3::new(Vector3::zero(), &Vector3::x_axis()).unwrap();
        assert!(matches!(
            line_plane_intersection(&line, &p),
            Err(GeomError::Domain(DomainError::Parallel(_)))
        ));
    }

    #[test]
    fn line_in_plane_is_indeterminate() {
        let p = plane(v(0.0, 0.0, 5.0), Vector3::z_axis());
        let line = Line3::new(v(3.0, 0.0, 5.0), &Vector3::y_axis()).unwrap();
        assert!(matches!(
            line_plane_intersection(&line, &p),
            Err(GeomError::Domain(DomainError::Indeterminate(_)))
        ));
    }

    // ── project_line ──

    #[test]
    fn projection_drops_normal_component() {
        let p = plane(Vector3::zero(), Vector3::z_axis());
        let line = Line3::new(v(1.0, 2.0, 7.0), &v(1.0, 0.0, 1.0)).unwrap();
        let projected = project_line(&line, &p).unwrap();

        // Every point of the 3D line projects onto the 2D line.
        for t in [0.0, 2.0, -1.0] {
            let local = p.to_local(&line.point_at(t).unwrap());
            let offset = local - projected.point();
            assert!(offset.perp(projected.direction()).abs() < 1e-12);
        }
        assert!((projected.direction().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_line_has_no_projection() {
        let p = plane(Vector3::zero(), Vector3::z_axis());
        let line = Line3::new(v(1.0, 2.0, 0.0), &v(0.0, 0.0, -3.0)).unwrap();
        assert!(matches!(
            project_line(&line, &p),
            Err(GeomError::Domain(DomainError::Parallel(_)))
        ));
    }
}
