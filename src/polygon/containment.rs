use crate::math::polygon_2d::winding_number;
use crate::math::tolerance::point_segment_distance;
use crate::math::Point3d;

use super::sense::PlanarLoop;

/// Smallest XY distance from `pt` to any edge of the loop.
#[must_use]
pub fn boundary_distance(pt: &Point3d, points: &[Point3d]) -> f64 {
    let n = points.len();
    let flat = Point3d::new(pt.x, pt.y, 0.0);
    (0..n)
        .map(|i| {
            let a = Point3d::new(points[i].x, points[i].y, 0.0);
            let b = Point3d::new(points[(i + 1) % n].x, points[(i + 1) % n].y, 0.0);
            point_segment_distance(&flat, &a, &b)
        })
        .fold(f64::INFINITY, f64::min)
}

/// Returns `true` if `pt` lies inside or on the boundary of a down loop.
///
/// The point must be within `tol` of the loop's plane. Up and vertical
/// loops contain nothing.
#[must_use]
pub fn point_in_polygon(pt: &Point3d, points: &[Point3d], tol: f64) -> bool {
    let planar = PlanarLoop::new(points.to_vec(), tol);
    if !planar.is_down() || (pt.z - planar.z()).abs() > tol {
        return false;
    }
    boundary_distance(pt, points) <= tol || winding_number(pt, points) != 0
}

/// Returns `true` if `pt` is strictly interior to a down loop and farther
/// than `tol` from every edge.
#[must_use]
pub fn within(pt: &Point3d, points: &[Point3d], tol: f64) -> bool {
    let planar = PlanarLoop::new(points.to_vec(), tol);
    if !planar.is_down() || (pt.z - planar.z()).abs() > tol {
        return false;
    }
    winding_number(pt, points) != 0 && boundary_distance(pt, points) > tol
}

/// Returns `true` if every point is [`within`] the loop.
#[must_use]
pub fn within_all(pts: &[Point3d], points: &[Point3d], tol: f64) -> bool {
    !pts.is_empty() && pts.iter().all(|pt| within(pt, points, tol))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 0.01;

    fn p(x: f64, y: f64) -> Point3d {
        Point3d::new(x, y, 0.0)
    }

    fn square_down() -> Vec<Point3d> {
        vec![p(1.0, 1.0), p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)]
    }

    // ── point_in_polygon tests ──

    #[test]
    fn interior_point_is_inside() {
        assert!(point_in_polygon(&p(0.5, 0.5), &square_down(), TOL));
    }

    #[test]
    fn boundary_point_is_inside() {
        assert!(point_in_polygon(&p(1.0, 0.5), &square_down(), TOL));
        assert!(point_in_polygon(&p(1.005, 0.5), &square_down(), TOL));
        assert!(point_in_polygon(&p(0.0, 0.0), &square_down(), TOL));
    }

    #[test]
    fn exterior_point_is_outside() {
        assert!(!point_in_polygon(&p(1.5, 0.5), &square_down(), TOL));
    }

    #[test]
    fn up_loop_contains_nothing() {
        let up: Vec<Point3d> = square_down().into_iter().rev().collect();
        assert!(!point_in_polygon(&p(0.5, 0.5), &up, TOL));
        assert!(!within(&p(0.5, 0.5), &up, TOL));
    }

    #[test]
    fn off_plane_point_is_outside() {
        assert!(!point_in_polygon(&Point3d::new(0.5, 0.5, 1.0), &square_down(), TOL));
    }

    // ── within tests ──

    #[test]
    fn within_excludes_boundary_collar() {
        assert!(within(&p(0.5, 0.5), &square_down(), TOL));
        assert!(!within(&p(1.0, 0.5), &square_down(), TOL));
        assert!(!within(&p(0.995, 0.5), &square_down(), TOL));
        assert!(within(&p(0.98, 0.5), &square_down(), TOL));
    }

    #[test]
    fn within_all_requires_every_point() {
        let sq = square_down();
        assert!(within_all(&[p(0.2, 0.2), p(0.8, 0.8)], &sq, TOL));
        assert!(!within_all(&[p(0.2, 0.2), p(1.0, 0.8)], &sq, TOL));
        assert!(!within_all(&[], &sq, TOL));
    }
}
