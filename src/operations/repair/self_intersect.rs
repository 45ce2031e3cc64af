use crate::math::intersect_2d::segments_touch;
use crate::math::tolerance::{dedupe_loop, point_strictly_on_segment};
use crate::math::Point3d;

/// Returns `true` if the loop is not simple within `tol`.
///
/// A loop is self-intersecting when two non-adjacent edges cross or touch,
/// or when two adjacent edges fold back over each other (a spike).
/// Consecutive duplicate points are merged first; loops with fewer than
/// three distinct points never self-intersect.
#[must_use]
pub fn self_intersects(points: &[Point3d], tol: f64) -> bool {
    let pts = dedupe_loop(points, tol);
    let n = pts.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let a0 = &pts[i];
        let a1 = &pts[(i + 1) % n];

        // Adjacent edge a0-a1 / a1-a2 folding back onto itself.
        let a2 = &pts[(i + 2) % n];
        if point_strictly_on_segment(a2, a0, a1, tol) || point_strictly_on_segment(a0, a1, a2, tol) {
            return true;
        }

        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = &pts[j];
            let b1 = &pts[(j + 1) % n];
            if segments_touch(a0, a1, b0, b1, tol) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 0.01;

    fn p(x: f64, y: f64) -> Point3d {
        Point3d::new(x, y, 0.0)
    }

    #[test]
    fn square_is_simple() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!(!self_intersects(&pts, TOL));
    }

    #[test]
    fn concave_l_is_simple() {
        let pts = vec![
            p(0.0, 0.0),
            p(0.0, 2.0),
            p(1.0, 2.0),
            p(1.0, 1.0),
            p(2.0, 1.0),
            p(2.0, 0.0),
        ];
        assert!(!self_intersects(&pts, TOL));
    }

    #[test]
    fn bow_tie_crosses() {
        let pts = vec![p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(self_intersects(&pts, TOL));
    }

    #[test]
    fn vertex_touching_edge_intersects() {
        let pts = vec![
            p(0.0, 0.0),
            p(0.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 2.0),
            p(1.5, 0.5),
        ];
        assert!(self_intersects(&pts, TOL));
    }

    #[test]
    fn spike_folds_back() {
        let pts = vec![p(10.0, 10.0), p(10.0, 0.0), p(0.0, 0.0), p(0.0, 5.0), p(10.0, 5.0)];
        assert!(self_intersects(&pts, TOL));
    }

    #[test]
    fn collinear_vertex_is_not_a_fold() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(1.0, 2.0), p(1.0, 0.0)];
        assert!(!self_intersects(&pts, TOL));
    }

    #[test]
    fn duplicate_points_are_ignored() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!(!self_intersects(&pts, TOL));
    }

    #[test]
    fn degenerate_loops_are_not_self_intersecting() {
        assert!(!self_intersects(&[p(0.0, 0.0), p(1.0, 0.0)], TOL));
        assert!(!self_intersects(&[], TOL));
    }
}
