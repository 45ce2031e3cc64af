use tracing::trace;

use crate::math::tolerance::{dedupe_loop, point_line_distance, points_equal};
use crate::math::Point3d;
use crate::polygon::Sense;

/// Strips zero-width out-and-back spikes from a down loop.
///
/// A vertex is a spike tip when it lies within `tol` of the line through
/// its neighbours but outside the span between them, or when its two
/// neighbours coincide. Neighbours are re-checked after every removal.
/// Returns an empty loop when the input is not down or collapses below
/// three points.
#[must_use]
pub fn remove_spikes(points: &[Point3d], tol: f64) -> Vec<Point3d> {
    if Sense::classify(points, tol) != Sense::Down {
        return Vec::new();
    }
    let mut pts = dedupe_loop(points, tol);
    while pts.len() >= 3 {
        match (0..pts.len()).find(|&i| is_spike(&pts, i, tol)) {
            Some(i) => {
                trace!(index = i, "removing spike vertex");
                pts.remove(i);
                pts = dedupe_loop(&pts, tol);
            }
            None => return pts,
        }
    }
    Vec::new()
}

/// Returns `true` if vertex `i` is the tip of an out-and-back spike.
fn is_spike(pts: &[Point3d], i: usize, tol: f64) -> bool {
    let n = pts.len();
    let prev = &pts[(i + n - 1) % n];
    let v = &pts[i];
    let next = &pts[(i + 1) % n];
    if points_equal(prev, next, tol) {
        return true;
    }
    if point_line_distance(v, prev, next) > tol {
        return false;
    }
    (v - prev).dot(&(next - v)) < 0.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::tolerance::circular_equal;

    const TOL: f64 = 0.01;

    fn p(x: f64, y: f64) -> Point3d {
        Point3d::new(x, y, 0.0)
    }

    #[test]
    fn end_spike_removed() {
        let pts = vec![p(10.0, 10.0), p(10.0, 0.0), p(0.0, 0.0), p(0.0, 5.0), p(10.0, 5.0)];
        let expected = vec![p(10.0, 5.0), p(10.0, 0.0), p(0.0, 0.0), p(0.0, 5.0)];
        assert!(circular_equal(&remove_spikes(&pts, TOL), &expected, TOL));
    }

    #[test]
    fn middle_spike_removed() {
        let pts = vec![
            p(10.0, 10.0),
            p(10.0, 0.0),
            p(0.0, 0.0),
            p(0.0, 5.0),
            p(-5.0, 5.0),
            p(0.0, 5.0),
            p(0.0, 10.0),
        ];
        let expected = vec![p(10.0, 10.0), p(10.0, 0.0), p(0.0, 0.0), p(0.0, 5.0), p(0.0, 10.0)];
        assert!(circular_equal(&remove_spikes(&pts, TOL), &expected, TOL));
    }

    #[test]
    fn spike_free_loop_unchanged() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert_eq!(remove_spikes(&pts, TOL), pts);
    }

    #[test]
    fn collinear_vertex_is_kept() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(1.0, 2.0), p(1.0, 0.0)];
        assert_eq!(remove_spikes(&pts, TOL).len(), 5);
    }

    #[test]
    fn up_loop_is_emptied() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(remove_spikes(&pts, TOL).is_empty());
    }
}
