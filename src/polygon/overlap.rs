use crate::math::tolerance::{line_parameter, point_line_distance};
use crate::math::Point3d;

/// Sub-segments of `line` that coincide with edges of a loop within `tol`.
///
/// One sub-segment per coincident edge, sorted along the line direction.
/// Contacts no longer than `tol`, such as a line ending on a corner, are
/// not reported. Endpoints come from the edge where the edge bounds the
/// overlap and from the line otherwise.
#[must_use]
pub fn edge_overlaps(points: &[Point3d], line: &[Point3d; 2], tol: f64) -> Vec<[Point3d; 2]> {
    let [l0, l1] = line;
    let length = (l1 - l0).norm();
    let n = points.len();
    if length <= tol || n < 2 {
        return Vec::new();
    }

    let mut found: Vec<(f64, [Point3d; 2])> = Vec::new();
    for i in 0..n {
        let (e0, e1) = (&points[i], &points[(i + 1) % n]);
        if point_line_distance(e0, l0, l1) > tol || point_line_distance(e1, l0, l1) > tol {
            continue;
        }
        let (s0, s1) = (line_parameter(e0, l0, l1), line_parameter(e1, l0, l1));
        let (lo_edge, lo_t, hi_edge, hi_t) = if s0 <= s1 {
            (e0, s0, e1, s1)
        } else {
            (e1, s1, e0, s0)
        };
        let start_t = lo_t.max(0.0);
        let end_t = hi_t.min(1.0);
        if (end_t - start_t) * length <= tol {
            continue;
        }
        let start = if lo_t >= 0.0 { *lo_edge } else { *l0 };
        let end = if hi_t <= 1.0 { *hi_edge } else { *l1 };
        found.push((start_t, [start, end]));
    }
    found.sort_by(|a, b| a.0.total_cmp(&b.0));
    found.into_iter().map(|(_, seg)| seg).collect()
}
