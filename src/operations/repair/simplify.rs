use crate::math::polygon_2d::rotate_to_canonical_start;
use crate::math::tolerance::{
    dedupe_loop, line_parameter, point_line_distance, point_strictly_on_segment, points_equal,
};
use crate::math::Point3d;

/// Simplifies a planar loop.
///
/// Duplicate points within `tol` are merged and every vertex within `tol`
/// of the line through its neighbours is dropped, which also collapses
/// repeated back-and-forth traversal of a line to its turning points.
/// With `remove_collinear == false`, input vertices lying on a surviving
/// edge are put back in edge order so only the redundant traversal goes.
///
/// The result keeps the input winding, starts at the leftmost (then
/// lowest) vertex, never has more vertices than the input and is a fixed
/// point of `simplify`. Fewer than three surviving vertices yield an empty
/// loop.
#[must_use]
pub fn simplify(points: &[Point3d], remove_collinear: bool, tol: f64) -> Vec<Point3d> {
    let merged = dedupe_loop(points, tol);
    let mut core = remove_collinear_vertices(&merged, tol);
    if core.len() < 3 {
        return Vec::new();
    }

    if !remove_collinear {
        core = restore_edge_vertices(&core, &merged, tol);
    }
    rotate_to_canonical_start(&core, tol)
}

/// Reorders a loop to start at its leftmost (then lowest) vertex.
#[must_use]
pub fn reorder_canonical(points: &[Point3d], tol: f64) -> Vec<Point3d> {
    rotate_to_canonical_start(points, tol)
}

/// Repeatedly drops vertices within `tol` of the line through their neighbours.
pub(crate) fn remove_collinear_vertices(points: &[Point3d], tol: f64) -> Vec<Point3d> {
    let mut pts = dedupe_loop(points, tol);
    let mut i = 0;
    while pts.len() >= 3 && i < pts.len() {
        let n = pts.len();
        let prev = &pts[(i + n - 1) % n];
        let next = &pts[(i + 1) % n];
        let redundant =
            points_equal(prev, next, tol) || point_line_distance(&pts[i], prev, next) <= tol;
        if redundant {
            pts.remove(i);
            pts = dedupe_loop(&pts, tol);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
    if pts.len() < 3 {
        return Vec::new();
    }
    // A removal near the end can expose a redundant vertex at the front.
    if (0..pts.len()).any(|k| {
        let n = pts.len();
        point_line_distance(&pts[k], &pts[(k + n - 1) % n], &pts[(k + 1) % n]) <= tol
    }) {
        return remove_collinear_vertices(&pts, tol);
    }
    pts
}

/// Inserts the distinct `originals` that lie strictly inside an edge of
/// `core`, each once, sorted along its edge.
fn restore_edge_vertices(core: &[Point3d], originals: &[Point3d], tol: f64) -> Vec<Point3d> {
    let mut pending: Vec<Point3d> = Vec::new();
    for p in originals {
        let known = core.iter().chain(pending.iter()).any(|q| points_equal(p, q, tol));
        if !known {
            pending.push(*p);
        }
    }

    let n = core.len();
    let mut result = Vec::with_capacity(n + pending.len());
    for i in 0..n {
        let (a, b) = (&core[i], &core[(i + 1) % n]);
        result.push(*a);
        let mut on_edge: Vec<(f64, Point3d)> = Vec::new();
        pending.retain(|p| {
            if point_strictly_on_segment(p, a, b, tol) {
                on_edge.push((line_parameter(p, a, b), *p));
                false
            } else {
                true
            }
        });
        on_edge.sort_by(|x, y| x.0.total_cmp(&y.0));
        result.extend(on_edge.into_iter().map(|(_, p)| p));
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area_2d;

    const TOL: f64 = 0.01;

    fn p(x: f64, y: f64) -> Point3d {
        Point3d::new(x, y, 0.0)
    }

    fn back_and_forth() -> Vec<Point3d> {
        let mut pts = vec![p(158.0, 168.0), p(200.0, 168.0), p(200.0, 30.0), p(158.0, 30.0)];
        for y in [
            40.0, 70.0, 40.0, 70.0, 98.0, 70.0, 40.0, 70.0, 98.0, 70.0, 98.0, 128.0, 98.0, 70.0,
            40.0, 70.0, 98.0, 70.0, 98.0, 128.0, 98.0, 70.0, 98.0, 128.0, 98.0, 128.0, 138.0,
            128.0, 98.0, 70.0, 40.0, 70.0, 98.0, 70.0, 98.0, 128.0, 98.0, 70.0, 98.0, 128.0, 98.0,
            128.0, 138.0, 128.0, 98.0, 70.0, 98.0, 128.0, 98.0, 128.0, 138.0, 128.0, 98.0, 128.0,
            138.0, 128.0, 138.0,
        ] {
            pts.push(p(158.0, y));
        }
        pts
    }

    #[test]
    fn back_and_forth_keeps_distinct_edge_points() {
        let input = back_and_forth();
        let result = simplify(&input, false, TOL);
        let expected: Vec<Point3d> = [
            (158.0, 30.0),
            (158.0, 40.0),
            (158.0, 70.0),
            (158.0, 98.0),
            (158.0, 128.0),
            (158.0, 138.0),
            (158.0, 168.0),
            (200.0, 168.0),
            (200.0, 30.0),
        ]
        .iter()
        .map(|&(x, y)| p(x, y))
        .collect();
        assert_eq!(result, expected);
        assert!((signed_area_2d(&input) - signed_area_2d(&result)).abs() < TOL * TOL);
    }

    #[test]
    fn back_and_forth_collapses_to_rectangle() {
        let result = simplify(&back_and_forth(), true, TOL);
        assert_eq!(
            result,
            vec![p(158.0, 30.0), p(158.0, 168.0), p(200.0, 168.0), p(200.0, 30.0)]
        );
    }

    #[test]
    fn out_of_order_edge_points_are_sorted() {
        let input = vec![
            p(158.0, 120.0),
            p(158.0, 49.0),
            p(158.0, 108.0),
            p(158.0, 21.0),
            p(113.0, 21.0),
            p(113.0, 120.0),
        ];
        let result = simplify(&input, false, TOL);
        assert_eq!(
            result,
            vec![
                p(113.0, 21.0),
                p(113.0, 120.0),
                p(158.0, 120.0),
                p(158.0, 108.0),
                p(158.0, 49.0),
                p(158.0, 21.0),
            ]
        );
        assert_eq!(simplify(&input, true, TOL).len(), 4);
    }

    #[test]
    fn simplify_is_idempotent() {
        for remove in [true, false] {
            let once = simplify(&back_and_forth(), remove, TOL);
            let twice = simplify(&once, remove, TOL);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn up_loop_keeps_winding() {
        let input = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0)];
        let result = simplify(&input, true, TOL);
        assert_eq!(result, vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0)]);
    }

    #[test]
    fn degenerate_loop_is_emptied() {
        let input = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        assert!(simplify(&input, true, TOL).is_empty());
        assert!(simplify(&input, false, TOL).is_empty());
    }

    #[test]
    fn canonical_reorder() {
        let input = vec![p(1.0, 1.0), p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)];
        assert_eq!(reorder_canonical(&input, TOL)[0], p(0.0, 0.0));
    }
}
