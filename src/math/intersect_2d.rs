use super::tolerance::{line_parameter, point_line_distance, point_segment_distance};
use super::{Point3d, Vector3d, EPSILON};

/// Bounded segment-segment intersection in the XY plane.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel segments yield `None`; use [`collinear_overlap`] for those.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point3d,
    a1: &Point3d,
    b0: &Point3d,
    b1: &Point3d,
) -> Option<(Point3d, f64, f64)> {
    let da = Vector3d::new(a1.x - a0.x, a1.y - a0.y, 0.0);
    let db = Vector3d::new(b1.x - b0.x, b1.y - b0.y, 0.0);

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < EPSILON {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u) {
        let t_clamped = t.clamp(0.0, 1.0);
        let pt = Point3d::new(a0.x + da.x * t_clamped, a0.y + da.y * t_clamped, a0.z);
        Some((pt, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` if the segments cross or come within `tol` of each other.
#[must_use]
pub fn segments_touch(a0: &Point3d, a1: &Point3d, b0: &Point3d, b1: &Point3d, tol: f64) -> bool {
    if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
        return true;
    }
    point_segment_distance(a0, b0, b1) <= tol
        || point_segment_distance(a1, b0, b1) <= tol
        || point_segment_distance(b0, a0, a1) <= tol
        || point_segment_distance(b1, a0, a1) <= tol
}

/// Parameter interval on `a0`-`a1` shared with a collinear segment `b0`-`b1`.
///
/// Both ends of `b` must lie within `tol` of the line through `a`. Returns
/// `(lo, hi)` with `0 <= lo < hi <= 1` when the shared part is longer than `tol`.
#[must_use]
pub fn collinear_overlap(
    a0: &Point3d,
    a1: &Point3d,
    b0: &Point3d,
    b1: &Point3d,
    tol: f64,
) -> Option<(f64, f64)> {
    let len = (a1 - a0).norm();
    if len <= tol {
        return None;
    }
    if point_line_distance(b0, a0, a1) > tol || point_line_distance(b1, a0, a1) > tol {
        return None;
    }
    let t0 = line_parameter(b0, a0, a1);
    let t1 = line_parameter(b1, a0, a1);
    let lo = t0.min(t1).max(0.0);
    let hi = t0.max(t1).min(1.0);
    ((hi - lo) * len > tol).then_some((lo, hi))
}

/// Total length of boundary shared by two loops within `tol`.
#[must_use]
pub fn shared_boundary_length(a: &[Point3d], b: &[Point3d], tol: f64) -> f64 {
    let (na, nb) = (a.len(), b.len());
    let mut total = 0.0;
    for i in 0..na {
        let (a0, a1) = (&a[i], &a[(i + 1) % na]);
        let len = (a1 - a0).norm();
        for j in 0..nb {
            if let Some((lo, hi)) = collinear_overlap(a0, a1, &b[j], &b[(j + 1) % nb], tol) {
                total += (hi - lo) * len;
            }
        }
    }
    total
}
