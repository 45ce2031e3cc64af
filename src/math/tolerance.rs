//! Tolerance-based point, line and loop predicates.
//!
//! Every geometric comparison in the kernel goes through this module so the
//! tie-break rules stay consistent between operations.

use super::{Point3d, EPSILON};

/// Returns `true` if `a` and `b` are within `tol` of each other.
#[must_use]
pub fn points_equal(a: &Point3d, b: &Point3d, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Parameter of the projection of `p` onto the line through `a` and `b`.
///
/// `0` at `a`, `1` at `b`. Returns `0` for a degenerate line.
#[must_use]
pub fn line_parameter(p: &Point3d, a: &Point3d, b: &Point3d) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < EPSILON * EPSILON {
        return 0.0;
    }
    (p - a).dot(&d) / len_sq
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to the distance to `a` when the line is degenerate.
#[must_use]
pub fn point_line_distance(p: &Point3d, a: &Point3d, b: &Point3d) -> f64 {
    let t = line_parameter(p, a, b);
    let foot = a + (b - a) * t;
    (p - foot).norm()
}

/// Distance from `p` to the closed segment `a`-`b`.
#[must_use]
pub fn point_segment_distance(p: &Point3d, a: &Point3d, b: &Point3d) -> f64 {
    let t = line_parameter(p, a, b).clamp(0.0, 1.0);
    let foot = a + (b - a) * t;
    (p - foot).norm()
}

/// Returns `true` if `b` lies within `tol` of the line through `a` and `c`.
#[must_use]
pub fn is_collinear(a: &Point3d, b: &Point3d, c: &Point3d, tol: f64) -> bool {
    point_line_distance(b, a, c) <= tol
}

/// Returns `true` if `p` lies within `tol` of the segment `a`-`b`.
#[must_use]
pub fn point_on_segment(p: &Point3d, a: &Point3d, b: &Point3d, tol: f64) -> bool {
    point_segment_distance(p, a, b) <= tol
}

/// Returns `true` if `p` lies on the segment `a`-`b` away from both endpoints.
#[must_use]
pub fn point_strictly_on_segment(p: &Point3d, a: &Point3d, b: &Point3d, tol: f64) -> bool {
    point_on_segment(p, a, b, tol) && !points_equal(p, a, tol) && !points_equal(p, b, tol)
}

/// Returns `true` if two loops hold the same vertices in the same cyclic
/// order, starting anywhere.
#[must_use]
pub fn circular_equal(a: &[Point3d], b: &[Point3d], tol: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    let n = a.len();
    (0..n).any(|shift| (0..n).all(|i| points_equal(&a[i], &b[(i + shift) % n], tol)))
}

/// Removes consecutive duplicates within `tol`, including the wrap-around
/// pair between the last and first point.
#[must_use]
pub fn dedupe_loop(points: &[Point3d], tol: f64) -> Vec<Point3d> {
    let mut out: Vec<Point3d> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| !points_equal(last, p, tol)) {
            out.push(*p);
        }
    }
    while out.len() > 1 && points_equal(&out[0], &out[out.len() - 1], tol) {
        out.pop();
    }
    out
}

/// Shared vertex pool that snaps nearby points onto one representative.
///
/// The first point inserted within `tol` of a location wins, so operands fed
/// through the same pool agree exactly on shared vertices.
#[derive(Debug, Clone)]
pub struct VertexPool {
    points: Vec<Point3d>,
    tol: f64,
}

impl VertexPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new(tol: f64) -> Self {
        Self {
            points: Vec::new(),
            tol,
        }
    }

    /// Returns the pooled representative of `p`, inserting it if new.
    pub fn snap(&mut self, p: &Point3d) -> Point3d {
        if let Some(existing) = self.points.iter().find(|q| points_equal(q, p, self.tol)) {
            return *existing;
        }
        self.points.push(*p);
        *p
    }

    /// Snaps every point of a loop and drops the duplicates this creates.
    pub fn snap_loop(&mut self, points: &[Point3d]) -> Vec<Point3d> {
        let snapped: Vec<Point3d> = points.iter().map(|p| self.snap(p)).collect();
        dedupe_loop(&snapped, self.tol)
    }

    /// All points inserted so far.
    #[must_use]
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }
}
