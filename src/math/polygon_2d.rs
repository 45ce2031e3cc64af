use super::{Point3d, Vector3d, EPSILON};

/// Computes the signed area of a loop projected onto the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3d]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Newell normal of a loop. Its length is twice the enclosed area.
///
/// Works for loops in any plane and either winding.
#[must_use]
pub fn newell_normal(points: &[Point3d]) -> Vector3d {
    let n = points.len();
    let mut normal = Vector3d::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Unsigned area of a planar loop in 3D.
#[must_use]
pub fn loop_area(points: &[Point3d]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    newell_normal(points).norm() * 0.5
}

/// Length of the closed boundary, including the closing edge.
#[must_use]
pub fn loop_perimeter(points: &[Point3d]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Rotates a closed loop so it starts at the leftmost vertex (smallest x),
/// breaking ties within `tol` by smallest y. Ensures deterministic output.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point3d], tol: f64) -> Vec<Point3d> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - tol || (pt.x - b.x).abs() <= tol && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Normalized XY direction from `a` to `b`, or `None` for a zero-length segment.
#[must_use]
pub fn segment_direction(a: &Point3d, b: &Point3d) -> Option<Vector3d> {
    let d = b - a;
    let len = d.x.hypot(d.y);
    if len < EPSILON {
        return None;
    }
    Some(Vector3d::new(d.x / len, d.y / len, 0.0))
}

/// Returns the left-pointing normal of a direction vector in the XY plane.
#[must_use]
pub fn left_normal(dir: Vector3d) -> Vector3d {
    Vector3d::new(-dir.y, dir.x, 0.0)
}

/// Z component of `(b - a) x (c - b)`: positive for a left turn at `b`.
#[must_use]
pub fn turn_2d(a: &Point3d, b: &Point3d, c: &Point3d) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

/// Winding number of a loop around `pt` in the XY plane.
///
/// Non-zero means `pt` is strictly enclosed; points on the boundary may
/// report either value and must be classified separately.
#[must_use]
pub fn winding_number(pt: &Point3d, points: &[Point3d]) -> i32 {
    let n = points.len();
    let mut wn = 0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let side = (b.x - a.x) * (pt.y - a.y) - (pt.x - a.x) * (b.y - a.y);
        if a.y <= pt.y {
            if b.y > pt.y && side > 0.0 {
                wn += 1;
            }
        } else if b.y <= pt.y && side < 0.0 {
            wn -= 1;
        }
    }
    wn
}

/// Returns the loop with its winding reversed.
#[must_use]
pub fn reversed(points: &[Point3d]) -> Vec<Point3d> {
    points.iter().rev().copied().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn p(x: f64, y: f64) -> Point3d {
        Point3d::new(x, y, 0.0)
    }

    fn unit_square_ccw() -> Vec<Point3d> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    // ── area tests ──

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area_2d(&unit_square_ccw()) - 1.0).abs() < TOL);
    }

    #[test]
    fn signed_area_cw_square() {
        assert!((signed_area_2d(&reversed(&unit_square_ccw())) + 1.0).abs() < TOL);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[p(0.0, 0.0)]).abs() < TOL);
        assert!(signed_area_2d(&[]).abs() < TOL);
    }

    #[test]
    fn newell_normal_points_up_for_ccw() {
        let n = newell_normal(&unit_square_ccw());
        assert!((n.z - 2.0).abs() < TOL);
        assert!(n.x.abs() < TOL && n.y.abs() < TOL);
    }

    #[test]
    fn loop_area_vertical_rectangle() {
        let pts = vec![
            Point3d::new(0.0, 0.0, 1.0),
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 1.0),
        ];
        assert!((loop_area(&pts) - 2.0).abs() < TOL);
        assert!(signed_area_2d(&pts).abs() < TOL);
    }

    #[test]
    fn perimeter_includes_closing_edge() {
        assert!((loop_perimeter(&unit_square_ccw()) - 4.0).abs() < TOL);
    }

    // ── ordering tests ──

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];
        let rotated = rotate_to_canonical_start(&pts, TOL);
        assert_eq!(rotated[0], p(0.0, 0.0));
        assert_eq!(rotated[1], p(1.0, 0.0));
    }

    #[test]
    fn canonical_start_already_leftmost() {
        let rotated = rotate_to_canonical_start(&unit_square_ccw(), TOL);
        assert_eq!(rotated, unit_square_ccw());
    }

    #[test]
    fn segment_direction_basic() {
        let dir = segment_direction(&p(0.0, 0.0), &p(3.0, 4.0)).unwrap();
        assert!((dir.x - 0.6).abs() < TOL);
        assert!((dir.y - 0.8).abs() < TOL);
        assert!(segment_direction(&p(1.0, 1.0), &p(1.0, 1.0)).is_none());
    }

    #[test]
    fn left_normal_basic() {
        let n = left_normal(Vector3d::new(1.0, 0.0, 0.0));
        assert!(n.x.abs() < TOL);
        assert!((n.y - 1.0).abs() < TOL);
    }

    // ── winding tests ──

    #[test]
    fn winding_sign_follows_orientation() {
        let ccw = unit_square_ccw();
        assert_eq!(winding_number(&p(0.5, 0.5), &ccw), 1);
        assert_eq!(winding_number(&p(0.5, 0.5), &reversed(&ccw)), -1);
        assert_eq!(winding_number(&p(1.5, 0.5), &ccw), 0);
    }

    #[test]
    fn turn_sign() {
        assert!(turn_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)) > 0.0);
        assert!(turn_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, -1.0)) < 0.0);
    }
}
