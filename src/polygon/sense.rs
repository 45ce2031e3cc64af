use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point3d;

/// Winding orientation of a loop seen from +z.
///
/// `Down` (clockwise) loops are solid for every Boolean and offset
/// operation; `Up` loops are rejected. `Other` covers loops that are not
/// horizontal or that enclose no area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Up,
    Down,
    Other,
}

impl Sense {
    /// Classifies a loop. Requires all points within `tol` of a common z
    /// and an enclosed area above `tol²`.
    #[must_use]
    pub fn classify(points: &[Point3d], tol: f64) -> Self {
        if points.len() < 3 || common_z(points, tol).is_none() {
            return Self::Other;
        }
        let area = signed_area_2d(points);
        if area > tol * tol {
            Self::Up
        } else if area < -tol * tol {
            Self::Down
        } else {
            Self::Other
        }
    }
}

/// Returns the z of the first point if every point lies within `tol` of it.
#[must_use]
pub fn common_z(points: &[Point3d], tol: f64) -> Option<f64> {
    let z = points.first()?.z;
    points.iter().all(|p| (p.z - z).abs() <= tol).then_some(z)
}

/// A horizontal loop with its sense computed once at construction.
#[derive(Debug, Clone)]
pub struct PlanarLoop {
    points: Vec<Point3d>,
    sense: Sense,
    z: f64,
}

impl PlanarLoop {
    /// Wraps `points`, classifying the sense with `tol`.
    #[must_use]
    pub fn new(points: Vec<Point3d>, tol: f64) -> Self {
        let sense = Sense::classify(&points, tol);
        let z = points.first().map_or(0.0, |p| p.z);
        Self { points, sense, z }
    }

    #[must_use]
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point3d> {
        self.points
    }

    #[must_use]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    #[must_use]
    pub fn is_down(&self) -> bool {
        self.sense == Sense::Down
    }

    /// Plane height of the loop.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Returns `true` if both loops lie at the same height within `tol`.
    #[must_use]
    pub fn shares_plane(&self, other: &Self, tol: f64) -> bool {
        (self.z - other.z).abs() <= tol
    }

    /// Absolute enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.points).abs()
    }
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
    fn clockwise_is_down() {
        let pts = vec![p(1.0, 1.0), p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)];
        assert_eq!(Sense::classify(&pts, TOL), Sense::Down);
    }

    #[test]
    fn counter_clockwise_is_up() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert_eq!(Sense::classify(&pts, TOL), Sense::Up);
    }

    #[test]
    fn vertical_loop_is_other() {
        let pts = vec![
            Point3d::new(0.0, 0.0, 1.0),
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 1.0),
        ];
        assert_eq!(Sense::classify(&pts, TOL), Sense::Other);
    }

    #[test]
    fn collinear_loop_is_other() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        assert_eq!(Sense::classify(&pts, TOL), Sense::Other);
    }

    #[test]
    fn planar_loop_records_height() {
        let pts = vec![
            Point3d::new(1.0, 1.0, 3.0),
            Point3d::new(1.0, 0.0, 3.0),
            Point3d::new(0.0, 0.0, 3.0),
        ];
        let lp = PlanarLoop::new(pts, TOL);
        assert!(lp.is_down());
        assert!((lp.z() - 3.0).abs() < 1e-12);
        assert!((lp.area() - 0.5).abs() < 1e-12);
    }
}
