use crate::math::polygon_2d::{loop_area, loop_perimeter, newell_normal, winding_number};
use crate::math::{Point3d, Vector3d, EPSILON};

use super::containment::{boundary_distance, point_in_polygon};
use super::overlap::edge_overlaps;

/// A planar polygon: one outer loop and zero or more hole loops.
///
/// Holes are expected to lie inside the outer loop without overlapping each
/// other. Areas and perimeter are measured in the polygon's own plane, so
/// tilted polygons report their true surface area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    outer: Vec<Point3d>,
    holes: Vec<Vec<Point3d>>,
}

impl Polygon {
    /// Creates an empty polygon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a polygon from an outer loop and its holes.
    #[must_use]
    pub fn with_holes(outer: Vec<Point3d>, holes: Vec<Vec<Point3d>>) -> Self {
        Self { outer, holes }
    }

    /// Appends a vertex to the outer loop.
    pub fn add_point(&mut self, point: Point3d) {
        self.outer.push(point);
    }

    /// Appends a hole loop.
    pub fn add_hole(&mut self, hole: Vec<Point3d>) {
        self.holes.push(hole);
    }

    #[must_use]
    pub fn outer(&self) -> &[Point3d] {
        &self.outer
    }

    #[must_use]
    pub fn holes(&self) -> &[Vec<Point3d>] {
        &self.holes
    }

    /// Splits the polygon into its outer loop and holes.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Point3d>, Vec<Vec<Point3d>>) {
        (self.outer, self.holes)
    }

    /// Length of the outer loop. Holes do not contribute.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        loop_perimeter(&self.outer)
    }

    /// Area enclosed by the outer loop.
    #[must_use]
    pub fn gross_area(&self) -> f64 {
        loop_area(&self.outer)
    }

    /// Gross area minus the area of every hole.
    #[must_use]
    pub fn net_area(&self) -> f64 {
        self.gross_area() - self.holes.iter().map(|h| loop_area(h)).sum::<f64>()
    }

    /// Unit normal of the outer loop following its winding (right-hand rule).
    ///
    /// `None` when the outer loop encloses no area.
    #[must_use]
    pub fn outward_normal(&self) -> Option<Vector3d> {
        let n = newell_normal(&self.outer);
        let len = n.norm();
        (len > EPSILON).then(|| n / len)
    }

    /// Returns `true` if every vertex lies within `tol` of the outer loop's plane.
    #[must_use]
    pub fn is_planar(&self, tol: f64) -> bool {
        let (Some(normal), Some(origin)) = (self.outward_normal(), self.outer.first()) else {
            return false;
        };
        self.outer
            .iter()
            .chain(self.holes.iter().flatten())
            .all(|p| (p - origin).dot(&normal).abs() <= tol)
    }

    /// Returns `true` if `pt` lies in the solid region of a down polygon.
    ///
    /// Points on a hole boundary count as inside; points strictly inside a
    /// hole do not.
    #[must_use]
    pub fn contains(&self, pt: &Point3d, tol: f64) -> bool {
        if !point_in_polygon(pt, &self.outer, tol) {
            return false;
        }
        !self
            .holes
            .iter()
            .any(|h| winding_number(pt, h) != 0 && boundary_distance(pt, h) > tol)
    }

    /// Sub-segments of `line` that coincide with outer boundary edges.
    ///
    /// See [`edge_overlaps`] for the exact rules.
    #[must_use]
    pub fn overlap(&self, line: &[Point3d; 2], tol: f64) -> Vec<[Point3d; 2]> {
        edge_overlaps(&self.outer, line, tol)
    }
}

impl From<Vec<Point3d>> for Polygon {
    fn from(outer: Vec<Point3d>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }
}
