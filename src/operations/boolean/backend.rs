//! Narrow interface over the planar clipping library.
//!
//! Everything `i_overlay`-specific lives here: operations hand in down
//! loops and get back [`Polygon`]s whose outer loops are down and whose
//! holes are up, with every vertex snapped through the shared pool.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use tracing::{debug, trace};

use crate::math::polygon_2d::{loop_area, reversed, signed_area_2d};
use crate::math::tolerance::{points_equal, VertexPool};
use crate::math::Point3d;
use crate::operations::repair::{remove_collinear_vertices, self_intersects};
use crate::polygon::{point_in_polygon, PlanarLoop, Polygon};

type Contour = Vec<[f64; 2]>;

/// Clipping state for one kernel call: tolerance plus the vertex pool
/// shared by every operand and result.
#[derive(Debug)]
pub(crate) struct ClipBackend {
    pool: VertexPool,
    tol: f64,
}

impl ClipBackend {
    pub(crate) fn new(tol: f64) -> Self {
        Self {
            pool: VertexPool::new(tol),
            tol,
        }
    }

    pub(crate) fn tol(&self) -> f64 {
        self.tol
    }

    /// Snaps a loop into the pool and checks that it is a usable solid
    /// operand: horizontal, down and not self-intersecting.
    pub(crate) fn operand(&mut self, points: &[Point3d]) -> Option<PlanarLoop> {
        let snapped = self.pool.snap_loop(points);
        let planar = PlanarLoop::new(snapped, self.tol);
        if !planar.is_down() {
            debug!(sense = ?planar.sense(), "rejecting operand that is not a down loop");
            return None;
        }
        if self_intersects(planar.points(), self.tol) {
            debug!("rejecting self-intersecting operand");
            return None;
        }
        Some(planar)
    }

    /// Snaps a loop into the pool without validating it.
    pub(crate) fn snap(&mut self, points: &[Point3d]) -> Vec<Point3d> {
        self.pool.snap_loop(points)
    }

    /// Union of solid loops.
    pub(crate) fn union(&mut self, loops: &[Vec<Point3d>], z: f64) -> Vec<Polygon> {
        let Some((first, rest)) = loops.split_first() else {
            return Vec::new();
        };
        let subject = vec![to_contour(first)];
        let clip: Vec<Contour> = rest.iter().map(|l| to_contour(l)).collect();
        let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
        self.collect(shapes, z)
    }

    /// Intersection of two solid loops.
    pub(crate) fn intersection(&mut self, a: &[Point3d], b: &[Point3d], z: f64) -> Vec<Polygon> {
        let subject = vec![to_contour(a)];
        let clip = vec![to_contour(b)];
        let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::NonZero);
        self.collect(shapes, z)
    }

    /// `subject` minus the union of `clips`.
    pub(crate) fn difference(
        &mut self,
        subject: &[Point3d],
        clips: &[Vec<Point3d>],
        z: f64,
    ) -> Vec<Polygon> {
        let subject = vec![to_contour(subject)];
        let clip: Vec<Contour> = clips.iter().map(|l| to_contour(l)).collect();
        let shapes = subject.overlay(&clip, OverlayRule::Difference, FillRule::NonZero);
        self.collect(shapes, z)
    }

    /// Converts clipper output into pooled polygons, dropping contours that
    /// collapse or enclose less than `tol²`.
    ///
    /// A contour that passes through one vertex twice is split there. Pieces
    /// wound like the shape's largest loop become outer loops; the others
    /// become holes of the outer loop enclosing them.
    fn collect(&mut self, shapes: Vec<Vec<Contour>>, z: f64) -> Vec<Polygon> {
        let min_area = self.tol * self.tol;
        let mut result = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let mut contours = shape.iter();
            let Some(first) = contours.next() else {
                continue;
            };
            let mut rings: Vec<Vec<Point3d>> = self
                .clean(first, z)
                .into_iter()
                .filter(|r| signed_area_2d(r).abs() >= min_area)
                .collect();
            let Some(reference) = rings
                .iter()
                .map(|r| signed_area_2d(r))
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            else {
                trace!("dropping collapsed shape");
                continue;
            };
            for contour in contours {
                rings.extend(
                    self.clean(contour, z)
                        .into_iter()
                        .filter(|r| signed_area_2d(r).abs() >= min_area),
                );
            }

            let (outers, holes): (Vec<_>, Vec<_>) = rings
                .into_iter()
                .partition(|r| (signed_area_2d(r) > 0.0) == (reference > 0.0));
            result.extend(self.assemble(outers, holes));
        }
        result
    }

    /// Pairs each hole with the smallest outer loop holding all its vertices.
    fn assemble(&self, outers: Vec<Vec<Point3d>>, holes: Vec<Vec<Point3d>>) -> Vec<Polygon> {
        let outers: Vec<Vec<Point3d>> = outers.iter().map(|o| with_winding(o, true)).collect();
        let mut inner: Vec<Vec<Vec<Point3d>>> = vec![Vec::new(); outers.len()];
        for hole in holes {
            let owner = (0..outers.len())
                .filter(|&i| hole.iter().all(|v| point_in_polygon(v, &outers[i], self.tol)))
                .min_by(|&i, &j| loop_area(&outers[i]).total_cmp(&loop_area(&outers[j])));
            match owner {
                Some(i) => inner[i].push(with_winding(&hole, false)),
                None => debug!(points = hole.len(), "dropping hole outside every outer loop"),
            }
        }
        outers
            .into_iter()
            .zip(inner)
            .map(|(outer, holes)| {
                // Split points left on a now hole-free outer loop are collinear.
                if holes.is_empty() {
                    Polygon::from(remove_collinear_vertices(&outer, self.tol))
                } else {
                    Polygon::with_holes(outer, holes)
                }
            })
            .collect()
    }

    /// Snaps a contour into the pool and splits it into loops that visit
    /// each vertex once.
    fn clean(&mut self, contour: &[[f64; 2]], z: f64) -> Vec<Vec<Point3d>> {
        let points: Vec<Point3d> = contour.iter().map(|&[x, y]| Point3d::new(x, y, z)).collect();
        let snapped = self.pool.snap_loop(&points);
        let cleaned = remove_collinear_vertices(&snapped, self.tol);
        split_at_repeated_vertices(&cleaned, self.tol)
            .into_iter()
            .filter(|ring| ring.len() >= 3)
            .collect()
    }
}

/// Splits a closed loop at every vertex it passes through more than once.
fn split_at_repeated_vertices(points: &[Point3d], tol: f64) -> Vec<Vec<Point3d>> {
    let mut pending = vec![points.to_vec()];
    let mut rings = Vec::new();
    while let Some(ring) = pending.pop() {
        let repeat = (0..ring.len()).find_map(|i| {
            (i + 1..ring.len())
                .find(|&j| points_equal(&ring[i], &ring[j], tol))
                .map(|j| (i, j))
        });
        match repeat {
            Some((i, j)) => {
                let mut rest = ring[..i].to_vec();
                rest.extend_from_slice(&ring[j..]);
                pending.push(ring[i..j].to_vec());
                pending.push(rest);
            }
            None => rings.push(ring),
        }
    }
    rings
}

/// Counter-clockwise contour for the clipper; every input loop is solid.
fn to_contour(points: &[Point3d]) -> Contour {
    let contour: Contour = points.iter().map(|p| [p.x, p.y]).collect();
    if signed_area_2d(points) < 0.0 {
        contour.into_iter().rev().collect()
    } else {
        contour
    }
}

/// Returns the loop wound clockwise when `clockwise`, counter-clockwise otherwise.
fn with_winding(points: &[Point3d], clockwise: bool) -> Vec<Point3d> {
    let is_ccw = signed_area_2d(points) > 0.0;
    if is_ccw == clockwise {
        reversed(points)
    } else {
        points.to_vec()
    }
}
