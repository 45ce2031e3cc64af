use tracing::{debug, warn};

use crate::math::polygon_2d::{loop_area, rotate_to_canonical_start};
use crate::math::Point3d;
use crate::operations::repair::remove_spikes;
use crate::polygon::Polygon;

use super::backend::ClipBackend;
use super::decompose::decompose;

/// Result of intersecting two down loops `A` and `B`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionResult {
    polygon1: Vec<Point3d>,
    polygon2: Vec<Point3d>,
    new_polygons1: Vec<Vec<Point3d>>,
    new_polygons2: Vec<Vec<Point3d>>,
}

impl IntersectionResult {
    /// The shared region, expressed for `A`.
    #[must_use]
    pub fn polygon1(&self) -> &[Point3d] {
        &self.polygon1
    }

    /// The shared region, expressed for `B`.
    #[must_use]
    pub fn polygon2(&self) -> &[Point3d] {
        &self.polygon2
    }

    /// Pieces of `A` outside `B`, plus any extra shared pieces.
    #[must_use]
    pub fn new_polygons1(&self) -> &[Vec<Point3d>] {
        &self.new_polygons1
    }

    /// Pieces of `B` outside `A`, plus any extra shared pieces.
    #[must_use]
    pub fn new_polygons2(&self) -> &[Vec<Point3d>] {
        &self.new_polygons2
    }

    /// Total area of [`Self::polygon1`] and [`Self::new_polygons1`]: the
    /// area of `A` as partitioned.
    #[must_use]
    pub fn area1(&self) -> f64 {
        partition_area(&self.polygon1, &self.new_polygons1)
    }

    /// Total area of [`Self::polygon2`] and [`Self::new_polygons2`]: the
    /// area of `B` as partitioned.
    #[must_use]
    pub fn area2(&self) -> f64 {
        partition_area(&self.polygon2, &self.new_polygons2)
    }
}

fn partition_area(shared: &[Point3d], rest: &[Vec<Point3d>]) -> f64 {
    loop_area(shared) + rest.iter().map(|l| loop_area(l)).sum::<f64>()
}

/// Intersects two down loops lying in a common horizontal plane.
///
/// Returns `None` if either loop is not down, is self-intersecting or has
/// fewer than three points, if the loops lie at different heights, or if
/// they share no area larger than `tol²` (touching is not intersecting).
///
/// The largest shared piece becomes `polygon1`/`polygon2`. Any further
/// shared pieces are appended to both `new_polygons1` and `new_polygons2`,
/// followed by the remainders `A − B` and `B − A` respectively. Every
/// returned loop is down, simple, spike-free and hole-free: remainders
/// with holes are split into simple pieces.
#[must_use]
pub fn intersect(a: &[Point3d], b: &[Point3d], tol: f64) -> Option<IntersectionResult> {
    let mut backend = ClipBackend::new(tol);
    let a = backend.operand(a)?;
    let b = backend.operand(b)?;
    if !a.shares_plane(&b, tol) {
        debug!(za = a.z(), zb = b.z(), "operands lie in different planes");
        return None;
    }
    let z = a.z();

    let shared = backend.intersection(a.points(), b.points(), z);
    let mut shared_loops = simple_pieces(&shared, tol);
    if shared_loops.is_empty() {
        return None;
    }
    shared_loops.sort_by(|x, y| loop_area(y).total_cmp(&loop_area(x)));
    let largest = shared_loops.remove(0);

    let rest_a = backend.difference(a.points(), &[b.points().to_vec()], z);
    let rest_b = backend.difference(b.points(), &[a.points().to_vec()], z);

    let mut new_polygons1 = shared_loops.clone();
    new_polygons1.extend(simple_pieces(&rest_a, tol));
    let mut new_polygons2 = shared_loops;
    new_polygons2.extend(simple_pieces(&rest_b, tol));

    Some(IntersectionResult {
        polygon1: largest.clone(),
        polygon2: largest,
        new_polygons1,
        new_polygons2,
    })
}

/// Returns `true` if [`intersect`] would find a shared region.
#[must_use]
pub fn intersects(a: &[Point3d], b: &[Point3d], tol: f64) -> bool {
    let mut backend = ClipBackend::new(tol);
    let (Some(a), Some(b)) = (backend.operand(a), backend.operand(b)) else {
        return false;
    };
    a.shares_plane(&b, tol) && !backend.intersection(a.points(), b.points(), a.z()).is_empty()
}

/// Flattens clipper output into simple, spike-free down loops.
pub(crate) fn simple_pieces(polygons: &[Polygon], tol: f64) -> Vec<Vec<Point3d>> {
    let min_area = tol * tol;
    let mut pieces = Vec::new();
    for polygon in polygons {
        let loops = match decompose(polygon, tol) {
            Ok(loops) => loops,
            Err(err) => {
                warn!(%err, "dropping piece that could not be decomposed");
                continue;
            }
        };
        for piece in loops {
            let cleaned = remove_spikes(&piece, tol);
            if cleaned.len() >= 3 && loop_area(&cleaned) >= min_area {
                pieces.push(rotate_to_canonical_start(&cleaned, tol));
            }
        }
    }
    pieces
}
