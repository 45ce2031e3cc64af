use tracing::debug;

use crate::math::Point3d;
use crate::operations::repair::self_intersects;
use crate::polygon::containment::boundary_distance;
use crate::polygon::{PlanarLoop, Polygon};

use super::backend::ClipBackend;
use super::intersect::simple_pieces;

/// Subtracts `holes` from a down `base` loop, returning simple hole-free
/// down loops.
///
/// The base may be split into several pieces. Holes with two or fewer
/// points are ignored. Every other hole must be a simple down loop in the
/// base plane: an up, vertical, self-intersecting or displaced hole yields
/// an empty result, as do an invalid base and a hole covering the whole
/// base. Holes left inside the base are removed by splitting the remainder
/// into simple pieces.
#[must_use]
pub fn subtract(base: &[Point3d], holes: &[Vec<Point3d>], tol: f64) -> Vec<Vec<Point3d>> {
    let mut backend = ClipBackend::new(tol);
    let Some((base, pieces)) = subtract_with(&mut backend, base, holes) else {
        return Vec::new();
    };
    match pieces {
        Some(pieces) => simple_pieces(&pieces, tol),
        None => simple_pieces(&[Polygon::from(base.into_points())], tol),
    }
}

/// Like [`subtract`], but keeps holes that stay strictly inside a piece as
/// inner loops instead of splitting the piece. Pieces with a hole touching
/// their outer loop are still split.
#[must_use]
pub fn subtract_polygons(base: &[Point3d], holes: &[Vec<Point3d>], tol: f64) -> Vec<Polygon> {
    let mut backend = ClipBackend::new(tol);
    let Some((base, pieces)) = subtract_with(&mut backend, base, holes) else {
        return Vec::new();
    };
    let Some(pieces) = pieces else {
        return vec![Polygon::from(base.into_points())];
    };
    let mut result = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if hole_touches_outer(&piece, tol) {
            result.extend(simple_pieces(&[piece], tol).into_iter().map(Polygon::from));
        } else {
            result.push(piece);
        }
    }
    result
}

fn hole_touches_outer(polygon: &Polygon, tol: f64) -> bool {
    polygon
        .holes()
        .iter()
        .flatten()
        .any(|v| boundary_distance(v, polygon.outer()) <= tol)
}

/// Validates the operands and runs the difference. `None` for an invalid
/// operand; `Some((base, None))` when every hole is too short to count.
fn subtract_with(
    backend: &mut ClipBackend,
    base: &[Point3d],
    holes: &[Vec<Point3d>],
) -> Option<(PlanarLoop, Option<Vec<Polygon>>)> {
    let tol = backend.tol();
    let base = backend.operand(base)?;

    let mut clips = Vec::with_capacity(holes.len());
    for hole in holes {
        if hole.len() <= 2 {
            continue;
        }
        let snapped = backend.snap(hole);
        let planar = PlanarLoop::new(snapped, tol);
        if !planar.is_down() {
            debug!(sense = ?planar.sense(), "rejecting hole that is not a down loop");
            return None;
        }
        if !planar.shares_plane(&base, tol) {
            debug!(za = base.z(), zh = planar.z(), "rejecting hole outside the base plane");
            return None;
        }
        if self_intersects(planar.points(), tol) {
            debug!("rejecting self-intersecting hole");
            return None;
        }
        clips.push(planar.into_points());
    }

    if clips.is_empty() {
        return Some((base, None));
    }
    let pieces = backend.difference(base.points(), &clips, base.z());
    Some((base, Some(pieces)))
}
