use tracing::debug;

use crate::math::polygon_2d::{left_normal, rotate_to_canonical_start, segment_direction, turn_2d};
use crate::math::{Point3d, Vector3d, EPSILON};
use crate::operations::boolean::backend::ClipBackend;
use crate::operations::repair::remove_collinear_vertices;
use crate::polygon::{PlanarLoop, Polygon};

/// Parameters for [`buffer_with`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BufferOptions {
    /// Maximum miter length as a multiple of `|distance|`. Corners whose
    /// miter would reach further are bevelled. `None` keeps every corner sharp.
    pub miter_limit: Option<f64>,
}

/// Grows (`distance > 0`) or shrinks (`distance < 0`) a single down loop
/// with mitered corners.
///
/// Returns `None` if the loop is not a valid down operand, or if shrinking
/// removes it or splits it into several loops.
#[must_use]
pub fn buffer(points: &[Point3d], distance: f64, tol: f64) -> Option<Vec<Point3d>> {
    let mut loops = buffer_all(&[points.to_vec()], distance, tol)?;
    match loops.len() {
        1 => loops.pop(),
        n => {
            debug!(loops = n, "buffered loop did not stay a single loop");
            None
        }
    }
}

/// [`buffer_with`] using default [`BufferOptions`].
#[must_use]
pub fn buffer_all(loops: &[Vec<Point3d>], distance: f64, tol: f64) -> Option<Vec<Vec<Point3d>>> {
    buffer_with(loops, distance, tol, &BufferOptions::default())
}

/// Grows or shrinks down loops by `distance`.
///
/// Grown loops that touch or overlap are merged into one loop; holes
/// enclosed by the merged result are dropped. Shrinking may remove a loop
/// entirely or split it at a pinch. Returns `None` if any loop is not a
/// valid down operand or the loops lie at different heights.
#[must_use]
pub fn buffer_with(
    loops: &[Vec<Point3d>],
    distance: f64,
    tol: f64,
    options: &BufferOptions,
) -> Option<Vec<Vec<Point3d>>> {
    let mut backend = ClipBackend::new(tol);
    let mut operands: Vec<PlanarLoop> = Vec::with_capacity(loops.len());
    for points in loops {
        let planar = backend.operand(points)?;
        if operands.first().is_some_and(|first| !first.shares_plane(&planar, tol)) {
            debug!("buffer operands lie in different planes");
            return None;
        }
        operands.push(planar);
    }
    let Some(z) = operands.first().map(PlanarLoop::z) else {
        return Some(Vec::new());
    };

    let shapes = if distance > EPSILON {
        let mut pieces = Vec::new();
        for operand in &operands {
            pieces.push(operand.points().to_vec());
            pieces.extend(band_pieces(operand.points(), distance, options));
        }
        backend.union(&pieces, z)
    } else if distance < -EPSILON {
        let mut survivors = Vec::new();
        for operand in &operands {
            let band = band_pieces(operand.points(), distance, options);
            for shape in backend.difference(operand.points(), &band, z) {
                survivors.push(shape.outer().to_vec());
            }
        }
        backend.union(&survivors, z)
    } else {
        let all: Vec<Vec<Point3d>> = operands.iter().map(|o| o.points().to_vec()).collect();
        backend.union(&all, z)
    };

    Some(
        shapes
            .into_iter()
            .map(|shape| {
                if !shape.holes().is_empty() {
                    debug!(holes = shape.holes().len(), "dropping holes from buffered loop");
                }
                let (outer, _) = Polygon::into_parts(shape);
                rotate_to_canonical_start(&remove_collinear_vertices(&outer, tol), tol)
            })
            .collect(),
    )
}

/// Edge strips and corner pieces covering the band of width `|distance|`
/// on the side of a down loop selected by the sign of `distance`.
///
/// Strips meet without gaps at corners turning away from the band; corners
/// turning towards it get a miter (or bevel) piece.
fn band_pieces(points: &[Point3d], distance: f64, options: &BufferOptions) -> Vec<Vec<Point3d>> {
    let n = points.len();
    // Left of a clockwise loop is outside.
    let normals: Vec<Option<Vector3d>> = (0..n)
        .map(|i| segment_direction(&points[i], &points[(i + 1) % n]).map(left_normal))
        .collect();

    let mut pieces = Vec::with_capacity(2 * n);
    for i in 0..n {
        let Some(normal) = normals[i] else { continue };
        let (a, b) = (points[i], points[(i + 1) % n]);
        let shift = normal * distance;
        pieces.push(vec![a, b, b + shift, a + shift]);
    }

    for i in 0..n {
        let (Some(n1), Some(n2)) = (normals[(i + n - 1) % n], normals[i]) else {
            continue;
        };
        let v = points[i];
        let turn = turn_2d(&points[(i + n - 1) % n], &v, &points[(i + 1) % n]);
        // Growing needs pieces at right turns, shrinking at left turns.
        if turn * distance >= 0.0 {
            continue;
        }
        let (p1, p2) = (v + n1 * distance, v + n2 * distance);
        match miter_point(&v, n1, n2, distance, options) {
            Some(m) => pieces.push(vec![v, p1, m, p2]),
            None => pieces.push(vec![v, p1, p2]),
        }
    }
    pieces
}

/// Sharp corner where the offset lines of two edges meet, or `None` when
/// the corner must be bevelled.
fn miter_point(
    v: &Point3d,
    n1: Vector3d,
    n2: Vector3d,
    distance: f64,
    options: &BufferOptions,
) -> Option<Point3d> {
    let denom = 1.0 + n1.dot(&n2);
    if denom < EPSILON {
        return None;
    }
    let ratio = (n1 + n2).norm() / denom;
    if options.miter_limit.is_some_and(|limit| ratio > limit) {
        return None;
    }
    Some(v + (n1 + n2) * (distance / denom))
}
