use tracing::debug;

use crate::math::polygon_2d::rotate_to_canonical_start;
use crate::math::Point3d;
use crate::operations::offset::buffer_all;
use crate::operations::repair::remove_collinear_vertices;
use crate::polygon::{PlanarLoop, Polygon};

use super::backend::ClipBackend;
use super::join::{join_operands, overlap_area, touch_or_overlap};

/// Repeatedly joins touching or overlapping down loops until no pair can
/// be merged.
///
/// Loops that are not valid operands (not down, self-intersecting) are
/// returned unchanged. When two loops overlap but their union encloses a
/// hole, they are still merged and the hole is dropped; loops that only
/// share edges around a hole stay separate.
#[must_use]
pub fn join_all(loops: &[Vec<Point3d>], tol: f64) -> Vec<Vec<Point3d>> {
    let mut backend = ClipBackend::new(tol);
    let mut merged: Vec<PlanarLoop> = Vec::with_capacity(loops.len());
    let mut passthrough = Vec::new();

    for points in loops {
        let Some(mut current) = backend.operand(points) else {
            passthrough.push(points.clone());
            continue;
        };
        let mut i = 0;
        while i < merged.len() {
            match merge_pair(&mut backend, &current, &merged[i]) {
                Some(joined) => {
                    merged.swap_remove(i);
                    current = PlanarLoop::new(joined, tol);
                    i = 0;
                }
                None => i += 1,
            }
        }
        merged.push(current);
    }

    merged
        .into_iter()
        .map(PlanarLoop::into_points)
        .chain(passthrough)
        .collect()
}

fn merge_pair(backend: &mut ClipBackend, a: &PlanarLoop, b: &PlanarLoop) -> Option<Vec<Point3d>> {
    if let Some(joined) = join_operands(backend, a, b) {
        return Some(joined);
    }
    let tol = backend.tol();
    if !a.shares_plane(b, tol) || overlap_area(backend, a, b) <= tol * tol {
        return None;
    }
    let union = backend.union(&[a.points().to_vec(), b.points().to_vec()], a.z());
    let [shape] = union.as_slice() else {
        return None;
    };
    debug!(holes = shape.holes().len(), "joining overlapping loops without their holes");
    let outer = remove_collinear_vertices(shape.outer(), tol);
    (outer.len() >= 3).then(|| rotate_to_canonical_start(&outer, tol))
}

/// Joins touching or overlapping down loops into polygons, keeping any
/// holes the joined loops enclose.
///
/// Loops are grouped by shared boundary or overlap, and each group is
/// replaced by its union. Invalid loops are skipped.
#[must_use]
pub fn join_all_polygons(loops: &[Vec<Point3d>], tol: f64) -> Vec<Polygon> {
    let mut backend = ClipBackend::new(tol);
    let operands: Vec<PlanarLoop> = loops.iter().filter_map(|l| backend.operand(l)).collect();

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, operand) in operands.iter().enumerate() {
        let touching: Vec<usize> = (0..groups.len())
            .filter(|&g| {
                groups[g].iter().any(|&member| {
                    let other = &operands[member];
                    operand.shares_plane(other, tol)
                        && touch_or_overlap(&mut backend, operand, other)
                })
            })
            .collect();

        let mut group = vec![idx];
        for &g in touching.iter().rev() {
            group.extend(groups.swap_remove(g));
        }
        groups.push(group);
    }

    let mut result = Vec::with_capacity(groups.len());
    for group in groups {
        let members: Vec<Vec<Point3d>> =
            group.iter().map(|&m| operands[m].points().to_vec()).collect();
        let z = operands[group[0]].z();
        for shape in backend.union(&members, z) {
            let (outer, holes) = shape.into_parts();
            let outer = rotate_to_canonical_start(&remove_collinear_vertices(&outer, tol), tol);
            let holes = holes
                .iter()
                .map(|h| rotate_to_canonical_start(&remove_collinear_vertices(h, tol), tol))
                .collect();
            result.push(Polygon::with_holes(outer, holes));
        }
    }
    result
}

/// Grows every loop by `distance`, joins the grown loops and shrinks the
/// result back by `distance`.
///
/// Closes gaps narrower than `2 * distance` between neighbouring loops.
/// Returns `None` if any loop is not a valid down operand.
#[must_use]
pub fn join_all_with_buffer(
    loops: &[Vec<Point3d>],
    distance: f64,
    tol: f64,
) -> Option<Vec<Vec<Point3d>>> {
    let grown = buffer_all(loops, distance.abs(), tol)?;
    let joined = join_all(&grown, tol);
    buffer_all(&joined, -distance.abs(), tol)
}
