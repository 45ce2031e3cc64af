use tracing::debug;

use crate::math::intersect_2d::shared_boundary_length;
use crate::math::polygon_2d::{rotate_to_canonical_start, signed_area_2d};
use crate::math::Point3d;
use crate::operations::repair::{remove_collinear_vertices, self_intersects};
use crate::polygon::PlanarLoop;

use super::backend::ClipBackend;

/// Merges two down loops into a single simple loop.
///
/// The loops must be down, lie at the same height and share either a
/// boundary stretch longer than `tol` or an overlap area above `tol²`;
/// touching at a single corner is not enough. Returns `None` when those
/// conditions fail or when the union is not one loop without holes.
/// The result has no collinear vertices and starts at its leftmost (then
/// lowest) vertex.
#[must_use]
pub fn join(a: &[Point3d], b: &[Point3d], tol: f64) -> Option<Vec<Point3d>> {
    let mut backend = ClipBackend::new(tol);
    let a = backend.operand(a)?;
    let b = backend.operand(b)?;
    join_operands(&mut backend, &a, &b)
}

/// [`join`] on operands already validated through `backend`.
pub(crate) fn join_operands(
    backend: &mut ClipBackend,
    a: &PlanarLoop,
    b: &PlanarLoop,
) -> Option<Vec<Point3d>> {
    let tol = backend.tol();
    if !a.shares_plane(b, tol) {
        debug!(za = a.z(), zb = b.z(), "operands lie in different planes");
        return None;
    }
    if !touch_or_overlap(backend, a, b) {
        return None;
    }

    let union = backend.union(&[a.points().to_vec(), b.points().to_vec()], a.z());
    let [shape] = union.as_slice() else {
        debug!(pieces = union.len(), "union is not a single polygon");
        return None;
    };
    if !shape.holes().is_empty() {
        debug!(holes = shape.holes().len(), "union encloses a hole");
        return None;
    }

    let outer = remove_collinear_vertices(shape.outer(), tol);
    if outer.len() < 3 || signed_area_2d(&outer).abs() < tol * tol {
        return None;
    }
    if self_intersects(&outer, tol) {
        debug!("union is self-intersecting");
        return None;
    }
    Some(rotate_to_canonical_start(&outer, tol))
}

/// Returns `true` if the loops share boundary longer than `tol` or an
/// overlap area above `tol²`.
pub(crate) fn touch_or_overlap(backend: &mut ClipBackend, a: &PlanarLoop, b: &PlanarLoop) -> bool {
    let tol = backend.tol();
    shared_boundary_length(a.points(), b.points(), tol) > tol
        || overlap_area(backend, a, b) > tol * tol
}

/// Area shared by two loops.
pub(crate) fn overlap_area(backend: &mut ClipBackend, a: &PlanarLoop, b: &PlanarLoop) -> f64 {
    backend
        .intersection(a.points(), b.points(), a.z())
        .iter()
        .map(crate::polygon::Polygon::net_area)
        .sum()
}
