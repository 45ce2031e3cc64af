//! Splits polygons with holes into simple hole-free pieces.
//!
//! The region is triangulated with a constrained Delaunay triangulation,
//! interior triangles are picked by their centroids, and neighbouring
//! pieces are merged across triangulation diagonals while the result stays
//! convex (Hertel-Mehlhorn).

use std::collections::{HashMap, HashSet};

use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};
use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{
    reversed, rotate_to_canonical_start, signed_area_2d, turn_2d, winding_number,
};
use crate::math::Point3d;
use crate::operations::repair::remove_collinear_vertices;
use crate::polygon::Polygon;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Returns simple down loops whose union is `polygon`.
///
/// A polygon without holes is returned as its outer loop.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if a vertex cannot be inserted into
/// the triangulation or a loop edge crosses another, and `GeometryError::TooFewPoints` for loops with fewer
/// than three points.
pub fn decompose(polygon: &Polygon, tol: f64) -> Result<Vec<Vec<Point3d>>> {
    if polygon.holes().is_empty() {
        return Ok(vec![polygon.outer().to_vec()]);
    }
    let z = polygon.outer().first().map_or(0.0, |p| p.z);

    let mut cdt = Cdt::new();
    constrain_loop(&mut cdt, polygon.outer())?;
    for hole in polygon.holes() {
        constrain_loop(&mut cdt, hole)?;
    }
    let interior = interior_faces(&cdt, polygon);

    let mut positions: HashMap<usize, Point3d> = HashMap::new();
    let mut pieces: Vec<Option<Vec<usize>>> = Vec::new();
    let mut owner: HashMap<usize, usize> = HashMap::new();
    let mut diagonals: Vec<(usize, usize, usize, usize)> = Vec::new();

    for face in cdt.inner_faces() {
        let face_idx = face.fix().index();
        if !interior.contains(&face_idx) {
            continue;
        }
        let mut tri: Vec<usize> = Vec::with_capacity(3);
        for vh in face.vertices() {
            let pos = vh.position();
            let idx = vh.fix().index();
            positions.insert(idx, Point3d::new(pos.x, pos.y, z));
            tri.push(idx);
        }
        owner.insert(face_idx, pieces.len());
        pieces.push(Some(tri));

        for edge in face.adjacent_edges() {
            if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            if let Some(neighbor) = edge.rev().face().as_inner() {
                let n_idx = neighbor.fix().index();
                if n_idx > face_idx && interior.contains(&n_idx) {
                    let (u, v) = (edge.from().fix().index(), edge.to().fix().index());
                    diagonals.push((face_idx, n_idx, u, v));
                }
            }
        }
    }

    for piece in pieces.iter_mut().flatten() {
        let loop_pts: Vec<Point3d> = piece.iter().map(|i| positions[i]).collect();
        if signed_area_2d(&loop_pts) < 0.0 {
            piece.reverse();
        }
    }

    for (f, g, u, v) in diagonals {
        let (pf, pg) = (owner[&f], owner[&g]);
        if pf == pg {
            continue;
        }
        let (Some(p), Some(q)) = (&pieces[pf], &pieces[pg]) else {
            continue;
        };
        let Some(merged) = merge_across(p, q, u, v) else {
            continue;
        };
        let merged_pts: Vec<Point3d> = merged.iter().map(|i| positions[i]).collect();
        if !is_convex_ccw(&merged_pts, tol) {
            continue;
        }
        trace!(from = pg, into = pf, "merging pieces across diagonal");
        pieces[pf] = Some(merged);
        pieces[pg] = None;
        for o in owner.values_mut() {
            if *o == pg {
                *o = pf;
            }
        }
    }

    Ok(pieces
        .into_iter()
        .flatten()
        .map(|piece| {
            let ccw: Vec<Point3d> = piece.iter().map(|i| positions[i]).collect();
            let cleaned = remove_collinear_vertices(&reversed(&ccw), tol);
            rotate_to_canonical_start(&cleaned, tol)
        })
        .filter(|piece| piece.len() >= 3)
        .collect())
}

/// Joins two counter-clockwise pieces that share the edge `u -> v` in `p`
/// and `v -> u` in `q`.
fn merge_across(p: &[usize], q: &[usize], u: usize, v: usize) -> Option<Vec<usize>> {
    let (np, nq) = (p.len(), q.len());
    let ip = (0..np)
        .find(|&i| p[i] == u && p[(i + 1) % np] == v)
        .or_else(|| (0..np).find(|&i| p[i] == v && p[(i + 1) % np] == u))?;
    let (from, to) = (p[ip], p[(ip + 1) % np]);
    let iq = (0..nq).find(|&j| q[j] == to && q[(j + 1) % nq] == from)?;

    let mut merged = Vec::with_capacity(np + nq - 2);
    merged.extend((1..=np).map(|k| p[(ip + k) % np]));
    merged.extend((2..nq).map(|k| q[(iq + k) % nq]));
    Some(merged)
}

fn is_convex_ccw(points: &[Point3d], tol: f64) -> bool {
    let n = points.len();
    (0..n).all(|i| {
        let a = &points[(i + n - 1) % n];
        let b = &points[i];
        let c = &points[(i + 1) % n];
        turn_2d(a, b, c) >= -tol * tol
    })
}

/// Inserts a loop's vertices and constrains every edge between them.
fn constrain_loop(cdt: &mut Cdt, points: &[Point3d]) -> Result<()> {
    if points.len() < 3 {
        return Err(GeometryError::TooFewPoints {
            count: points.len(),
            min: 3,
        }
        .into());
    }

    let handles = points
        .iter()
        .map(|p| cdt.insert(SpadePoint2::new(p.x, p.y)))
        .collect::<std::result::Result<Vec<_>, InsertionError>>()
        .map_err(|e| GeometryError::Degenerate(format!("vertex rejected by triangulation: {e}")))?;

    for (&from, &to) in handles.iter().zip(handles.iter().cycle().skip(1)) {
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            let reason = "loop edge crosses another loop edge".to_owned();
            return Err(GeometryError::Degenerate(reason).into());
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Indices of the triangles whose centroid lies inside the outer loop and
/// outside every hole. Constraint edges never cut a triangle, so the
/// centroid decides for the whole face.
fn interior_faces(cdt: &Cdt, polygon: &Polygon) -> HashSet<usize> {
    cdt.inner_faces()
        .filter(|face| {
            let [a, b, c] = face.positions();
            let centroid = Point3d::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0, 0.0);
            winding_number(&centroid, polygon.outer()) != 0
                && polygon.holes().iter().all(|h| winding_number(&centroid, h) == 0)
        })
        .map(|face| face.fix().index())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::polygon_2d::loop_area;
    use crate::operations::repair::self_intersects;
    use crate::polygon::Sense;

    const TOL: f64 = 0.01;

    fn rect_down(x: f64, y: f64, w: f64, h: f64) -> Vec<Point3d> {
        vec![
            Point3d::new(x + w, y + h, 0.0),
            Point3d::new(x + w, y, 0.0),
            Point3d::new(x, y, 0.0),
            Point3d::new(x, y + h, 0.0),
        ]
    }

    #[test]
    fn polygon_without_holes_is_unchanged() {
        let poly = Polygon::from(rect_down(0.0, 0.0, 2.0, 1.0));
        let pieces = decompose(&poly, TOL).unwrap();
        assert_eq!(pieces, vec![rect_down(0.0, 0.0, 2.0, 1.0)]);
    }

    #[test]
    fn square_ring_splits_into_simple_pieces() {
        let hole: Vec<Point3d> = rect_down(1.0, 1.0, 1.0, 1.0).into_iter().rev().collect();
        let poly = Polygon::with_holes(rect_down(0.0, 0.0, 3.0, 3.0), vec![hole]);
        let pieces = decompose(&poly, TOL).unwrap();

        assert!(pieces.len() > 1);
        let total: f64 = pieces.iter().map(|p| loop_area(p)).sum();
        assert_relative_eq!(total, 8.0, epsilon = 1e-9);
        for piece in &pieces {
            assert_eq!(Sense::classify(piece, TOL), Sense::Down);
            assert!(!self_intersects(piece, TOL));
        }
    }

    #[test]
    fn pieces_avoid_the_hole() {
        let hole = rect_down(4.0, 4.0, 2.0, 2.0);
        let poly = Polygon::with_holes(rect_down(0.0, 0.0, 10.0, 10.0), vec![hole]);
        let pieces = decompose(&poly, TOL).unwrap();
        let centre = Point3d::new(5.0, 5.0, 0.0);
        for piece in &pieces {
            assert!(!crate::polygon::within(&centre, piece, TOL));
        }
        let total: f64 = pieces.iter().map(|p| loop_area(p)).sum();
        assert_relative_eq!(total, 96.0, epsilon = 1e-9);
    }

    #[test]
    fn merge_across_shared_diagonal() {
        let merged = merge_across(&[0, 1, 2], &[0, 2, 3], 2, 0).unwrap();
        assert_eq!(merged, vec![0, 1, 2, 3]);
    }

    #[test]
    fn hole_touching_outer_vertex_gives_simple_pieces() {
        let hole = vec![
            Point3d::new(1.5, 0.0, 0.0),
            Point3d::new(2.0, 0.5, 0.0),
            Point3d::new(1.5, 1.0, 0.0),
            Point3d::new(1.0, 0.5, 0.0),
        ];
        let outer = vec![
            Point3d::new(3.0, 3.0, 0.0),
            Point3d::new(3.0, 0.0, 0.0),
            Point3d::new(1.5, 0.0, 0.0),
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(0.0, 3.0, 0.0),
        ];
        let pieces = decompose(&Polygon::with_holes(outer, vec![hole]), TOL).unwrap();
        let total: f64 = pieces.iter().map(|p| loop_area(p)).sum();
        assert_relative_eq!(total, 8.5, epsilon = 1e-9);
        for piece in &pieces {
            assert_eq!(Sense::classify(piece, TOL), Sense::Down);
            assert!(!self_intersects(piece, TOL));
        }
    }

    #[test]
    fn crossing_hole_is_degenerate() {
        let hole = rect_down(2.0, 1.0, 2.0, 1.0);
        let poly = Polygon::with_holes(rect_down(0.0, 0.0, 3.0, 3.0), vec![hole]);
        let err = decompose(&poly, TOL).unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Geometry(GeometryError::Degenerate(_))
        ));
    }
}
