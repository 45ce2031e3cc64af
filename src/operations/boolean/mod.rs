//! Boolean operations on down loops in a common horizontal plane.

pub(crate) mod backend;
mod decompose;
mod intersect;
mod join;
mod join_all;
mod subtract;

pub use decompose::decompose;
pub use intersect::{intersect, intersects, IntersectionResult};
pub use join::join;
pub use join_all::{join_all, join_all_polygons, join_all_with_buffer};
pub use subtract::{subtract, subtract_polygons};
