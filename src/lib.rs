//! Tolerance-based planar polygon kernel.
//!
//! Polygons are vertex loops of [`math::Point3d`] lying in a horizontal
//! plane. Boolean operations, buffering and repair require *down* loops
//! (clockwise seen from above); every operation takes an explicit
//! tolerance and reports failed preconditions as `None` or an empty result.
//! The [`geodesy`] module converts between WGS84 coordinates and a local
//! metric frame.

pub mod error;
pub mod geodesy;
pub mod math;
pub mod operations;
pub mod polygon;

pub use error::{GeodesyError, GeometryError, KernelError, Result};
pub use geodesy::{geodesic_distance, Ellipsoid, Hemisphere, LocalFrame, PointLatLon, UtmPoint};
pub use math::{Point3d, Vector3d};
pub use operations::boolean::{
    intersect, intersects, join, join_all, join_all_polygons, join_all_with_buffer, subtract,
    subtract_polygons, IntersectionResult,
};
pub use operations::offset::{buffer, buffer_all, buffer_with, BufferOptions};
pub use operations::repair::{remove_spikes, reorder_canonical, self_intersects, simplify};
pub use polygon::{point_in_polygon, within, within_all, PlanarLoop, Polygon, Sense};
