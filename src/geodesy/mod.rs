//! Geodetic coordinates on the WGS84 ellipsoid: geodesic distance, a
//! local east-north-up frame and UTM projection.

mod ellipsoid;
mod geodesic;
mod local_frame;
mod point_lat_lon;
mod utm;

pub use ellipsoid::Ellipsoid;
pub use geodesic::geodesic_distance;
pub use local_frame::LocalFrame;
pub use point_lat_lon::PointLatLon;
pub use utm::{Hemisphere, UtmPoint};
