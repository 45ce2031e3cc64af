pub mod containment;
pub mod overlap;
mod polygon_3d;
pub mod sense;

pub use containment::{point_in_polygon, within, within_all};
pub use polygon_3d::Polygon;
pub use sense::{PlanarLoop, Sense};
