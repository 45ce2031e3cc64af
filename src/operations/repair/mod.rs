mod self_intersect;
mod simplify;
mod spikes;

pub use self_intersect::self_intersects;
pub(crate) use simplify::remove_collinear_vertices;
pub use simplify::{reorder_canonical, simplify};
pub use spikes::remove_spikes;
