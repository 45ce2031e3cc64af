pub mod intersect_2d;
pub mod polygon_2d;
pub mod tolerance;

/// 3D point type.
pub type Point3d = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3d = nalgebra::Vector3<f64>;

/// Numerical zero used for denominators and orientation signs.
///
/// Independent of the caller-supplied tolerance, which always governs
/// geometric comparisons.
pub const EPSILON: f64 = 1e-12;
