use nalgebra::Matrix3;

use crate::math::{Point3d, Vector3d};

use super::{Ellipsoid, PointLatLon};

const GEODETIC_ITERATIONS: usize = 10;

/// Local east-north-up Cartesian frame anchored at a geodetic origin.
///
/// `x` points east, `y` north and `z` up along the ellipsoid normal, in
/// metres. Built once and reused for any number of conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: PointLatLon,
    origin_ecef: Vector3d,
    /// Rows are the east, north and up unit vectors in ECEF.
    rotation: Matrix3<f64>,
}

impl LocalFrame {
    #[must_use]
    pub fn new(origin: PointLatLon) -> Self {
        let (sin_lat, cos_lat) = origin.lat().to_radians().sin_cos();
        let (sin_lon, cos_lon) = origin.lon().to_radians().sin_cos();
        #[rustfmt::skip]
        let rotation = Matrix3::new(
            -sin_lon,           cos_lon,           0.0,
            -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat,
            cos_lat * cos_lon,  cos_lat * sin_lon,  sin_lat,
        );
        Self {
            origin,
            origin_ecef: to_ecef(&origin),
            rotation,
        }
    }

    #[must_use]
    pub fn origin(&self) -> &PointLatLon {
        &self.origin
    }

    /// Position of `point` in this frame.
    #[must_use]
    pub fn to_local(&self, point: &PointLatLon) -> Point3d {
        Point3d::from(self.rotation * (to_ecef(point) - self.origin_ecef))
    }

    /// Geodetic position of a point given in this frame.
    #[must_use]
    pub fn from_local(&self, point: &Point3d) -> PointLatLon {
        let ecef = self.origin_ecef + self.rotation.transpose() * point.coords;
        from_ecef(&ecef)
    }

    #[must_use]
    pub fn to_local_all(&self, points: &[PointLatLon]) -> Vec<Point3d> {
        points.iter().map(|p| self.to_local(p)).collect()
    }

    #[must_use]
    pub fn from_local_all(&self, points: &[Point3d]) -> Vec<PointLatLon> {
        points.iter().map(|p| self.from_local(p)).collect()
    }
}

fn to_ecef(point: &PointLatLon) -> Vector3d {
    let ellipsoid = Ellipsoid::WGS84;
    let phi = point.lat().to_radians();
    let (sin_lat, cos_lat) = phi.sin_cos();
    let (sin_lon, cos_lon) = point.lon().to_radians().sin_cos();
    let n = ellipsoid.prime_vertical_radius(phi);
    let h = point.height();
    Vector3d::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - ellipsoid.e2()) + h) * sin_lat,
    )
}

/// Fixed-point iteration on latitude; each step shrinks the error by
/// roughly `e²`.
fn from_ecef(ecef: &Vector3d) -> PointLatLon {
    let ellipsoid = Ellipsoid::WGS84;
    let e2 = ellipsoid.e2();
    let p = ecef.x.hypot(ecef.y);
    let lon = ecef.y.atan2(ecef.x);

    let mut phi = ecef.z.atan2(p * (1.0 - e2));
    for _ in 0..GEODETIC_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius(phi);
        phi = (ecef.z + e2 * n * phi.sin()).atan2(p);
    }
    let (sin_lat, cos_lat) = phi.sin_cos();
    let height = p * cos_lat + ecef.z * sin_lat - ellipsoid.a * (1.0 - e2 * sin_lat * sin_lat).sqrt();
    PointLatLon::from_parts(phi.to_degrees(), lon.to_degrees(), height)
}
