use geographiclib_rs::{Geodesic, InverseGeodesic};

use super::PointLatLon;

/// Geodesic distance in metres between two points on WGS84. Heights are
/// ignored.
///
/// Solved with Karney's method, which converges for every pair of points,
/// nearly antipodal ones included.
#[must_use]
pub fn geodesic_distance(from: &PointLatLon, to: &PointLatLon) -> f64 {
    Geodesic::wgs84().inverse(from.lat(), from.lon(), to.lat(), to.lon())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geodesy::Ellipsoid;

    fn p(lat: f64, lon: f64) -> PointLatLon {
        PointLatLon::on_surface(lat, lon).unwrap()
    }

    #[test]
    fn known_city_distances() {
        let san_francisco = p(37.7749, -122.4194);
        let new_york = p(40.7128, -74.0060);
        let anchorage = p(61.2181, -149.9003);
        assert_relative_eq!(
            geodesic_distance(&san_francisco, &new_york),
            4_139_145.47,
            epsilon = 0.1
        );
        assert_relative_eq!(
            geodesic_distance(&anchorage, &new_york),
            5_424_036.18,
            epsilon = 0.1
        );
        assert_relative_eq!(
            geodesic_distance(&anchorage, &san_francisco),
            3_229_834.69,
            epsilon = 0.1
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let a = p(45.0, 10.0);
        let b = p(-12.0, 77.0);
        assert_relative_eq!(
            geodesic_distance(&a, &b),
            geodesic_distance(&b, &a),
            epsilon = 1e-6
        );
    }

    #[test]
    fn equatorial_quarter() {
        let d = geodesic_distance(&p(0.0, 0.0), &p(0.0, 90.0));
        assert_relative_eq!(d, Ellipsoid::WGS84.a * std::f64::consts::FRAC_PI_2, epsilon = 1e-3);
    }

    #[test]
    fn equatorial_antipodes_follow_a_meridian() {
        let d = geodesic_distance(&p(0.0, 0.0), &p(0.0, 180.0));
        assert_relative_eq!(d, 20_003_931.458_6, epsilon = 1e-3);
    }

    #[test]
    fn nearly_antipodal_points_have_a_distance() {
        let d = geodesic_distance(&p(0.0, 0.0), &p(0.5, 179.7));
        assert!(d.is_finite());
        assert!(d > 19_900_000.0 && d < 20_003_931.5);
    }

    #[test]
    fn same_point_is_zero() {
        let here = p(45.521_272_355_398, -122.686_472_758_865);
        assert_relative_eq!(geodesic_distance(&here, &here), 0.0);
    }
}
