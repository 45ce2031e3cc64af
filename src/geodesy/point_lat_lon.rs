use crate::error::{GeodesyError, Result};

use super::utm::{self, UtmPoint};
use super::geodesic::geodesic_distance;

/// Geodetic position on WGS84: latitude and longitude in degrees, height
/// above the ellipsoid in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLatLon {
    lat: f64,
    lon: f64,
    height: f64,
}

impl PointLatLon {
    /// Creates a validated position.
    ///
    /// # Errors
    ///
    /// Returns `GeodesyError::LatitudeOutOfRange` if `lat` is outside
    /// [-90, 90] and `GeodesyError::LongitudeOutOfRange` if `lon` is
    /// outside [-180, 180].
    pub fn new(lat: f64, lon: f64, height: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeodesyError::LatitudeOutOfRange(lat).into());
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeodesyError::LongitudeOutOfRange(lon).into());
        }
        Ok(Self { lat, lon, height })
    }

    /// Position at zero height. See [`Self::new`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn on_surface(lat: f64, lon: f64) -> Result<Self> {
        Self::new(lat, lon, 0.0)
    }

    /// Builds a position from values already known to be in range.
    pub(crate) fn from_parts(lat: f64, lon: f64, height: f64) -> Self {
        Self { lat, lon, height }
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Geodesic distance along the ellipsoid surface, ignoring height.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        geodesic_distance(self, other)
    }

    /// Projects onto the UTM zone containing this point.
    ///
    /// # Errors
    ///
    /// Returns `GeodesyError::OutsideUtmBand` for latitudes outside [-80, 84].
    pub fn to_utm(&self) -> Result<UtmPoint> {
        utm::project(self)
    }

    /// Inverse of [`Self::to_utm`].
    ///
    /// # Errors
    ///
    /// Returns `GeodesyError::LatitudeOutOfRange` or
    /// `GeodesyError::LongitudeOutOfRange` if the easting or northing lies
    /// far outside the zone.
    pub fn from_utm(point: &UtmPoint) -> Result<Self> {
        utm::unproject(point)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::KernelError;

    #[test]
    fn accessors() {
        let p = PointLatLon::new(45.5, -122.6, 30.0).unwrap();
        assert_relative_eq!(p.lat(), 45.5);
        assert_relative_eq!(p.lon(), -122.6);
        assert_relative_eq!(p.height(), 30.0);
        assert_eq!(p, p);
        assert_ne!(p, PointLatLon::on_surface(45.5, -122.6).unwrap());
    }

    #[test]
    fn latitude_out_of_range() {
        let err = PointLatLon::new(91.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Geodesy(GeodesyError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn longitude_out_of_range() {
        let err = PointLatLon::new(0.0, -180.5, 0.0).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Geodesy(GeodesyError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = PointLatLon::on_surface(45.521_272_355_398, -122.686_472_758_865).unwrap();
        assert_relative_eq!(p.distance(&p), 0.0);
    }
}
