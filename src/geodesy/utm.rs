//! Universal Transverse Mercator projection on WGS84.
//!
//! Uses Krüger's series in the third flattening to third order, which is
//! accurate to about a millimetre inside a zone.

use crate::error::{GeodesyError, Result};

use super::{Ellipsoid, PointLatLon};

const SCALE: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
const MIN_LAT: f64 = -80.0;
const MAX_LAT: f64 = 84.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

/// Position in a UTM zone: easting and northing in metres, height carried
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmPoint {
    zone: u8,
    hemisphere: Hemisphere,
    easting: f64,
    northing: f64,
    height: f64,
}

impl UtmPoint {
    /// # Errors
    ///
    /// Returns `GeodesyError::InvalidZone` if `zone` is outside 1..=60.
    pub fn new(
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
        height: f64,
    ) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(GeodesyError::InvalidZone(zone).into());
        }
        Ok(Self {
            zone,
            hemisphere,
            easting,
            northing,
            height,
        })
    }

    #[must_use]
    pub fn zone(&self) -> u8 {
        self.zone
    }

    #[must_use]
    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    #[must_use]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    #[must_use]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Series coefficients derived from the third flattening.
struct Series {
    /// Rectifying radius scaled by `SCALE`.
    k0_a: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
}

impl Series {
    fn wgs84() -> Self {
        let ellipsoid = Ellipsoid::WGS84;
        let n = ellipsoid.n();
        let (n2, n3) = (n * n, n * n * n);
        let rectifying = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        Self {
            k0_a: SCALE * rectifying,
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
                n2 / 48.0 + n3 / 15.0,
                17.0 * n3 / 480.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
                56.0 * n3 / 15.0,
            ],
        }
    }
}

fn central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn zone_of(lon: f64) -> u8 {
    // Longitude 180 belongs to zone 60.
    (((lon + 180.0) / 6.0).floor() as u8 + 1).min(60)
}

pub(crate) fn project(point: &PointLatLon) -> Result<UtmPoint> {
    if !(MIN_LAT..=MAX_LAT).contains(&point.lat()) {
        return Err(GeodesyError::OutsideUtmBand(point.lat()).into());
    }
    let series = Series::wgs84();
    let n = Ellipsoid::WGS84.n();
    let zone = zone_of(point.lon());
    let phi = point.lat().to_radians();
    let lambda = (point.lon() - central_meridian(zone)).to_radians();

    let e = 2.0 * n.sqrt() / (1.0 + n);
    let sin_phi = phi.sin();
    let t = (sin_phi.atanh() - e * (e * sin_phi).atanh()).sinh();
    let xi_p = t.atan2(lambda.cos());
    let eta_p = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

    let mut xi = xi_p;
    let mut eta = eta_p;
    for (j, alpha) in (1..=3_i32).zip(series.alpha) {
        let k = 2.0 * f64::from(j);
        xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
        eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
    }

    let hemisphere = if point.lat() < 0.0 {
        Hemisphere::South
    } else {
        Hemisphere::North
    };
    let false_northing = match hemisphere {
        Hemisphere::North => 0.0,
        Hemisphere::South => FALSE_NORTHING_SOUTH,
    };
    UtmPoint::new(
        zone,
        hemisphere,
        FALSE_EASTING + series.k0_a * eta,
        false_northing + series.k0_a * xi,
        point.height(),
    )
}

pub(crate) fn unproject(point: &UtmPoint) -> Result<PointLatLon> {
    let series = Series::wgs84();
    let false_northing = match point.hemisphere {
        Hemisphere::North => 0.0,
        Hemisphere::South => FALSE_NORTHING_SOUTH,
    };
    let xi = (point.northing - false_northing) / series.k0_a;
    let eta = (point.easting - FALSE_EASTING) / series.k0_a;

    let mut xi_p = xi;
    let mut eta_p = eta;
    for (j, beta) in (1..=3_i32).zip(series.beta) {
        let k = 2.0 * f64::from(j);
        xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
        eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
    }

    let chi = (xi_p.sin() / eta_p.cosh()).asin();
    let mut phi = chi;
    for (j, delta) in (1..=3_i32).zip(series.delta) {
        phi += delta * (2.0 * f64::from(j) * chi).sin();
    }
    let lambda = eta_p.sinh().atan2(xi_p.cos());

    PointLatLon::new(
        phi.to_degrees(),
        central_meridian(point.zone) + lambda.to_degrees(),
        point.height,
    )
}
