use thiserror::Error;

/// Top-level error type for the planar kernel.
///
/// Polygon operations report failed preconditions as empty or `None`
/// results; only constructors and coordinate transforms return errors.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Geodesy(#[from] GeodesyError),
}

/// Errors related to planar geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("loop has {count} points, at least {min} are required")]
    TooFewPoints { count: usize, min: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to geodetic coordinates and projections.
#[derive(Debug, Error)]
pub enum GeodesyError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("latitude {0} is outside the UTM band [-80, 84]")]
    OutsideUtmBand(f64),

    #[error("UTM zone {0} is outside 1..=60")]
    InvalidZone(u8),
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;
