//! Coordinate and location types.

use std::fmt;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components are finite and within degree range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Resolved location of a client address.
///
/// Produced fresh for every lookup and owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub coordinate: Coordinate,
    pub city: String,
    pub country_code: String,
    /// First-level administrative region (state, province).
    pub state: String,
    pub timezone: String,
}
