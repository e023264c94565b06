/// Geographic coordinate types and the map viewport zoom range.
/// All coordinate math uses f64 for precision.

use serde::{Deserialize, Serialize};

use crate::error::InvalidCoordinateError;

/// A point on the sphere in WGS84 geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct and validate in one step.
    pub fn checked(lat: f64, lon: f64) -> Result<Self, InvalidCoordinateError> {
        let ll = Self::new(lat, lon);
        ll.validate()?;
        Ok(ll)
    }

    /// Latitude is checked before longitude; NaN fails both.
    pub fn validate(&self) -> Result<(), InvalidCoordinateError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidCoordinateError::Latitude(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(InvalidCoordinateError::Longitude(self.lon));
        }
        Ok(())
    }
}

/// Inclusive zoom range supported by the map rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: u32,
    pub max: u32,
}

impl ZoomRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Clamp `zoom` into the range. An inverted range clamps to `min`.
    pub fn clamp(&self, zoom: u32) -> u32 {
        zoom.min(self.max).max(self.min)
    }
}

impl Default for ZoomRange {
    /// Slippy-map tile backends serve zoom 0 through 24.
    fn default() -> Self {
        Self::new(0, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rome_is_a_valid_center() {
        assert!(LatLon::checked(41.902782, 12.496366).is_ok());
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            assert!(LatLon::checked(lat, lon).is_ok(), "({lat}, {lon}) should be valid");
        }
    }

    #[test]
    fn latitude_out_of_range_is_reported_first() {
        assert_eq!(
            LatLon::checked(200.0, 500.0),
            Err(InvalidCoordinateError::Latitude(200.0))
        );
        assert_eq!(
            LatLon::checked(10.0, -180.5),
            Err(InvalidCoordinateError::Longitude(-180.5))
        );
    }

    #[test]
    fn nan_is_rejected() {
        assert!(LatLon::checked(f64::NAN, 0.0).is_err());
        assert!(LatLon::checked(0.0, f64::NAN).is_err());
    }

    #[test]
    fn zoom_is_clamped_not_rejected() {
        let range = ZoomRange::new(2, 18);
        assert_eq!(range.clamp(8), 8);
        assert_eq!(range.clamp(0), 2);
        assert_eq!(range.clamp(40), 18);
    }
}
