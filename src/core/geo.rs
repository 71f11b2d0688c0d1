use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::constants::METERS_PER_DEGREE;

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `lat` in [-90, 90] and `lng` in [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Mercator y-transform of the latitude: `ln(tan(π/4 + φ/2))`.
    pub fn mercator_y(&self) -> f64 {
        (PI / 4.0 + self.lat.to_radians() / 2.0).tan().ln()
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Poster coordinate line, e.g. `48.8566° N / 2.3522° E`.
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lng >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}\u{b0} {} / {:.4}\u{b0} {}",
            self.lat.abs(),
            ns,
            self.lng.abs(),
            ew
        )
    }
}

/// Canvas position in pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Geographic window mapped onto the canvas, corners in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Square box of half-width `radius_m` around `center`, using a local
    /// flat-earth approximation. Longitude span widens with latitude; the
    /// result is meaningless at exactly ±90°.
    pub fn around(center: LatLng, radius_m: f64) -> Self {
        let lat_span = radius_m / METERS_PER_DEGREE;
        let lng_span = radius_m / (METERS_PER_DEGREE * center.lat.to_radians().cos());

        Self::new(
            LatLng::new(center.lat - lat_span, center.lng - lng_span),
            LatLng::new(center.lat + lat_span, center.lng + lng_span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display() {
        let paris = LatLng::new(48.85661, 2.35222);
        assert_eq!(paris.to_string(), "48.8566\u{b0} N / 2.3522\u{b0} E");

        let rio = LatLng::new(-22.90685, -43.17290);
        assert_eq!(rio.to_string(), "22.9068\u{b0} S / 43.1729\u{b0} W");
    }

    #[test]
    fn test_validity() {
        assert!(LatLng::new(90.0, -180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_bounds_around_widen_with_latitude() {
        let equator = LatLngBounds::around(LatLng::new(0.0, 10.0), 10_000.0);
        let north = LatLngBounds::around(LatLng::new(60.0, 10.0), 10_000.0);

        let lat_span = |b: &LatLngBounds| b.north_east.lat - b.south_west.lat;
        let lng_span = |b: &LatLngBounds| b.north_east.lng - b.south_west.lng;

        assert!((lat_span(&equator) - lat_span(&north)).abs() < 1e-12);
        // cos(60°) = 0.5 doubles the longitude span
        assert!((lng_span(&north) - 2.0 * lng_span(&equator)).abs() < 1e-9);
        assert!((north.south_west.lat + north.north_east.lat - 120.0).abs() < 1e-9);
        assert!((north.south_west.lng + north.north_east.lng - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_mercator_y_at_equator() {
        assert!(LatLng::new(0.0, 0.0).mercator_y().abs() < 1e-12);
        assert!(LatLng::new(45.0, 0.0).mercator_y() > 0.0);
    }
}
