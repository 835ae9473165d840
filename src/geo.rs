//! Geographic types and great-circle calculations.

use cgmath::Vector2;
use serde::{Deserialize, Serialize};

/// A small positional offset in degrees, `(lat, lng)`.
pub type Vector2d = Vector2<f64>;

/// Mean Earth radius in km.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the coordinate displaced by the given offset in degrees.
    pub fn offset(self, delta: Vector2d) -> Self {
        Self {
            lat: self.lat + delta.x,
            lng: self.lng + delta.y,
        }
    }
}

/// Computes the haversine great-circle distance between two points, in km.
pub fn distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (0.5 * d_lat).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (0.5 * d_lng).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
