// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters used for the great-circle calculations.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Represents a geographical coordinate with latitude and longitude.
///
/// The `Position` struct stores a point on Earth in decimal degrees.
/// Latitude values range from -90.0 to 90.0, and longitude values range
/// from -180.0 to 180.0.
///
/// # Example
///
/// ```rust
/// use common::position::Position;
///
/// let pos = Position {
///     latitude: 37.4219,
///     longitude: -122.0840,
/// };
///
/// println!("{:?}", pos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a new [`Position`] with the given latitude and longitude.
    ///
    /// ```rust
    /// use common::position::Position;
    ///
    /// let pos = Position::new(&37.4219, &-122.0840);
    /// assert_eq!(pos.latitude, 37.4219);
    /// ```
    pub fn new(latitude: &f64, longitude: &f64) -> Self {
        Position {
            latitude: *latitude,
            longitude: *longitude,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Position) -> f64 {
        haversine_distance(self, other)
    }

    /// Initial bearing from this position towards `other` in degrees [0, 360).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();
        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}

/// Calculates the great-circle distance between two positions with the haversine formula.
///
/// # Returns
///
/// `f64` – The distance in meters.
pub fn haversine_distance(lhs: &Position, rhs: &Position) -> f64 {
    let lat1 = lhs.latitude.to_radians();
    let lat2 = rhs.latitude.to_radians();
    let delta_lat = (rhs.latitude - lhs.latitude).to_radians();
    let delta_lon = (rhs.longitude - lhs.longitude).to_radians();
    let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}
