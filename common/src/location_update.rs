// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{fix::Fix, time_of_day};
use serde::{Deserialize, Serialize};

/// Represents one location update as it is broadcast to the subscribers.
///
/// A `LocationUpdate` is built from exactly one provider callback and can't be
/// changed afterwards. When serialized, the fields are written with the names
/// `latitude`, `longitude`, `speed`, `altitude`, `bearing`, `accuracy`, `time`
/// and `provider`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    latitude: f64,
    longitude: f64,
    speed: f32,
    altitude: f32,
    bearing: f32,
    accuracy: f32,
    #[serde(rename = "time")]
    timestamp: String,
    provider: String,
}

impl LocationUpdate {
    /// Creates a new [`LocationUpdate`].
    ///
    /// # Arguments
    ///
    /// * `latitude` – Latitude in decimal degrees.
    /// * `longitude` – Longitude in decimal degrees.
    /// * `speed` – Speed in meters per second, `0` if unknown.
    /// * `altitude` – Altitude in meters.
    /// * `bearing` – Bearing in degrees, `0` if unknown.
    /// * `accuracy` – Accuracy in meters as reported by the provider.
    /// * `timestamp` – Formatted local time of day of the fix.
    /// * `provider` – Name of the provider that reported the fix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::location_update::LocationUpdate;
    ///
    /// let update = LocationUpdate::new(37.4219, -122.0840, 0.0, 10.0, 0.0, 5.0, "10:15:00", "gps");
    /// assert_eq!(update.provider(), "gps");
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        latitude: f64,
        longitude: f64,
        speed: f32,
        altitude: f32,
        bearing: f32,
        accuracy: f32,
        timestamp: &str,
        provider: &str,
    ) -> LocationUpdate {
        LocationUpdate {
            latitude,
            longitude,
            speed,
            altitude,
            bearing,
            accuracy,
            timestamp: timestamp.to_string(),
            provider: provider.to_string(),
        }
    }

    /// Builds the update for a raw provider fix.
    ///
    /// Metrics the provider didn't report become `0`, the altitude is narrowed to
    /// `f32` and the time is rendered as local time of day.
    pub fn from_fix(fix: &Fix) -> LocationUpdate {
        LocationUpdate {
            latitude: fix.latitude,
            longitude: fix.longitude,
            speed: fix.speed.unwrap_or_default(),
            altitude: fix.altitude.unwrap_or_default() as f32,
            bearing: fix.bearing.unwrap_or_default(),
            accuracy: fix.accuracy.unwrap_or_default(),
            timestamp: time_of_day::format_local(&fix.time),
            provider: fix.provider.clone(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Speed in meters per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Altitude in meters.
    pub fn altitude(&self) -> f32 {
        self.altitude
    }

    /// Bearing in degrees.
    pub fn bearing(&self) -> f32 {
        self.bearing
    }

    /// Accuracy in meters.
    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// The formatted local time of day of the fix.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}
