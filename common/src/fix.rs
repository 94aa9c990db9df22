// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::position::Position;
use chrono::{DateTime, Utc};

/// A single raw measurement as reported by a location provider.
///
/// Providers only fill in the quality metrics they know about. Everything
/// that is not reported stays `None` and is treated as `0` once the fix is
/// turned into a [`LocationUpdate`](crate::location_update::LocationUpdate).
#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    /// Speed over ground in meters per second.
    pub speed: Option<f32>,
    /// Altitude in meters.
    pub altitude: Option<f64>,
    /// Direction of travel in degrees.
    pub bearing: Option<f32>,
    /// Horizontal accuracy in meters.
    pub accuracy: Option<f32>,
    pub time: DateTime<Utc>,
    pub provider: String,
}

impl Fix {
    /// Creates a fix that only carries a position, a time and the provider name.
    pub fn new(latitude: f64, longitude: f64, time: DateTime<Utc>, provider: &str) -> Self {
        Fix {
            latitude,
            longitude,
            speed: None,
            altitude: None,
            bearing: None,
            accuracy: None,
            time,
            provider: provider.to_string(),
        }
    }

    pub fn position(&self) -> Position {
        Position {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
