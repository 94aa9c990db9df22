// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{fix::Fix, location_update::LocationUpdate, position::Position};
use chrono::{DateTime, TimeZone, Utc};

/// The time of the sample fix: 2024-06-01T10:15:00Z.
pub fn get_fix_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, 15, 0)
        .single()
        .unwrap_or_else(|| panic!("Invalid sample fix time"))
}

/// A fully populated fix as a GPS provider would report it.
pub fn get_fix() -> Fix {
    Fix {
        latitude: 37.4219,
        longitude: -122.0840,
        speed: Some(0.0),
        altitude: Some(10.0),
        bearing: Some(0.0),
        accuracy: Some(5.0),
        time: get_fix_time(),
        provider: "gps".to_string(),
    }
}

/// The update that is displayed for [`get_fix`] when the time is shown in UTC.
pub fn get_location_update() -> LocationUpdate {
    LocationUpdate::new(37.4219, -122.0840, 0.0, 10.0, 0.0, 5.0, "10:15:00", "gps")
}

/// Three points along a straight road, used to replay a drive.
pub fn get_track_points() -> Vec<Position> {
    vec![
        Position::new(&52.026649, &11.282535),
        Position::new(&52.026751, &11.282047),
        Position::new(&52.026807, &11.281746),
    ]
}
