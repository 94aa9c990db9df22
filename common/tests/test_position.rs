// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{Position, haversine_distance};

fn get_position_as_json<'a>() -> &'a str {
    r#"
    {
        "latitude": 52.025833,
        "longitude": 11.279166
    }
    "#
}

fn get_position() -> Position {
    Position {
        latitude: 52.025833,
        longitude: 11.279166,
    }
}

#[test]
pub fn deserialize_position_from_json() {
    let pos = Position::from_json(get_position_as_json())
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(pos, get_position());
}

#[test]
pub fn distance_to_same_position_is_zero() {
    let pos = get_position();
    assert_eq!(haversine_distance(&pos, &pos), 0.0);
}

#[test]
pub fn distance_of_one_degree_latitude() {
    let start = Position::new(&0.0, &0.0);
    let end = Position::new(&1.0, &0.0);
    let distance = start.distance_to(&end);
    assert!((distance - 111_195.0).abs() < 10.0, "distance was {distance}");
}

#[test]
pub fn bearing_to_cardinal_directions() {
    let origin = Position::new(&0.0, &0.0);
    let north = origin.bearing_to(&Position::new(&1.0, &0.0));
    let east = origin.bearing_to(&Position::new(&0.0, &1.0));
    let west = origin.bearing_to(&Position::new(&0.0, &-1.0));
    assert!(north.abs() < 1e-9);
    assert!((east - 90.0).abs() < 1e-9);
    assert!((west - 270.0).abs() < 1e-9);
}
