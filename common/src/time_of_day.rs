// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{DateTime, Local, TimeZone, Utc};

const FORMAT: &str = "%H:%M:%S";

/// Formats the time of day of `time` in the given time zone as `HH:MM:SS`.
pub fn format_in<Tz>(time: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.with_timezone(zone).format(FORMAT).to_string()
}

/// Formats the time of day of `time` in the local time zone of the host.
pub fn format_local(time: &DateTime<Utc>) -> String {
    format_in(time, &Local)
}
