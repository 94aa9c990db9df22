// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common Modul for the geolocation pipeline
//!
//! Provides the data types that are shared between the location source and the presenter.

pub mod fix;
pub mod location_update;
pub mod position;
pub mod test_helper;
pub mod time_of_day;
