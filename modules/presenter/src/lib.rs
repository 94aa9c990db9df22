// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Presenter Modul
//!
//! Renders the latest location update as text.

use async_trait::async_trait;
use common::location_update::LocationUpdate;
use module_core::{Event, EventKind, LocationUpdatePtr, Module, ModuleCtx};
use std::fmt::{Display, LowerExp};
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{debug, error, warn};

pub mod test_helper;

/// A surface that shows a block of text and short notices to the user.
pub trait TextView: Send {
    /// Replaces the displayed text.
    fn set_text(&mut self, text: &str);

    /// Shows a transient notice next to the text.
    fn show_notice(&mut self, notice: &str);
}

/// Formats a decimal value the way the location screen always showed them.
///
/// Plain notation keeps a fractional part (`0.0`, `-122.084`). Magnitudes below
/// `1e-3` or from `1e7` on switch to scientific notation (`5.0E-4`, `1.0E7`).
fn decimal<T: Copy + Display + LowerExp + Into<f64>>(value: T) -> String {
    let number: f64 = value.into();
    if number.is_nan() {
        return "NaN".to_string();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = number.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return with_fraction(value.to_string());
    }
    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            format!("{}E{exponent}", with_fraction(mantissa.to_string()))
        }
        None => scientific,
    }
}

fn with_fraction(text: String) -> String {
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Renders the fields of `update` line by line in a fixed order.
///
/// ```rust
/// use common::location_update::LocationUpdate;
/// use presenter::format_location_update;
///
/// let update = LocationUpdate::new(1.5, 2.0, 0.0, 0.0, 0.0, 0.0, "12:00:00", "gps");
/// assert!(format_location_update(&update).starts_with("Latitude: 1.5\nLongitude: 2.0\n"));
/// ```
pub fn format_location_update(update: &LocationUpdate) -> String {
    format!(
        "Latitude: {}\nLongitude: {}\nSpeed: {}\nAltitude: {}\nBearing: {}\nAccuracy: {}\nTime: {}\nProvider: {}",
        decimal(update.latitude()),
        decimal(update.longitude()),
        decimal(update.speed()),
        decimal(update.altitude()),
        decimal(update.bearing()),
        decimal(update.accuracy()),
        update.timestamp(),
        update.provider()
    )
}

/// Shows the most recent location update on a [`TextView`].
///
/// The presenter only listens to location updates while it is visible, between a
/// resume and a pause event. Updates published in between are lost for it.
pub struct UpdatePresenter {
    ctx: ModuleCtx,
    view: Box<dyn TextView>,
    updates: Option<Receiver<Event>>,
}

impl UpdatePresenter {
    pub fn new(ctx: ModuleCtx, view: Box<dyn TextView>) -> Self {
        UpdatePresenter {
            ctx,
            view,
            updates: None,
        }
    }

    /// Subscribes to the location updates.
    pub fn resume(&mut self) {
        if self.updates.is_none() {
            debug!("Presenter subscribed to location updates");
            self.updates = Some(self.ctx.subscribe());
        }
    }

    /// Drops the subscription to the location updates.
    pub fn pause(&mut self) {
        if self.updates.take().is_some() {
            debug!("Presenter unsubscribed from location updates");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.updates.is_some()
    }

    /// Replaces the displayed text with the rendering of `update`.
    pub fn on_update(&mut self, update: &LocationUpdate) {
        self.view.set_text(&format_location_update(update));
    }

    pub fn on_notice(&mut self, notice: &str) {
        self.view.show_notice(notice);
    }

    /// Waits for the next location update. Never resolves while unsubscribed.
    pub async fn next_update(&mut self) -> Option<LocationUpdatePtr> {
        next_update(&mut self.updates).await
    }
}

async fn next_update(updates: &mut Option<Receiver<Event>>) -> Option<LocationUpdatePtr> {
    let Some(receiver) = updates else {
        return std::future::pending().await;
    };
    loop {
        match receiver.recv().await {
            Ok(Event {
                kind: EventKind::LocationUpdateEvent(update),
            }) => return Some(update),
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Presenter skipped {skipped} location updates");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

#[async_trait]
impl Module for UpdatePresenter {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => match event.kind {
                            EventKind::QuitEvent => run = false,
                            EventKind::ResumeEvent => self.resume(),
                            EventKind::PauseEvent => self.pause(),
                            EventKind::NoticeEvent(notice) => self.on_notice(&notice),
                            _ => (),
                        },
                        Err(e) => {
                            error!("Failed to receive event in module UpdatePresenter. Error:{e}");
                        }
                    }
                }
                Some(update) = next_update(&mut self.updates) => {
                    self.on_update(&update);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::decimal;

    #[test]
    fn keep_fractional_part() {
        assert_eq!(decimal(0.0f32), "0.0");
        assert_eq!(decimal(-0.0f64), "-0.0");
        assert_eq!(decimal(10.0f32), "10.0");
        assert_eq!(decimal(-122.0840f64), "-122.084");
        assert_eq!(decimal(0.001f64), "0.001");
        assert_eq!(decimal(9_999_999.5f64), "9999999.5");
    }

    #[test]
    fn use_scientific_notation_outside_plain_range() {
        assert_eq!(decimal(0.0005f64), "5.0E-4");
        assert_eq!(decimal(-0.00012f64), "-1.2E-4");
        assert_eq!(decimal(1e7f64), "1.0E7");
        assert_eq!(decimal(123_450_000.0f64), "1.2345E8");
    }

    #[test]
    fn name_non_finite_values() {
        assert_eq!(decimal(f32::INFINITY), "Infinity");
        assert_eq!(decimal(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(decimal(f32::NAN), "NaN");
    }
}
