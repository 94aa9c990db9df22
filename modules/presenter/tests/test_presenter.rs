// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{location_update::LocationUpdate, test_helper::get_location_update};
use module_core::{
    Event, EventBus, EventKind, Module,
    test_helper::{stop_module, wait_until},
};
use presenter::{UpdatePresenter, format_location_update, test_helper::MemoryTextView};
use std::{sync::Arc, time::Duration};
use tokio::time::timeout;

const TIMEOUT: Duration = Duration::from_millis(100);

fn second_update() -> LocationUpdate {
    LocationUpdate::new(52.0266, 11.2825, 2.5, 120.5, 271.0, 3.0, "10:15:01", "gps")
}

fn publish_update(eb: &EventBus, update: LocationUpdate) {
    eb.publish(&Event {
        kind: EventKind::LocationUpdateEvent(Arc::new(update)),
    });
}

fn start_presenter(eb: &EventBus, view: &MemoryTextView) -> tokio::task::JoinHandle<Result<(), ()>> {
    let mut presenter = UpdatePresenter::new(eb.context(), Box::new(view.clone()));
    tokio::spawn(async move { presenter.run().await })
}

#[test]
fn format_update_in_fixed_order() {
    assert_eq!(
        format_location_update(&get_location_update()),
        "Latitude: 37.4219\nLongitude: -122.084\nSpeed: 0.0\nAltitude: 10.0\nBearing: 0.0\nAccuracy: 5.0\nTime: 10:15:00\nProvider: gps"
    );
}

#[test]
fn format_keeps_fractional_digits() {
    assert_eq!(
        format_location_update(&second_update()),
        "Latitude: 52.0266\nLongitude: 11.2825\nSpeed: 2.5\nAltitude: 120.5\nBearing: 271.0\nAccuracy: 3.0\nTime: 10:15:01\nProvider: gps"
    );
}

#[test]
fn last_update_wins() {
    let eb = EventBus::default();
    let view = MemoryTextView::new();
    let mut presenter = UpdatePresenter::new(eb.context(), Box::new(view.clone()));

    presenter.on_update(&get_location_update());
    presenter.on_update(&second_update());

    assert_eq!(view.text(), Some(format_location_update(&second_update())));
    assert_eq!(view.writes(), 2);
}

#[tokio::test]
#[test_log::test]
async fn receive_updates_while_subscribed() {
    let eb = EventBus::default();
    let view = MemoryTextView::new();
    let mut presenter = UpdatePresenter::new(eb.context(), Box::new(view.clone()));
    presenter.resume();

    publish_update(&eb, get_location_update());

    let update = timeout(TIMEOUT, presenter.next_update())
        .await
        .unwrap_or_else(|_| panic!("Update not received in {:?}", TIMEOUT))
        .expect("Event bus closed");
    assert_eq!(*update, get_location_update());
}

#[tokio::test]
#[test_log::test]
async fn drop_updates_while_unsubscribed() {
    let eb = EventBus::default();
    let view = MemoryTextView::new();
    let mut presenter = UpdatePresenter::new(eb.context(), Box::new(view.clone()));
    presenter.resume();
    presenter.pause();
    assert!(!presenter.is_subscribed());

    publish_update(&eb, get_location_update());
    presenter.resume();

    assert!(timeout(Duration::from_millis(50), presenter.next_update())
        .await
        .is_err());
    assert_eq!(view.text(), None);
    assert_eq!(view.writes(), 0);
}

#[tokio::test]
#[test_log::test]
async fn never_resolve_before_resume() {
    let eb = EventBus::default();
    let mut presenter = UpdatePresenter::new(eb.context(), Box::new(MemoryTextView::new()));

    publish_update(&eb, get_location_update());

    assert!(timeout(Duration::from_millis(50), presenter.next_update())
        .await
        .is_err());
}

#[tokio::test]
#[test_log::test]
async fn display_latest_update_when_resumed() {
    let eb = EventBus::default();
    let view = MemoryTextView::new();
    let mut handle = start_presenter(&eb, &view);

    eb.publish(&Event {
        kind: EventKind::ResumeEvent,
    });
    // The subscription is created asynchronously, repeat until the presenter shows it.
    let expected = format_location_update(&get_location_update());
    timeout(Duration::from_millis(500), async {
        while view.text().as_deref() != Some(expected.as_str()) {
            publish_update(&eb, get_location_update());
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("Presenter didn't display the update"));

    publish_update(&eb, second_update());
    let expected = format_location_update(&second_update());
    wait_until(TIMEOUT, || view.text().as_deref() == Some(expected.as_str())).await;

    stop_module(&eb, &mut handle).await;
}

#[tokio::test]
#[test_log::test]
async fn ignore_updates_after_pause_event() {
    let eb = EventBus::default();
    let view = MemoryTextView::new();
    let mut handle = start_presenter(&eb, &view);

    for kind in [
        EventKind::ResumeEvent,
        EventKind::PauseEvent,
        EventKind::NoticeEvent("paused".into()),
    ] {
        eb.publish(&Event { kind });
    }
    // Lifecycle events are handled in order, the notice marks the pause as done.
    wait_until(TIMEOUT, || !view.notices().is_empty()).await;

    publish_update(&eb, get_location_update());
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(view.text(), None);
    assert_eq!(view.writes(), 0);
    stop_module(&eb, &mut handle).await;
}

#[tokio::test]
#[test_log::test]
async fn show_notices() {
    let eb = EventBus::default();
    let view = MemoryTextView::new();
    let mut handle = start_presenter(&eb, &view);

    eb.publish(&Event {
        kind: EventKind::NoticeEvent("Permission denied to access location".into()),
    });

    wait_until(TIMEOUT, || !view.notices().is_empty()).await;
    assert_eq!(view.notices(), vec!["Permission denied to access location"]);
    assert_eq!(view.text(), None);

    stop_module(&eb, &mut handle).await;
}
