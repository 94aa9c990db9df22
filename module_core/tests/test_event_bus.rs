// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::test_helper::get_location_update;
use module_core::{
    test_helper::{assert_no_event, wait_for_event},
    *,
};
use std::{sync::Arc, time::Duration};

#[tokio::test]
#[test_log::test]
pub async fn events_delivered() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let event = Event {
        kind: EventKind::QuitEvent,
    };
    event_bus.publish(&event);
    let received_event = tokio::time::timeout(Duration::from_millis(100), receiver.recv())
        .await
        .expect("Failed to receive event in required time")
        .unwrap();
    assert_eq!(received_event, event);
}

#[tokio::test]
#[test_log::test]
pub async fn location_update_delivered_to_every_subscriber() {
    let event_bus = EventBus::new();
    let mut first = event_bus.subscribe();
    let mut second = event_bus.subscribe();
    let update = Arc::new(get_location_update());
    event_bus.publish(&Event {
        kind: EventKind::LocationUpdateEvent(update.clone()),
    });

    for receiver in [&mut first, &mut second] {
        let event = wait_for_event(
            receiver,
            Duration::from_millis(100),
            EventKindType::LocationUpdateEvent,
        )
        .await;
        assert_eq!(
            payload_ref!(event.kind, EventKind::LocationUpdateEvent),
            Some(&update)
        );
    }
}

#[test]
pub fn publish_without_subscriber_is_dropped() {
    let event_bus = EventBus::new();
    let sender = event_bus.sender();
    let receivers = publish(
        &sender,
        EventKind::LocationUpdateEvent(Arc::new(get_location_update())),
    );
    assert_eq!(receivers, 0);
}

#[tokio::test]
#[test_log::test]
pub async fn late_subscriber_misses_earlier_updates() {
    let event_bus = EventBus::new();
    event_bus.publish(&Event {
        kind: EventKind::LocationUpdateEvent(Arc::new(get_location_update())),
    });
    let mut receiver = event_bus.subscribe();
    assert_no_event(
        &mut receiver,
        Duration::from_millis(50),
        EventKindType::LocationUpdateEvent,
    )
    .await;
}

#[test]
pub fn location_updates_use_the_location_update_channel() {
    let kind = EventKind::LocationUpdateEvent(Arc::new(get_location_update()));
    assert_eq!(kind.channel(), "location_update");
    assert_eq!(EventKind::QuitEvent.channel(), LIFECYCLE_CHANNEL);
}

#[test]
pub fn module_ctx_publishes_to_other_contexts() {
    let event_bus = EventBus::new();
    let publisher = event_bus.context();
    let mut listener = event_bus.context();
    let receivers = publisher.publish_event(EventKind::NoticeEvent("notice".into()));
    // Both contexts hold a receiver.
    assert_eq!(receivers, 2);
    let event = listener.receiver.try_recv().unwrap();
    assert_eq!(
        payload_ref!(event.kind, EventKind::NoticeEvent).map(|n| &**n),
        Some("notice")
    );
}
