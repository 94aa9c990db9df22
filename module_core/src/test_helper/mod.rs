// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::time::timeout;

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// This function publishes a [`QuitEvent`](EventKind::QuitEvent) through the given [`EventBus`],
/// signaling the target module to terminate. It then waits asynchronously for the module’s task
/// (represented by the provided [`tokio::task::JoinHandle`]) to complete within a fixed timeout.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within 100ms.
/// - The task returns an error (`Err(())`).
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .expect("Module task panicked")
        .expect("Module returned an error");
}

/// Waits asynchronously for a specific type of [`Event`] to be received on a
/// [`tokio::sync::broadcast::Receiver`] within a given duration.
///
/// Events of other types are skipped. Only the variant type is compared,
/// payload data is ignored.
///
/// # Panics
///
/// This function panics if no matching event is received within the specified
/// `duration`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let result = timeout(duration, async {
        loop {
            match rx.recv().await {
                Ok(event) if EventKindType::from(&event.kind) == exp_event => return event,
                Ok(_) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    panic!("Event bus closed while waiting for {:?}", exp_event)
                }
            }
        }
    })
    .await;
    match result {
        Ok(event) => event,
        Err(_) => panic!("Failed to receive event of type {:?}", exp_event),
    }
}

/// Asserts that no event of the given type arrives on `rx` within `duration`.
///
/// # Panics
///
/// This function panics if a matching event is received.
pub async fn assert_no_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    unexpected: EventKindType,
) {
    let result = timeout(duration, async {
        loop {
            match rx.recv().await {
                Ok(event) if EventKindType::from(&event.kind) == unexpected => return event,
                Ok(_) | Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    std::future::pending::<()>().await;
                }
            }
        }
    })
    .await;
    if let Ok(event) = result {
        panic!("Received unexpected event {:?}", event);
    }
}

/// Polls `condition` every few milliseconds until it holds or `duration` elapsed.
///
/// # Panics
///
/// This function panics if the condition doesn't hold in time.
pub async fn wait_until<F>(duration: std::time::Duration, mut condition: F)
where
    F: FnMut() -> bool,
{
    let result = timeout(duration, async {
        while !condition() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    })
    .await;
    if result.is_err() {
        panic!("Condition not met within {:?}", duration);
    }
}
