// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use strum_macros::EnumDiscriminants;
use tracing::trace;

/// Name of the broadcast channel that carries [`EventKind::LocationUpdateEvent`]s.
pub const LOCATION_UPDATE_CHANNEL: &str = "location_update";

/// Name of the channel for the lifecycle and notice events.
pub const LIFECYCLE_CHANNEL: &str = "lifecycle";

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
///
/// This structure is designed to be passed through an [`EventBus`]
/// between asynchronous modules.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

/// A thread-safe, reference-counted pointer to a [`LocationUpdate`](common::location_update::LocationUpdate).
///
/// Every subscriber receives the same update without copying it.
pub type LocationUpdatePtr = std::sync::Arc<common::location_update::LocationUpdate>;

/// A shared text for a transient notice to the user.
pub type NoticePtr = std::sync::Arc<str>;

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
///
/// The payload free discriminant is available as [`EventKindType`].
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// The display surface became visible. Presenters subscribe to updates.
    ResumeEvent,

    /// The display surface is hidden. Presenters drop their subscription.
    PauseEvent,

    /// A new location fix, published once per provider callback.
    LocationUpdateEvent(LocationUpdatePtr),

    /// A transient message that shall be shown to the user.
    NoticeEvent(NoticePtr),
}

impl EventKind {
    /// Returns the name of the channel this event is published on.
    pub fn channel(&self) -> &'static str {
        match self {
            EventKind::LocationUpdateEvent(_) => LOCATION_UPDATE_CHANNEL,
            _ => LIFECYCLE_CHANNEL,
        }
    }
}

/// Returns a reference to the payload of `$kind` if it is the `$variant`, otherwise `None`.
///
/// ```rust
/// use module_core::{EventKind, payload_ref};
///
/// let kind = EventKind::NoticeEvent("hello".into());
/// assert_eq!(payload_ref!(kind, EventKind::NoticeEvent).map(|n| &**n), Some("hello"));
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
/// A subscriber only sees events that are published after it subscribed.
pub struct EventBus {
    /// The broadcast sender used internally to distribute events.
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus { sender }
    }

    /// Subscribes to the event bus and returns a [`tokio::sync::broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        publish(&self.sender, event.kind.clone());
    }

    /// Returns a sender that publishes on this bus.
    ///
    /// Used by callbacks that live outside of a module, e.g. signal handlers.
    pub fn sender(&self) -> tokio::sync::broadcast::Sender<Event> {
        self.sender.clone()
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    ///
    /// The returned context can be used by modules implementing [`Module`]
    /// to send and receive events within their execution scope.
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

/// Provides a default instance of [`EventBus`].
impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes `kind` on `sender` and returns the number of subscribers that will see it.
///
/// Having no subscriber is not an error, the event is dropped.
pub fn publish(sender: &tokio::sync::broadcast::Sender<Event>, kind: EventKind) -> usize {
    let channel = kind.channel();
    match sender.send(Event { kind }) {
        Ok(receivers) => receivers,
        Err(_) => {
            trace!("No subscriber on channel {channel}, event dropped");
            0
        }
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until completion.
    ///
    /// This function typically contains the module's main event loop,
    /// reacting to messages received through the [`ModuleCtx`].
    async fn run(&mut self) -> Result<(), ()>;
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events concurrently.
pub struct ModuleCtx {
    /// The broadcast sender used to publish events.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Publishes an event of the given kind on the bus of this context.
    pub fn publish_event(&self, kind: EventKind) -> usize {
        publish(&self.sender, kind)
    }

    /// Creates an additional receiver on the bus of this context.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

pub mod test_helper;
