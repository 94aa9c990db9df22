// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::provider::{
    GPS_PROVIDER, LocationError, LocationProvider, LocationRequest, UpdateListener,
};
use common::{fix::Fix, location_update::LocationUpdate};
use module_core::{Event, EventKind, publish};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Registration state of a [`LocationSourceAdapter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterState {
    /// Never started or stopped.
    Unregistered,
    /// Receiving updates from the provider.
    Registered,
    /// The last start was refused because the location permission is missing.
    Unauthorized,
}

/// Turns provider fixes into [`LocationUpdate`]s on the event bus.
pub struct LocationPublisher {
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl LocationPublisher {
    pub fn new(sender: tokio::sync::broadcast::Sender<Event>) -> Self {
        LocationPublisher { sender }
    }
}

impl UpdateListener for LocationPublisher {
    fn on_location_changed(&self, fix: &Fix) {
        let update = Arc::new(LocationUpdate::from_fix(fix));
        trace!("Publishing location update {:?}", update);
        publish(&self.sender, EventKind::LocationUpdateEvent(update));
    }
}

/// Connects a [`LocationProvider`] with the event bus.
///
/// The adapter owns the provider for its whole lifetime. It registers for every
/// update of the GPS provider on [`start`](Self::start) and unregisters on
/// [`stop`](Self::stop). Missing authorization is never fatal, it is logged and
/// leaves the adapter without registration.
pub struct LocationSourceAdapter {
    provider: Box<dyn LocationProvider>,
    publisher: Arc<LocationPublisher>,
    state: AdapterState,
}

impl LocationSourceAdapter {
    pub fn new(
        provider: Box<dyn LocationProvider>,
        sender: tokio::sync::broadcast::Sender<Event>,
    ) -> Self {
        LocationSourceAdapter {
            provider,
            publisher: Arc::new(LocationPublisher::new(sender)),
            state: AdapterState::Unregistered,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Registers for continuous updates without time or distance filter.
    ///
    /// Returns `Ok` if the provider refused because of missing authorization.
    /// Any other provider failure is returned.
    pub async fn start(&mut self) -> Result<(), LocationError> {
        if self.state == AdapterState::Registered {
            debug!(
                "Location updates of {} already registered",
                self.provider.name()
            );
            return Ok(());
        }
        let request = LocationRequest::continuous(GPS_PROVIDER);
        match self
            .provider
            .request_location_updates(request, self.publisher.clone())
            .await
        {
            Ok(()) => {
                info!("Registered for location updates of {}", self.provider.name());
                self.state = AdapterState::Registered;
                Ok(())
            }
            Err(LocationError::AuthorizationDenied(provider)) => {
                warn!("Location updates of {provider} not registered, permission missing");
                self.state = AdapterState::Unauthorized;
                Ok(())
            }
            Err(e) => {
                self.state = AdapterState::Unregistered;
                Err(e)
            }
        }
    }

    /// Publishes the update for one provider callback.
    pub fn on_update(&self, fix: &Fix) {
        self.publisher.on_location_changed(fix);
    }

    /// Unregisters from the provider. Never fails and may be called any number of times.
    pub async fn stop(&mut self) {
        if self.state != AdapterState::Registered {
            debug!("Location updates not registered, nothing to stop");
            self.state = AdapterState::Unregistered;
            return;
        }
        match self.provider.remove_updates().await {
            Ok(()) => info!(
                "Unregistered from location updates of {}",
                self.provider.name()
            ),
            Err(LocationError::AuthorizationDenied(provider)) => {
                warn!("Location permission for {provider} revoked during the session")
            }
            Err(e) => error!("Failed to unregister from location updates. Error: {e}"),
        }
        self.state = AdapterState::Unregistered;
    }
}
