// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::provider::{
    GPS_PROVIDER, LocationError, LocationProvider, LocationRequest, UpdateListener,
};
use common::fix::Fix;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Default)]
struct MockProviderState {
    listener: Option<Arc<dyn UpdateListener>>,
    last_request: Option<LocationRequest>,
    deny_request: bool,
    deny_remove: bool,
    request_calls: usize,
    remove_calls: usize,
}

/// A [`LocationProvider`] that is driven by the test.
///
/// Clones share their state, so a test keeps a clone to emit fixes after the
/// provider was handed over to an adapter.
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockProviderState>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that refuses registration and removal with [`LocationError::AuthorizationDenied`].
    pub fn unauthorized() -> Self {
        let provider = Self::default();
        {
            let mut state = provider.lock();
            state.deny_request = true;
            state.deny_remove = true;
        }
        provider
    }

    /// Lets the following calls of `remove_updates` fail with [`LocationError::AuthorizationDenied`].
    pub fn revoke_on_remove(&self) {
        self.lock().deny_remove = true;
    }

    /// Delivers `fix` to the registered listener, like a provider callback.
    ///
    /// Returns `false` if no listener is registered.
    pub fn emit(&self, fix: &Fix) -> bool {
        let listener = self.lock().listener.clone();
        match listener {
            Some(listener) => {
                listener.on_location_changed(fix);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.lock().listener.is_some()
    }

    pub fn request_calls(&self) -> usize {
        self.lock().request_calls
    }

    pub fn remove_calls(&self) -> usize {
        self.lock().remove_calls
    }

    pub fn last_request(&self) -> Option<LocationRequest> {
        self.lock().last_request.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockProviderState> {
        self.state.lock().unwrap_or_else(|state| state.into_inner())
    }
}

#[async_trait::async_trait]
impl LocationProvider for MockProvider {
    fn name(&self) -> &str {
        GPS_PROVIDER
    }

    async fn request_location_updates(
        &mut self,
        request: LocationRequest,
        listener: Arc<dyn UpdateListener>,
    ) -> Result<(), LocationError> {
        let mut state = self.lock();
        state.request_calls += 1;
        state.last_request = Some(request);
        if state.deny_request {
            return Err(LocationError::AuthorizationDenied(GPS_PROVIDER.to_string()));
        }
        state.listener = Some(listener);
        Ok(())
    }

    async fn remove_updates(&mut self) -> Result<(), LocationError> {
        let mut state = self.lock();
        state.remove_calls += 1;
        state.listener = None;
        if state.deny_remove {
            return Err(LocationError::AuthorizationDenied(GPS_PROVIDER.to_string()));
        }
        Ok(())
    }
}

/// A listener that forwards every fix into a channel.
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<Fix>,
}

impl ChannelListener {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Fix>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(ChannelListener { sender }), receiver)
    }
}

impl UpdateListener for ChannelListener {
    fn on_location_changed(&self, fix: &Fix) {
        let _ = self.sender.send(fix.clone());
    }
}
