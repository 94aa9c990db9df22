// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Location Modul
//!
//! Provides the location providers and the adapter that publishes their fixes
//! as location updates on the event bus.

use adapter::{AdapterState, LocationSourceAdapter};
use async_trait::async_trait;
use module_core::{Event, EventKind, Module, ModuleCtx};
use permission::{PermissionCollaborator, PermissionStatus};
use provider::LocationProvider;
use std::sync::Arc;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{debug, error, info, warn};

pub mod adapter;
pub mod gpsd_source;
pub mod permission;
pub mod provider;
pub mod replay_source;
pub mod test_helper;

/// Notice shown to the user when the location permission was refused.
pub const PERMISSION_DENIED_NOTICE: &str = "Permission denied to access location";

/// Runs a [`LocationSourceAdapter`] for the lifetime of the module.
///
/// The adapter is started once the permission is granted and stopped when the
/// module receives the quit event. A refused permission is reported as a notice
/// and keeps the location updates disabled for the session.
pub struct LocationModule {
    ctx: ModuleCtx,
    adapter: LocationSourceAdapter,
    permission: Arc<dyn PermissionCollaborator>,
}

impl LocationModule {
    pub fn new(
        ctx: ModuleCtx,
        provider: Box<dyn LocationProvider>,
        permission: Arc<dyn PermissionCollaborator>,
    ) -> Self {
        let adapter = LocationSourceAdapter::new(provider, ctx.sender.clone());
        LocationModule {
            ctx,
            adapter,
            permission,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.adapter.state()
    }

    async fn on_permission(&mut self, status: PermissionStatus) {
        match status {
            PermissionStatus::Granted => {
                if let Err(e) = self.adapter.start().await {
                    error!("Failed to start location updates. Error: {e}");
                    self.ctx
                        .publish_event(EventKind::NoticeEvent(e.to_string().into()));
                }
            }
            PermissionStatus::Denied => {
                warn!("Location permission denied, location updates disabled");
                self.ctx
                    .publish_event(EventKind::NoticeEvent(PERMISSION_DENIED_NOTICE.into()));
            }
        }
    }
}

/// Resolves once the quit event arrives or the event bus is closed.
async fn quit_requested(receiver: &mut Receiver<Event>) {
    loop {
        match receiver.recv().await {
            Ok(Event {
                kind: EventKind::QuitEvent,
            }) => return,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!("LocationModule skipped {skipped} events");
            }
            Err(RecvError::Closed) => return,
        }
    }
}

/// Returns the granted permission or asks for it.
async fn acquire_permission(permission: &dyn PermissionCollaborator) -> PermissionStatus {
    match permission.check() {
        PermissionStatus::Granted => PermissionStatus::Granted,
        PermissionStatus::Denied => {
            debug!("Location permission not granted, requesting it");
            permission.request().await
        }
    }
}

#[async_trait]
impl Module for LocationModule {
    async fn run(&mut self) -> Result<(), ()> {
        let permission = self.permission.clone();
        let status = tokio::select! {
            status = acquire_permission(permission.as_ref()) => Some(status),
            _ = quit_requested(&mut self.ctx.receiver) => None,
        };
        let Some(status) = status else {
            info!("Location module stopped before the permission was answered");
            return Ok(());
        };
        self.on_permission(status).await;

        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            if let EventKind::QuitEvent = event.kind {
                                self.adapter.stop().await;
                                run = false;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to receive event in module LocationModule. Error: {e}");
                        }
                    }
                }
            }
        }
        info!("Location module stopped");
        Ok(())
    }
}
