// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::permission::{PermissionCollaborator, PermissionStatus};
use common::fix::Fix;
use std::{sync::Arc, time::Duration};
use thiserror::Error;

/// Name of the satellite based location provider.
pub const GPS_PROVIDER: &str = "gps";

/// Receives the fixes of a [`LocationProvider`].
///
/// The provider calls the listener from its own task, one call per fix.
pub trait UpdateListener: Send + Sync {
    fn on_location_changed(&self, fix: &Fix);
}

/// Describes which updates a listener wants to receive.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationRequest {
    /// The provider the updates shall come from.
    pub provider: String,
    /// Minimum time between two delivered fixes.
    pub min_time: Duration,
    /// Minimum distance in meters between two delivered fixes.
    pub min_distance: f32,
}

impl LocationRequest {
    /// A request for every fix the provider produces.
    pub fn continuous(provider: &str) -> Self {
        LocationRequest {
            provider: provider.to_string(),
            min_time: Duration::ZERO,
            min_distance: 0.0,
        }
    }

    /// Returns `true` if `next` shall be delivered when `last` was the previously delivered fix.
    pub fn accepts(&self, last: Option<&Fix>, next: &Fix) -> bool {
        let Some(last) = last else {
            return true;
        };
        if self.min_time.is_zero() && self.min_distance <= 0.0 {
            return true;
        }
        let elapsed = (next.time - last.time).to_std().unwrap_or(Duration::ZERO);
        let distance = last.position().distance_to(&next.position());
        elapsed >= self.min_time && distance >= f64::from(self.min_distance)
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Not authorized to access the location provider {0}")]
    AuthorizationDenied(String),
    #[error("Unknown location provider {0}")]
    UnknownProvider(String),
    #[error("Location provider {provider} is unavailable: {source}")]
    ProviderUnavailable {
        provider: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid replay track: {0}")]
    InvalidTrack(String),
}

/// Common interface that every location provider must support.
///
/// A provider delivers fixes to at most one listener. Registering again replaces
/// the previous registration.
#[async_trait::async_trait]
pub trait LocationProvider: Send {
    /// The name of the provider, e.g. [`GPS_PROVIDER`].
    fn name(&self) -> &str;

    /// Registers `listener` for the updates described by `request`.
    ///
    /// Fails with [`LocationError::AuthorizationDenied`] if the location permission isn't granted.
    async fn request_location_updates(
        &mut self,
        request: LocationRequest,
        listener: Arc<dyn UpdateListener>,
    ) -> Result<(), LocationError>;

    /// Stops the delivery of updates. Calling it without a registration does nothing.
    async fn remove_updates(&mut self) -> Result<(), LocationError>;
}

/// Rejects requests for a provider other than `name`.
pub fn check_provider(request: &LocationRequest, name: &str) -> Result<(), LocationError> {
    if request.provider != name {
        return Err(LocationError::UnknownProvider(request.provider.clone()));
    }
    Ok(())
}

/// Fails with [`LocationError::AuthorizationDenied`] unless the permission is granted.
pub fn authorize(permission: &dyn PermissionCollaborator, provider: &str) -> Result<(), LocationError> {
    match permission.check() {
        PermissionStatus::Granted => Ok(()),
        PermissionStatus::Denied => Err(LocationError::AuthorizationDenied(provider.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_helper::get_fix;

    fn moved_fix(seconds: i64, latitude_delta: f64) -> Fix {
        let mut fix = get_fix();
        fix.time += chrono::Duration::seconds(seconds);
        fix.latitude += latitude_delta;
        fix
    }

    #[test]
    fn continuous_request_accepts_every_fix() {
        let request = LocationRequest::continuous(GPS_PROVIDER);
        let last = get_fix();
        assert!(request.accepts(None, &last));
        assert!(request.accepts(Some(&last), &get_fix()));
        assert!(request.accepts(Some(&last), &moved_fix(-5, 0.0)));
    }

    #[test]
    fn reject_fix_before_min_time() {
        let request = LocationRequest {
            min_time: Duration::from_secs(10),
            ..LocationRequest::continuous(GPS_PROVIDER)
        };
        let last = get_fix();
        assert!(!request.accepts(Some(&last), &moved_fix(5, 0.0)));
        assert!(request.accepts(Some(&last), &moved_fix(10, 0.0)));
    }

    #[test]
    fn reject_fix_below_min_distance() {
        let request = LocationRequest {
            min_distance: 100.0,
            ..LocationRequest::continuous(GPS_PROVIDER)
        };
        let last = get_fix();
        // 0.0001 degree latitude is roughly 11 meters.
        assert!(!request.accepts(Some(&last), &moved_fix(1, 0.0001)));
        assert!(request.accepts(Some(&last), &moved_fix(1, 0.01)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let request = LocationRequest::continuous("network");
        assert!(matches!(
            check_provider(&request, GPS_PROVIDER),
            Err(LocationError::UnknownProvider(name)) if name == "network"
        ));
    }
}
