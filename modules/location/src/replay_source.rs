// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    permission::PermissionCollaborator,
    provider::{
        GPS_PROVIDER, LocationError, LocationProvider, LocationRequest, UpdateListener, authorize,
        check_provider,
    },
};
use chrono::Utc;
use common::{fix::Fix, position::Position};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Clone, Debug)]
struct ReplayConfig {
    points: Vec<Position>,
    interval: Duration,
    velocity: f32,
    accuracy: f32,
}

/// A simulated GPS that replays a recorded track.
///
/// The provider reports one point of the track per interval and starts over
/// at the first point after the last one. Each fix carries the configured
/// velocity and accuracy and the bearing towards the next point.
pub struct ReplayProvider {
    config: Arc<ReplayConfig>,
    permission: Arc<dyn PermissionCollaborator>,
    task: Option<JoinHandle<()>>,
}

impl ReplayProvider {
    pub fn new(
        points: &[Position],
        interval: Duration,
        velocity: f32,
        accuracy: f32,
        permission: Arc<dyn PermissionCollaborator>,
    ) -> Result<Self, LocationError> {
        if points.is_empty() {
            return Err(LocationError::InvalidTrack(
                "track has no positions".to_string(),
            ));
        }
        if interval.is_zero() {
            return Err(LocationError::InvalidTrack(
                "replay interval must not be zero".to_string(),
            ));
        }
        Ok(ReplayProvider {
            config: Arc::new(ReplayConfig {
                points: points.to_vec(),
                interval,
                velocity,
                accuracy,
            }),
            permission,
            task: None,
        })
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[async_trait::async_trait]
impl LocationProvider for ReplayProvider {
    fn name(&self) -> &str {
        GPS_PROVIDER
    }

    async fn request_location_updates(
        &mut self,
        request: LocationRequest,
        listener: Arc<dyn UpdateListener>,
    ) -> Result<(), LocationError> {
        check_provider(&request, GPS_PROVIDER)?;
        authorize(self.permission.as_ref(), GPS_PROVIDER)?;
        self.abort_task();
        let config = self.config.clone();
        self.task = Some(tokio::spawn(replay_task(config, request, listener)));
        debug!("Replaying track with {} points", self.config.points.len());
        Ok(())
    }

    async fn remove_updates(&mut self) -> Result<(), LocationError> {
        self.abort_task();
        authorize(self.permission.as_ref(), GPS_PROVIDER)
    }
}

impl Drop for ReplayProvider {
    fn drop(&mut self) {
        self.abort_task();
    }
}

fn replay_fix(config: &ReplayConfig, index: usize) -> Fix {
    let current = &config.points[index];
    let next = &config.points[(index + 1) % config.points.len()];
    let bearing = if current == next {
        0.0
    } else {
        current.bearing_to(next) as f32
    };
    Fix {
        latitude: current.latitude,
        longitude: current.longitude,
        speed: Some(config.velocity),
        altitude: None,
        bearing: Some(bearing),
        accuracy: Some(config.accuracy),
        time: Utc::now(),
        provider: GPS_PROVIDER.to_string(),
    }
}

async fn replay_task(
    config: Arc<ReplayConfig>,
    request: LocationRequest,
    listener: Arc<dyn UpdateListener>,
) {
    let mut timer = tokio::time::interval(config.interval);
    let mut index = 0;
    let mut last: Option<Fix> = None;
    loop {
        timer.tick().await;
        let fix = replay_fix(&config, index);
        if request.accepts(last.as_ref(), &fix) {
            listener.on_location_changed(&fix);
            last = Some(fix);
        }
        index = (index + 1) % config.points.len();
    }
}
