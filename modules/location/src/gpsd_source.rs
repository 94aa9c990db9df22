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
use chrono::{DateTime, Utc};
use common::fix::Fix;
use futures::StreamExt;
use gpsd_proto::{self, Tpv};
use std::{
    io::{self, ErrorKind},
    net::SocketAddr,
    str::FromStr,
    sync::Arc,
};
use tokio::{io::AsyncWriteExt, net::TcpStream, task::JoinHandle};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, trace, warn};

/// GPSD daemon based location provider.
///
/// Every registration opens a new connection to the daemon and enables the
/// JSON watch mode. The connection is closed when the updates are removed.
pub struct GpsdProvider {
    /// The address of the GPSD daemon, e.g. `127.0.0.1:2947`.
    address: String,
    permission: Arc<dyn PermissionCollaborator>,
    /// Handle to the task that constantly reads from the GPSD
    reader: Option<JoinHandle<()>>,
}

impl GpsdProvider {
    pub fn new(address: &str, permission: Arc<dyn PermissionCollaborator>) -> Self {
        GpsdProvider {
            address: address.to_string(),
            permission,
            reader: None,
        }
    }

    fn abort_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

#[async_trait::async_trait]
impl LocationProvider for GpsdProvider {
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
        self.abort_reader();
        let stream = connect(&self.address).await?;
        self.reader = Some(tokio::spawn(gpsd_reader(stream, request, listener)));
        Ok(())
    }

    /// Stops reading from the daemon. Without permission the updates are still
    /// stopped but the denial is reported.
    async fn remove_updates(&mut self) -> Result<(), LocationError> {
        self.abort_reader();
        authorize(self.permission.as_ref(), GPS_PROVIDER)
    }
}

impl Drop for GpsdProvider {
    fn drop(&mut self) {
        self.abort_reader();
    }
}

fn unavailable(source: io::Error) -> LocationError {
    LocationError::ProviderUnavailable {
        provider: GPS_PROVIDER.to_string(),
        source,
    }
}

/// Opens the connection to the daemon and enables the watch mode.
async fn connect(address: &str) -> Result<TcpStream, LocationError> {
    let address: SocketAddr = address
        .parse()
        .map_err(|e| unavailable(io::Error::new(ErrorKind::InvalidInput, e)))?;
    let mut stream = TcpStream::connect(address).await.map_err(unavailable)?;
    stream
        .write_all(gpsd_proto::ENABLE_WATCH_CMD.as_bytes())
        .await
        .map_err(unavailable)?;
    debug!("Connected to GPSD at {address}");
    Ok(stream)
}

/// Converts a TPV report into a fix. Reports without position are skipped.
pub fn fix_from_tpv(tpv: &Tpv) -> Option<Fix> {
    let latitude = tpv.lat?;
    let longitude = tpv.lon?;
    let time = tpv
        .time
        .as_ref()
        .and_then(|time| DateTime::<Utc>::from_str(time).ok())
        .unwrap_or_else(Utc::now);
    Some(Fix {
        latitude,
        longitude,
        speed: tpv.speed.map(|speed| speed as f32),
        altitude: tpv.alt.map(|alt| alt as f64),
        bearing: tpv.track.map(|track| track as f32),
        accuracy: horizontal_accuracy(
            tpv.epx.map(|epx| epx as f32),
            tpv.epy.map(|epy| epy as f32),
        ),
        time,
        provider: GPS_PROVIDER.to_string(),
    })
}

/// The larger of the longitude and latitude error estimates in meters.
fn horizontal_accuracy(epx: Option<f32>, epy: Option<f32>) -> Option<f32> {
    match (epx, epy) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

async fn gpsd_reader(stream: TcpStream, request: LocationRequest, listener: Arc<dyn UpdateListener>) {
    let mut framed = Framed::new(stream, LinesCodec::new());
    let mut last: Option<Fix> = None;
    while let Some(result) = framed.next().await {
        match result {
            Ok(ref line) => {
                let Ok(tpv) = serde_json::from_str::<Tpv>(line) else {
                    trace!("Skipping GPSD message {line}");
                    continue;
                };
                let Some(fix) = fix_from_tpv(&tpv) else {
                    continue;
                };
                if request.accepts(last.as_ref(), &fix) {
                    listener.on_location_changed(&fix);
                    last = Some(fix);
                }
            }
            Err(e) => {
                warn!("GPSD receive error {e:?}");
            }
        }
    }
    debug!("GPSD connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_uses_larger_error_estimate() {
        assert_eq!(horizontal_accuracy(Some(3.0), Some(4.5)), Some(4.5));
        assert_eq!(horizontal_accuracy(None, Some(2.0)), Some(2.0));
        assert_eq!(horizontal_accuracy(Some(2.0), None), Some(2.0));
        assert_eq!(horizontal_accuracy(None, None), None);
    }
}
