use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use time::{Duration, OffsetDateTime};
use ventisync_api::models::{TelemetryRequest, TelemetryResponse};

use crate::models::LocationKey;
use crate::services::{ArbiterService, CacheService};

/// Report-and-fetch contract of the window device.
///
/// Each call carries the full device state and returns the full command, so
/// retries and duplicates are harmless.
pub struct SessionService {
    arbiter: Arc<ArbiterService>,
    cache: Arc<CacheService>,
    location: LocationKey,
    liveness_timeout: Duration,
    online: AtomicBool,
}

impl SessionService {
    pub fn new(
        arbiter: Arc<ArbiterService>,
        cache: Arc<CacheService>,
        location: LocationKey,
        liveness_timeout: Duration,
    ) -> Self {
        Self {
            arbiter,
            cache,
            location,
            liveness_timeout,
            online: AtomicBool::new(false),
        }
    }

    pub fn liveness_timeout(&self) -> Duration {
        self.liveness_timeout
    }

    pub async fn handle_telemetry(
        &self,
        request: &TelemetryRequest,
        now: OffsetDateTime,
    ) -> TelemetryResponse {
        self.arbiter
            .report_physical_state(request.reported_open, now)
            .await;

        if let Some(reading) = &request.reading {
            let reading = self.cache.ingest(self.location, reading, now).await;
            tracing::debug!(
                "device reading for {}: {:.1}°C, AQI {:?}",
                self.location,
                reading.temperature_c,
                reading.european_aqi
            );
        }

        let commanded_open = self.arbiter.current_command().await;

        if commanded_open != request.reported_open {
            tracing::debug!(
                "device reports {}, commanded {}",
                request.reported_open,
                commanded_open
            );
        }

        if !self.online.swap(true, Ordering::AcqRel) {
            tracing::info!("window device online");
        }

        TelemetryResponse { commanded_open }
    }

    pub fn is_online(&self, now: OffsetDateTime) -> bool {
        self.arbiter
            .snapshot()
            .device_online(now, self.liveness_timeout)
    }

    /// Watchdog step. Returns the new liveness when it changed since the last check.
    pub fn check_liveness(&self, now: OffsetDateTime) -> Option<bool> {
        let online = self.is_online(now);
        let previous = self.online.swap(online, Ordering::AcqRel);

        if previous == online {
            return None;
        }

        if online {
            tracing::info!("window device online");
        } else {
            let last_contact = self.arbiter.snapshot().last_device_contact_at();
            tracing::warn!("window device offline, last contact {:?}", last_contact);
        }

        Some(online)
    }
}
