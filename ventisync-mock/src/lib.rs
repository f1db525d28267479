use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::interval;
use ventisync_api::models::{DeviceReading, TelemetryRequest, TelemetryResponse};

use crate::actuator::{Actuator, SimulatedActuator};
use crate::settings::Settings;
use crate::simulate::simulated_reading;

pub mod actuator;
pub mod settings;
mod simulate;

/// Simulated window device speaking the report-and-fetch protocol.
pub struct MockDevice<A: Actuator> {
    client: reqwest::Client,
    telemetry_url: String,
    actuator: A,
}

impl<A: Actuator> MockDevice<A> {
    pub fn new(client: reqwest::Client, telemetry_url: String, actuator: A) -> Self {
        Self {
            client,
            telemetry_url,
            actuator,
        }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn report(&self, reading: Option<DeviceReading>) -> TelemetryRequest {
        TelemetryRequest {
            reported_open: self.actuator.is_open(),
            reading,
        }
    }

    pub fn apply(&mut self, response: &TelemetryResponse) {
        self.actuator.set_position(response.commanded_open);
    }

    /// One round trip: report state, receive and execute the next command.
    ///
    /// A lost response is harmless, the next poll asks again.
    pub async fn poll_once(&mut self, reading: Option<DeviceReading>) -> Result<bool, reqwest::Error> {
        let request = self.report(reading);

        let response: TelemetryResponse = self
            .client
            .post(&self.telemetry_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!("Receive: {:?}", response);

        self.apply(&response);

        Ok(response.commanded_open)
    }
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let mut device = MockDevice::new(client, settings.telemetry_url(), SimulatedActuator::default());
    let mut rng = rand::rng();

    tracing::info!("mock window polling {}", settings.telemetry_url());

    let mut ticker = interval(Duration::from_secs(settings.mock.poll_interval_secs));
    loop {
        ticker.tick().await;

        let now = OffsetDateTime::now_utc();
        let day_fraction = (now.hour() as f64 + now.minute() as f64 / 60.0) / 24.0;
        let reading = simulated_reading(
            &mut rng,
            settings.mock.base_temperature,
            settings.mock.base_aqi,
            day_fraction,
        );

        if let Err(e) = device.poll_once(Some(reading)).await {
            tracing::warn!("telemetry round trip failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_apply() {
        let mut device = MockDevice::new(
            reqwest::Client::new(),
            "http://127.0.0.1:3000/api/device/telemetry".to_string(),
            SimulatedActuator::new(false),
        );

        assert!(!device.report(None).reported_open);

        device.apply(&TelemetryResponse { commanded_open: true });
        device.apply(&TelemetryResponse { commanded_open: true });

        assert!(device.report(None).reported_open);
        assert_eq!(device.actuator().moves(), 1);
    }
}
