use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use ventisync_api::models::NormalizedReading;

use crate::configs::Weather;
use crate::errors::FetchError;
use crate::models::LocationKey;

const FORECAST_FIELDS: &str = "temperature_2m,wind_speed_10m,cloud_cover,is_day";
const AIR_QUALITY_FIELDS: &str = "european_aqi";

/// Best-effort source of environmental readings.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, key: LocationKey) -> Result<NormalizedReading, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    current: ForecastCurrent,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    temperature_2m: f64,
    wind_speed_10m: f64,
    cloud_cover: Option<f64>,
    is_day: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct AirQualityPayload {
    current: AirQualityCurrent,
}

#[derive(Debug, Deserialize)]
struct AirQualityCurrent {
    european_aqi: Option<f64>,
}

/// open-meteo client: forecast for temperature, wind and sunlight, air quality for AQI.
pub struct OpenMeteoProvider {
    client: reqwest::Client,
    forecast_url: String,
    air_quality_url: String,
}

impl OpenMeteoProvider {
    pub fn new(weather: &Weather) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(weather.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            forecast_url: weather.forecast_url.clone(),
            air_quality_url: weather.air_quality_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        key: LocationKey,
        fields: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", key.latitude().to_string()),
                ("longitude", key.longitude().to_string()),
                ("current", fields.to_string()),
                ("wind_speed_unit", "kmh".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch(&self, key: LocationKey) -> Result<NormalizedReading, FetchError> {
        let forecast: ForecastPayload = self
            .get_json(&self.forecast_url, key, FORECAST_FIELDS)
            .await?;

        // Air quality coverage is patchy, a missing index must not discard the forecast.
        let air_quality = match self
            .get_json::<AirQualityPayload>(&self.air_quality_url, key, AIR_QUALITY_FIELDS)
            .await
        {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("air quality lookup for {} failed: {}", key, e);
                None
            }
        };

        Ok(normalize(forecast, air_quality, OffsetDateTime::now_utc()))
    }
}

fn normalize(
    forecast: ForecastPayload,
    air_quality: Option<AirQualityPayload>,
    observed_at: OffsetDateTime,
) -> NormalizedReading {
    let current = forecast.current;

    let sunlight_pct = match (current.is_day, current.cloud_cover) {
        (Some(0), _) => Some(0.0),
        (_, Some(cloud_cover)) => Some((100.0 - cloud_cover).clamp(0.0, 100.0)),
        _ => None,
    };

    let european_aqi = air_quality
        .and_then(|payload| payload.current.european_aqi)
        .filter(|aqi| aqi.is_finite() && *aqi >= 0.0)
        .map(|aqi| aqi.round() as u32);

    NormalizedReading {
        temperature_c: current.temperature_2m,
        wind_kph: current.wind_speed_10m,
        european_aqi,
        sunlight_pct,
        observed_at,
    }
}
