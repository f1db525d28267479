use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Weather and air quality snapshot for one location.
///
/// Readings are replaced as a whole, never patched field by field.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReading {
    /// Air temperature in Celsius
    pub temperature_c: f64,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// European air quality index, absent when no station covers the area
    pub european_aqi: Option<u32>,
    /// Share of available sunlight in percent
    pub sunlight_pct: Option<f64>,
    /// Observation time
    #[serde(with = "time::serde::rfc3339")]
    pub observed_at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentResponse {
    /// Cached location, rounded to the cache precision
    pub location: Coordinates,
    pub reading: NormalizedReading,
    /// Whether the reading is younger than the cache TTL
    pub fresh: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    /// What the decision engine would command for this reading
    pub recommendation: bool,
}
