use std::env;
use std::time::Duration as StdDuration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use time::Duration;
use ventisync_api::models::Coordinates;

use crate::models::LocationKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    pub forecast_url: String,
    pub air_quality_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cache {
    pub ttl_secs: u64,
    pub refresh_interval_secs: u64,
}

impl Cache {
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_secs as i64)
    }

    pub fn refresh_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.refresh_interval_secs)
    }
}

/// Limits the decision engine compares a reading against.
///
/// Pollution values are European AQI points, wind is km/h, sunlight is percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub pollution_high: u32,
    pub pollution_low: u32,
    pub wind_high: f64,
    pub wind_moderate: f64,
    pub sunlight_min: f64,
    pub temperature_high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub interval_secs: u64,
    pub poll_interval_secs: u64,
    pub thresholds: Thresholds,
}

impl Decision {
    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_secs as i64)
    }

    pub fn poll_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub default: Coordinates,
    #[serde(default)]
    pub extra: Vec<Coordinates>,
}

impl Location {
    pub fn default_key(&self) -> LocationKey {
        LocationKey::from(self.default)
    }

    /// Every distinct location the background refresh keeps warm, default first.
    pub fn keys(&self) -> Vec<LocationKey> {
        let mut keys = vec![self.default_key()];
        for coordinates in &self.extra {
            let key = LocationKey::from(*coordinates);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub liveness_timeout_secs: u64,
}

impl Device {
    pub fn liveness_timeout(&self) -> Duration {
        Duration::seconds(self.liveness_timeout_secs as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub weather: Weather,
    pub cache: Cache,
    pub decision: Decision,
    pub location: Location,
    pub device: Device,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Overrides such as `VENTISYNC_CACHE__TTL_SECS`: prefix `VENTISYNC_`, and
    /// `__` between nesting levels since keys themselves contain `_`.
    pub fn environment() -> Environment {
        Environment::with_prefix("VENTISYNC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Parses a TOML document without consulting the filesystem or environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = &self.decision.thresholds;

        if thresholds.pollution_low > thresholds.pollution_high {
            return Err(ConfigError::Message(format!(
                "pollution_low ({}) exceeds pollution_high ({})",
                thresholds.pollution_low, thresholds.pollution_high
            )));
        }

        if thresholds.wind_moderate > thresholds.wind_high {
            return Err(ConfigError::Message(format!(
                "wind_moderate ({}) exceeds wind_high ({})",
                thresholds.wind_moderate, thresholds.wind_high
            )));
        }

        let intervals = [
            ("cache.ttl_secs", self.cache.ttl_secs),
            ("cache.refresh_interval_secs", self.cache.refresh_interval_secs),
            ("decision.interval_secs", self.decision.interval_secs),
            ("decision.poll_interval_secs", self.decision.poll_interval_secs),
            ("device.liveness_timeout_secs", self.device.liveness_timeout_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Message(format!("{name} must be greater than zero")));
        }

        Ok(())
    }
}
