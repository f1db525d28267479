use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use ventisync_api::models::{DeviceReading, NormalizedReading};

use crate::errors::FetchError;
use crate::models::LocationKey;
use crate::services::WeatherProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: LocationKey,
    pub reading: NormalizedReading,
    pub fetched_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fresh(CacheEntry),
    /// Older than the TTL, still good enough for display
    Stale(CacheEntry),
    /// Nothing was ever fetched for the key
    Unavailable,
}

impl CacheLookup {
    pub fn entry(&self) -> Option<&CacheEntry> {
        match self {
            CacheLookup::Fresh(entry) | CacheLookup::Stale(entry) => Some(entry),
            CacheLookup::Unavailable => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, CacheLookup::Fresh(_))
    }
}

/// Latest environmental reading per location.
///
/// Reads only take the lock, they never reach the network. Writers swap whole
/// entries, so a reader sees either the old reading or the new one.
pub struct CacheService {
    entries: RwLock<HashMap<LocationKey, CacheEntry>>,
    ttl: Duration,
}

impl CacheService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get(&self, key: LocationKey, now: OffsetDateTime) -> CacheLookup {
        let entries = self.entries.read().await;

        match entries.get(&key) {
            Some(entry) => self.classify(entry, now),
            None => CacheLookup::Unavailable,
        }
    }

    fn classify(&self, entry: &CacheEntry, now: OffsetDateTime) -> CacheLookup {
        if now - entry.fetched_at < self.ttl {
            CacheLookup::Fresh(entry.clone())
        } else {
            CacheLookup::Stale(entry.clone())
        }
    }

    /// Fetches a new reading and replaces the entry for `key`.
    ///
    /// On failure the previous entry is kept untouched.
    pub async fn refresh(
        &self,
        key: LocationKey,
        provider: &dyn WeatherProvider,
        now: OffsetDateTime,
    ) -> Result<NormalizedReading, FetchError> {
        match provider.fetch(key).await {
            Ok(reading) => {
                self.insert(key, reading.clone(), now).await;
                tracing::debug!("refreshed environment for {}", key);

                Ok(reading)
            }
            Err(e) => {
                let kept = self.entries.read().await.contains_key(&key);
                tracing::warn!(
                    "environment refresh for {} failed, keeping {}: {}",
                    key,
                    if kept { "previous reading" } else { "no reading" },
                    e
                );

                Err(e)
            }
        }
    }

    /// Stores a reading measured by the device itself.
    ///
    /// The device reports temperature and optionally AQI; wind and sunlight
    /// carry over from the previous entry so the replacement stays complete.
    /// The entry is only as fresh as its oldest field, so a carried-over entry
    /// keeps the previous `fetched_at`.
    pub async fn ingest(
        &self,
        key: LocationKey,
        device_reading: &DeviceReading,
        now: OffsetDateTime,
    ) -> NormalizedReading {
        let mut entries = self.entries.write().await;
        let fetched_at = entries
            .get(&key)
            .map_or(now, |entry| entry.fetched_at.min(now));
        let previous = entries.get(&key).map(|entry| &entry.reading);

        let reading = NormalizedReading {
            temperature_c: device_reading.temperature_c,
            wind_kph: previous.map_or(0.0, |reading| reading.wind_kph),
            european_aqi: device_reading
                .european_aqi
                .or_else(|| previous.and_then(|reading| reading.european_aqi)),
            sunlight_pct: previous.and_then(|reading| reading.sunlight_pct),
            observed_at: now,
        };

        entries.insert(
            key,
            CacheEntry {
                key,
                reading: reading.clone(),
                fetched_at,
            },
        );

        reading
    }

    pub async fn insert(&self, key: LocationKey, reading: NormalizedReading, fetched_at: OffsetDateTime) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                key,
                reading,
                fetched_at,
            },
        );
    }

    /// Every cached location, sorted by key, each classified against `now`.
    pub async fn snapshot(&self, now: OffsetDateTime) -> Vec<CacheLookup> {
        let entries = self.entries.read().await;
        let mut sorted: Vec<&CacheEntry> = entries.values().collect();
        sorted.sort_by_key(|entry| entry.key);

        sorted.into_iter().map(|entry| self.classify(entry, now)).collect()
    }
}
