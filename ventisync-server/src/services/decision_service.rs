use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use ventisync_api::models::NormalizedReading;

use crate::configs::Thresholds;
use crate::models::{LocationKey, decision_due};
use crate::services::{CacheLookup, CacheService};

/// Reading substituted when the cache never held data for the default location.
///
/// No sunlight and no air quality index, so [`decide`] always keeps the window closed.
pub fn default_reading(observed_at: OffsetDateTime) -> NormalizedReading {
    NormalizedReading {
        temperature_c: 20.0,
        wind_kph: 0.0,
        european_aqi: None,
        sunlight_pct: None,
        observed_at,
    }
}

/// Maps a reading to "should be open".
///
/// Bad air, strong wind or heat close the window. Opening needs sunlight, clean
/// air and moderate wind all at once; a missing measurement never opens.
pub fn decide(reading: &NormalizedReading, thresholds: &Thresholds) -> bool {
    let aqi = reading.european_aqi;

    let polluted = aqi.is_some_and(|aqi| aqi > thresholds.pollution_high);
    let stormy = reading.wind_kph > thresholds.wind_high;
    let hot = reading.temperature_c > thresholds.temperature_high;
    if polluted || stormy || hot {
        return false;
    }

    let clean_air = aqi.is_some_and(|aqi| aqi < thresholds.pollution_low);
    let calm = reading.wind_kph < thresholds.wind_moderate;
    let sunny = reading
        .sunlight_pct
        .is_some_and(|sunlight| sunlight > thresholds.sunlight_min);

    sunny && clean_air && calm
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    Fresh,
    Stale,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub open: bool,
    pub source: ReadingSource,
}

pub struct DecisionService {
    cache: Arc<CacheService>,
    location: LocationKey,
    thresholds: Thresholds,
    interval: Duration,
}

impl DecisionService {
    pub fn new(
        cache: Arc<CacheService>,
        location: LocationKey,
        thresholds: Thresholds,
        interval: Duration,
    ) -> Self {
        Self {
            cache,
            location,
            thresholds,
            interval,
        }
    }

    pub fn location(&self) -> LocationKey {
        self.location
    }

    pub fn decide(&self, reading: &NormalizedReading) -> bool {
        decide(reading, &self.thresholds)
    }

    /// Decides from the best reading on hand for the default location, ignoring the cadence.
    pub async fn evaluate(&self, now: OffsetDateTime) -> Decision {
        let (reading, source) = match self.cache.get(self.location, now).await {
            CacheLookup::Fresh(entry) => (entry.reading, ReadingSource::Fresh),
            CacheLookup::Stale(entry) => (entry.reading, ReadingSource::Stale),
            CacheLookup::Unavailable => (default_reading(now), ReadingSource::Default),
        };

        Decision {
            open: self.decide(&reading),
            source,
        }
    }

    /// Returns a decision only when a full interval elapsed since `last_decision_at`.
    pub async fn maybe_decide(
        &self,
        now: OffsetDateTime,
        last_decision_at: Option<OffsetDateTime>,
    ) -> Option<Decision> {
        if !decision_due(last_decision_at, now, self.interval) {
            return None;
        }

        let decision = self.evaluate(now).await;
        if decision.source == ReadingSource::Default {
            tracing::debug!(
                "no environment data for {}, deciding on the default reading",
                self.location
            );
        }

        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            pollution_high: 50,
            pollution_low: 40,
            wind_high: 40.0,
            wind_moderate: 25.0,
            sunlight_min: 60.0,
            temperature_high: 30.0,
        }
    }

    fn reading(aqi: Option<u32>, wind_kph: f64, sunlight_pct: Option<f64>) -> NormalizedReading {
        NormalizedReading {
            temperature_c: 22.0,
            wind_kph,
            european_aqi: aqi,
            sunlight_pct,
            observed_at: datetime!(2025-06-01 12:00 UTC),
        }
    }

    fn start() -> OffsetDateTime {
        datetime!(2025-06-01 12:00 UTC)
    }

    #[test]
    fn test_pollution_dominates_sunlight() {
        assert!(!decide(&reading(Some(80), 10.0, Some(90.0)), &thresholds()));
    }

    #[test]
    fn test_open_in_good_conditions() {
        assert!(decide(&reading(Some(30), 10.0, Some(70.0)), &thresholds()));
    }

    #[test]
    fn test_strong_wind_closes() {
        assert!(!decide(&reading(Some(10), 45.0, Some(95.0)), &thresholds()));
    }

    #[test]
    fn test_heat_closes() {
        let mut hot = reading(Some(10), 5.0, Some(95.0));
        hot.temperature_c = 31.0;

        assert!(!decide(&hot, &thresholds()));
    }

    #[test]
    fn test_ambiguous_conditions_stay_closed() {
        // AQI between the low and high thresholds
        assert!(!decide(&reading(Some(45), 10.0, Some(90.0)), &thresholds()));
        // wind between moderate and high
        assert!(!decide(&reading(Some(10), 30.0, Some(90.0)), &thresholds()));
        // not sunny enough
        assert!(!decide(&reading(Some(10), 10.0, Some(60.0)), &thresholds()));
        // unknown air quality or sunlight
        assert!(!decide(&reading(None, 10.0, Some(90.0)), &thresholds()));
        assert!(!decide(&reading(Some(10), 10.0, None), &thresholds()));
        // unusable wind measurement
        assert!(!decide(&reading(Some(10), f64::NAN, Some(90.0)), &thresholds()));
    }

    #[test]
    fn test_default_reading_is_closed() {
        assert!(!decide(&default_reading(start()), &thresholds()));
    }

    #[tokio::test]
    async fn test_maybe_decide_respects_interval() {
        let cache = Arc::new(CacheService::new(Duration::minutes(10)));
        let location = LocationKey::new(45.18, 5.72);
        cache.insert(location, reading(Some(30), 10.0, Some(70.0)), start()).await;
        let service = DecisionService::new(cache, location, thresholds(), Duration::minutes(15));

        let first = service.maybe_decide(start(), None).await;
        assert_eq!(
            first,
            Some(Decision {
                open: true,
                source: ReadingSource::Fresh,
            })
        );

        assert_eq!(service.maybe_decide(start() + Duration::minutes(5), Some(start())).await, None);

        let later = service
            .maybe_decide(start() + Duration::minutes(15), Some(start()))
            .await;
        assert_eq!(later.map(|decision| decision.source), Some(ReadingSource::Stale));
    }

    #[tokio::test]
    async fn test_maybe_decide_falls_back_to_default() {
        let cache = Arc::new(CacheService::new(Duration::minutes(10)));
        let service = DecisionService::new(
            cache,
            LocationKey::new(45.18, 5.72),
            thresholds(),
            Duration::minutes(15),
        );

        let decision = service.maybe_decide(start(), None).await.unwrap();

        assert!(!decision.open);
        assert_eq!(decision.source, ReadingSource::Default);
    }
}
