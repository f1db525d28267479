use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{MissedTickBehavior, interval};

use crate::models::{AutoOutcome, LocationKey};
use crate::services::{ArbiterService, CacheService, DecisionService, SessionService, WeatherProvider};

/// Periodic work: one loop refreshes the cache, the other takes decisions.
///
/// The loops share nothing but the services they write into.
pub struct Scheduler {
    cache: Arc<CacheService>,
    provider: Arc<dyn WeatherProvider>,
    decision: Arc<DecisionService>,
    arbiter: Arc<ArbiterService>,
    session: Arc<SessionService>,
    locations: Vec<LocationKey>,
    refresh_interval: Duration,
    poll_interval: Duration,
}

impl Scheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cache: Arc<CacheService>,
        provider: Arc<dyn WeatherProvider>,
        decision: Arc<DecisionService>,
        arbiter: Arc<ArbiterService>,
        session: Arc<SessionService>,
        locations: Vec<LocationKey>,
        refresh_interval: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            cache,
            provider,
            decision,
            arbiter,
            session,
            locations,
            refresh_interval,
            poll_interval,
        }
    }

    /// Spawns both loops. The returned handles resolve when a loop ends, which
    /// only happens if it panicked or was cancelled.
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<Result<(), JoinError>>> {
        vec![
            tokio::spawn(supervise("refresh", self.spawn_refresh_task())),
            tokio::spawn(supervise("decision", self.spawn_decision_task())),
        ]
    }

    fn spawn_refresh_task(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                scheduler.refresh_all(OffsetDateTime::now_utc()).await;
            }
        })
    }

    fn spawn_decision_task(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                scheduler.decision_tick(OffsetDateTime::now_utc()).await;
            }
        })
    }

    /// Refreshes every configured location once. Returns how many succeeded.
    pub async fn refresh_all(&self, now: OffsetDateTime) -> usize {
        let mut refreshed = 0;

        for key in &self.locations {
            if self.cache.refresh(*key, self.provider.as_ref(), now).await.is_ok() {
                refreshed += 1;
            }
        }

        refreshed
    }

    /// One evaluation of the decision loop, plus the device liveness watchdog.
    pub async fn decision_tick(&self, now: OffsetDateTime) -> Option<AutoOutcome> {
        self.session.check_liveness(now);

        let last_decision_at = self.arbiter.snapshot().last_decision_at();
        let decision = self.decision.maybe_decide(now, last_decision_at).await?;

        tracing::debug!(
            "decision from {:?} reading: open = {}",
            decision.source,
            decision.open
        );

        Some(self.arbiter.apply_automatic_decision(decision.open, now).await)
    }
}

/// Waits for a background loop and logs how it ended.
pub async fn supervise(name: &'static str, handle: JoinHandle<()>) -> Result<(), JoinError> {
    let result = handle.await;

    match &result {
        Ok(()) => tracing::warn!("{} loop exited", name),
        Err(e) if e.is_panic() => tracing::error!("{} loop panicked: {}", name, e),
        Err(e) => tracing::warn!("{} loop cancelled: {}", name, e),
    }

    result
}
