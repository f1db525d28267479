use std::sync::Arc;

use axum::Router;
use time::OffsetDateTime;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::handles::*;
use crate::services::{
    ArbiterService, CacheService, DecisionService, OpenMeteoProvider, Scheduler, SessionService,
    WeatherProvider,
};

/// The coordinator's services, wired together but not yet running.
pub struct AppContext {
    pub cache: Arc<CacheService>,
    pub arbiter: Arc<ArbiterService>,
    pub decision: Arc<DecisionService>,
    pub session: Arc<SessionService>,
    pub scheduler: Arc<Scheduler>,
}

impl AppContext {
    pub fn new(settings: &Settings, provider: Arc<dyn WeatherProvider>) -> Self {
        let location = settings.location.default_key();
        let decision_interval = settings.decision.interval();
        let liveness_timeout = settings.device.liveness_timeout();

        let cache = Arc::new(CacheService::new(settings.cache.ttl()));
        let arbiter = Arc::new(ArbiterService::new(
            decision_interval,
            liveness_timeout,
            OffsetDateTime::now_utc(),
        ));
        let decision = Arc::new(DecisionService::new(
            cache.clone(),
            location,
            settings.decision.thresholds.clone(),
            decision_interval,
        ));
        let session = Arc::new(SessionService::new(
            arbiter.clone(),
            cache.clone(),
            location,
            liveness_timeout,
        ));
        let scheduler = Arc::new(Scheduler::new(
            cache.clone(),
            provider,
            decision.clone(),
            arbiter.clone(),
            session.clone(),
            settings.location.keys(),
            settings.cache.refresh_interval(),
            settings.decision.poll_interval(),
        ));

        Self {
            cache,
            arbiter,
            decision,
            session,
            scheduler,
        }
    }

    pub fn router(&self) -> Router {
        let liveness_timeout = self.session.liveness_timeout();

        Router::new()
            .merge(device_router(DeviceState {
                session: self.session.clone(),
            }))
            .merge(control_router(ControlState {
                arbiter: self.arbiter.clone(),
                liveness_timeout,
            }))
            .merge(status_router(StatusState {
                arbiter: self.arbiter.clone(),
                liveness_timeout,
            }))
            .merge(environment_router(EnvironmentState {
                cache: self.cache.clone(),
                decision: self.decision.clone(),
            }))
            .merge(docs_router())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }
}

/// Builds the router and starts the refresh and decision loops.
pub fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    let provider = Arc::new(OpenMeteoProvider::new(&settings.weather)?);
    let context = AppContext::new(settings, provider);

    // supervisors log if a loop dies, nothing awaits them here
    let _supervisors = context.scheduler.start();

    tracing::info!(
        "coordinating window for {} ({} location(s) refreshed every {:?})",
        settings.location.default_key(),
        settings.location.keys().len(),
        settings.cache.refresh_interval()
    );

    Ok(context.router())
}
