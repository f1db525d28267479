use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, Response, StatusCode};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use ventisync_api::models::NormalizedReading;
use ventisync_server::app::AppContext;
use ventisync_server::configs::Settings;
use ventisync_server::errors::FetchError;
use ventisync_server::models::LocationKey;
use ventisync_server::services::WeatherProvider;

pub const DEFAULT_CONFIG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../configs/default.toml"
));

/// Provider answering every location with the same reading, or failing.
pub struct StaticProvider {
    reading: Option<NormalizedReading>,
}

impl StaticProvider {
    pub fn sunny() -> Self {
        Self {
            reading: Some(NormalizedReading {
                temperature_c: 22.0,
                wind_kph: 10.0,
                european_aqi: Some(30),
                sunlight_pct: Some(70.0),
                observed_at: OffsetDateTime::now_utc(),
            }),
        }
    }

    pub fn polluted() -> Self {
        Self {
            reading: Some(NormalizedReading {
                temperature_c: 22.0,
                wind_kph: 10.0,
                european_aqi: Some(80),
                sunlight_pct: Some(90.0),
                observed_at: OffsetDateTime::now_utc(),
            }),
        }
    }

    pub fn offline() -> Self {
        Self { reading: None }
    }
}

#[async_trait]
impl WeatherProvider for StaticProvider {
    async fn fetch(&self, _key: LocationKey) -> Result<NormalizedReading, FetchError> {
        self.reading.clone().ok_or(FetchError::Status(503))
    }
}

pub struct MockApp {
    pub settings: Settings,
    pub context: AppContext,
    pub router: Router,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_provider(StaticProvider::sunny())
    }

    pub fn with_provider(provider: StaticProvider) -> Self {
        Self::with_config(DEFAULT_CONFIG, provider)
    }

    pub fn with_config(config: &str, provider: StaticProvider) -> Self {
        let settings = Settings::from_toml(config).unwrap();
        let context = AppContext::new(&settings, Arc::new(provider));
        let router = context.router();

        Self {
            settings,
            context,
            router,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };

        (status, value)
    }

    /// Sends a GET and hands back the response unread, for streaming bodies.
    pub async fn open(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }
}
