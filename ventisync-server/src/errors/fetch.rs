/// Failure talking to an external data provider.
///
/// Recovered by the refresh task; never surfaced to devices or clients.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider answered with status {0}")]
    Status(u16),

    #[error("Malformed provider payload: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        FetchError::Parse(value.to_string())
    }
}
