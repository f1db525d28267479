use axum::http::StatusCode;

use crate::models::LocationKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    #[error("No environmental data has been fetched for {0} yet")]
    Unavailable(LocationKey),
}

impl EnvironmentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EnvironmentError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
