use super::{ControlError, EnvironmentError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Control error: {0}")]
    ControlError(#[from] ControlError),

    #[error("Environment error: {0}")]
    EnvironmentError(#[from] EnvironmentError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
