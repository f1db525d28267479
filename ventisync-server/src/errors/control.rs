use axum::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Request must carry an action or an autoMode flag")]
    InvalidCommand,
}

impl ControlError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ControlError::InvalidCommand => StatusCode::BAD_REQUEST,
        }
    }
}
