use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid input, detected before any mutation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Email already registered
    #[error("{0}")]
    DuplicateIdentity(String),

    #[error("Invalid email or password!")]
    InvalidCredentials,

    /// The email provider failed. Any preceding write stays committed.
    #[error("{0}")]
    Notification(String),

    /// Storage failure or any other unexpected error
    #[error("Server error")]
    External(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateIdentity(_) | Self::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Notification(_) | Self::External(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::External(e) => {
                error!("Server error: {:#}", e);
                json!({ "success": false, "message": self.to_string(), "error": format!("{:#}", e) })
            }
            Self::Notification(message) => {
                error!("Notification failed: {}", message);
                json!({ "success": false, "message": message })
            }
            other => {
                warn!("Request rejected ({}): {}", status, other);
                json!({ "success": false, "message": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
