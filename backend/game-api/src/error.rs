use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The feed returned nothing usable, or could not be reached.
    #[error("game data unavailable: {0}")]
    DataUnavailable(String),

    #[error("submission failed: {0}")]
    SubmissionFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("unknown criteria: {0}")]
    UnknownCriteria(String),

    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl GameError {
    /// Message safe to show the player.
    pub fn user_message(&self) -> String {
        match self {
            GameError::DataUnavailable(_) => {
                "Could not load the next round. Please try again.".to_string()
            }
            GameError::SubmissionFailed(msg) | GameError::AuthFailed(msg) => msg.clone(),
            GameError::UnknownTag(_) | GameError::UnknownCriteria(_) => self.to_string(),
            GameError::Storage(_) => "Something went wrong".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GameError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
            GameError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            GameError::UnknownTag(_) => StatusCode::NOT_FOUND,
            GameError::UnknownCriteria(_) => StatusCode::BAD_REQUEST,
            GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        (
            status,
            Json(json!({
                "message": self.user_message(),
                "status": status.as_u16()
            })),
        )
            .into_response()
    }
}
