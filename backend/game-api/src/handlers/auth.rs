use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use super::respond;
use crate::{
    error::GameError,
    extractors::AppJson,
    models::api::{ApiResponse, LoginData, LoginOtpRequest, User},
    services::AppState,
};

/// POST /api/v1/auth/login - Link the account with a one-time code
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginOtpRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        tracing::warn!("Rejected login request: {}", e);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginData>::failure(format!(
                "Validation error: {}",
                e
            ))),
        );
    }

    let result = state.api.login_otp(&req.code).await;
    if let Err(e) = &result {
        tracing::warn!("Account link failed: {}", e);
    }
    respond(result)
}

/// GET /api/v1/auth/user-info
pub async fn user_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result: Result<User, GameError> = state.api.get_user_info().await;
    respond(result)
}

/// POST /api/v1/auth/logout - Forget the stored token
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.api.logout().await)
}
