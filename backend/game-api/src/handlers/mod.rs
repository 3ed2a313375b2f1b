use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::error::GameError;
use crate::metrics;
use crate::models::{api::ApiResponse, registry};
use crate::services::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.controller.snapshot().await;
    let feed = if state.config.feed_url().is_some() {
        "configured"
    } else {
        "missing"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "artcade-game-api",
            "version": env!("CARGO_PKG_VERSION"),
            "game": {
                "type": state.config.game_type.id(),
                "mode": state.config.game_mode.id(),
                "feed": feed,
                "phase": snapshot.phase,
                "round": snapshot.current_round,
            }
        })),
    )
}

/// Wraps a remote-API result in the uniform `{ success, data, error }` body, with the
/// error's status code on failure.
pub(crate) fn respond<T: serde::Serialize>(
    result: Result<T, GameError>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };
    (status, Json(ApiResponse::from(result)))
}

/// GET /api/v1/games
pub async fn list_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(registry::listing(
        state.config.game_type,
        state.config.game_mode,
    ))
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Metrics authentication middleware - protects /metrics endpoint with HTTP Basic Auth
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Get Authorization header
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if it's Basic auth
    if !auth_header.starts_with("Basic ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // Decode base64 credentials
    let encoded = &auth_header[6..];
    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Get expected credentials from environment variable
    // Format: username:password
    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());

    // Compare credentials
    if credentials != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // Credentials are valid, proceed with request
    Ok(next.run(request).await)
}

pub mod auth;
pub mod game;
pub mod kym;
pub mod sse;
