use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    error::GameError,
    extractors::AppJson,
    models::{api::SelectTagRequest, Criteria},
    services::AppState,
};

/// GET /api/v1/game - Current session snapshot
pub async fn get_game(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.snapshot().await)
}

/// POST /api/v1/game/start - Start a new game
pub async fn start_game(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!("Starting new game");
    let snapshot = state.controller.start_new_game().await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// POST /api/v1/game/selections - Select a tag for its category
pub async fn select_tag(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SelectTagRequest>,
) -> Result<impl IntoResponse, GameError> {
    let snapshot = state.controller.select_tag(&req.tag_id).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/game/selections/{criteria} - Clear one category
pub async fn reset_tag(
    State(state): State<Arc<AppState>>,
    Path(criteria): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let criteria: Criteria = criteria.parse()?;
    Ok(Json(state.controller.reset_tag(criteria).await))
}

/// POST /api/v1/game/submit
pub async fn submit_round(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.submit_round().await)
}

/// POST /api/v1/game/next
pub async fn next_round(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, GameError> {
    Ok(Json(state.controller.next_round().await?))
}

/// GET /api/v1/game/summary - Rounds, total and tickets earned
pub async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.summary().await)
}
