use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use super::respond;
use crate::{extractors::AppJson, models::api::KymAnswers, services::AppState};

/// POST /api/v1/kym/gameplay - Open a scored gameplay on the Artcade backend
pub async fn start_gameplay(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::info!("Starting remote gameplay");
    respond(state.api.start_gameplay().await)
}

/// POST /api/v1/kym/gameplay/{id}/question
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Path(gameplay_id): Path<u64>,
) -> impl IntoResponse {
    respond(state.api.create_question(gameplay_id).await)
}

/// POST /api/v1/kym/question/{id}/submit - Answer a backend-issued question
pub async fn submit_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<u64>,
    AppJson(answers): AppJson<KymAnswers>,
) -> impl IntoResponse {
    tracing::debug!("Submitting answers for question {}", question_id);
    respond(state.api.submit_question(question_id, &answers).await)
}

/// POST /api/v1/kym/gameplay/{id}/submit - Close the gameplay and fetch its score
pub async fn submit_gameplay(
    State(state): State<Arc<AppState>>,
    Path(gameplay_id): Path<u64>,
) -> impl IntoResponse {
    tracing::info!("Submitting remote gameplay {}", gameplay_id);
    respond(state.api.submit_gameplay(gameplay_id).await)
}
