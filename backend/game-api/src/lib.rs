use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::GameError;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The PWA is served from its own origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(middlewares::trace::TRACE_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(middlewares::trace::TRACE_ID_HEADER)])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .route("/api/v1/games", get(handlers::list_games))
        .merge(game_routes())
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/kym", kym_routes())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(
                    middlewares::trace::trace_context_middleware,
                ))
                .layer(middleware::from_fn(
                    middlewares::metrics::metrics_middleware,
                ))
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
}

fn game_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/game", get(handlers::game::get_game))
        .route("/api/v1/game/start", post(handlers::game::start_game))
        .route("/api/v1/game/selections", post(handlers::game::select_tag))
        .route(
            "/api/v1/game/selections/{criteria}",
            delete(handlers::game::reset_tag),
        )
        .route("/api/v1/game/submit", post(handlers::game::submit_round))
        .route("/api/v1/game/next", post(handlers::game::next_round))
        .route("/api/v1/game/summary", get(handlers::game::get_summary))
        .route("/api/v1/game/stream", get(handlers::sse::game_stream))
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/user-info", get(handlers::auth::user_info))
        .route("/logout", post(handlers::auth::logout))
}

fn kym_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/gameplay", post(handlers::kym::start_gameplay))
        .route(
            "/gameplay/{id}/question",
            post(handlers::kym::create_question),
        )
        .route("/gameplay/{id}/submit", post(handlers::kym::submit_gameplay))
        .route("/question/{id}/submit", post(handlers::kym::submit_question))
}
