#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use artcade_game_api::{config::Config, create_router, services::AppState};

pub const GOOD_CODE: &str = "123456";
pub const GOOD_TOKEN: &str = "good-token";

/// Requests seen by the fake Artcade backend, and its failure switches.
#[derive(Default)]
pub struct FakeBackend {
    pub scores: Mutex<Vec<u64>>,
    pub auth_headers: Mutex<Vec<String>>,
    pub fail_scores: AtomicBool,
    pub fail_feed: AtomicBool,
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub backend: Arc<FakeBackend>,
    pub base_url: String,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Builds the real router and state against a fake feed and API on an ephemeral port.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(&[]).await
}

pub async fn create_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    init_tracing();

    let backend = Arc::new(FakeBackend::default());
    let base_url = spawn_fake_backend(backend.clone()).await;

    let config = test_config(&base_url, overrides);
    let state = Arc::new(AppState::new(config).expect("Failed to initialize test app state"));

    TestApp {
        router: create_router(state.clone()),
        state,
        backend,
        base_url,
    }
}

pub fn test_config(base_url: &str, overrides: &[(&str, &str)]) -> Config {
    let storage_dir = std::env::temp_dir().join(format!("artcade-test-{}", Uuid::new_v4()));
    let feed_url = format!("{}/feed.json", base_url);

    let mut builder = config::Config::builder()
        .set_override("api.base_url", base_url)
        .unwrap()
        .set_override("storage.dir", storage_dir.to_string_lossy().to_string())
        .unwrap()
        .set_override("game.data_url", feed_url)
        .unwrap()
        .set_override("game.calculation_delay_ms", 50)
        .unwrap();
    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }

    Config::from_settings("test".to_string(), &builder.build().unwrap())
        .expect("Failed to build test configuration")
}

async fn spawn_fake_backend(backend: Arc<FakeBackend>) -> String {
    let app = Router::new()
        .route("/feed.json", get(fake_feed))
        .route("/auth/user-info", get(fake_user_info))
        .route("/auth/login/otp", post(fake_login))
        .route("/kym/gameplay", post(fake_start_gameplay))
        .route("/kym/gameplay/{id}/question", post(fake_question))
        .route("/kym/gameplay/{id}/submit", post(fake_submit_gameplay))
        .route("/kym/question/{id}/submit", post(fake_submit_question))
        .route("/scores/demo", post(fake_score))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn record_auth(backend: &FakeBackend, headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(value) = &value {
        backend.auth_headers.lock().unwrap().push(value.clone());
    }
    value
}

pub fn feed_items() -> Value {
    let items: Vec<Value> = [
        ("A", "alice", 100, 1),
        ("B", "bob", 200, 2),
        ("C", "carol", 300, 3),
        ("D", "dave", 400, 4),
        ("E", "erin", 500, 5),
    ]
    .iter()
    .enumerate()
    .map(|(i, (title, artist, supply, season))| {
        json!({
            "collection": "The Memes by 6529",
            "contract_address": "0x33fd426905f149f8376e227d0c9d3340aad17af1",
            "token_id": i + 1,
            "questions": {
                "title": title,
                "artist": artist,
                "supply": supply,
                "season": season,
            },
            "image_url": format!("https://img.example/{}.png", i + 1),
            "blurhash": "LEHV6nWB2yk8",
            "predominant_color": "#112233",
        })
    })
    .collect();

    json!({ "raw_data": items })
}

async fn fake_feed(State(backend): State<Arc<FakeBackend>>) -> impl IntoResponse {
    if backend.fail_feed.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    (StatusCode::OK, Json(feed_items()))
}

fn fake_user() -> Value {
    json!({
        "eth_address": "0xabc",
        "username": "meme-lord",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
    })
}

async fn fake_user_info(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match record_auth(&backend, &headers) {
        Some(value) if value == format!("Token {}", GOOD_TOKEN) => {
            (StatusCode::OK, Json(fake_user()))
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token." })),
        ),
    }
}

async fn fake_login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["code"] == GOOD_CODE {
        (
            StatusCode::OK,
            Json(json!({
                "token": GOOD_TOKEN,
                "expiry": "2030-01-01T00:00:00Z",
                "user": fake_user(),
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Invalid code" })),
        )
    }
}

async fn fake_start_gameplay(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    record_auth(&backend, &headers);
    Json(json!({ "id": 7 }))
}

async fn fake_question(Path(id): Path<u64>) -> impl IntoResponse {
    Json(json!({
        "id": 70 + id,
        "gameplay_id": id,
        "token_id": 12,
        "image_url": "https://img.example/12.png",
        "blurhash": "LEHV6nWB2yk8",
        "color": "#112233",
        "title_options": "A,B,C",
        "artist_options": "alice,bob",
        "supply_options": "100,200",
        "season_options": "1,2",
    }))
}

fn fake_revealed_question(question_id: u64, answers: &Value) -> Value {
    let score = if answers["title"] == "A" { 250 } else { 0 };
    json!({
        "id": question_id,
        "gameplay_id": 7,
        "token_id": 12,
        "image_url": "https://img.example/12.png",
        "blurhash": "LEHV6nWB2yk8",
        "color": "#112233",
        "title_options": "A,B,C",
        "artist_options": "alice,bob",
        "supply_options": "100,200",
        "season_options": "1,2",
        "score": score,
        "title": answers["title"],
        "artist": answers["artist"],
        "supply": answers["supply"],
        "season": answers["season"],
        "title_answer": "A",
        "artist_answer": "alice",
        "supply_answer": 100,
        "season_answer": 1,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "gameplay": 7,
    })
}

async fn fake_submit_question(
    Path(id): Path<u64>,
    Json(answers): Json<Value>,
) -> impl IntoResponse {
    Json(fake_revealed_question(id, &answers))
}

async fn fake_submit_gameplay(Path(id): Path<u64>) -> impl IntoResponse {
    if id != 7 {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })));
    }
    let answers = json!({ "title": "A", "artist": "alice", "supply": 100, "season": 1 });
    (
        StatusCode::OK,
        Json(json!({
            "id": 7,
            "score": 250,
            "questions": [fake_revealed_question(77, &answers)],
        })),
    )
}

async fn fake_score(
    State(backend): State<Arc<FakeBackend>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if backend.fail_scores.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    if let Some(score) = body["score"].as_u64() {
        backend.scores.lock().unwrap().push(score);
    }
    StatusCode::CREATED
}

/// Sends one request through the router and returns status plus JSON body.
pub async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "non-JSON body for {} {}: {}",
                method,
                uri,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, json)
}

/// Polls until `check` holds or a second has passed.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
