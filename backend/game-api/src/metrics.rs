use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Feed Metrics
    pub static ref FEED_FETCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_fetch_total",
        "Total number of game-data feed fetches",
        &["status"]
    )
    .unwrap();

    pub static ref FEED_FETCH_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_fetch_duration_seconds",
        "Game-data feed fetch duration in seconds",
        &["status"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .unwrap();

    // Game Metrics
    pub static ref GAMES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "games_total",
        "Total number of games",
        &["status"]
    )
    .unwrap();

    pub static ref ROUNDS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rounds_submitted_total",
        "Total number of rounds recorded",
        &["trigger"]
    )
    .unwrap();

    pub static ref ANSWERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_total",
        "Per-category answers recorded",
        &["correct"]
    )
    .unwrap();

    pub static ref SCORE_SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "score_submissions_total",
        "Final score submissions to the remote API",
        &["status"]
    )
    .unwrap();

    pub static ref SSE_CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        "sse_connections_active",
        "Number of active SSE connections"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a feed fetch with metrics
pub async fn track_feed_fetch<F, T, E>(future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    FEED_FETCH_TOTAL.with_label_values(&[status]).inc();
    FEED_FETCH_DURATION_SECONDS
        .with_label_values(&[status])
        .observe(duration);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/health", "200"])
            .get();
        let _ = GAMES_TOTAL.with_label_values(&["started"]).get();
    }

    #[test]
    fn test_render_metrics() {
        ROUNDS_SUBMITTED_TOTAL.with_label_values(&["timeout"]).inc();

        let output = render_metrics().unwrap();
        assert!(output.contains("rounds_submitted_total"));
    }

    #[tokio::test]
    async fn test_track_feed_fetch_counts_errors() {
        let before = FEED_FETCH_TOTAL.with_label_values(&["error"]).get();
        let result: Result<(), &str> = track_feed_fetch(async { Err("offline") }).await;
        assert!(result.is_err());
        assert!(FEED_FETCH_TOTAL.with_label_values(&["error"]).get() > before);
    }
}
