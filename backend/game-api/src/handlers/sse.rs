use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    metrics::SSE_CONNECTIONS_ACTIVE,
    models::timer::GameEvent,
    services::AppState,
};

/// SSE endpoint for game events (ticks, expiry, phase changes, recorded rounds)
/// GET /api/v1/game/stream
pub async fn game_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::info!("Client connected to game event stream");

    let stream = create_event_stream(state.controller.subscribe());
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Keeps the connection gauge accurate however the stream ends.
struct ConnectionGuard;

impl ConnectionGuard {
    fn new() -> Self {
        SSE_CONNECTIONS_ACTIVE.inc();
        Self
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        SSE_CONNECTIONS_ACTIVE.dec();
        tracing::debug!("Game event stream closed");
    }
}

fn to_sse_event(event: &GameEvent) -> Event {
    Event::default()
        .event(event.event_name())
        .data(event.to_sse_data())
}

/// Forwards controller events until the controller goes away. A slow client skips what it
/// missed rather than disconnecting.
fn create_event_stream(
    receiver: broadcast::Receiver<GameEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(
        (receiver, ConnectionGuard::new()),
        |(mut receiver, guard)| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some((Ok(to_sse_event(&event)), (receiver, guard))),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event stream lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        },
    )
}
