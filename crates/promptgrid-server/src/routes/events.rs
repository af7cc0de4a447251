//! Server-Sent Events (SSE) endpoint for real-time notifications.
//!
//! Clients subscribe to a token and receive its committed ledger events
//! instead of polling the details endpoint.
//!
//! Endpoint: GET /prompts/{id}/events
//!
//! # Event Types
//!
//! - `prompt_purchased`, `prompt_rated`, `prompt_deactivated`: per-token
//!   lifecycle events
//! - `listing_fee_updated`: fee-schedule changes, fanned out to every stream
//! - `heartbeat`: sent every 30 seconds to keep the connection alive
//! - `catchup`: sent when the client falls behind and should refetch state
//!
//! # Example
//!
//! ```text
//! event: prompt_purchased
//! data: {"type":"prompt_purchased","token_id":3,"buyer":"...","price":500,...}
//!
//! event: heartbeat
//! data: {"timestamp":"2024-01-01T00:00:00Z"}
//! ```

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use promptgrid_core::TokenId;

use crate::error::ApiError;
use crate::events::HEARTBEAT_INTERVAL_SECS;
use crate::state::AppState;

/// Payload of a `catchup` event: the client lagged and missed events.
#[derive(Debug, Serialize)]
struct CatchupPayload {
    events_missed: u64,
    token_id: TokenId,
}

/// GET /prompts/{id}/events - Subscribe to real-time events for one token.
///
/// Returns a Server-Sent Events stream that emits an event whenever the token
/// is purchased, rated, or deactivated, plus fee-schedule updates. Heartbeats
/// keep the connection alive.
///
/// # Response
///
/// - 200 OK: SSE stream (Content-Type: text/event-stream)
/// - 404 Not Found: no such token
///
/// # Backpressure
///
/// If a client falls behind (channel buffer overflows), a `catchup` event is
/// sent indicating how many events were missed. The client should refetch the
/// token details and rating log to sync up.
async fn subscribe_events(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let token_id = TokenId(id);

    // Validate the token exists before opening a stream.
    {
        let ledger = state.ledger().read().await;
        ledger.prompt_details(token_id)?;
    }

    let receiver = state.broadcaster().subscribe(token_id).await;

    tracing::info!(token_id = %token_id, "client subscribed to SSE events");

    let stream = stream::unfold((receiver, token_id), move |(mut rx, tid)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(data) => {
                        let sse_event = Event::default().event(event.name()).data(data);
                        return Some((Ok(sse_event), (rx, tid)));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to serialize event");
                        continue;
                    }
                },
                Err(RecvError::Lagged(count)) => {
                    tracing::warn!(
                        token_id = %tid,
                        events_missed = count,
                        "SSE client lagged, sending catchup event"
                    );

                    let catchup = CatchupPayload {
                        events_missed: count,
                        token_id: tid,
                    };
                    match serde_json::to_string(&catchup) {
                        Ok(data) => {
                            let sse_event = Event::default().event("catchup").data(data);
                            return Some((Ok(sse_event), (rx, tid)));
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to serialize catchup event");
                            continue;
                        }
                    }
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(token_id = %tid, "event channel closed, ending SSE stream");
                    return None;
                }
            }
        }
    });

    let keep_alive = KeepAlive::new()
        .interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS))
        .event(Event::default().event("heartbeat").data("{}"));

    Ok(Sse::new(stream).keep_alive(keep_alive))
}

/// Build SSE event routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/prompts/{id}/events", get(subscribe_events))
}
