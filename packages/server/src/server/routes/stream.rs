//! SSE streaming endpoint.
//!
//! GET /realtime
//!
//! Forwards every mutation notification to connected clients. The SSE event
//! name is the notification name (`cubiculo.updated`, ...) and the data is
//! its JSON payload. Open to anonymous listeners.

use std::convert::Infallible;

use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::debug;

use crate::server::app::AppState;

/// SSE stream handler.
///
/// Slow clients that fall behind the broadcast buffer receive a `lagged`
/// event with the number of missed notifications and keep streaming.
pub async fn stream_handler(
    Extension(state): Extension<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.deps.notifier.subscribe();
    debug!(listeners = state.deps.notifier.listener_count(), "Realtime client connected");

    // Stream with connected event and lag handling
    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(notification) => Event::default()
                .event(&notification.event)
                .json_data(&notification.payload)
                .ok()
                .map(Ok),
            Err(BroadcastStreamRecvError::Lagged(n)) => Event::default()
                .event("lagged")
                .json_data(&serde_json::json!({"missed": n}))
                .ok()
                .map(Ok),
        }
    });

    Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}
