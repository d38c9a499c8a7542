//! SSE viewer transport.

use crate::AppState;
use axum::{
    extract::Extension,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
};
use futures_util::{stream, Stream};
use rfid_core::BROADCAST_EVENT_NAME;
use std::{convert::Infallible, sync::Arc};
use tokio_stream::StreamExt;

/// Handler for `GET /events/stream`.
///
/// Streams `rfid-list` events carrying the full history as a JSON array:
/// once on connect, then after every recorded scan. The subscription is
/// dropped with the response stream, which leaves the hub.
pub async fn get_list_stream_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.relay.subscribe();
    tracing::info!(observer = %subscription.id(), "sse viewer connected");

    let snapshots = stream::unfold(subscription, |mut subscription| async move {
        let snapshot = subscription.next().await?;
        Some((snapshot, subscription))
    });

    let events = snapshots.filter_map(|snapshot| {
        match Event::default().event(BROADCAST_EVENT_NAME).json_data(&snapshot) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::error!("failed to serialize rfid-list event: {}", e);
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
