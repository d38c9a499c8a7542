//! WebSocket viewer transport.
//!
//! Each connection joins the relay's hub and receives one `rfid-list` frame
//! on join and one after every recorded scan. Frames carry the whole
//! history, so a viewer that falls behind simply skips to the newest one.

use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Extension, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use rfid_core::{ScanRelay, Snapshot, BROADCAST_EVENT_NAME};
use serde::Serialize;
use std::sync::Arc;

/// Outgoing WebSocket frame.
#[derive(Debug, Serialize)]
pub struct ListFrame<'a> {
    /// Always [`BROADCAST_EVENT_NAME`].
    pub event: &'static str,
    /// Current history, oldest first.
    pub data: &'a Snapshot,
}

impl<'a> ListFrame<'a> {
    pub fn new(data: &'a Snapshot) -> Self {
        Self {
            event: BROADCAST_EVENT_NAME,
            data,
        }
    }
}

/// WebSocket handler: `GET /ws`.
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let relay = state.relay.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Drives one viewer connection until either side goes away.
async fn handle_socket(socket: WebSocket, relay: Arc<ScanRelay>) {
    let mut subscription = relay.subscribe();
    let observer = subscription.id();
    tracing::info!(%observer, "viewer connected");

    let (mut sender, mut receiver) = socket.split();

    // Forward snapshots to the socket. The subscription lives in this task,
    // so aborting it leaves the hub.
    let mut send_task = tokio::spawn(async move {
        while let Some(snapshot) = subscription.next().await {
            let frame = match serde_json::to_string(&ListFrame::new(&snapshot)) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!(%observer, "failed to serialize rfid-list frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Viewers never send anything meaningful; drain until close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(%observer, "viewer disconnected");
}
