//! WebSocket handler implementation.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use matchcast_protocols::{ClientFrame, ServerFrame};

use crate::state::AppState;

/// Outbound queue depth per connection. A client that falls this far
/// behind starts losing frames; it never backpressures the dispatch
/// loop.
const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = tokio::sync::mpsc::channel::<ServerFrame>(OUTBOUND_QUEUE_CAPACITY);

    let connection_id = state.registry.register(tx);

    // Send connected frame
    let connected = ServerFrame::Connected {
        connection_id: connection_id.clone(),
    };
    if let Ok(json) = serde_json::to_string(&connected) {
        let _ = sender.send(Message::Text(json.into())).await;
    }

    // Spawn sender task
    let sender_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&frame) {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming frames
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientFrame>(&text) {
                Ok(ClientFrame::JoinRoom { room }) => {
                    state.registry.join_room(&connection_id, &room);
                }
                Err(_) => {
                    // The relay imposes no contract on client frames
                    // beyond join-room; anything else is ignored.
                    warn!(connection_id = %connection_id, "Ignoring unparseable client frame");
                }
            },
            Ok(Message::Close(_)) => {
                debug!(connection_id = %connection_id, "Client sent close");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup affects only this connection; broadcasts in flight to
    // other clients are untouched.
    state.registry.unregister(&connection_id);
    sender_task.abort();
}
