//! WebSocket frame types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Control frames sent by a client over its WebSocket.
///
/// `join-room` is the only control frame; disconnect is implicit on
/// transport close. Wire names are kebab-case to stay compatible with
/// the existing browser clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    /// Join a named room. Rooms are created implicitly on first join.
    JoinRoom { room: String },
}

/// Frames sent by the relay to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    /// Connection established, carries the assigned connection id.
    Connected { connection_id: String },

    /// A bus message fanned out to this client. `event` is the topic
    /// name; `data` is the published JSON verbatim.
    Event { event: String, data: Value },
}

impl ServerFrame {
    pub fn event(event: impl Into<String>, data: Value) -> Self {
        Self::Event {
            event: event.into(),
            data,
        }
    }
}
