//! Live connection registry with room bookkeeping.
//!
//! Owned exclusively by the relay process and shared by reference
//! between the WebSocket accept path and the subscriber dispatch path.
//! Rooms are implicit: created on first join, discarded with the
//! session. Membership is bookkeeping only; delivery scoping by room is
//! available through [`ConnectionRegistry::broadcast_to_room`] but the
//! shipped wiring routes everything through
//! [`ConnectionRegistry::broadcast_all`].

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use matchcast_protocols::ServerFrame;

/// Opaque per-connection identifier, assigned at register time.
pub type ConnectionId = String;

/// One registered client: its outbound queue and joined rooms.
struct ClientSession {
    sender: mpsc::Sender<ServerFrame>,
    rooms: HashSet<String>,
}

/// Thread-safe registry of open client connections.
///
/// Broadcast never blocks: each client's bounded FIFO queue is fed
/// with a non-blocking `try_send`, and a queue that is full or closed
/// loses that frame for that client only. The actual socket write
/// happens in the connection's own sender task, so one slow or
/// half-closed client cannot stall dispatch.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ClientSession>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection and return its assigned id.
    pub fn register(&self, sender: mpsc::Sender<ServerFrame>) -> ConnectionId {
        let id = Uuid::new_v4().to_string();
        self.connections.insert(
            id.clone(),
            ClientSession {
                sender,
                rooms: HashSet::new(),
            },
        );
        info!(connection_id = %id, "Client connected");
        id
    }

    /// Remove a connection and all its room memberships.
    ///
    /// Idempotent: unknown or already-removed ids are a no-op.
    pub fn unregister(&self, id: &str) {
        if self.connections.remove(id).is_some() {
            info!(connection_id = %id, "Client disconnected");
        }
    }

    /// Add `room` to the connection's membership set.
    ///
    /// Set semantics: joining the same room twice is a no-op. Returns
    /// false if the connection is not registered.
    pub fn join_room(&self, id: &str, room: &str) -> bool {
        match self.connections.get_mut(id) {
            Some(mut session) => {
                if session.rooms.insert(room.to_string()) {
                    info!(connection_id = %id, room = %room, "Joined room");
                }
                true
            }
            None => false,
        }
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections that have joined `room`.
    pub fn room_size(&self, room: &str) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.value().rooms.contains(room))
            .count()
    }

    /// Deliver `frame` to every registered connection.
    ///
    /// Fire-and-forget and non-blocking: a per-client queue that is
    /// closed, or full because the client stopped draining its socket,
    /// loses this frame for that client only. Nothing surfaces to the
    /// caller and dispatch never waits on any single connection. The
    /// connection's own handler notices a dead transport and
    /// unregisters it.
    pub fn broadcast_all(&self, frame: ServerFrame) {
        debug!(recipients = self.connections.len(), "Broadcasting frame");
        for entry in self.connections.iter() {
            Self::offer(entry.key(), &entry.value().sender, frame.clone());
        }
    }

    /// Deliver `frame` only to connections that joined `room`.
    pub fn broadcast_to_room(&self, room: &str, frame: ServerFrame) {
        debug!(room = %room, "Broadcasting frame to room");
        for entry in self.connections.iter() {
            if entry.value().rooms.contains(room) {
                Self::offer(entry.key(), &entry.value().sender, frame.clone());
            }
        }
    }

    fn offer(id: &str, sender: &mpsc::Sender<ServerFrame>, frame: ServerFrame) {
        match sender.try_send(frame) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(connection_id = %id, "Outbound queue full, dropping frame for this client");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(connection_id = %id, "Skipping closed connection");
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(n: i64) -> ServerFrame {
        ServerFrame::event("events-updates", json!({"seq": n}))
    }

    #[tokio::test]
    async fn test_register_assigns_unique_ids() {
        let registry = ConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::channel(8);
        let (tx2, _rx2) = mpsc::channel(8);

        let a = registry.register(tx1);
        let b = registry.register(tx2);

        assert_ne!(a, b);
        assert_eq!(registry.connection_count(), 2);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_connection() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        let (tx3, mut rx3) = mpsc::channel(8);
        registry.register(tx1);
        registry.register(tx2);
        registry.register(tx3);

        let sent = ServerFrame::event(
            "scores-updates",
            json!({
                "type": "score_update",
                "payload": {"matchId": "m1", "homeScore": 2, "awayScore": 1, "status": "LIVE"}
            }),
        );
        registry.broadcast_all(sent.clone());

        for rx in [&mut rx1, &mut rx2, &mut rx3] {
            let got = rx.recv().await.unwrap();
            assert_eq!(got, sent);
            assert!(rx.try_recv().is_err(), "delivered more than once");
        }
    }

    #[tokio::test]
    async fn test_broadcast_preserves_order_per_connection() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(8);
        registry.register(tx);

        registry.broadcast_all(frame(1));
        registry.broadcast_all(frame(2));
        registry.broadcast_all(frame(3));

        for expected in 1..=3 {
            match rx.recv().await.unwrap() {
                ServerFrame::Event { data, .. } => assert_eq!(data["seq"], expected),
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_broadcast_survives_closed_connection() {
        let registry = ConnectionRegistry::new();
        let (tx_dead, rx_dead) = mpsc::channel(8);
        let (tx_live, mut rx_live) = mpsc::channel(8);
        registry.register(tx_dead);
        registry.register(tx_live);

        // Simulate a client whose transport died mid-broadcast.
        drop(rx_dead);

        registry.broadcast_all(frame(1));
        assert_eq!(rx_live.recv().await.unwrap(), frame(1));

        // The next broadcast still works.
        registry.broadcast_all(frame(2));
        assert_eq!(rx_live.recv().await.unwrap(), frame(2));
    }

    #[tokio::test]
    async fn test_backlogged_client_does_not_stall_dispatch() {
        let registry = ConnectionRegistry::new();
        // A client with a tiny queue it never drains.
        let (tx_slow, mut rx_slow) = mpsc::channel(1);
        let (tx_live, mut rx_live) = mpsc::channel(8);
        registry.register(tx_slow);
        registry.register(tx_live);

        // First frame fills the slow client's queue.
        registry.broadcast_all(frame(1));

        // Serial broadcasts, as the subscriber loop issues them, must
        // complete promptly and keep reaching the healthy client.
        let dispatch = async {
            registry.broadcast_all(frame(2));
            registry.broadcast_all(frame(3));
        };
        tokio::time::timeout(std::time::Duration::from_millis(500), dispatch)
            .await
            .expect("dispatch stalled behind a backlogged client");

        for expected in 1..=3 {
            match rx_live.recv().await.unwrap() {
                ServerFrame::Event { data, .. } => assert_eq!(data["seq"], expected),
                other => panic!("unexpected frame: {other:?}"),
            }
        }

        // The backlogged client kept only what fit; later frames were
        // dropped for it, not queued behind it.
        assert_eq!(rx_slow.recv().await.unwrap(), frame(1));
        assert!(rx_slow.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_late_joiner_receives_nothing_retroactively() {
        let registry = ConnectionRegistry::new();
        let (tx_x, mut rx_x) = mpsc::channel(8);
        let x = registry.register(tx_x);

        registry.broadcast_all(frame(1));
        assert_eq!(rx_x.recv().await.unwrap(), frame(1));

        registry.unregister(&x);
        registry.broadcast_all(frame(2));

        // X reconnects as a fresh session and must only see what comes after.
        let (tx_x2, mut rx_x2) = mpsc::channel(8);
        registry.register(tx_x2);
        registry.broadcast_all(frame(3));

        match rx_x2.recv().await.unwrap() {
            ServerFrame::Event { data, .. } => assert_eq!(data["seq"], 3),
            other => panic!("unexpected frame: {other:?}"),
        }
        assert!(rx_x2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(8);
        let id = registry.register(tx);

        registry.unregister(&id);
        registry.unregister(&id);
        registry.unregister("never-registered");

        assert_eq!(registry.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_join_room_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(8);
        let id = registry.register(tx);

        assert!(registry.join_room(&id, "pole-7"));
        assert!(registry.join_room(&id, "pole-7"));
        assert_eq!(registry.room_size("pole-7"), 1);

        assert!(!registry.join_room("never-registered", "pole-7"));
    }

    #[tokio::test]
    async fn test_broadcast_to_room_filters_membership() {
        let registry = ConnectionRegistry::new();
        let (tx_in, mut rx_in) = mpsc::channel(8);
        let (tx_out, mut rx_out) = mpsc::channel(8);
        let member = registry.register(tx_in);
        registry.register(tx_out);
        registry.join_room(&member, "pole-7");

        registry.broadcast_to_room("pole-7", frame(1));

        assert_eq!(rx_in.recv().await.unwrap(), frame(1));
        assert!(rx_out.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_drops_room_memberships() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(8);
        let id = registry.register(tx);
        registry.join_room(&id, "pole-7");
        assert_eq!(registry.room_size("pole-7"), 1);

        registry.unregister(&id);
        assert_eq!(registry.room_size("pole-7"), 0);
    }
}
