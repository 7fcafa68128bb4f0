//! Fire-and-forget event publisher.
//!
//! The counterpart any in-process producer (or the `matchcast publish`
//! test command) uses to put an event on the bus after a successful
//! state change. Publishing is one-way: success means the bus accepted
//! the command, not that any client received the message.

use redis::AsyncCommands;
use serde_json::Value;
use tracing::debug;

use matchcast_config::BusConfig;

use crate::error::RelayError;

/// Publisher handle over a multiplexed bus connection.
pub struct EventPublisher {
    conn: redis::aio::MultiplexedConnection,
}

impl EventPublisher {
    /// Connect to the bus for publishing.
    pub async fn connect(config: &BusConfig) -> Result<Self, RelayError> {
        let client = redis::Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }

    /// Publish `data` on `topic`.
    ///
    /// An error here reflects only the local enqueue to the bus; there
    /// is no delivery acknowledgement and none is awaited.
    pub async fn publish(&mut self, topic: &str, data: &Value) -> Result<(), RelayError> {
        let payload = serde_json::to_string(data)?;
        let _: () = self.conn.publish(topic, payload).await?;
        debug!(topic = %topic, "Published event");
        Ok(())
    }
}
