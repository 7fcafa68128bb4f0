//! Bus subscriber adapter.
//!
//! Bridges the external pub/sub bus to the connection registry. One
//! subscriber per relay process, bound at startup to a fixed topic
//! list. The relay is a transparent pipe: payloads are parsed only far
//! enough to know they are valid JSON, then forwarded verbatim.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, info, warn};

use matchcast_config::BusConfig;
use matchcast_protocols::ServerFrame;

use crate::error::RelayError;
use crate::registry::ConnectionRegistry;

/// Subscriber half of the relay.
///
/// [`BusSubscriber::connect`] establishes the subscription; any failure
/// there is fatal to the process so supervision can restart it, rather
/// than running silently with no event source.
pub struct BusSubscriber {
    pubsub: redis::aio::PubSub,
    registry: Arc<ConnectionRegistry>,
}

impl BusSubscriber {
    /// Open the pub/sub connection and subscribe to every configured topic.
    pub async fn connect(
        config: &BusConfig,
        registry: Arc<ConnectionRegistry>,
    ) -> Result<Self, RelayError> {
        let client = redis::Client::open(config.url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;
        for topic in &config.topics {
            pubsub.subscribe(topic).await?;
        }
        info!(url = %config.url, topics = ?config.topics, "Subscribed to bus");
        Ok(Self { pubsub, registry })
    }

    /// Receive loop for the lifetime of the process.
    ///
    /// Returns an error only when the bus connection itself is gone;
    /// individual bad messages are dropped inside [`dispatch_raw`].
    pub async fn run(mut self) -> Result<(), RelayError> {
        let mut stream = self.pubsub.on_message();
        while let Some(msg) = stream.next().await {
            let topic = msg.get_channel_name().to_string();
            dispatch_raw(&self.registry, &topic, msg.get_payload_bytes());
        }
        Err(RelayError::Bus(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "bus subscription stream closed",
        ))))
    }
}

/// Parse one raw bus message and fan it out.
///
/// Parse failure drops that single message with a warning; it never
/// stalls delivery of subsequent messages. The topic name becomes the
/// event name the client sees; it is not used to select recipients.
pub fn dispatch_raw(registry: &ConnectionRegistry, topic: &str, raw: &[u8]) {
    match serde_json::from_slice::<Value>(raw) {
        Ok(data) => {
            debug!(topic = %topic, "Dispatching bus message");
            registry.broadcast_all(ServerFrame::event(topic, data));
        }
        Err(err) => {
            warn!(topic = %topic, error = %err, "Dropping undeserializable bus message");
        }
    }
}
