//! # Matchcast Relay
//!
//! The fan-out core of the matchcast relay process.
//!
//! ```text
//! ┌──────────────┐   PUBLISH    ┌──────────────────┐
//! │ API handlers │ ───────────▶ │   message bus    │
//! └──────────────┘              └────────┬─────────┘
//!                                        │ subscribe (fixed topics)
//!                                        ▼
//!                               ┌──────────────────┐
//!                               │  BusSubscriber   │  parse, drop bad messages
//!                               └────────┬─────────┘
//!                                        │ broadcast_all
//!                                        ▼
//!                               ┌──────────────────┐
//!                               │ConnectionRegistry│  one FIFO queue per client
//!                               └────────┬─────────┘
//!                                        ▼
//!                                every open WebSocket
//! ```
//!
//! The relay keeps no durable state. A message that arrives while no
//! client is connected is simply gone; clients refetch current state
//! over the ordinary request/response API when they (re)connect.

pub mod error;
pub mod publisher;
pub mod registry;
pub mod subscriber;

pub use error::RelayError;
pub use publisher::EventPublisher;
pub use registry::{ConnectionId, ConnectionRegistry};
pub use subscriber::BusSubscriber;
