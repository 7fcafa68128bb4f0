//! # Matchcast API
//!
//! The external surface of the relay process:
//! - **WebSocket** (`/ws`): persistent bidirectional client
//!   connections, fed by the connection registry.
//! - **HTTP** (`/health`): liveness and connection-count introspection.
//!
//! All realtime state lives in [`matchcast_relay::ConnectionRegistry`];
//! this crate only wires transports onto it.

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod websocket;

pub use error::ApiError;
pub use http::create_router;
pub use server::RelayServer;
pub use state::AppState;
pub use websocket::ws_handler;
