//! # Matchcast Config
//!
//! TOML configuration for the relay process: the HTTP/WebSocket bind
//! address and the message bus subscription. Supports `${VAR}`
//! environment expansion so deployments can inject the bus URL.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BusConfig, Config, ServerConfig};
