//! # Matchcast Protocols
//!
//! Wire types shared by the relay process, in-repo publishers, and the
//! browser clients. Bus payloads are carried as opaque
//! `serde_json::Value`s end to end; the only structured types are the
//! WebSocket control and server frames.

pub mod frame;

pub use frame::{ClientFrame, ServerFrame};
